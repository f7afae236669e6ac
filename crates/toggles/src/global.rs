// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide toggle service.
//!
//! Nothing is initialized implicitly: call [`init`] or [`configure`] during
//! startup, then use [`service`] (or the [`is_on`]/[`is_off`] shortcuts)
//! anywhere. Re-initializing replaces the service wholesale, dropping its
//! overrides, defaults and cache. Test harnesses should call
//! [`reset_for_testing`] between cases.

use parking_lot::RwLock;
use toggles_config::{ToggleConfig, ToggleConfigLayer};
use tracing::{debug, info};

use crate::error::{Result, ToggleError};
use crate::service::ToggleService;

static GLOBAL: RwLock<Option<ToggleService>> = parking_lot::const_rwlock(None);

/// Installs a service built from `config`.
pub fn init(config: ToggleConfig) -> ToggleService {
	install(ToggleService::new(config))
}

/// Installs a service built from partial options.
pub fn configure(options: ToggleConfigLayer) -> Result<ToggleService> {
	Ok(install(ToggleService::from_options(options)?))
}

/// Installs an already built service, replacing any previous one.
pub fn install(service: ToggleService) -> ToggleService {
	let previous = GLOBAL.write().replace(service.clone());
	if previous.is_some() {
		info!(app_name = %service.config().app_name(), "Replaced process-wide toggle service");
	} else {
		debug!(app_name = %service.config().app_name(), "Installed process-wide toggle service");
	}
	service
}

/// Returns the installed service.
pub fn service() -> Result<ToggleService> {
	GLOBAL.read().clone().ok_or(ToggleError::NotInitialized)
}

pub fn is_initialized() -> bool {
	GLOBAL.read().is_some()
}

/// Removes the installed service.
pub fn reset_for_testing() {
	GLOBAL.write().take();
}

pub async fn is_on(key: impl AsRef<str>) -> Result<bool> {
	service()?.is_on(key).await
}

pub async fn is_off(key: impl AsRef<str>) -> Result<bool> {
	service()?.is_off(key).await
}
