// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layers.
//!
//! Every field is optional so layers from different sources can be merged;
//! set fields of a later layer win.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{RemoteClientParams, ToggleConfig};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfigLayer {
	pub scheme: Option<String>,
	pub host: Option<String>,
	pub port: Option<u16>,
	pub timeout_secs: Option<u64>,
}

impl RemoteConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.scheme.is_some() {
			self.scheme = other.scheme;
		}
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> RemoteClientParams {
		let defaults = RemoteClientParams::default();
		RemoteClientParams {
			scheme: self.scheme.unwrap_or(defaults.scheme),
			host: self.host.unwrap_or(defaults.host),
			port: self.port.unwrap_or(defaults.port),
			timeout: self.timeout_secs.map(Duration::from_secs),
		}
	}
}

/// Toggle options as accepted by `configure`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToggleConfigLayer {
	pub enabled: Option<bool>,
	pub app_name: Option<String>,
	pub key_suffix: Option<String>,
	pub cache_toggles: Option<bool>,
	pub remote: Option<RemoteConfigLayer>,
}

impl ToggleConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.app_name.is_some() {
			self.app_name = other.app_name;
		}
		if other.key_suffix.is_some() {
			self.key_suffix = other.key_suffix;
		}
		if other.cache_toggles.is_some() {
			self.cache_toggles = other.cache_toggles;
		}
		if let Some(remote) = other.remote {
			self.remote.get_or_insert_with(Default::default).merge(remote);
		}
	}

	/// Applies defaults and validates. Fails when `app_name` is missing.
	pub fn finalize(self) -> Result<ToggleConfig, ConfigError> {
		let mut builder = ToggleConfig::builder()
			.remote(self.remote.unwrap_or_default().finalize());

		if let Some(enabled) = self.enabled {
			builder = builder.enabled(enabled);
		}
		if let Some(app_name) = self.app_name {
			builder = builder.app_name(app_name);
		}
		if let Some(key_suffix) = self.key_suffix {
			builder = builder.key_suffix(key_suffix);
		}
		if let Some(cache_toggles) = self.cache_toggles {
			builder = builder.cache_toggles(cache_toggles);
		}

		builder.build()
	}
}
