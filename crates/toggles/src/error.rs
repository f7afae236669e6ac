// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for toggle resolution.

use thiserror::Error;
use toggles_config::ConfigError;
use toggles_core::StoreError;

/// Result type alias for toggle operations.
pub type Result<T> = std::result::Result<T, ToggleError>;

/// Errors surfaced to callers of the resolver and the toggle service.
///
/// Missing keys and refused connections never appear here: they resolve to the
/// configured default.
#[derive(Debug, Error)]
pub enum ToggleError {
	/// Remote store failure that is not recovered from.
	#[error(transparent)]
	Remote(#[from] StoreError),

	/// Invalid or incomplete configuration.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The process-wide service was used before `init`/`configure`.
	#[error("toggle service has not been initialized")]
	NotInitialized,
}
