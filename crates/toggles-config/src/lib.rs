// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the feature toggle resolver.
//!
//! This crate provides:
//! - [`ToggleConfig`]: immutable settings built once per process (or per test)
//! - [`ToggleConfigLayer`]: partial settings, the shape accepted by `configure`
//! - Layered loading from defaults, a TOML file and `TOGGLES_*` environment
//!   variables
//!
//! # Usage
//!
//! ```ignore
//! use toggles_config::ToggleConfig;
//!
//! let config = ToggleConfig::builder()
//!     .app_name("checkout")
//!     .key_suffix("prod")
//!     .cache_toggles(true)
//!     .build()?;
//!
//! // Or from /etc/toggles/toggles.toml plus the environment:
//! let config = toggles_config::load_config()?;
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod sources;

pub use config::{
	RemoteClientParams, ToggleConfig, ToggleConfigBuilder, DEFAULT_HOST, DEFAULT_KEY_SUFFIX,
	DEFAULT_PORT, DEFAULT_SCHEME,
};
pub use error::ConfigError;
pub use layer::{RemoteConfigLayer, ToggleConfigLayer};
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, LayerSource, Precedence, TomlSource,
};

use std::path::PathBuf;

use tracing::{debug, info};

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TOGGLES_*`)
/// 2. Config file (`/etc/toggles/toggles.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ToggleConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::process()),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ToggleConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::process()),
	])
}

/// Merge an arbitrary set of sources in precedence order and finalize.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ToggleConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ToggleConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let config = merged.finalize()?;

	info!(
		app_name = %config.app_name(),
		key_suffix = %config.key_suffix(),
		enabled = config.enabled(),
		cache_toggles = config.cache_toggles(),
		endpoint = %config.remote().endpoint(),
		"Toggle configuration loaded"
	);

	Ok(config)
}
