// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved toggle configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Default environment discriminator appended to remote keys.
pub const DEFAULT_KEY_SUFFIX: &str = "suffix";
/// Default remote store scheme.
pub const DEFAULT_SCHEME: &str = "http";
/// Default remote store host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default remote store port (etcd v2 client port).
pub const DEFAULT_PORT: u16 = 4001;

/// Connection parameters handed to the remote store client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteClientParams {
	pub scheme: String,
	pub host: String,
	pub port: u16,
	/// Per-request timeout. `None` leaves timeouts to the transport defaults.
	pub timeout: Option<Duration>,
}

impl RemoteClientParams {
	/// Base URL of the store, e.g. `http://127.0.0.1:4001`.
	pub fn endpoint(&self) -> String {
		format!("{}://{}:{}", self.scheme, self.host, self.port)
	}
}

impl Default for RemoteClientParams {
	fn default() -> Self {
		Self {
			scheme: DEFAULT_SCHEME.to_string(),
			host: DEFAULT_HOST.to_string(),
			port: DEFAULT_PORT,
			timeout: None,
		}
	}
}

/// Immutable toggle settings.
///
/// Built once per process or per test. Replacing the configuration means
/// building a new value and a new resolver around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleConfig {
	enabled: bool,
	app_name: String,
	key_suffix: String,
	remote: RemoteClientParams,
	cache_toggles: bool,
}

impl ToggleConfig {
	pub fn builder() -> ToggleConfigBuilder {
		ToggleConfigBuilder::new()
	}

	/// Whether remote resolution is attempted at all.
	pub fn enabled(&self) -> bool {
		self.enabled
	}

	/// Namespace segment of remote keys.
	pub fn app_name(&self) -> &str {
		&self.app_name
	}

	/// Environment discriminator appended to remote keys.
	pub fn key_suffix(&self) -> &str {
		&self.key_suffix
	}

	pub fn remote(&self) -> &RemoteClientParams {
		&self.remote
	}

	/// Whether successful remote lookups are memoized.
	pub fn cache_toggles(&self) -> bool {
		self.cache_toggles
	}
}

/// Builder for [`ToggleConfig`].
#[derive(Debug, Clone)]
pub struct ToggleConfigBuilder {
	enabled: bool,
	app_name: Option<String>,
	key_suffix: String,
	remote: RemoteClientParams,
	cache_toggles: bool,
}

impl ToggleConfigBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			enabled: true,
			app_name: None,
			key_suffix: DEFAULT_KEY_SUFFIX.to_string(),
			remote: RemoteClientParams::default(),
			cache_toggles: false,
		}
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Sets the application namespace. Required.
	pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
		self.app_name = Some(app_name.into());
		self
	}

	/// Sets the environment discriminator.
	///
	/// Example: `production`, `staging`, `test`
	pub fn key_suffix(mut self, key_suffix: impl Into<String>) -> Self {
		self.key_suffix = key_suffix.into();
		self
	}

	pub fn remote(mut self, remote: RemoteClientParams) -> Self {
		self.remote = remote;
		self
	}

	pub fn cache_toggles(mut self, cache_toggles: bool) -> Self {
		self.cache_toggles = cache_toggles;
		self
	}

	pub fn build(self) -> Result<ToggleConfig, ConfigError> {
		let app_name = self
			.app_name
			.filter(|name| !name.trim().is_empty())
			.ok_or_else(|| ConfigError::missing_field("app_name"))?;

		Ok(ToggleConfig {
			enabled: self.enabled,
			app_name,
			key_suffix: self.key_suffix,
			remote: self.remote,
			cache_toggles: self.cache_toggles,
		})
	}
}

impl Default for ToggleConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}
