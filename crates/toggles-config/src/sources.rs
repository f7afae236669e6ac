// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files and environment variables.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::{RemoteConfigLayer, ToggleConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	CommandLine = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ToggleConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ToggleConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ToggleConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/toggles/toggles.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ToggleConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ToggleConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ToggleConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// An explicit layer, e.g. options parsed from command-line flags.
pub struct LayerSource {
	name: &'static str,
	precedence: Precedence,
	layer: ToggleConfigLayer,
}

impl LayerSource {
	pub fn new(name: &'static str, precedence: Precedence, layer: ToggleConfigLayer) -> Self {
		Self {
			name,
			precedence,
			layer,
		}
	}

	pub fn command_line(layer: ToggleConfigLayer) -> Self {
		Self::new("command-line", Precedence::CommandLine, layer)
	}
}

impl ConfigSource for LayerSource {
	fn name(&self) -> &'static str {
		self.name
	}

	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ToggleConfigLayer, ConfigError> {
		Ok(self.layer.clone())
	}
}

/// Environment variable source.
///
/// Convention: `TOGGLES_<FIELD>`, with remote client settings under
/// `TOGGLES_ETCD_<FIELD>`.
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads from the process environment.
	pub fn process() -> Self {
		Self { vars: None }
	}

	/// Reads from a fixed set of variables instead of the process environment.
	pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(
				vars.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		let value = match &self.vars {
			Some(vars) => vars.get(name).cloned(),
			None => std::env::var(name).ok(),
		};
		value.filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn u16(&self, name: &str) -> Result<Option<u16>, ConfigError> {
		match self.var(name) {
			Some(v) => v
				.parse()
				.map(Some)
				.map_err(|_| ConfigError::invalid_value(name, format!("invalid u16 value '{v}'"))),
			None => Ok(None),
		}
	}

	fn u64(&self, name: &str) -> Result<Option<u64>, ConfigError> {
		match self.var(name) {
			Some(v) => v
				.parse()
				.map(Some)
				.map_err(|_| ConfigError::invalid_value(name, format!("invalid u64 value '{v}'"))),
			None => Ok(None),
		}
	}

	fn load_remote(&self) -> Result<Option<RemoteConfigLayer>, ConfigError> {
		let remote = RemoteConfigLayer {
			scheme: self.var("TOGGLES_ETCD_SCHEME"),
			host: self.var("TOGGLES_ETCD_HOST"),
			port: self.u16("TOGGLES_ETCD_PORT")?,
			timeout_secs: self.u64("TOGGLES_ETCD_TIMEOUT_SECS")?,
		};

		if remote == RemoteConfigLayer::default() {
			Ok(None)
		} else {
			Ok(Some(remote))
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ToggleConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ToggleConfigLayer {
			enabled: self.bool("TOGGLES_ENABLED"),
			app_name: self.var("TOGGLES_APP_NAME"),
			key_suffix: self.var("TOGGLES_KEY_SUFFIX"),
			cache_toggles: self.bool("TOGGLES_CACHE"),
			remote: self.load_remote()?,
		})
	}
}
