// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Three-tier toggle resolution: override, remote store, default.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::OnceCell;
use toggles_config::ToggleConfig;
use toggles_core::{QualifiedKey, SharedRemoteStore, StoreError, ToggleValue};
use toggles_etcd::EtcdClient;
use tracing::{debug, error, trace};

use crate::error::{Result, ToggleError};
use crate::reporter::{ErrorReport, SharedErrorReporter};

/// Resolves raw toggle values.
///
/// Lookup order for a key:
/// 1. override, if one is set (even when set to [`ToggleValue::Unset`])
/// 2. remote store, when remote resolution is enabled
/// 3. default, when remote resolution is disabled or the key is missing or the
///    store refuses connections
/// 4. [`ToggleValue::Unset`]
///
/// Successful remote values are memoized for the resolver's lifetime when
/// `cache_toggles` is on. Misses are never cached.
///
/// All state is lock-protected and no lock is held across an `.await`, so a
/// resolver can be shared between tasks and threads.
pub struct Resolver {
	config: Arc<ToggleConfig>,
	overrides: RwLock<HashMap<String, ToggleValue>>,
	defaults: RwLock<HashMap<String, ToggleValue>>,
	cache: RwLock<HashMap<QualifiedKey, ToggleValue>>,
	/// Built on first remote lookup unless injected.
	store: OnceCell<SharedRemoteStore>,
	reporter: Option<SharedErrorReporter>,
}

impl Resolver {
	/// Creates a resolver that talks to the etcd store described by the config.
	pub fn new(config: ToggleConfig) -> Self {
		Self::from_parts(config, None, None)
	}

	/// Creates a resolver that uses `store` for remote lookups.
	pub fn with_store(config: ToggleConfig, store: SharedRemoteStore) -> Self {
		Self::from_parts(config, Some(store), None)
	}

	pub(crate) fn from_parts(
		config: ToggleConfig,
		store: Option<SharedRemoteStore>,
		reporter: Option<SharedErrorReporter>,
	) -> Self {
		Self {
			config: Arc::new(config),
			overrides: RwLock::new(HashMap::new()),
			defaults: RwLock::new(HashMap::new()),
			cache: RwLock::new(HashMap::new()),
			store: OnceCell::new_with(store),
			reporter,
		}
	}

	pub fn config(&self) -> &ToggleConfig {
		&self.config
	}

	pub fn enabled(&self) -> bool {
		self.config.enabled()
	}

	pub fn app_name(&self) -> &str {
		self.config.app_name()
	}

	pub fn key_suffix(&self) -> &str {
		self.config.key_suffix()
	}

	/// Fully-qualified remote path for `key`.
	pub fn qualified_key(&self, key: &str) -> QualifiedKey {
		QualifiedKey::new(self.config.app_name(), key, self.config.key_suffix())
	}

	/// Resolves the raw value for `key`.
	///
	/// Only remote failures other than "not found" and "connection refused"
	/// are returned as errors.
	pub async fn get(&self, key: impl AsRef<str>) -> Result<ToggleValue> {
		let key = key.as_ref();

		let overridden = self.overrides.read().get(key).cloned();
		if let Some(value) = overridden {
			trace!(key = %key, value = %value, "toggle resolved from override");
			return Ok(value);
		}

		if self.config.enabled() {
			self.retrieve_value(key).await
		} else {
			trace!(key = %key, "remote resolution disabled, using default");
			Ok(self.default_value_for(key))
		}
	}

	/// The configured default for `key`, or [`ToggleValue::Unset`].
	pub fn default_value_for(&self, key: impl AsRef<str>) -> ToggleValue {
		self.defaults
			.read()
			.get(key.as_ref())
			.cloned()
			.unwrap_or_default()
	}

	pub fn set_override(&self, key: impl Into<String>, value: impl Into<ToggleValue>) {
		let key = key.into();
		let value = value.into();
		debug!(key = %key, value = %value, "override set");
		self.overrides.write().insert(key, value);
	}

	pub fn unset_override(&self, key: impl AsRef<str>) {
		let key = key.as_ref();
		if self.overrides.write().remove(key).is_some() {
			debug!(key = %key, "override removed");
		}
	}

	pub fn clear_overrides(&self) {
		self.overrides.write().clear();
		debug!("overrides cleared");
	}

	pub fn has_override(&self, key: impl AsRef<str>) -> bool {
		self.overrides.read().contains_key(key.as_ref())
	}

	pub fn override_count(&self) -> usize {
		self.overrides.read().len()
	}

	pub fn set_default(&self, key: impl Into<String>, value: impl Into<ToggleValue>) {
		let key = key.into();
		let value = value.into();
		debug!(key = %key, value = %value, "default set");
		self.defaults.write().insert(key, value);
	}

	pub fn unset_default(&self, key: impl AsRef<str>) {
		let key = key.as_ref();
		if self.defaults.write().remove(key).is_some() {
			debug!(key = %key, "default removed");
		}
	}

	pub fn clear_defaults(&self) {
		self.defaults.write().clear();
		debug!("defaults cleared");
	}

	pub fn has_default(&self, key: impl AsRef<str>) -> bool {
		self.defaults.read().contains_key(key.as_ref())
	}

	pub fn default_count(&self) -> usize {
		self.defaults.read().len()
	}

	/// Number of memoized remote values.
	pub fn cached_len(&self) -> usize {
		self.cache.read().len()
	}

	async fn retrieve_value(&self, key: &str) -> Result<ToggleValue> {
		let qualified = self.qualified_key(key);

		if self.config.cache_toggles() {
			let cached = self.cache.read().get(&qualified).cloned();
			if let Some(value) = cached {
				trace!(key = %key, final_key = %qualified, "toggle resolved from cache");
				return Ok(value);
			}
		}

		let store = self.store().await?;

		match store.get(&qualified).await {
			Ok(value) => {
				trace!(key = %key, final_key = %qualified, value = %value, "toggle resolved from store");
				if self.config.cache_toggles() {
					self.cache.write().insert(qualified, value.clone());
				}
				Ok(value)
			}
			Err(StoreError::NotFound { .. }) => {
				error!(key = %key, final_key = %qualified, "Feature toggle key not found in toggle store");
				Ok(self.default_value_for(key))
			}
			Err(err @ StoreError::ConnectionRefused { .. }) => {
				error!(
					key = %key,
					final_key = %qualified,
					error = %err,
					"Cannot connect to toggle store"
				);
				if let Some(reporter) = &self.reporter {
					reporter
						.notify(ErrorReport::new(key, &qualified, &err))
						.await;
				}
				Ok(self.default_value_for(key))
			}
			Err(err) => Err(err.into()),
		}
	}

	async fn store(&self) -> Result<&SharedRemoteStore> {
		self.store
			.get_or_try_init(|| async {
				let client = EtcdClient::new(self.config.remote())?;
				Ok::<SharedRemoteStore, ToggleError>(Arc::new(client))
			})
			.await
	}
}

impl std::fmt::Debug for Resolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Resolver")
			.field("config", &self.config)
			.field("overrides", &self.override_count())
			.field("defaults", &self.default_count())
			.field("cached", &self.cached_len())
			.field("store_connected", &self.store.initialized())
			.field("has_reporter", &self.reporter.is_some())
			.finish()
	}
}
