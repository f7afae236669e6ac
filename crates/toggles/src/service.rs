// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Boolean toggle facade over the resolver.

use std::sync::Arc;

use toggles_config::{ConfigError, ToggleConfig, ToggleConfigLayer};
use toggles_core::{RemoteStore, SharedRemoteStore, ToggleValue};
use tracing::info;

use crate::error::Result;
use crate::reporter::{ErrorReporter, SharedErrorReporter};
use crate::resolver::Resolver;

/// Builder for constructing a [`ToggleService`].
pub struct ToggleServiceBuilder {
	config: Option<ToggleConfig>,
	remote_store: Option<SharedRemoteStore>,
	error_reporter: Option<SharedErrorReporter>,
}

impl ToggleServiceBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			config: None,
			remote_store: None,
			error_reporter: None,
		}
	}

	/// Sets the toggle configuration. Required.
	pub fn config(mut self, config: ToggleConfig) -> Self {
		self.config = Some(config);
		self
	}

	/// Uses `store` for remote lookups instead of an etcd client built from
	/// the configuration.
	pub fn remote_store(mut self, store: impl RemoteStore) -> Self {
		self.remote_store = Some(Arc::new(store));
		self
	}

	pub fn shared_remote_store(mut self, store: SharedRemoteStore) -> Self {
		self.remote_store = Some(store);
		self
	}

	/// Sets the collaborator notified when the toggle store is unreachable.
	pub fn error_reporter(mut self, reporter: impl ErrorReporter) -> Self {
		self.error_reporter = Some(Arc::new(reporter));
		self
	}

	pub fn shared_error_reporter(mut self, reporter: SharedErrorReporter) -> Self {
		self.error_reporter = Some(reporter);
		self
	}

	pub fn build(self) -> Result<ToggleService> {
		let config = self
			.config
			.ok_or_else(|| ConfigError::missing_field("config"))?;

		Ok(ToggleService::assemble(
			config,
			self.remote_store,
			self.error_reporter,
		))
	}
}

impl Default for ToggleServiceBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Answers "is this feature on?" for the current process.
///
/// A toggle is on only when it resolves to `true`, `1` or `"true"`; any
/// other value, including no value at all, is off.
///
/// # Example
///
/// ```ignore
/// use toggles::{ToggleConfig, ToggleService};
///
/// let service = ToggleService::new(
///     ToggleConfig::builder().app_name("checkout").key_suffix("prod").build()?,
/// );
///
/// // Fall back to "on" if the store has no value for the key.
/// service.default_on("new_flow");
///
/// if service.is_on("new_flow").await? {
///     // ...
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ToggleService {
	resolver: Arc<Resolver>,
}

impl ToggleService {
	/// Creates a service that resolves remotely through etcd.
	pub fn new(config: ToggleConfig) -> Self {
		Self::assemble(config, None, None)
	}

	/// Builds a service from partial options, applying defaults.
	pub fn from_options(options: ToggleConfigLayer) -> Result<Self> {
		Ok(Self::new(options.finalize()?))
	}

	pub fn builder() -> ToggleServiceBuilder {
		ToggleServiceBuilder::new()
	}

	pub fn resolver(&self) -> &Resolver {
		&self.resolver
	}

	pub fn config(&self) -> &ToggleConfig {
		self.resolver.config()
	}

	/// Whether remote resolution is enabled.
	pub fn enabled(&self) -> bool {
		self.resolver.enabled()
	}

	/// Resolves the raw value behind `key`.
	pub async fn resolve(&self, key: impl AsRef<str>) -> Result<ToggleValue> {
		self.resolver.get(key).await
	}

	pub async fn is_on(&self, key: impl AsRef<str>) -> Result<bool> {
		Ok(self.resolver.get(key).await?.is_on())
	}

	pub async fn is_off(&self, key: impl AsRef<str>) -> Result<bool> {
		Ok(!self.is_on(key).await?)
	}

	pub fn default_on(&self, key: impl Into<String>) {
		self.set_default(key.into(), true);
	}

	pub fn default_off(&self, key: impl Into<String>) {
		self.set_default(key.into(), false);
	}

	pub fn override_on(&self, key: impl Into<String>) {
		self.set_override(key.into(), true);
	}

	pub fn override_off(&self, key: impl Into<String>) {
		self.set_override(key.into(), false);
	}

	pub fn unset_override(&self, key: impl AsRef<str>) {
		self.resolver.unset_override(key);
	}

	pub fn clear_overrides(&self) {
		self.resolver.clear_overrides();
	}

	pub fn unset_default(&self, key: impl AsRef<str>) {
		self.resolver.unset_default(key);
	}

	pub fn clear_defaults(&self) {
		self.resolver.clear_defaults();
	}

	fn assemble(
		config: ToggleConfig,
		remote_store: Option<SharedRemoteStore>,
		error_reporter: Option<SharedErrorReporter>,
	) -> Self {
		info!(
			app_name = %config.app_name(),
			key_suffix = %config.key_suffix(),
			enabled = config.enabled(),
			cache_toggles = config.cache_toggles(),
			"Toggle service initialized"
		);

		Self {
			resolver: Arc::new(Resolver::from_parts(config, remote_store, error_reporter)),
		}
	}

	fn set_default(&self, key: String, on: bool) {
		info!(key = %key, state = state_name(on), "Feature toggle default set");
		self.resolver.set_default(key, on);
	}

	fn set_override(&self, key: String, on: bool) {
		info!(key = %key, state = state_name(on), "Feature toggle override set");
		self.resolver.set_override(key, on);
	}
}

fn state_name(on: bool) -> &'static str {
	if on {
		"on"
	} else {
		"off"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use proptest::prelude::*;
	use toggles_core::{QualifiedKey, StoreError, StoreResult};

	use crate::error::ToggleError;

	/// Store that answers every lookup with the same outcome.
	struct FixedStore(Option<ToggleValue>);

	#[async_trait]
	impl RemoteStore for FixedStore {
		async fn get(&self, key: &QualifiedKey) -> StoreResult<ToggleValue> {
			self.0
				.clone()
				.ok_or_else(|| StoreError::not_found(key.as_str()))
		}
	}

	fn config(enabled: bool) -> ToggleConfig {
		ToggleConfig::builder()
			.app_name("my-app")
			.key_suffix("test")
			.enabled(enabled)
			.build()
			.unwrap()
	}

	fn service_with(remote: Option<ToggleValue>) -> ToggleService {
		ToggleService::builder()
			.config(config(true))
			.remote_store(FixedStore(remote))
			.build()
			.unwrap()
	}

	#[derive(Clone, Default)]
	struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

	impl std::io::Write for CapturedLogs {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	fn logs_during(f: impl FnOnce()) -> String {
		let logs = CapturedLogs::default();
		let writer = logs.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_ansi(false)
			.with_writer(move || writer.clone())
			.finish();
		tracing::subscriber::with_default(subscriber, f);
		let bytes = logs.0.lock().unwrap().clone();
		String::from_utf8(bytes).unwrap()
	}

	#[test]
	fn every_constructor_logs_initialization() {
		let from_new = logs_during(|| {
			ToggleService::new(config(true));
		});
		let from_options = logs_during(|| {
			ToggleService::from_options(ToggleConfigLayer {
				app_name: Some("my-app".to_string()),
				..Default::default()
			})
			.unwrap();
		});
		let from_builder = logs_during(|| {
			service_with(None);
		});

		for output in [from_new, from_options, from_builder] {
			assert!(output.contains("Toggle service initialized"), "{output}");
			assert!(output.contains("app_name=my-app"), "{output}");
		}
	}

	#[test]
	fn builder_requires_config() {
		let result = ToggleService::builder().build();
		assert!(matches!(result, Err(ToggleError::Config(ConfigError::MissingField(_)))));
	}

	#[test]
	fn from_options_requires_app_name() {
		let result = ToggleService::from_options(ToggleConfigLayer::default());
		assert!(matches!(result, Err(ToggleError::Config(_))));
	}

	#[test]
	fn from_options_applies_values() {
		let service = ToggleService::from_options(ToggleConfigLayer {
			enabled: Some(false),
			app_name: Some("my-app".to_string()),
			..Default::default()
		})
		.unwrap();

		assert!(!service.enabled());
		assert_eq!(service.config().app_name(), "my-app");
	}

	#[tokio::test]
	async fn remote_true_is_on() {
		let service = service_with(Some(ToggleValue::from("true")));
		assert!(service.is_on("my_key").await.unwrap());
		assert!(!service.is_off("my_key").await.unwrap());
	}

	#[tokio::test]
	async fn override_on_beats_remote_false() {
		let service = service_with(Some(ToggleValue::from("false")));
		service.override_on("my_key");
		assert!(service.is_on("my_key").await.unwrap());
	}

	#[tokio::test]
	async fn override_off_beats_remote_true() {
		let service = service_with(Some(ToggleValue::from("true")));
		service.override_off("my_key");
		assert!(!service.is_on("my_key").await.unwrap());
	}

	#[tokio::test]
	async fn default_on_used_when_not_found() {
		let service = service_with(None);
		assert!(!service.is_on("my_key").await.unwrap());

		service.default_on("my_key");
		assert!(service.is_on("my_key").await.unwrap());

		service.default_off("my_key");
		assert!(!service.is_on("my_key").await.unwrap());
	}

	#[tokio::test]
	async fn default_ignored_when_remote_has_value() {
		let service = service_with(Some(ToggleValue::from("false")));
		service.default_on("my_key");
		assert!(!service.is_on("my_key").await.unwrap());
	}

	#[tokio::test]
	async fn disabled_without_default_is_off() {
		let service = ToggleService::builder()
			.config(config(false))
			.remote_store(FixedStore(Some(ToggleValue::from("true"))))
			.build()
			.unwrap();

		assert!(!service.is_on("my_key").await.unwrap());
		assert!(service.is_off("my_key").await.unwrap());
	}

	#[tokio::test]
	async fn unrecognized_remote_value_fails_closed() {
		let service = service_with(Some(ToggleValue::from("maybe")));
		assert!(!service.is_on("my_key").await.unwrap());
		assert!(service.is_off("my_key").await.unwrap());
	}

	#[tokio::test]
	async fn unset_and_clear_restore_remote_resolution() {
		let service = service_with(None);
		service.override_on("a");
		service.override_on("b");
		service.default_on("c");

		service.unset_override("a");
		assert!(!service.is_on("a").await.unwrap());
		assert!(service.is_on("b").await.unwrap());

		service.clear_overrides();
		service.unset_default("c");
		assert!(!service.is_on("b").await.unwrap());
		assert!(!service.is_on("c").await.unwrap());

		service.default_on("d");
		service.clear_defaults();
		assert_eq!(service.resolver().override_count(), 0);
		assert_eq!(service.resolver().default_count(), 0);
		assert!(!service.is_on("d").await.unwrap());
	}

	#[tokio::test]
	async fn clones_share_state() {
		let service = service_with(None);
		let clone = service.clone();
		clone.override_on("my_key");
		assert!(service.is_on("my_key").await.unwrap());
	}

	fn arb_value() -> impl Strategy<Value = ToggleValue> {
		prop_oneof![
			Just(ToggleValue::Unset),
			any::<bool>().prop_map(ToggleValue::Bool),
			(-2i64..3).prop_map(ToggleValue::Int),
			prop_oneof![Just("true"), Just("false"), Just("maybe"), Just("")]
				.prop_map(ToggleValue::from),
		]
	}

	proptest! {
		#[test]
		fn off_is_negation_of_on(
			remote in prop::option::of(arb_value()),
			override_value in prop::option::of(arb_value()),
			default_value in prop::option::of(arb_value()),
			enabled: bool,
		) {
			let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
			let service = ToggleService::builder()
				.config(config(enabled))
				.remote_store(FixedStore(remote))
				.build()
				.unwrap();
			if let Some(value) = override_value {
				service.resolver().set_override("k", value);
			}
			if let Some(value) = default_value {
				service.resolver().set_default("k", value);
			}

			let (on, off) = rt.block_on(async {
				(service.is_on("k").await.unwrap(), service.is_off("k").await.unwrap())
			});
			prop_assert_eq!(off, !on);
		}

		#[test]
		fn override_always_wins(
			remote in prop::option::of(arb_value()),
			override_value in arb_value(),
			enabled: bool,
		) {
			let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
			let service = ToggleService::builder()
				.config(config(enabled))
				.remote_store(FixedStore(remote))
				.build()
				.unwrap();
			service.resolver().set_override("k", override_value.clone());

			let resolved = rt.block_on(service.resolve("k")).unwrap();
			prop_assert_eq!(resolved, override_value);
		}
	}
}
