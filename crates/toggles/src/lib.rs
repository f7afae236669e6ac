// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-side feature toggles.
//!
//! Decides whether a feature is on or off for the current process by
//! consulting a remote key-value store (etcd), with local overrides and
//! defaults taking precedence.
//!
//! # Features
//!
//! - **Overrides**: highest-precedence local values, typically set by tests
//! - **Remote resolution**: values read from `/v1/toggles/{app}/{key}/{suffix}`
//! - **Defaults**: used when remote resolution is disabled, the key is missing
//!   or the store is unreachable
//! - **Caching**: optional process-lifetime memoization of remote values
//! - **Fail closed**: only `true`, `1` and `"true"` count as on
//!
//! # Example
//!
//! ```ignore
//! use toggles::{ToggleConfig, ToggleService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ToggleConfig::builder()
//!         .app_name("checkout")
//!         .key_suffix("prod")
//!         .cache_toggles(true)
//!         .build()?;
//!
//!     let toggles = toggles::global::init(config);
//!     toggles.default_off("new_flow");
//!
//!     if toggles.is_on("new_flow").await? {
//!         // ...
//!     }
//!
//!     Ok(())
//! }
//! ```

mod error;
pub mod global;
mod reporter;
mod resolver;
mod service;

pub use error::{Result, ToggleError};
pub use reporter::{ErrorReport, ErrorReporter, NoOpErrorReporter, SharedErrorReporter};
pub use resolver::Resolver;
pub use service::{ToggleService, ToggleServiceBuilder};

// Re-export configuration and core types for convenience
pub use toggles_config::{
	load_config, load_config_with_file, ConfigError, RemoteClientParams, RemoteConfigLayer,
	ToggleConfig, ToggleConfigLayer,
};
pub use toggles_core::{
	QualifiedKey, RemoteStore, SharedRemoteStore, StoreError, ToggleValue, Truthiness,
};
pub use toggles_etcd::EtcdClient;
