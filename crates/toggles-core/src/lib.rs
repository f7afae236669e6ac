// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for feature toggle resolution.
//!
//! This crate provides the pieces shared by the resolver (`toggles`) and the
//! remote store implementations (`toggles-etcd`):
//!
//! - [`ToggleValue`]: the raw value a toggle resolves to, including the
//!   [`ToggleValue::Unset`] sentinel
//! - [`Truthiness`]: closed-world normalization of raw values to on/off
//! - [`QualifiedKey`]: the fully-qualified remote store path for a toggle
//! - [`RemoteStore`]: the remote lookup contract and its [`StoreError`] taxonomy
//!
//! # Example
//!
//! ```
//! use toggles_core::{QualifiedKey, ToggleValue, Truthiness};
//!
//! let key = QualifiedKey::new("my-app", "new_checkout", "prod");
//! assert_eq!(key.as_str(), "/v1/toggles/my-app/new_checkout/prod");
//!
//! assert_eq!(ToggleValue::from("true").truthiness(), Truthiness::On);
//! assert_eq!(ToggleValue::from(0).truthiness(), Truthiness::Off);
//! assert!(!ToggleValue::from("maybe").is_on());
//! ```

pub mod key;
pub mod store;
pub mod value;

pub use key::{QualifiedKey, KEY_PREFIX};
pub use store::{BoxError, RemoteStore, SharedRemoteStore, StoreError, StoreResult};
pub use value::{ToggleValue, Truthiness};
