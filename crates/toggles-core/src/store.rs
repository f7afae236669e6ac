// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Remote store contract.
//!
//! The resolver only needs a single lookup operation. Implementations decide
//! the wire protocol; they must map their failures onto [`StoreError`] so the
//! resolver can tell recoverable misses from hard failures.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::key::QualifiedKey;
use crate::value::ToggleValue;

/// Boxed error used to carry transport-specific causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for remote store lookups.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors a remote store lookup can produce.
///
/// Only [`StoreError::NotFound`] and [`StoreError::ConnectionRefused`] are
/// recovered from by the resolver; everything else reaches the caller.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The key does not exist in the store.
	#[error("toggle key not found: {key}")]
	NotFound { key: String },

	/// The store could not be reached.
	#[error("cannot connect to toggle store at {endpoint}: {source}")]
	ConnectionRefused {
		endpoint: String,
		#[source]
		source: BoxError,
	},

	/// The store answered with an unexpected status.
	#[error("toggle store error (status {status}): {message}")]
	Server { status: u16, message: String },

	/// The store answered with a body that could not be decoded.
	#[error("invalid toggle store response: {0}")]
	Decode(String),

	/// Any other transport failure (timeouts, TLS, client construction).
	#[error("toggle store request failed: {0}")]
	Transport(#[source] BoxError),
}

impl StoreError {
	pub fn not_found(key: impl Into<String>) -> Self {
		Self::NotFound { key: key.into() }
	}

	pub fn connection_refused(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
		Self::ConnectionRefused {
			endpoint: endpoint.into(),
			source: source.into(),
		}
	}

	/// True for the failures that resolve to the configured default.
	pub fn is_recoverable(&self) -> bool {
		matches!(
			self,
			StoreError::NotFound { .. } | StoreError::ConnectionRefused { .. }
		)
	}
}

/// A remote key-value store holding toggle values.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
	/// Fetches the raw value stored under `key`.
	async fn get(&self, key: &QualifiedKey) -> StoreResult<ToggleValue>;
}

/// Type alias for a shared remote store.
pub type SharedRemoteStore = Arc<dyn RemoteStore>;
