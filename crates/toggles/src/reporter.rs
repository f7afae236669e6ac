// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error tracking integration for toggle store outages.
//!
//! When the toggle store cannot be reached the resolver falls back to the
//! configured default, so the outage is invisible to callers. An
//! [`ErrorReporter`] lets the host forward those events to its error tracker.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use toggles::{ErrorReport, ErrorReporter, ToggleService};
//!
//! struct CrashReporter {
//!     // Your error tracking client
//! }
//!
//! #[async_trait]
//! impl ErrorReporter for CrashReporter {
//!     async fn notify(&self, report: ErrorReport) {
//!         eprintln!("toggle store unreachable for {}: {}", report.key, report.message);
//!     }
//! }
//!
//! let service = ToggleService::builder()
//!     .config(config)
//!     .error_reporter(CrashReporter { /* ... */ })
//!     .build()?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use toggles_core::{QualifiedKey, StoreError};

/// Data captured when the toggle store could not be reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
	/// The toggle key as requested by the caller.
	pub key: String,
	/// The fully-qualified remote path that was looked up.
	pub qualified_key: String,
	/// Rendered error message.
	pub message: String,
	pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
	pub fn new(key: impl Into<String>, qualified_key: &QualifiedKey, error: &StoreError) -> Self {
		Self {
			key: key.into(),
			qualified_key: qualified_key.to_string(),
			message: error.to_string(),
			timestamp: Utc::now(),
		}
	}
}

/// Receives toggle store connectivity failures.
///
/// Called on the resolution path, so implementations should hand the report
/// off quickly and never fail.
#[async_trait]
pub trait ErrorReporter: Send + Sync + 'static {
	async fn notify(&self, report: ErrorReport);
}

/// Type alias for a shared error reporter.
pub type SharedErrorReporter = Arc<dyn ErrorReporter>;

/// An error reporter that discards all reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpErrorReporter;

#[async_trait]
impl ErrorReporter for NoOpErrorReporter {
	async fn notify(&self, _report: ErrorReport) {}
}
