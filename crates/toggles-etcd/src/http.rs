// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client construction with a consistent User-Agent header.

use reqwest::ClientBuilder;

/// Creates a new HTTP client builder with the standard User-Agent header.
///
/// Use this when you need to customize the client (e.g., set timeout).
pub fn builder() -> ClientBuilder {
	reqwest::Client::builder().user_agent(user_agent())
}

/// Returns the standard User-Agent string.
///
/// Format: `toggles-etcd/{version}`
pub fn user_agent() -> String {
	format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
