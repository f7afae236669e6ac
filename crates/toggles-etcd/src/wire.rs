// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! etcd v2 keys API payloads.

use serde::Deserialize;

/// etcd error code for a missing key.
pub(crate) const KEY_NOT_FOUND: u32 = 100;

/// Successful `GET /v2/keys/...` response.
#[derive(Debug, Deserialize)]
pub(crate) struct GetResponse {
	pub node: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Node {
	/// Absent for directory nodes.
	pub value: Option<String>,
	#[serde(default)]
	pub dir: bool,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
	pub error_code: u32,
	pub message: String,
}
