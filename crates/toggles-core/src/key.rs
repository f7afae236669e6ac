// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Remote store key construction.

/// Version prefix shared by every toggle stored remotely.
pub const KEY_PREFIX: &str = "/v1/toggles";

/// Fully-qualified remote path of a toggle.
///
/// Format: `/v1/toggles/{app_name}/{key}/{key_suffix}`. Existing store layouts
/// depend on this shape, so segments are inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedKey(String);

impl QualifiedKey {
	pub fn new(app_name: &str, key: &str, key_suffix: &str) -> Self {
		Self(format!("{KEY_PREFIX}/{app_name}/{key}/{key_suffix}"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl std::fmt::Display for QualifiedKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for QualifiedKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
