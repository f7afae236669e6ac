// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw toggle values and their normalization to on/off.

use serde_json::Value;

/// A raw value a toggle can resolve to.
///
/// Values arrive from several places (remote store, overrides, defaults), so
/// the type is deliberately open. Use [`ToggleValue::truthiness`] to interpret
/// it as a switch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToggleValue {
	/// No value: nothing was configured for the key.
	#[default]
	Unset,
	Bool(bool),
	Int(i64),
	Text(String),
	/// Anything that is not a scalar the other variants can hold.
	Json(Value),
}

/// Result of interpreting a [`ToggleValue`] as a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Truthiness {
	On,
	Off,
	/// The value is not one of the canonical encodings. Treated as off.
	Unrecognized,
}

impl Truthiness {
	/// Collapses the tri-state to a switch position, failing closed.
	pub fn is_on(self) -> bool {
		matches!(self, Truthiness::On)
	}
}

impl ToggleValue {
	/// Normalizes the value against the canonical encodings.
	///
	/// On: `true`, `1`, `"true"`. Off: `false`, `0`, `"false"`. Text is
	/// compared exactly; `"TRUE"` or `"yes"` are unrecognized.
	pub fn truthiness(&self) -> Truthiness {
		match self {
			ToggleValue::Unset => Truthiness::Unrecognized,
			ToggleValue::Bool(b) => bool_truthiness(*b),
			ToggleValue::Int(n) => int_truthiness(*n),
			ToggleValue::Text(s) => text_truthiness(s),
			ToggleValue::Json(value) => match value {
				Value::Bool(b) => bool_truthiness(*b),
				Value::Number(n) => n.as_i64().map_or(Truthiness::Unrecognized, int_truthiness),
				Value::String(s) => text_truthiness(s),
				_ => Truthiness::Unrecognized,
			},
		}
	}

	/// True iff the value is a canonical "on" encoding.
	pub fn is_on(&self) -> bool {
		self.truthiness().is_on()
	}

	pub fn is_unset(&self) -> bool {
		matches!(self, ToggleValue::Unset)
	}
}

fn bool_truthiness(b: bool) -> Truthiness {
	if b {
		Truthiness::On
	} else {
		Truthiness::Off
	}
}

fn int_truthiness(n: i64) -> Truthiness {
	match n {
		1 => Truthiness::On,
		0 => Truthiness::Off,
		_ => Truthiness::Unrecognized,
	}
}

fn text_truthiness(s: &str) -> Truthiness {
	match s {
		"true" => Truthiness::On,
		"false" => Truthiness::Off,
		_ => Truthiness::Unrecognized,
	}
}

impl std::fmt::Display for ToggleValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ToggleValue::Unset => f.write_str("unset"),
			ToggleValue::Bool(b) => write!(f, "{b}"),
			ToggleValue::Int(n) => write!(f, "{n}"),
			ToggleValue::Text(s) => f.write_str(s),
			ToggleValue::Json(value) => write!(f, "{value}"),
		}
	}
}

impl From<bool> for ToggleValue {
	fn from(b: bool) -> Self {
		ToggleValue::Bool(b)
	}
}

impl From<i64> for ToggleValue {
	fn from(n: i64) -> Self {
		ToggleValue::Int(n)
	}
}

impl From<i32> for ToggleValue {
	fn from(n: i32) -> Self {
		ToggleValue::Int(i64::from(n))
	}
}

impl From<u32> for ToggleValue {
	fn from(n: u32) -> Self {
		ToggleValue::Int(i64::from(n))
	}
}

impl From<&str> for ToggleValue {
	fn from(s: &str) -> Self {
		ToggleValue::Text(s.to_string())
	}
}

impl From<String> for ToggleValue {
	fn from(s: String) -> Self {
		ToggleValue::Text(s)
	}
}

impl<T: Into<ToggleValue>> From<Option<T>> for ToggleValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(ToggleValue::Unset, Into::into)
	}
}

impl From<Value> for ToggleValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => ToggleValue::Unset,
			Value::Bool(b) => ToggleValue::Bool(b),
			Value::String(s) => ToggleValue::Text(s),
			Value::Number(n) => match n.as_i64() {
				Some(i) => ToggleValue::Int(i),
				None => ToggleValue::Json(Value::Number(n)),
			},
			other => ToggleValue::Json(other),
		}
	}
}
