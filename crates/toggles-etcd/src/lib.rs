// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! etcd v2 remote store for feature toggles.
//!
//! [`EtcdClient`] implements [`toggles_core::RemoteStore`] over the etcd v2
//! keys API (`GET /v2/keys/<path>`), translating etcd's answers into the
//! store error taxonomy the resolver understands:
//!
//! | etcd answer | Result |
//! |-------------|--------|
//! | `200` with a node value | `ToggleValue::Text(value)` |
//! | `200` with a directory node | `ToggleValue::Unset` |
//! | `404` / `errorCode: 100` | `StoreError::NotFound` |
//! | connection refused | `StoreError::ConnectionRefused` |
//! | anything else | `StoreError::Server`, `Decode` or `Transport` |

mod client;
mod http;
mod wire;

pub use client::EtcdClient;
pub use http::{builder, user_agent};
