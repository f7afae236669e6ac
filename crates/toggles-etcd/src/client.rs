// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! etcd v2 client for toggle lookups.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use toggles_config::RemoteClientParams;
use toggles_core::{QualifiedKey, RemoteStore, StoreError, StoreResult, ToggleValue};
use tracing::{debug, info, trace};

use crate::wire::{ErrorBody, GetResponse, KEY_NOT_FOUND};

/// Remote store backed by the etcd v2 keys API.
///
/// # Example
///
/// ```ignore
/// use toggles_core::{QualifiedKey, RemoteStore};
/// use toggles_etcd::EtcdClient;
///
/// let client = EtcdClient::new(&RemoteClientParams::default())?;
/// let value = client.get(&QualifiedKey::new("my-app", "new_checkout", "prod")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct EtcdClient {
	endpoint: String,
	base_url: Url,
	http_client: Client,
}

impl EtcdClient {
	/// Builds a client for the store described by `params`.
	///
	/// No connection is made until the first lookup.
	pub fn new(params: &RemoteClientParams) -> StoreResult<Self> {
		let endpoint = params.endpoint().trim_end_matches('/').to_string();
		let base_url = Url::parse(&endpoint).map_err(|e| StoreError::Transport(Box::new(e)))?;
		if base_url.cannot_be_a_base() {
			return Err(StoreError::Transport(
				format!("etcd endpoint {endpoint} cannot carry a key path").into(),
			));
		}

		let mut builder = crate::http::builder();
		if let Some(timeout) = params.timeout {
			builder = builder.timeout(timeout);
		}
		let http_client = builder
			.build()
			.map_err(|e| StoreError::Transport(Box::new(e)))?;

		info!(endpoint = %endpoint, timeout = ?params.timeout, "etcd toggle client initialized");

		Ok(Self {
			endpoint,
			base_url,
			http_client,
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// `{endpoint}/v2/keys/...` with every key segment percent-encoded, so
	/// `?`, `#` and spaces stay inside the key.
	fn key_url(&self, key: &QualifiedKey) -> Url {
		let mut url = self.base_url.clone();
		if let Ok(mut segments) = url.path_segments_mut() {
			segments
				.pop_if_empty()
				.extend(["v2", "keys"])
				.extend(key.as_str().trim_start_matches('/').split('/'));
		}
		url
	}

	fn transport_error(&self, err: reqwest::Error) -> StoreError {
		if err.is_connect() && !err.is_timeout() {
			StoreError::connection_refused(self.endpoint.clone(), err)
		} else {
			StoreError::Transport(Box::new(err))
		}
	}
}

#[async_trait]
impl RemoteStore for EtcdClient {
	async fn get(&self, key: &QualifiedKey) -> StoreResult<ToggleValue> {
		let url = self.key_url(key);

		debug!(url = %url, key = %key, "Fetching toggle from etcd");

		let response = self
			.http_client
			.get(url)
			.send()
			.await
			.map_err(|e| self.transport_error(e))?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| StoreError::Transport(Box::new(e)))?;

		if !status.is_success() {
			return Err(status_error(key, status, &body));
		}

		let parsed: GetResponse =
			serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;

		if parsed.node.dir {
			debug!(key = %key, "etcd key is a directory, treating as unset");
		}

		trace!(key = %key, value = ?parsed.node.value, "etcd toggle fetched");

		Ok(parsed
			.node
			.value
			.map_or(ToggleValue::Unset, ToggleValue::Text))
	}
}

fn status_error(key: &QualifiedKey, status: StatusCode, body: &str) -> StoreError {
	if status == StatusCode::NOT_FOUND {
		return StoreError::not_found(key.as_str());
	}

	match serde_json::from_str::<ErrorBody>(body) {
		Ok(err) if err.error_code == KEY_NOT_FOUND => StoreError::not_found(key.as_str()),
		Ok(err) => StoreError::Server {
			status: status.as_u16(),
			message: err.message,
		},
		Err(_) => StoreError::Server {
			status: status.as_u16(),
			message: body.to_string(),
		},
	}
}
