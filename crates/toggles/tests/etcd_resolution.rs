// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end resolution against a stubbed etcd v2 endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use toggles::{
	ErrorReport, ErrorReporter, RemoteClientParams, ToggleConfig, ToggleError, ToggleService,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "my_key";
const APP_NAME: &str = "my-app";
const KEY_SUFFIX: &str = "test";
const ETCD_KEY_PATH: &str = "/v2/keys/v1/toggles/my-app/my_key/test";

fn body_200(value: bool) -> String {
	format!(
		r#"{{"action":"get","node":{{"key":"/v1/toggles/my-app/my_key/test","value":"{value}","modifiedIndex":73,"createdIndex":73}}}}"#
	)
}

const BODY_404: &str =
	r#"{"errorCode":100,"message":"Key not found","cause":"/v1/toggles/my-app/my_key/test","index":86}"#;

fn config_for(server: &MockServer, enabled: bool, cache: bool) -> ToggleConfig {
	let addr = server.address();
	ToggleConfig::builder()
		.enabled(enabled)
		.app_name(APP_NAME)
		.key_suffix(KEY_SUFFIX)
		.cache_toggles(cache)
		.remote(RemoteClientParams {
			host: addr.ip().to_string(),
			port: addr.port(),
			..Default::default()
		})
		.build()
		.unwrap()
}

async fn etcd_with(status: u16, body: String) -> MockServer {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(ETCD_KEY_PATH))
		.respond_with(ResponseTemplate::new(status).set_body_string(body))
		.mount(&server)
		.await;
	server
}

#[derive(Clone, Copy, Debug)]
enum Setup {
	Alone,
	DefaultOff,
	DefaultOn,
	OverrideOff,
	OverrideOn,
}

impl Setup {
	const ALL: [Setup; 5] = [
		Setup::Alone,
		Setup::DefaultOff,
		Setup::DefaultOn,
		Setup::OverrideOff,
		Setup::OverrideOn,
	];

	fn apply(self, service: &ToggleService) {
		match self {
			Setup::Alone => {}
			Setup::DefaultOff => service.default_off(KEY),
			Setup::DefaultOn => service.default_on(KEY),
			Setup::OverrideOff => service.override_off(KEY),
			Setup::OverrideOn => service.override_on(KEY),
		}
	}
}

async fn assert_matrix(server: &MockServer, expected: [bool; 5]) {
	for (setup, expected) in Setup::ALL.into_iter().zip(expected) {
		let service = ToggleService::new(config_for(server, true, false));
		setup.apply(&service);
		assert_eq!(
			service.is_on(KEY).await.unwrap(),
			expected,
			"setup {setup:?}"
		);
		assert_eq!(service.is_off(KEY).await.unwrap(), !expected, "setup {setup:?}");
	}
}

#[tokio::test]
async fn true_in_etcd() {
	let server = etcd_with(200, body_200(true)).await;
	// alone, default off, default on, override off, override on
	assert_matrix(&server, [true, true, true, false, true]).await;
}

#[tokio::test]
async fn false_in_etcd() {
	let server = etcd_with(200, body_200(false)).await;
	assert_matrix(&server, [false, false, false, false, true]).await;
}

#[tokio::test]
async fn not_set_in_etcd() {
	let server = etcd_with(404, BODY_404.to_string()).await;
	assert_matrix(&server, [false, false, true, false, true]).await;
}

#[tokio::test]
async fn etcd_disabled_is_off_without_default() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(200).set_body_string(body_200(true)))
		.expect(0)
		.mount(&server)
		.await;

	let service = ToggleService::new(config_for(&server, false, false));
	assert!(!service.enabled());
	assert!(!service.is_on(KEY).await.unwrap());

	service.default_on(KEY);
	assert!(service.is_on(KEY).await.unwrap());
}

#[tokio::test]
async fn cached_toggle_is_fetched_once() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(ETCD_KEY_PATH))
		.respond_with(ResponseTemplate::new(200).set_body_string(body_200(true)))
		.expect(1)
		.mount(&server)
		.await;

	let service = ToggleService::new(config_for(&server, true, true));
	for _ in 0..3 {
		assert!(service.is_on(KEY).await.unwrap());
	}
}

#[tokio::test]
async fn missing_toggle_is_refetched_even_with_cache() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(ETCD_KEY_PATH))
		.respond_with(ResponseTemplate::new(404).set_body_string(BODY_404))
		.expect(3)
		.mount(&server)
		.await;

	let service = ToggleService::new(config_for(&server, true, true));
	service.default_on(KEY);
	for _ in 0..3 {
		assert!(service.is_on(KEY).await.unwrap());
	}
	assert_eq!(service.resolver().cached_len(), 0);
}

#[tokio::test]
async fn store_failure_propagates() {
	let server = etcd_with(500, "etcd is unhappy".to_string()).await;

	let service = ToggleService::new(config_for(&server, true, false));
	service.default_on(KEY);

	let err = service.is_on(KEY).await.unwrap_err();
	assert!(matches!(err, ToggleError::Remote(_)), "{err:?}");
	assert!(service.is_off(KEY).await.is_err());
}

struct CountingReporter(AtomicUsize);

#[async_trait]
impl ErrorReporter for CountingReporter {
	async fn notify(&self, _report: ErrorReport) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}

#[tokio::test]
async fn unreachable_store_falls_back_and_reports() {
	let port = {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		listener.local_addr().unwrap().port()
	};
	let config = ToggleConfig::builder()
		.app_name(APP_NAME)
		.key_suffix(KEY_SUFFIX)
		.cache_toggles(true)
		.remote(RemoteClientParams {
			port,
			..Default::default()
		})
		.build()
		.unwrap();

	let reporter = Arc::new(CountingReporter(AtomicUsize::new(0)));
	let service = ToggleService::builder()
		.config(config)
		.shared_error_reporter(reporter.clone())
		.build()
		.unwrap();

	assert!(!service.is_on(KEY).await.unwrap());

	service.default_on(KEY);
	assert!(service.is_on(KEY).await.unwrap());
	assert_eq!(reporter.0.load(Ordering::SeqCst), 2);
}
