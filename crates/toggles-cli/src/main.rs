// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Feature toggle inspection binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use toggles::{ToggleConfig, ToggleConfigLayer, ToggleService};
use toggles_config::{
	load_from_sources, ConfigSource, DefaultsSource, EnvSource, LayerSource, TomlSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// toggles - check feature toggles stored in etcd.
#[derive(Parser, Debug)]
#[command(name = "toggles", about = "Inspect client-side feature toggles", version)]
struct Args {
	/// Config file (defaults to /etc/toggles/toggles.toml)
	#[arg(long, global = true, env = "TOGGLES_CONFIG")]
	config: Option<PathBuf>,

	/// Application namespace for toggle keys
	#[arg(long, global = true)]
	app_name: Option<String>,

	/// Environment discriminator appended to toggle keys
	#[arg(long, global = true)]
	key_suffix: Option<String>,

	/// Skip etcd and resolve from defaults only
	#[arg(long, global = true)]
	disable_remote: bool,

	/// Memoize remote values for the lifetime of the process
	#[arg(long, global = true)]
	cache: bool,

	/// Emit logs as JSON
	#[arg(long, global = true)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print whether each toggle is on or off
	Check {
		#[arg(required = true)]
		keys: Vec<String>,
	},
	/// Print the etcd key a toggle resolves from
	Key { key: String },
	/// Print the resolved configuration
	Config,
}

impl Args {
	/// Options given as flags; unset flags leave lower layers alone.
	fn overrides(&self) -> ToggleConfigLayer {
		ToggleConfigLayer {
			enabled: self.disable_remote.then_some(false),
			app_name: self.app_name.clone(),
			key_suffix: self.key_suffix.clone(),
			cache_toggles: self.cache.then_some(true),
			remote: None,
		}
	}

	fn load_config(&self) -> Result<ToggleConfig, toggles::ConfigError> {
		let file = match &self.config {
			Some(path) => TomlSource::new(path),
			None => TomlSource::system(),
		};
		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(DefaultsSource),
			Box::new(file),
			Box::new(EnvSource::process()),
			Box::new(LayerSource::command_line(self.overrides())),
		];
		load_from_sources(sources)
	}
}

fn init_tracing(json: bool) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
	let registry = tracing_subscriber::registry().with(filter);

	if json {
		registry
			.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}

fn describe(config: &ToggleConfig) -> String {
	let remote = config.remote();
	let timeout = remote
		.timeout
		.map(|t| format!("{}s", t.as_secs()))
		.unwrap_or_else(|| "none".to_string());
	format!(
		"app_name: {}\nkey_suffix: {}\nenabled: {}\ncache_toggles: {}\nendpoint: {}\ntimeout: {}",
		config.app_name(),
		config.key_suffix(),
		config.enabled(),
		config.cache_toggles(),
		remote.endpoint(),
		timeout,
	)
}

fn state_line(key: &str, on: bool) -> String {
	format!("{key}: {}", if on { "on" } else { "off" })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	init_tracing(args.json_logs);

	let config = args.load_config().context("failed to load toggle configuration")?;

	match &args.command {
		Command::Config => println!("{}", describe(&config)),
		Command::Key { key } => {
			let service = ToggleService::new(config);
			println!("{}", service.resolver().qualified_key(key));
		}
		Command::Check { keys } => {
			let service = ToggleService::new(config);
			for key in keys {
				let on = service
					.is_on(key)
					.await
					.with_context(|| format!("failed to resolve toggle {key}"))?;
				println!("{}", state_line(key, on));
			}
		}
	}

	Ok(())
}
