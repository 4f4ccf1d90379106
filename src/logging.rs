//! Tracing subscriber of the application

use anyhow::anyhow;
use foris_conf::Settings;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured level
pub fn filter(settings: &Settings) -> anyhow::Result<EnvFilter> {
	match EnvFilter::try_from_default_env() {
		Ok(filter) => Ok(filter),
		Err(_) => EnvFilter::try_new(&settings.log_level)
			.map_err(|err| anyhow!("invalid log level `{}`: {err}", settings.log_level)),
	}
}

/// Installs the global fmt subscriber
///
/// # Errors
///
/// Fails when the filter does not parse or a subscriber is already set.
pub fn init(settings: &Settings) -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(filter(settings)?)
		.with_target(settings.debug)
		.try_init()
		.map_err(|err| anyhow!("failed to install the tracing subscriber: {err}"))
}
