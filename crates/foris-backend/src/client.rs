//! Backend client contract and typed RPC wrappers

use crate::error::{BackendError, BackendResult};
use crate::uci::{UciChange, UciPath};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Configuration backend consumed by forms, pages and the wizard
///
/// Implementations wrap whatever transport the router uses. Every method is a
/// blocking call; a request handler calls the backend sequentially.
pub trait Backend: Send + Sync {
	/// Reads the current value stored at `path`, `None` when unset
	fn fetch(&self, path: &UciPath) -> BackendResult<Option<Value>>;

	/// Applies a batch of changes
	///
	/// Either every change is applied or, on failure, none is.
	fn mutate(&self, changes: &[UciChange]) -> BackendResult<()>;

	/// Calls a named RPC action
	fn perform(&self, module: &str, action: &str, payload: Value) -> BackendResult<Value>;
}

/// Results of the router's connectivity self test
///
/// Check names follow the backend (`IPv4-connectivity`, `IPv6-connectivity`,
/// `DNS`, `DNSSEC`, ...). A missing check counts as failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityReport {
	#[serde(default)]
	pub checks: BTreeMap<String, bool>,
}

impl ConnectivityReport {
	fn check(&self, name: &str) -> bool {
		self.checks.get(name).copied().unwrap_or(false)
	}

	pub fn is_empty(&self) -> bool {
		self.checks.is_empty()
	}

	pub fn ipv4(&self) -> bool {
		self.check("IPv4-connectivity")
	}

	pub fn ipv6(&self) -> bool {
		self.check("IPv6-connectivity")
	}

	pub fn dns(&self) -> bool {
		self.check("DNS")
	}

	pub fn dnssec(&self) -> bool {
		self.check("DNSSEC")
	}
}

/// State of the background updater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdaterStatus {
	pub status: String,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub last_activity: Vec<Value>,
}

/// One frequency band supported by a radio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioBand {
	/// UCI `hwmode` of the band (`11g` or `11a`)
	pub hwmode: String,
	pub channels: Vec<u32>,
}

/// A WiFi card as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiRadio {
	/// UCI section name of the device (`radio0`)
	pub name: String,
	pub bands: Vec<RadioBand>,
}

/// Outcome of restoring a configuration backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreOutcome {
	pub result: bool,
	#[serde(default)]
	pub new_ip: Option<String>,
}

/// Remote access settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
	pub enabled: bool,
	pub wan_access: bool,
	pub port: u16,
}

/// Remote access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteToken {
	pub id: String,
	pub name: String,
	pub status: String,
}

fn decode<T: DeserializeOwned>(module: &str, action: &str, value: Value) -> BackendResult<T> {
	serde_json::from_value(value).map_err(|e| BackendError::InvalidResponse {
		module: module.to_string(),
		action: action.to_string(),
		reason: e.to_string(),
	})
}

fn expect_result(module: &str, action: &str, value: &Value) -> BackendResult<bool> {
	value
		.get("result")
		.and_then(Value::as_bool)
		.ok_or_else(|| BackendError::InvalidResponse {
			module: module.to_string(),
			action: action.to_string(),
			reason: "missing boolean `result`".to_string(),
		})
}

/// Typed wrappers over the RPC actions used by the interface
///
/// Implemented for every [`Backend`], including trait objects.
pub trait BackendExt: Backend {
	/// Calls an action and deserializes its reply
	fn call<T: DeserializeOwned>(&self, module: &str, action: &str, payload: Value) -> BackendResult<T> {
		let reply = self.perform(module, action, payload)?;
		decode(module, action, reply)
	}

	/// Reads `path`, returning `None` both for unset paths and empty strings
	fn fetch_str(&self, path: &str) -> BackendResult<Option<String>> {
		let path: UciPath = path.parse()?;
		Ok(self
			.fetch(&path)?
			.and_then(|v| v.as_str().map(str::to_string))
			.filter(|s| !s.is_empty()))
	}

	/// Sets the password of a system user
	fn set_password(&self, user: &str, password: &str) -> BackendResult<()> {
		let reply = self.perform(
			"password",
			"set",
			json!({"user": user, "password": BASE64.encode(password)}),
		)?;
		if expect_result("password", "set", &reply)? {
			Ok(())
		} else {
			Err(BackendError::Rpc {
				module: "password".to_string(),
				action: "set".to_string(),
				message: format!("password for `{}` was rejected", user),
			})
		}
	}

	fn check_connection(&self) -> BackendResult<ConnectivityReport> {
		self.call("wan", "connection_test", json!({}))
	}

	/// Whether the WAN interface has a link
	fn wan_link_up(&self) -> BackendResult<bool> {
		let reply = self.perform("wan", "get_wan_status", json!({}))?;
		Ok(reply.get("up").and_then(Value::as_bool).unwrap_or(false))
	}

	/// Synchronizes the clock with NTP, returning whether it succeeded
	fn ntp_update(&self) -> BackendResult<bool> {
		let reply = self.perform("time", "ntpdate_trigger", json!({}))?;
		expect_result("time", "ntpdate_trigger", &reply)
	}

	fn set_time(&self, time: NaiveDateTime) -> BackendResult<()> {
		self.perform(
			"time",
			"update_settings",
			json!({"how_to_set_time": "manual", "time": time.format("%Y-%m-%dT%H:%M:%S").to_string()}),
		)?;
		Ok(())
	}

	/// Starts an updater run, returning whether it was started
	fn check_updates(&self) -> BackendResult<bool> {
		let reply = self.perform("updater", "run", json!({}))?;
		expect_result("updater", "run", &reply)
	}

	fn updater_status(&self) -> BackendResult<UpdaterStatus> {
		self.call("updater", "get_status", json!({}))
	}

	fn reboot(&self) -> BackendResult<()> {
		self.perform("maintain", "reboot", json!({}))?;
		Ok(())
	}

	/// Registration code of the device, `None` when the lookup failed
	fn registration_code(&self) -> BackendResult<Option<String>> {
		let reply = self.perform("about", "get_registration_number", json!({}))?;
		Ok(reply
			.get("registration_number")
			.and_then(Value::as_str)
			.map(str::to_string))
	}

	/// Produces a configuration backup archive
	fn create_backup(&self) -> BackendResult<Vec<u8>> {
		let reply = self.perform("maintain", "generate_backup", json!({}))?;
		let encoded = reply
			.get("backup")
			.and_then(Value::as_str)
			.ok_or_else(|| BackendError::InvalidResponse {
				module: "maintain".to_string(),
				action: "generate_backup".to_string(),
				reason: "missing `backup`".to_string(),
			})?;
		BASE64
			.decode(encoded)
			.map_err(|e| BackendError::InvalidResponse {
				module: "maintain".to_string(),
				action: "generate_backup".to_string(),
				reason: e.to_string(),
			})
	}

	fn restore_backup(&self, archive: &[u8]) -> BackendResult<RestoreOutcome> {
		self.call(
			"maintain",
			"restore_backup",
			json!({"backup": BASE64.encode(archive)}),
		)
	}

	fn wifi_radios(&self) -> BackendResult<Vec<WifiRadio>> {
		let reply = self.perform("wifi", "get_settings", json!({}))?;
		decode(
			"wifi",
			"get_settings",
			reply.get("devices").cloned().unwrap_or_else(|| json!([])),
		)
	}

	fn remote_settings(&self) -> BackendResult<RemoteSettings> {
		self.call("remote", "get_settings", json!({}))
	}

	fn remote_update_settings(&self, enabled: bool, wan_access: bool, port: u16) -> BackendResult<()> {
		let reply = self.perform(
			"remote",
			"update_settings",
			json!({"enabled": enabled, "wan_access": wan_access, "port": port}),
		)?;
		if expect_result("remote", "update_settings", &reply)? {
			Ok(())
		} else {
			Err(BackendError::Rpc {
				module: "remote".to_string(),
				action: "update_settings".to_string(),
				message: "settings were rejected".to_string(),
			})
		}
	}

	fn remote_tokens(&self) -> BackendResult<Vec<RemoteToken>> {
		let reply = self.perform("remote", "list_tokens", json!({}))?;
		decode(
			"remote",
			"list_tokens",
			reply.get("tokens").cloned().unwrap_or_else(|| json!([])),
		)
	}

	fn remote_generate_token(&self, name: &str) -> BackendResult<()> {
		self.perform("remote", "generate_token", json!({"name": name}))?;
		Ok(())
	}

	fn remote_revoke_token(&self, id: &str) -> BackendResult<bool> {
		let reply = self.perform("remote", "revoke", json!({"id": id}))?;
		expect_result("remote", "revoke", &reply)
	}

	/// Stores the interface language on the router
	fn set_language(&self, language: &str) -> BackendResult<bool> {
		let reply = self.perform("web", "set_language", json!({"language": language}))?;
		expect_result("web", "set_language", &reply)
	}
}

impl<B: Backend + ?Sized> BackendExt for B {}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryBackend;
	use rstest::rstest;

	#[rstest]
	fn test_connectivity_report_missing_checks_fail() {
		// Arrange
		let report: ConnectivityReport =
			serde_json::from_value(json!({"checks": {"IPv4-connectivity": true}})).unwrap();

		// Assert
		assert!(report.ipv4());
		assert!(!report.ipv6());
		assert!(!report.dns());
		assert!(!report.is_empty());
	}

	#[rstest]
	fn test_set_password_rejected() {
		// Arrange
		let backend = MemoryBackend::new().respond("password", "set", json!({"result": false}));

		// Act
		let result = backend.set_password("root", "secret");

		// Assert
		assert!(matches!(result, Err(BackendError::Rpc { .. })));
	}

	#[rstest]
	fn test_set_password_sends_encoded_password() {
		// Arrange
		let backend = MemoryBackend::new().respond("password", "set", json!({"result": true}));

		// Act
		backend.set_password("root", "secret").unwrap();

		// Assert
		let calls = backend.rpc_calls();
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].payload["password"], json!(BASE64.encode("secret")));
	}

	#[rstest]
	fn test_updater_status_invalid_shape() {
		// Arrange
		let backend = MemoryBackend::new().respond("updater", "get_status", json!({"nope": 1}));

		// Act
		let result = backend.updater_status();

		// Assert
		assert!(matches!(result, Err(BackendError::InvalidResponse { .. })));
	}

	#[rstest]
	fn test_backup_round_trip_through_base64() {
		// Arrange
		let backend = MemoryBackend::new().respond(
			"maintain",
			"generate_backup",
			json!({"backup": BASE64.encode(b"archive")}),
		);

		// Act
		let archive = backend.create_backup().unwrap();

		// Assert
		assert_eq!(archive, b"archive");
	}

	#[rstest]
	fn test_wifi_radios_without_devices() {
		// Arrange
		let backend = MemoryBackend::new().respond("wifi", "get_settings", json!({}));

		// Act
		let radios = backend.wifi_radios().unwrap();

		// Assert
		assert!(radios.is_empty());
	}

	#[rstest]
	fn test_fetch_str_treats_empty_as_unset() {
		// Arrange
		let backend = MemoryBackend::new()
			.with_value("foris.auth.password", json!(""))
			.with_value("system.@system[0].hostname", json!("turris"));

		// Act & Assert
		assert_eq!(backend.fetch_str("foris.auth.password").unwrap(), None);
		assert_eq!(
			backend.fetch_str("system.@system[0].hostname").unwrap(),
			Some("turris".to_string())
		);
	}
}
