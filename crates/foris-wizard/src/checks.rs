//! Interpretation of the backend self tests polled by the wizard

use foris_backend::{ConnectivityReport, UpdaterStatus};
use serde::Serialize;
use serde_json::{Value, json};

/// Outcome of the connectivity test shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
	Ok,
	NoDns,
	NoConnection,
	/// The backend ran no checks
	Error,
}

impl Connectivity {
	pub fn from_report(report: &ConnectivityReport) -> Self {
		if report.is_empty() {
			return Self::Error;
		}
		let connected = report.ipv4() || report.ipv6();
		let resolves = report.dns() && report.dnssec();
		match (connected, resolves) {
			(true, true) => Self::Ok,
			(true, false) => Self::NoDns,
			(false, _) => Self::NoConnection,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Ok => "ok",
			Self::NoDns => "no_dns",
			Self::NoConnection => "no_connection",
			Self::Error => "error",
		}
	}
}

pub const UPDATER_DONE: &str = "done";
pub const UPDATER_OFFLINE_PENDING: &str = "offline_pending";

/// JSON answer of an updater status poll
///
/// With `offline_as_done` a pending offline update is reported as done; it is
/// handled by the following step.
pub fn updater_status_json(status: &UpdaterStatus, offline_as_done: bool) -> Value {
	let state = if offline_as_done && status.status == UPDATER_OFFLINE_PENDING {
		UPDATER_DONE
	} else {
		status.status.as_str()
	};
	let mut result = json!({
		"success": true,
		"status": state,
		"last_activity": status.last_activity,
	});
	if let Some(message) = status.message.as_deref().filter(|m| !m.is_empty()) {
		result["message"] = json!(message);
	}
	result
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::BTreeMap;

	fn report(checks: &[(&str, bool)]) -> ConnectivityReport {
		ConnectivityReport {
			checks: checks
				.iter()
				.map(|(name, ok)| (name.to_string(), *ok))
				.collect::<BTreeMap<_, _>>(),
		}
	}

	#[rstest]
	#[case(&[("IPv4-connectivity", true), ("IPv6-connectivity", true), ("DNS", true), ("DNSSEC", true)], Connectivity::Ok)]
	#[case(&[("IPv4-connectivity", false), ("IPv6-connectivity", true), ("DNS", true), ("DNSSEC", true)], Connectivity::Ok)]
	#[case(&[("IPv4-connectivity", true), ("DNS", true), ("DNSSEC", false)], Connectivity::NoDns)]
	#[case(&[("IPv4-connectivity", false), ("DNS", true), ("DNSSEC", true)], Connectivity::NoConnection)]
	#[case(&[], Connectivity::Error)]
	fn test_connectivity_from_report(#[case] checks: &[(&str, bool)], #[case] expected: Connectivity) {
		// Act & Assert
		assert_eq!(Connectivity::from_report(&report(checks)), expected);
	}

	#[rstest]
	#[case(true, "done")]
	#[case(false, "offline_pending")]
	fn test_offline_pending_status(#[case] offline_as_done: bool, #[case] expected: &str) {
		// Arrange
		let status = UpdaterStatus {
			status: UPDATER_OFFLINE_PENDING.to_string(),
			message: None,
			last_activity: Vec::new(),
		};

		// Act
		let value = updater_status_json(&status, offline_as_done);

		// Assert
		assert_eq!(value["status"], json!(expected));
		assert!(value.get("message").is_none());
	}
}
