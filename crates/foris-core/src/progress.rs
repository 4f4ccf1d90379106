//! Wizard progress
//!
//! The furthest wizard step a router may reach is kept in the backend
//! (`foris.wizard.allowed_step_max`, `foris.wizard.finished`) and mirrored in
//! the session. The login needs it to pick the landing page and the wizard
//! gates its steps on it.

use crate::context::RequestContext;
use crate::exception::Result;
use crate::response::Location;
use foris_backend::{BackendExt, BackendResult, UciChange, parse_uci_bool};
use foris_sessions::Session;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of wizard steps
pub const NUM_WIZARD_STEPS: u8 = 10;

pub const ALLOWED_STEP_MAX_KEY: &str = "allowed_step_max";
pub const WIZARD_FINISHED_KEY: &str = "wizard_finished";

pub const ALLOWED_STEP_MAX_PATH: &str = "foris.wizard.allowed_step_max";
pub const WIZARD_FINISHED_PATH: &str = "foris.wizard.finished";

/// Option storing the hash of the administration password
pub const PASSWORD_PATH: &str = "foris.auth.password";

/// High-water mark of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardProgress {
	pub allowed_step_max: u8,
	pub finished: bool,
}

impl Default for WizardProgress {
	fn default() -> Self {
		Self {
			allowed_step_max: 1,
			finished: false,
		}
	}
}

impl WizardProgress {
	pub fn new(allowed_step_max: u8, finished: bool) -> Self {
		Self {
			allowed_step_max: allowed_step_max.max(1),
			finished,
		}
	}

	/// Whether step `step` may be shown
	pub fn allows(&self, step: u8) -> bool {
		step <= self.allowed_step_max
	}

	/// Whether the wizard has nothing left to do
	pub fn is_complete(&self) -> bool {
		self.finished || self.allowed_step_max > NUM_WIZARD_STEPS
	}

	/// Page an authenticated user lands on when no other target is known
	///
	/// # Examples
	///
	/// ```
	/// use foris_core::{Location, WizardProgress};
	///
	/// assert_eq!(WizardProgress::new(4, false).landing(), Location::WizardStep(4));
	/// assert_eq!(WizardProgress::new(4, true).landing(), Location::ConfigIndex);
	/// ```
	pub fn landing(&self) -> Location {
		if self.is_complete() {
			Location::ConfigIndex
		} else {
			Location::WizardStep(self.allowed_step_max)
		}
	}

	/// Changes storing the progress in the backend
	pub fn changes(&self) -> BackendResult<Vec<UciChange>> {
		Ok(vec![
			UciChange::set(ALLOWED_STEP_MAX_PATH, self.allowed_step_max.to_string())?,
			UciChange::set_bool(WIZARD_FINISHED_PATH, self.finished)?,
		])
	}

	fn from_session(session: &Session) -> Option<Self> {
		let step = session.get(ALLOWED_STEP_MAX_KEY).and_then(parse_step)?;
		let finished = session.get(WIZARD_FINISHED_KEY)?.as_bool()?;
		Some(Self::new(step, finished))
	}
}

fn parse_step(value: &Value) -> Option<u8> {
	let step = match value {
		Value::Number(n) => n.as_u64()?,
		Value::String(s) => s.trim().parse().ok()?,
		_ => return None,
	};
	u8::try_from(step).ok().filter(|step| *step >= 1)
}

/// Mirrors `progress` into the session
pub fn record_progress(session: &mut Session, progress: WizardProgress) {
	session.set(ALLOWED_STEP_MAX_KEY, progress.allowed_step_max);
	session.set(WIZARD_FINISHED_KEY, progress.finished);
}

/// Progress of the request's router, recovered from the backend when the
/// session does not know it yet
///
/// A missing or unparsable stored value counts as the initial state.
pub fn wizard_progress(ctx: &mut RequestContext<'_>) -> Result<WizardProgress> {
	if let Some(progress) = WizardProgress::from_session(ctx.session()) {
		return Ok(progress);
	}

	let backend = ctx.backend();
	let step = backend
		.fetch(&ALLOWED_STEP_MAX_PATH.parse()?)?
		.as_ref()
		.and_then(parse_step);
	let finished = backend
		.fetch(&WIZARD_FINISHED_PATH.parse()?)?
		.as_ref()
		.and_then(parse_uci_bool)
		.unwrap_or(false);
	let progress = match step {
		Some(step) => WizardProgress::new(step, finished),
		None => WizardProgress {
			finished,
			..WizardProgress::default()
		},
	};
	tracing::debug!(
		allowed_step_max = progress.allowed_step_max,
		finished = progress.finished,
		"Wizard progress recovered from the backend"
	);
	record_progress(ctx.session_mut(), progress);
	Ok(progress)
}

/// Whether the router has an administration password
pub fn is_password_set(ctx: &RequestContext<'_>) -> Result<bool> {
	Ok(ctx.backend().fetch_str(PASSWORD_PATH)?.is_some())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(3), Some(3))]
	#[case(json!("7"), Some(7))]
	#[case(json!(" 2 "), Some(2))]
	#[case(json!(0), None)]
	#[case(json!("many"), None)]
	#[case(json!(300), None)]
	#[case(json!(null), None)]
	fn test_parse_step(#[case] value: Value, #[case] expected: Option<u8>) {
		// Act & Assert
		assert_eq!(parse_step(&value), expected);
	}

	#[rstest]
	#[case(WizardProgress::new(1, false), Location::WizardStep(1))]
	#[case(WizardProgress::new(10, false), Location::WizardStep(10))]
	#[case(WizardProgress::new(11, false), Location::ConfigIndex)]
	#[case(WizardProgress::new(3, true), Location::ConfigIndex)]
	fn test_landing(#[case] progress: WizardProgress, #[case] expected: Location) {
		// Act & Assert
		assert_eq!(progress.landing(), expected);
	}

	#[rstest]
	fn test_session_needs_both_keys() {
		// Arrange
		let mut session = Session::new();
		session.set(ALLOWED_STEP_MAX_KEY, 4);

		// Act & Assert
		assert_eq!(WizardProgress::from_session(&session), None);
		session.set(WIZARD_FINISHED_KEY, false);
		assert_eq!(
			WizardProgress::from_session(&session),
			Some(WizardProgress::new(4, false))
		);
	}
}
