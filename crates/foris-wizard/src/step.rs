//! The ten wizard steps

use crate::error::WizardError;
use foris_core::NUM_WIZARD_STEPS;
use std::fmt;

/// A step of the setup wizard, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
	Password = 1,
	Wan = 2,
	Connectivity = 3,
	Region = 4,
	Time = 5,
	Updater = 6,
	UpdaterOffline = 7,
	Lan = 8,
	Wifi = 9,
	Registration = 10,
}

impl StepId {
	pub const ALL: [StepId; NUM_WIZARD_STEPS as usize] = [
		StepId::Password,
		StepId::Wan,
		StepId::Connectivity,
		StepId::Region,
		StepId::Time,
		StepId::Updater,
		StepId::UpdaterOffline,
		StepId::Lan,
		StepId::Wifi,
		StepId::Registration,
	];

	pub fn number(self) -> u8 {
		self as u8
	}

	/// Step the gate opens once this one is done
	pub fn next_number(self) -> u8 {
		self.number() + 1
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Password => "password",
			Self::Wan => "wan",
			Self::Connectivity => "connectivity",
			Self::Region => "region",
			Self::Time => "time",
			Self::Updater | Self::UpdaterOffline => "updater",
			Self::Lan => "lan",
			Self::Wifi => "wifi",
			Self::Registration => "registration",
		}
	}

	/// Whether the rest of the wizard may be skipped from this step
	pub fn can_skip(self) -> bool {
		!matches!(self, Self::Password | Self::Registration)
	}

	/// Completing this step finishes the wizard
	pub fn is_final(self) -> bool {
		self == Self::Wifi
	}

	pub fn template(self) -> &'static str {
		match self {
			Self::Connectivity => "wizard/connectivity",
			Self::Time => "wizard/time",
			Self::Updater | Self::UpdaterOffline => "wizard/updater",
			Self::Wifi => "wizard/wifi",
			Self::Registration => "wizard/registration",
			_ => "wizard/form",
		}
	}
}

impl TryFrom<u8> for StepId {
	type Error = WizardError;

	fn try_from(number: u8) -> Result<Self, Self::Error> {
		Self::ALL
			.into_iter()
			.find(|step| step.number() == number)
			.ok_or(WizardError::StepNotFound(u32::from(number)))
	}
}

impl TryFrom<u32> for StepId {
	type Error = WizardError;

	fn try_from(number: u32) -> Result<Self, Self::Error> {
		u8::try_from(number)
			.map_err(|_| WizardError::StepNotFound(number))
			.and_then(Self::try_from)
	}
}

impl fmt::Display for StepId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.number(), self.name())
	}
}
