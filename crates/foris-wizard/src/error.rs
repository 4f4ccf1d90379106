//! Wizard errors

use foris_backend::BackendError;
use foris_config::ConfigError;
use foris_forms::FormError;
use thiserror::Error;

pub type WizardResult<T> = Result<T, WizardError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WizardError {
	/// The number names no wizard step
	#[error("Wizard step {0} not found")]
	StepNotFound(u32),

	#[error("Wizard step {step} has no action `{action}`")]
	UnknownAction { step: u8, action: String },

	/// Skipping is not allowed from the current progress
	#[error("Skipping the wizard is not allowed at step {0}")]
	SkipNotAllowed(u8),

	/// The step has no form to submit
	#[error("Wizard step {0} accepts no submission")]
	NoForm(u8),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Core(#[from] foris_core::Error),

	#[error(transparent)]
	Form(#[from] FormError),

	#[error(transparent)]
	Backend(#[from] BackendError),
}

impl WizardError {
	pub fn unknown_action(step: u8, action: impl Into<String>) -> Self {
		Self::UnknownAction {
			step,
			action: action.into(),
		}
	}

	pub fn is_not_found(&self) -> bool {
		match self {
			Self::StepNotFound(_) | Self::UnknownAction { .. } => true,
			Self::Config(err) => err.is_not_found(),
			Self::Core(err) => err.is_not_found(),
			_ => false,
		}
	}

	pub fn is_forbidden(&self) -> bool {
		matches!(self, Self::SkipNotAllowed(_))
	}

	/// The backend failure behind the error, if any
	pub fn backend_error(&self) -> Option<&BackendError> {
		match self {
			Self::Backend(err)
			| Self::Form(FormError::Backend(err))
			| Self::Core(foris_core::Error::Backend(err))
			| Self::Core(foris_core::Error::Form(FormError::Backend(err)))
			| Self::Config(ConfigError::Backend(err))
			| Self::Config(ConfigError::Form(FormError::Backend(err))) => Some(err),
			_ => None,
		}
	}
}
