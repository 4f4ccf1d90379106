//! Top-level error of request handling

use foris_backend::BackendError;
use foris_conf::SettingsError;
use foris_forms::FormError;
use foris_i18n::I18nError;
use foris_sessions::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// Unknown page, step or action
	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Forbidden: {0}")]
	Forbidden(String),

	#[error(transparent)]
	Form(#[from] FormError),

	#[error(transparent)]
	Backend(#[from] BackendError),

	#[error(transparent)]
	Session(#[from] SessionError),

	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[error(transparent)]
	I18n(#[from] I18nError),
}

impl Error {
	pub fn not_found(what: impl Into<String>) -> Self {
		Self::NotFound(what.into())
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound(_))
	}

	/// Whether the router configuration backend could not be reached
	pub fn is_backend_unavailable(&self) -> bool {
		match self {
			Self::Backend(err) | Self::Form(FormError::Backend(err)) => err.is_transport(),
			_ => false,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
