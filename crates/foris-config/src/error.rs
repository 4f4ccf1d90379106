//! Configuration page errors

use foris_backend::BackendError;
use foris_forms::FormError;
use foris_sessions::SessionError;
use thiserror::Error;

/// Result type for configuration pages
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while serving configuration pages
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// No page is registered under the slug
	#[error("Config page `{0}` not found")]
	PageNotFound(String),

	/// The page has no such action
	#[error("Config page `{page}` has no action `{action}`")]
	UnknownAction { page: String, action: String },

	/// Two pages share a slug
	#[error("Config page `{0}` is already registered")]
	AlreadyRegistered(String),

	/// Two plugins share a name
	#[error("Plugin `{0}` is already loaded")]
	PluginAlreadyLoaded(String),

	/// A request parameter is missing or invalid
	#[error("Invalid request: {0}")]
	BadRequest(String),

	#[error(transparent)]
	Core(#[from] foris_core::Error),

	#[error(transparent)]
	Form(#[from] FormError),

	#[error(transparent)]
	Backend(#[from] BackendError),

	#[error(transparent)]
	Session(#[from] SessionError),
}

impl ConfigError {
	pub fn unknown_action(page: impl Into<String>, action: impl Into<String>) -> Self {
		Self::UnknownAction {
			page: page.into(),
			action: action.into(),
		}
	}

	/// Whether the error maps to a "not found" response
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::PageNotFound(_) | Self::UnknownAction { .. } => true,
			Self::Core(err) => err.is_not_found(),
			_ => false,
		}
	}

	/// Whether submitted values did not have the shape the form expects
	pub fn is_malformed(&self) -> bool {
		matches!(
			self,
			Self::Form(FormError::Malformed { .. })
				| Self::Core(foris_core::Error::Form(FormError::Malformed { .. }))
		)
	}

	/// Whether the router configuration backend could not be reached
	pub fn is_backend_unavailable(&self) -> bool {
		match self {
			Self::Backend(err) | Self::Form(FormError::Backend(err)) => err.is_transport(),
			Self::Core(err) => err.is_backend_unavailable(),
			_ => false,
		}
	}
}
