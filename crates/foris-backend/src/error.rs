//! Backend error types

use thiserror::Error;

/// Errors raised while talking to the configuration backend
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
	/// The backend could not be reached at all
	#[error("Backend unavailable: {0}")]
	Unavailable(String),

	/// An RPC action was reached but reported a failure
	#[error("RPC {module}.{action} failed: {message}")]
	Rpc {
		module: String,
		action: String,
		message: String,
	},

	/// An RPC action returned data of an unexpected shape
	#[error("RPC {module}.{action} returned an invalid response: {reason}")]
	InvalidResponse {
		module: String,
		action: String,
		reason: String,
	},

	/// A configuration path could not be parsed
	#[error("Invalid configuration path: {0}")]
	InvalidPath(String),

	/// The backend did not answer in time
	#[error("Backend call timed out after {0} seconds")]
	Timeout(u64),
}

impl BackendError {
	/// Whether the error is a transport-level failure rather than an
	/// application-level one
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Unavailable(_) | Self::Timeout(_))
	}
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;
