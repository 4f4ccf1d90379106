//! Session error types

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
	#[error("Session storage error: {0}")]
	Storage(String),

	#[error("Session `{0}` could not be serialized: {1}")]
	Serialization(String, String),

	#[error("Invalid session id: {0}")]
	InvalidId(String),

	#[error("CSRF token validation failed.")]
	Csrf,

	#[error("Password hashing failed: {0}")]
	Hashing(String),
}

impl From<std::io::Error> for SessionError {
	fn from(err: std::io::Error) -> Self {
		Self::Storage(err.to_string())
	}
}

pub type SessionResult<T> = Result<T, SessionError>;
