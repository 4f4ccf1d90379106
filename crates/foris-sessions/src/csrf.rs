//! CSRF protection tokens

use crate::error::{SessionError, SessionResult};
use crate::session::{CSRF_TOKEN_KEY, Session};
use rand::Rng;
use rand::distributions::Alphanumeric;

const TOKEN_LENGTH: usize = 32;

/// HTTP methods that never change state and skip token validation
pub const SAFE_METHODS: [&str; 4] = ["GET", "HEAD", "OPTIONS", "TRACE"];

fn generate_token() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(TOKEN_LENGTH)
		.map(char::from)
		.collect()
}

/// Token of the session, created on first use
///
/// # Examples
///
/// ```
/// use foris_sessions::{Session, csrf_token};
///
/// let mut session = Session::new();
/// let token = csrf_token(&mut session);
/// assert_eq!(token.len(), 32);
/// assert_eq!(csrf_token(&mut session), token);
/// ```
pub fn csrf_token(session: &mut Session) -> String {
	if let Some(token) = session.get_str(CSRF_TOKEN_KEY)
		&& !token.is_empty()
	{
		return token.to_string();
	}
	rotate_csrf_token(session)
}

/// Replaces the token of the session; done on every login
pub fn rotate_csrf_token(session: &mut Session) -> String {
	let token = generate_token();
	session.set(CSRF_TOKEN_KEY, token.clone());
	token
}

/// Checks the token sent with a request against the session's
///
/// `token` is the `csrf_token` form field or the `X-CSRFToken` header.
pub fn verify_csrf(session: &Session, method: &str, token: Option<&str>) -> SessionResult<()> {
	if SAFE_METHODS.iter().any(|safe| safe.eq_ignore_ascii_case(method)) {
		return Ok(());
	}
	let expected = session.get_str(CSRF_TOKEN_KEY).unwrap_or_default();
	match token {
		Some(sent) if !expected.is_empty() && constant_time_eq(sent, expected) => Ok(()),
		_ => {
			tracing::warn!(method, "CSRF token validation failed");
			Err(SessionError::Csrf)
		}
	}
}

fn constant_time_eq(a: &str, b: &str) -> bool {
	a.len() == b.len()
		&& a
			.bytes()
			.zip(b.bytes())
			.fold(0u8, |acc, (x, y)| acc | (x ^ y))
			== 0
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("GET")]
	#[case("head")]
	#[case("OPTIONS")]
	fn test_safe_methods_pass_without_token(#[case] method: &str) {
		// Arrange
		let session = Session::new();

		// Act & Assert
		assert!(verify_csrf(&session, method, None).is_ok());
	}

	#[rstest]
	fn test_post_requires_matching_token() {
		// Arrange
		let mut session = Session::new();
		let token = csrf_token(&mut session);

		// Act & Assert
		assert!(verify_csrf(&session, "POST", Some(&token)).is_ok());
		assert!(matches!(
			verify_csrf(&session, "POST", Some("forged")),
			Err(SessionError::Csrf)
		));
		assert!(matches!(verify_csrf(&session, "POST", None), Err(SessionError::Csrf)));
	}

	#[rstest]
	fn test_post_fails_without_session_token() {
		// Arrange
		let session = Session::new();

		// Act & Assert
		assert!(verify_csrf(&session, "POST", Some("")).is_err());
	}

	#[rstest]
	fn test_rotation_changes_token() {
		// Arrange
		let mut session = Session::new();
		let first = csrf_token(&mut session);

		// Act
		let second = rotate_csrf_token(&mut session);

		// Assert
		assert_ne!(first, second);
		assert!(second.chars().all(|c| c.is_ascii_alphanumeric()));
	}
}
