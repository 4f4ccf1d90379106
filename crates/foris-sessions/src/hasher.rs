//! Password hashing of the administration password

use crate::error::{SessionError, SessionResult};

/// Password hasher trait
pub trait PasswordHasher: Send + Sync {
	/// Hashes a password into a self-describing PHC string
	fn hash(&self, password: &str) -> SessionResult<String>;

	/// `Ok(false)` on mismatch, an error when `hash` cannot be parsed
	fn verify(&self, password: &str, hash: &str) -> SessionResult<bool>;
}

/// Argon2id password hasher
///
/// # Examples
///
/// ```
/// use foris_sessions::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("turris123").unwrap();
///
/// assert!(hasher.verify("turris123", &hash).unwrap());
/// assert!(!hasher.verify("wrong", &hash).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> SessionResult<String> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
		let salt =
			SaltString::encode_b64(&salt_bytes).map_err(|e| SessionError::Hashing(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| SessionError::Hashing(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> SessionResult<bool> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed = PasswordHash::new(hash).map_err(|e| SessionError::Hashing(e.to_string()))?;
		match Argon2::default().verify_password(password.as_bytes(), &parsed) {
			Ok(()) => Ok(true),
			Err(password_hash::Error::Password) => Ok(false),
			Err(e) => Err(SessionError::Hashing(e.to_string())),
		}
	}
}

/// Checks a login attempt against the stored hash
///
/// A router without a password yet accepts any attempt, so the first setup
/// can be reached.
pub fn check_password(
	hasher: &dyn PasswordHasher,
	password: &str,
	stored: Option<&str>,
) -> SessionResult<bool> {
	match stored {
		None | Some("") => Ok(true),
		Some(hash) => hasher.verify(password, hash),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_hashes_are_salted() {
		// Arrange
		let hasher = Argon2Hasher::new();

		// Act
		let first = hasher.hash("same").unwrap();
		let second = hasher.hash("same").unwrap();

		// Assert
		assert_ne!(first, second);
		assert!(first.starts_with("$argon2id$"));
	}

	#[rstest]
	fn test_unset_password_accepts_anything() {
		// Arrange
		let hasher = Argon2Hasher::new();

		// Act & Assert
		assert!(check_password(&hasher, "whatever", None).unwrap());
		assert!(check_password(&hasher, "whatever", Some("")).unwrap());
	}

	#[rstest]
	fn test_garbage_hash_is_an_error() {
		// Arrange
		let hasher = Argon2Hasher::new();

		// Act
		let result = check_password(&hasher, "whatever", Some("not a hash"));

		// Assert
		assert!(matches!(result, Err(SessionError::Hashing(_))));
	}
}
