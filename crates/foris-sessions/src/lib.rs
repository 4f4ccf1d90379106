//! Sessions and authentication of the administration interface
//!
//! - [`Session`]: flat JSON map kept per browser
//! - [`SessionStore`]: storage of sessions, in memory or as files
//! - CSRF tokens bound to the session
//! - Argon2 hashing of the administration password
//! - validation of post-login redirect targets
//!
//! ```
//! use foris_sessions::{InMemorySessionStore, Session, SessionStore, persist};
//!
//! let store = InMemorySessionStore::new();
//! let id = store.create_session_id();
//! let mut session = Session::new();
//! session.set_language("cs");
//!
//! assert!(persist(&store, &id, &mut session).unwrap());
//! assert_eq!(store.load(&id).unwrap().unwrap().language(), Some("cs"));
//! ```

pub mod csrf;
pub mod error;
pub mod hasher;
pub mod redirect;
pub mod session;
pub mod store;

pub use csrf::{SAFE_METHODS, csrf_token, rotate_csrf_token, verify_csrf};
pub use error::{SessionError, SessionResult};
pub use hasher::{Argon2Hasher, PasswordHasher, check_password};
pub use redirect::is_safe_redirect;
pub use session::{
	CSRF_TOKEN_KEY, LANGUAGE_KEY, Session, SessionId, USER_AUTHENTICATED_KEY,
};
pub use store::{FileSessionStore, InMemorySessionStore, SessionStore, persist};
