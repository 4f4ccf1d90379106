//! Session storage backends

use crate::error::{SessionError, SessionResult};
use crate::session::{Session, SessionId};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Session store trait for different backends
pub trait SessionStore: Send + Sync {
	/// Load session data by session ID, `None` when unknown or expired
	fn load(&self, session_id: &SessionId) -> SessionResult<Option<Session>>;

	fn save(&self, session_id: &SessionId, session: &Session) -> SessionResult<()>;

	fn delete(&self, session_id: &SessionId) -> SessionResult<()>;

	fn create_session_id(&self) -> SessionId {
		Uuid::new_v4().to_string()
	}

	/// Moves `session` under a fresh ID and forgets the old one
	///
	/// Called on login so a session ID known before authentication is
	/// never authenticated.
	fn cycle_id(&self, old_id: &SessionId, session: &Session) -> SessionResult<SessionId> {
		let new_id = self.create_session_id();
		self.save(&new_id, session)?;
		self.delete(old_id)?;
		tracing::debug!(old = %old_id, new = %new_id, "Session ID cycled");
		Ok(new_id)
	}
}

/// Saves `session` when it changed since it was loaded
///
/// Returns whether anything was written.
pub fn persist(
	store: &dyn SessionStore,
	session_id: &SessionId,
	session: &mut Session,
) -> SessionResult<bool> {
	if !session.is_tainted() {
		return Ok(false);
	}
	store.save(session_id, session)?;
	session.mark_clean();
	Ok(true)
}

/// In-memory session store for testing and development
///
/// # Examples
///
/// ```
/// use foris_sessions::{InMemorySessionStore, Session, SessionStore};
///
/// let store = InMemorySessionStore::new();
/// let id = store.create_session_id();
/// assert!(store.load(&id).unwrap().is_none());
///
/// store.save(&id, &Session::new()).unwrap();
/// assert!(store.load(&id).unwrap().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
	sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.sessions.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.lock().is_empty()
	}
}

impl SessionStore for InMemorySessionStore {
	fn load(&self, session_id: &SessionId) -> SessionResult<Option<Session>> {
		Ok(self.sessions.lock().get(session_id).cloned())
	}

	fn save(&self, session_id: &SessionId, session: &Session) -> SessionResult<()> {
		let mut stored = session.clone();
		stored.mark_clean();
		self.sessions.lock().insert(session_id.clone(), stored);
		Ok(())
	}

	fn delete(&self, session_id: &SessionId) -> SessionResult<()> {
		self.sessions.lock().remove(session_id);
		Ok(())
	}
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
	expires_at: DateTime<Utc>,
	session: Session,
}

/// Stores each session as a JSON file, expiring after a period of inactivity
#[derive(Debug, Clone)]
pub struct FileSessionStore {
	dir: PathBuf,
	timeout: Duration,
}

impl FileSessionStore {
	/// Creates the store, creating `dir` when missing
	pub fn new(dir: impl Into<PathBuf>, timeout: Duration) -> SessionResult<Self> {
		let dir = dir.into();
		fs::create_dir_all(&dir)?;
		Ok(Self { dir, timeout })
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	fn path_for(&self, session_id: &str) -> SessionResult<PathBuf> {
		let id = Uuid::parse_str(session_id)
			.map_err(|_| SessionError::InvalidId(session_id.to_string()))?;
		Ok(self.dir.join(format!("{}.json", id.hyphenated())))
	}
}

impl SessionStore for FileSessionStore {
	fn load(&self, session_id: &SessionId) -> SessionResult<Option<Session>> {
		let path = self.path_for(session_id)?;
		let raw = match fs::read_to_string(&path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err.into()),
		};
		let stored: StoredSession = match serde_json::from_str(&raw) {
			Ok(stored) => stored,
			Err(err) => {
				tracing::warn!(session = %session_id, error = %err, "Discarding unreadable session");
				fs::remove_file(&path)?;
				return Ok(None);
			}
		};
		if stored.expires_at <= Utc::now() {
			tracing::debug!(session = %session_id, "Session expired");
			fs::remove_file(&path)?;
			return Ok(None);
		}
		Ok(Some(stored.session))
	}

	fn save(&self, session_id: &SessionId, session: &Session) -> SessionResult<()> {
		let path = self.path_for(session_id)?;
		let stored = StoredSession {
			expires_at: Utc::now() + self.timeout,
			session: session.clone(),
		};
		let raw = serde_json::to_string(&stored)
			.map_err(|e| SessionError::Serialization(session_id.clone(), e.to_string()))?;
		fs::write(path, raw)?;
		Ok(())
	}

	fn delete(&self, session_id: &SessionId) -> SessionResult<()> {
		match fs::remove_file(self.path_for(session_id)?) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(err.into()),
		}
	}
}
