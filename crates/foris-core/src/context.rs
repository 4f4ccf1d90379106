//! Application wide services and the state of a single request

use crate::exception::Result;
use crate::messages::{self, Level, Message, MessageFilter};
use foris_backend::{Backend, BackendExt};
use foris_conf::Settings;
use foris_i18n::Translator;
use foris_sessions::{Session, SessionError, SessionId, SessionStore};
use std::sync::Arc;

/// Services shared by all requests
#[derive(Clone)]
pub struct AppContext {
	settings: Arc<Settings>,
	backend: Arc<dyn Backend>,
	translator: Arc<Translator>,
	sessions: Arc<dyn SessionStore>,
}

impl AppContext {
	pub fn new(
		settings: Settings,
		backend: Arc<dyn Backend>,
		translator: Translator,
		sessions: Arc<dyn SessionStore>,
	) -> Self {
		Self {
			settings: Arc::new(settings),
			backend,
			translator: Arc::new(translator),
			sessions,
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn backend(&self) -> &dyn Backend {
		self.backend.as_ref()
	}

	/// Shared handle, for forms that keep the backend
	pub fn backend_handle(&self) -> Arc<dyn Backend> {
		Arc::clone(&self.backend)
	}

	pub fn translator(&self) -> &Translator {
		&self.translator
	}

	pub fn sessions(&self) -> &dyn SessionStore {
		self.sessions.as_ref()
	}
}

/// State of one request: the loaded session and the shared services
///
/// The session is written back by [`RequestContext::finish`], and only when
/// it changed.
pub struct RequestContext<'a> {
	app: &'a AppContext,
	session_id: SessionId,
	session: Session,
	host: Option<String>,
	is_new: bool,
}

impl<'a> RequestContext<'a> {
	/// Loads the session `session_id`, starting a new one when it is unknown
	pub fn open(app: &'a AppContext, session_id: Option<&str>) -> Result<Self> {
		if let Some(id) = session_id {
			match app.sessions().load(&id.to_string()) {
				Ok(Some(session)) => {
					return Ok(Self {
						app,
						session_id: id.to_string(),
						session,
						host: None,
						is_new: false,
					});
				}
				Ok(None) => tracing::debug!(session = %id, "Unknown session, starting a new one"),
				Err(SessionError::InvalidId(_)) => {
					tracing::warn!(session = %id, "Malformed session id, starting a new session");
				}
				Err(err) => return Err(err.into()),
			}
		}
		Ok(Self::fresh(app))
	}

	/// Request with a brand new session
	pub fn fresh(app: &'a AppContext) -> Self {
		Self {
			app,
			session_id: app.sessions().create_session_id(),
			session: Session::new(),
			host: None,
			is_new: true,
		}
	}

	/// Host the request was sent to, used to validate redirects
	pub fn with_host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());
		self
	}

	pub fn app(&self) -> &'a AppContext {
		self.app
	}

	pub fn settings(&self) -> &'a Settings {
		self.app.settings()
	}

	pub fn backend(&self) -> &'a dyn Backend {
		self.app.backend()
	}

	pub fn host(&self) -> Option<&str> {
		self.host.as_deref()
	}

	pub fn session_id(&self) -> &SessionId {
		&self.session_id
	}

	/// Whether the session was created by this request
	pub fn is_new(&self) -> bool {
		self.is_new
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn session_mut(&mut self) -> &mut Session {
		&mut self.session
	}

	pub fn is_authenticated(&self) -> bool {
		self.session.is_authenticated()
	}

	/// Language of the session when enabled, the configured default otherwise
	pub fn language(&self) -> &str {
		let settings = self.app.settings();
		self.session
			.language()
			.filter(|lang| settings.languages.iter().any(|enabled| enabled == lang))
			.unwrap_or(&settings.language)
	}

	/// Switches the interface language, stored on the router as well
	///
	/// Returns `false` for a language that is not enabled.
	pub fn set_language(&mut self, language: &str) -> Result<bool> {
		if !self.settings().languages.iter().any(|enabled| enabled == language) {
			return Ok(false);
		}
		if !self.backend().set_language(language)? {
			tracing::warn!(language, "Router refused the interface language");
			return Ok(false);
		}
		self.session.set_language(language);
		Ok(true)
	}

	/// Translation of `message` into the request language
	pub fn gettext(&self, message: &str) -> String {
		self.app
			.translator()
			.gettext(self.language(), message)
			.to_string()
	}

	pub fn ngettext(&self, singular: &str, plural: &str, count: u64) -> String {
		self.app
			.translator()
			.ngettext(self.language(), singular, plural, count)
			.to_string()
	}

	/// Queues a flash message, translated into the request language
	pub fn message(&mut self, level: Level, text: &str) {
		let text = self.gettext(text);
		messages::add_message(&mut self.session, Message::new(level, text));
	}

	pub fn info(&mut self, text: &str) {
		self.message(Level::Info, text);
	}

	pub fn success(&mut self, text: &str) {
		self.message(Level::Success, text);
	}

	pub fn warning(&mut self, text: &str) {
		self.message(Level::Warning, text);
	}

	pub fn error(&mut self, text: &str) {
		self.message(Level::Error, text);
	}

	pub fn take_messages(&mut self, filter: MessageFilter) -> Vec<Message> {
		messages::take_messages(&mut self.session, filter)
	}

	/// CSRF token to embed in rendered forms
	pub fn csrf_token(&mut self) -> String {
		foris_sessions::csrf_token(&mut self.session)
	}

	pub fn verify_csrf(&self, method: &str, token: Option<&str>) -> Result<()> {
		Ok(foris_sessions::verify_csrf(&self.session, method, token)?)
	}

	/// Marks the session authenticated under a fresh id and CSRF token
	pub fn authenticate(&mut self) -> Result<()> {
		self.session.set_authenticated(true);
		foris_sessions::rotate_csrf_token(&mut self.session);
		let new_id = self
			.app
			.sessions()
			.cycle_id(&self.session_id, &self.session)?;
		tracing::info!(session = %new_id, "User authenticated");
		self.session_id = new_id;
		Ok(())
	}

	/// Drops the session, keeping only the chosen language
	pub fn logout(&mut self) -> Result<()> {
		let language = self.session.language().map(str::to_string);
		self.app.sessions().delete(&self.session_id)?;
		self.session_id = self.app.sessions().create_session_id();
		self.session = Session::new();
		if let Some(language) = language {
			self.session.set_language(language);
		}
		self.is_new = true;
		Ok(())
	}

	/// Whether `target` may be redirected to from this request
	pub fn is_safe_redirect(&self, target: &str) -> bool {
		foris_sessions::is_safe_redirect(target, self.host.as_deref())
	}

	/// Writes the session back when it changed and returns its id
	pub fn finish(mut self) -> Result<SessionId> {
		foris_sessions::persist(self.app.sessions(), &self.session_id, &mut self.session)?;
		Ok(self.session_id)
	}
}
