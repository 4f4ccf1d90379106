//! Assembly of the application services

use anyhow::{Context, bail};
use chrono::Duration;
use foris_backend::{Backend, MemoryBackend};
use foris_conf::Settings;
use foris_config::{ForisPlugin, PageRegistry, enabled_plugins, load_plugins};
use foris_core::{AppContext, RequestContext};
use foris_i18n::Translator;
use foris_sessions::{FileSessionStore, InMemorySessionStore, SessionStore};
use foris_wizard::Wizard;
use std::path::Path;
use std::sync::Arc;

/// Shared services, pages and the wizard of a running interface
pub struct App {
	context: AppContext,
	registry: PageRegistry,
	wizard: Wizard,
	plugins: Vec<String>,
}

impl App {
	/// Loads settings from defaults, `path` and the environment, then builds
	/// the application with the backend they name
	pub fn from_env(path: Option<&Path>, available: Vec<Box<dyn ForisPlugin>>) -> anyhow::Result<Self> {
		let settings = Settings::load(path).context("failed to load settings")?;
		let backend: Arc<dyn Backend> = match settings.backend.as_str() {
			"memory" => Arc::new(MemoryBackend::new()),
			other => bail!("backend `{other}` is not supported"),
		};
		Self::build(settings, backend, available)
	}

	/// Builds the application over `backend`
	///
	/// Plugins enabled by the settings are loaded before the translator is
	/// shared, so their catalogs extend the built-in ones.
	pub fn build(
		settings: Settings,
		backend: Arc<dyn Backend>,
		available: Vec<Box<dyn ForisPlugin>>,
	) -> anyhow::Result<Self> {
		settings.validate().context("invalid settings")?;

		let mut translator = match &settings.locale_dir {
			Some(dir) => Translator::load_dir(settings.language.clone(), dir, &settings.languages)
				.with_context(|| format!("failed to load catalogs from {}", dir.display()))?,
			None => Translator::new(settings.language.clone()),
		};
		let mut registry = PageRegistry::with_defaults()?;
		let plugins = load_plugins(
			enabled_plugins(available, &settings.plugins),
			&mut registry,
			&mut translator,
		)?;

		let sessions: Arc<dyn SessionStore> = match &settings.session_dir {
			Some(dir) => {
				let timeout = i64::try_from(settings.session_timeout)
					.ok()
					.and_then(Duration::try_seconds)
					.with_context(|| format!("session timeout {} is out of range", settings.session_timeout))?;
				Arc::new(
					FileSessionStore::new(dir, timeout)
						.with_context(|| format!("failed to open session directory {}", dir.display()))?,
				)
			}
			None => Arc::new(InMemorySessionStore::new()),
		};

		tracing::info!(
			device = ?settings.device,
			pages = registry.len(),
			plugins = ?plugins,
			"Application assembled"
		);
		let context = AppContext::new(settings, backend, translator, sessions);
		Ok(Self {
			context,
			registry,
			wizard: Wizard::new(),
			plugins,
		})
	}

	pub fn context(&self) -> &AppContext {
		&self.context
	}

	pub fn settings(&self) -> &Settings {
		self.context.settings()
	}

	pub fn registry(&self) -> &PageRegistry {
		&self.registry
	}

	pub fn wizard(&self) -> &Wizard {
		&self.wizard
	}

	/// Names of the loaded plugins in load order
	pub fn plugins(&self) -> &[String] {
		&self.plugins
	}

	/// Opens the request of the session `session_id`, or of a new session
	pub fn request(&self, session_id: Option<&str>) -> foris_core::Result<RequestContext<'_>> {
		RequestContext::open(&self.context, session_id)
	}
}
