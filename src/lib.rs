//! # Foris
//!
//! Web administration interface of a home router: configuration pages, a
//! step gated setup wizard and the declarative forms both are built from.
//!
//! The work is split over the workspace crates, re-exported here:
//!
//! - [`backend`]: the configuration backend client and its in-memory double
//! - [`forms`]: fields, sections, validators and the save protocol
//! - [`sessions`]: sessions, CSRF tokens and password hashing
//! - [`conf`]: layered settings
//! - [`i18n`]: message catalogs and the translator
//! - [`core`]: request context, responses and wizard progress
//! - [`config`]: configuration pages, login and plugins
//! - [`wizard`]: the setup wizard
//!
//! [`App`] wires them together for the HTTP layer, which stays outside of
//! this crate.
//!
//! ## Quick Example
//!
//! ```
//! use foris::App;
//! use foris::backend::MemoryBackend;
//! use foris::conf::Settings;
//! use std::sync::Arc;
//!
//! let app = App::build(Settings::default(), Arc::new(MemoryBackend::new()), Vec::new()).unwrap();
//! let mut ctx = app.request(None).unwrap();
//! let response = app.wizard().index(&mut ctx).unwrap();
//! assert!(response.as_redirect().is_some());
//! ```

pub mod app;
pub mod logging;

pub use app::App;

pub use foris_backend as backend;
pub use foris_conf as conf;
pub use foris_config as config;
pub use foris_core as core;
pub use foris_forms as forms;
pub use foris_i18n as i18n;
pub use foris_sessions as sessions;
pub use foris_wizard as wizard;

pub mod prelude {
	pub use crate::App;
	pub use foris_backend::{Backend, BackendExt, MemoryBackend};
	pub use foris_conf::Settings;
	pub use foris_config::{ConfigPage, FormBuilder, ForisPlugin, PageId, PageRegistry};
	pub use foris_core::{Location, PageView, RequestContext, Response};
	pub use foris_forms::{Field, FieldKind, ForisForm, Section, SubmittedData};
	pub use foris_wizard::{StepId, Wizard};
}
