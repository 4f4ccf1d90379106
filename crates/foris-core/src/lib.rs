//! Core of the administration interface
//!
//! - [`AppContext`]: settings, backend, translator and session store shared
//!   by all requests
//! - [`RequestContext`]: the session of one request with translation, flash
//!   messages and CSRF helpers
//! - [`Response`] and [`Location`]: what handlers return
//! - [`WizardProgress`]: how far the setup wizard got
//! - [`Error`]: the error every handler reports

pub mod context;
pub mod exception;
pub mod messages;
pub mod progress;
pub mod response;

pub use context::{AppContext, RequestContext};
pub use exception::{Error, Result};
pub use messages::{Level, Message, MessageFilter};
pub use progress::{NUM_WIZARD_STEPS, WizardProgress, record_progress, wizard_progress};
pub use response::{Location, PageView, Response};
