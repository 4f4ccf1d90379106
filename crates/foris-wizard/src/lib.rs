//! Setup wizard of the administration interface
//!
//! Ten ordered steps walk a fresh router through its basic configuration.
//! A step may only be shown once the router got that far; the
//! [`gate`] keeps that high-water mark in the backend and the session.
//!
//! # Examples
//!
//! ```
//! use foris_wizard::StepId;
//!
//! let step = StepId::try_from(3u8).unwrap();
//! assert_eq!(step, StepId::Connectivity);
//! assert!(step.can_skip());
//! assert!(StepId::try_from(11u8).is_err());
//! ```

pub mod checks;
pub mod error;
pub mod gate;
pub mod step;
pub mod wizard;

pub use checks::{Connectivity, updater_status_json};
pub use error::{WizardError, WizardResult};
pub use gate::{advanced, check_step, complete_step, may_skip, open_step};
pub use step::StepId;
pub use wizard::{SKIP_PATH, Wizard};
