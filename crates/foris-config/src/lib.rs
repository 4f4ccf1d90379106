//! Configuration section of the administration interface
//!
//! Each configuration domain (password, WAN, LAN, Wi-Fi, ...) is a
//! [`FormBuilder`] in [`handlers`]. A [`ConfigPage`] pairs a form builder
//! with an optional [`ActionHandler`], and the [`PageRegistry`] resolves
//! pages by slug and dispatches requests to them. Plugins add pages and
//! translations through [`ForisPlugin`].
//!
//! # Examples
//!
//! ```
//! use foris_config::{PageId, PageRegistry};
//!
//! let registry = PageRegistry::with_defaults().unwrap();
//! assert_eq!(registry.pages()[0].id(), &PageId::Notifications);
//! assert!(registry.get("openvpn").is_err());
//! ```

pub mod auth;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod page;
pub mod plugin;
pub mod registry;

mod values;

pub use auth::{login, login_page, login_with, logout, require_login};
pub use error::{ConfigError, ConfigResult};
pub use handler::{ActionHandler, FormBuilder, report_malformed, report_saved, save_form};
pub use page::{ConfigPage, PageId, default_pages};
pub use plugin::{ForisPlugin, enabled_plugins, load_plugins};
pub use registry::{MenuEntry, PageRegistry};
