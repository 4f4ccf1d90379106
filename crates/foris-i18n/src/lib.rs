//! Internationalization of the administration interface
//!
//! Catalogs are read from gettext `.po` files, one per language, and looked
//! up through a [`Translator`] with the language of the current request.

pub mod catalog;
pub mod po_parser;
pub mod translator;

pub use catalog::MessageCatalog;
pub use po_parser::{PoParseError, parse_po_file};
pub use translator::{I18nError, Translator};
