//! Translation lookup across the enabled languages

use crate::catalog::MessageCatalog;
use crate::po_parser::{PoParseError, parse_po_file};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum I18nError {
	#[error("Failed to load catalog of `{language}`: {source}")]
	Catalog {
		language: String,
		#[source]
		source: PoParseError,
	},
}

/// Catalogs of all enabled languages
///
/// Lookups for a language without a catalog, or of a message the catalog
/// lacks, return the message itself.
///
/// # Examples
///
/// ```
/// use foris_i18n::{MessageCatalog, Translator};
///
/// let mut cs = MessageCatalog::new("cs");
/// cs.add_translation("Password", "Heslo");
///
/// let mut translator = Translator::new("en");
/// translator.add_catalog(cs);
///
/// assert_eq!(translator.gettext("cs", "Password"), "Heslo");
/// assert_eq!(translator.gettext("de", "Password"), "Password");
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
	default_language: String,
	catalogs: HashMap<String, MessageCatalog>,
}

impl Translator {
	pub fn new(default_language: impl Into<String>) -> Self {
		Self {
			default_language: default_language.into(),
			catalogs: HashMap::new(),
		}
	}

	/// Loads `<dir>/<language>.po` for each language that has a file
	///
	/// A language without a file falls back to untranslated messages.
	pub fn load_dir(
		default_language: impl Into<String>,
		dir: &Path,
		languages: &[String],
	) -> Result<Self, I18nError> {
		let mut translator = Self::new(default_language);
		for language in languages {
			let path = dir.join(format!("{language}.po"));
			let file = match File::open(&path) {
				Ok(file) => file,
				Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
					tracing::debug!(language = %language, path = %path.display(), "No catalog, messages stay untranslated");
					continue;
				}
				Err(err) => {
					return Err(I18nError::Catalog {
						language: language.clone(),
						source: err.into(),
					});
				}
			};
			let catalog = parse_po_file(file, language).map_err(|source| I18nError::Catalog {
				language: language.clone(),
				source,
			})?;
			translator.add_catalog(catalog);
		}
		Ok(translator)
	}

	/// Adds a catalog, merging it into an existing one of the same language
	pub fn add_catalog(&mut self, catalog: MessageCatalog) {
		match self.catalogs.get_mut(catalog.locale()) {
			Some(existing) => existing.merge(catalog),
			None => {
				self.catalogs.insert(catalog.locale().to_string(), catalog);
			}
		}
	}

	pub fn default_language(&self) -> &str {
		&self.default_language
	}

	pub fn has_catalog(&self, language: &str) -> bool {
		self.catalogs.contains_key(language)
	}

	pub fn gettext<'a>(&'a self, language: &str, message: &'a str) -> &'a str {
		self.catalogs
			.get(language)
			.and_then(|catalog| catalog.get(message))
			.unwrap_or(message)
	}

	/// Plural lookup; untranslated messages use English plural rules
	pub fn ngettext<'a>(
		&'a self,
		language: &str,
		singular: &'a str,
		plural: &'a str,
		count: u64,
	) -> &'a str {
		self.catalogs
			.get(language)
			.and_then(|catalog| catalog.get_plural(singular, count))
			.unwrap_or(if count == 1 { singular } else { plural })
	}

	pub fn pgettext<'a>(&'a self, language: &str, context: &str, message: &'a str) -> &'a str {
		self.catalogs
			.get(language)
			.and_then(|catalog| catalog.get_context(context, message))
			.unwrap_or(message)
	}
}

impl Default for Translator {
	fn default() -> Self {
		Self::new("en")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn translator() -> Translator {
		let mut cs = MessageCatalog::new("cs");
		cs.add_translation("Save", "Uložit");
		cs.add_plural("%d step", vec!["%d krok".into(), "%d kroky".into(), "%d kroků".into()]);
		cs.add_context("wizard", "Next", "Další krok");
		let mut translator = Translator::new("en");
		translator.add_catalog(cs);
		translator
	}

	#[rstest]
	#[case(1, "%d step")]
	#[case(2, "%d steps")]
	fn test_ngettext_falls_back_to_english_rules(
		translator: Translator,
		#[case] count: u64,
		#[case] expected: &str,
	) {
		// Act & Assert
		assert_eq!(translator.ngettext("de", "%d step", "%d steps", count), expected);
	}

	#[rstest]
	fn test_ngettext_uses_language_rule(translator: Translator) {
		// Act & Assert
		assert_eq!(translator.ngettext("cs", "%d step", "%d steps", 3), "%d kroky");
	}

	#[rstest]
	fn test_pgettext(translator: Translator) {
		// Act & Assert
		assert_eq!(translator.pgettext("cs", "wizard", "Next"), "Další krok");
		assert_eq!(translator.pgettext("cs", "menu", "Next"), "Next");
	}

	#[rstest]
	fn test_add_catalog_merges_same_language(mut translator: Translator) {
		// Arrange
		let mut plugin = MessageCatalog::new("cs");
		plugin.add_translation("Tokens", "Tokeny");

		// Act
		translator.add_catalog(plugin);

		// Assert
		assert_eq!(translator.gettext("cs", "Tokens"), "Tokeny");
		assert_eq!(translator.gettext("cs", "Save"), "Uložit");
	}
}
