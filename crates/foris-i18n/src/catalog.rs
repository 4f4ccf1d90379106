//! Message catalog for storing translations

use std::collections::HashMap;

/// Translations of one language
///
/// # Examples
///
/// ```
/// use foris_i18n::MessageCatalog;
///
/// let mut catalog = MessageCatalog::new("cs");
/// catalog.add_translation("Save", "Uložit");
/// catalog.add_plural("%d day", vec!["%d den".into(), "%d dny".into(), "%d dní".into()]);
///
/// assert_eq!(catalog.get("Save"), Some("Uložit"));
/// assert_eq!(catalog.get_plural("%d day", 3), Some("%d dny"));
/// assert_eq!(catalog.get_plural("%d day", 7), Some("%d dní"));
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
	locale: String,
	messages: HashMap<String, String>,
	plurals: HashMap<String, Vec<String>>,
	contexts: HashMap<(String, String), String>,
}

impl MessageCatalog {
	pub fn new(locale: &str) -> Self {
		Self {
			locale: locale.to_string(),
			messages: HashMap::new(),
			plurals: HashMap::new(),
			contexts: HashMap::new(),
		}
	}

	pub fn locale(&self) -> &str {
		&self.locale
	}

	pub fn add_translation(&mut self, message: impl Into<String>, translation: impl Into<String>) {
		self.messages.insert(message.into(), translation.into());
	}

	/// Plural forms in the order of the language's plural rule
	pub fn add_plural(&mut self, singular: impl Into<String>, forms: Vec<String>) {
		self.plurals.insert(singular.into(), forms);
	}

	pub fn add_context(
		&mut self,
		context: impl Into<String>,
		message: impl Into<String>,
		translation: impl Into<String>,
	) {
		self.contexts
			.insert((context.into(), message.into()), translation.into());
	}

	pub fn get(&self, message: &str) -> Option<&str> {
		self.messages.get(message).map(String::as_str)
	}

	pub fn get_plural(&self, singular: &str, count: u64) -> Option<&str> {
		let forms = self.plurals.get(singular)?;
		forms.get(self.plural_form(count)).map(String::as_str)
	}

	pub fn get_context(&self, context: &str, message: &str) -> Option<&str> {
		self.contexts
			.get(&(context.to_string(), message.to_string()))
			.map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.messages.len() + self.plurals.len() + self.contexts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Adds the entries of `other`, which win over existing ones
	pub fn merge(&mut self, other: MessageCatalog) {
		self.messages.extend(other.messages);
		self.plurals.extend(other.plurals);
		self.contexts.extend(other.contexts);
	}

	/// Index of the plural form used for `count`
	pub fn plural_form(&self, count: u64) -> usize {
		match self.language() {
			"cs" | "sk" => match count {
				1 => 0,
				2..=4 => 1,
				_ => 2,
			},
			"pl" => {
				if count == 1 {
					0
				} else if (2..=4).contains(&(count % 10)) && !(12..=14).contains(&(count % 100)) {
					1
				} else {
					2
				}
			}
			"ja" | "ko" | "zh" => 0,
			_ => usize::from(count != 1),
		}
	}

	fn language(&self) -> &str {
		self.locale
			.split(['_', '-'])
			.next()
			.unwrap_or(&self.locale)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("en", 1, 0)]
	#[case("en", 0, 1)]
	#[case("de_DE", 2, 1)]
	#[case("cs", 4, 1)]
	#[case("cs", 5, 2)]
	#[case("pl", 22, 1)]
	#[case("pl", 12, 2)]
	#[case("ja", 9, 0)]
	fn test_plural_form(#[case] locale: &str, #[case] count: u64, #[case] expected: usize) {
		// Arrange
		let catalog = MessageCatalog::new(locale);

		// Act & Assert
		assert_eq!(catalog.plural_form(count), expected);
	}

	#[rstest]
	fn test_context_is_separate_from_plain_messages() {
		// Arrange
		let mut catalog = MessageCatalog::new("de");
		catalog.add_translation("Open", "Öffnen");
		catalog.add_context("port", "Open", "Offen");

		// Act & Assert
		assert_eq!(catalog.get("Open"), Some("Öffnen"));
		assert_eq!(catalog.get_context("port", "Open"), Some("Offen"));
		assert_eq!(catalog.get_context("menu", "Open"), None);
	}
}
