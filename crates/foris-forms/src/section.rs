//! Sections group fields of a form

use crate::field::Field;

/// Child of a section
#[derive(Debug, Clone)]
pub enum Element {
	Field(Field),
	Section(Section),
}

/// Named, titled group of fields and nested sections
///
/// # Examples
///
/// ```
/// use foris_forms::{Field, FieldKind, Section};
///
/// let mut wan = Section::new("wan", "WAN")
/// 	.with_description("Settings of the interface connected to your ISP.");
/// wan.add_field(Field::new("proto", FieldKind::Dropdown));
///
/// let mut pppoe = Section::new("pppoe", "PPPoE");
/// pppoe.add_field(Field::new("username", FieldKind::Text));
/// wan.add_section(pppoe);
///
/// let names: Vec<&str> = wan.fields().map(|f| f.name()).collect();
/// assert_eq!(names, ["proto", "username"]);
/// ```
#[derive(Debug, Clone)]
pub struct Section {
	name: String,
	title: String,
	description: Option<String>,
	children: Vec<Element>,
}

impl Section {
	pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			title: title.into(),
			description: None,
			children: Vec::new(),
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn add_field(&mut self, field: Field) -> &mut Self {
		self.children.push(Element::Field(field));
		self
	}

	pub fn add_section(&mut self, section: Section) -> &mut Self {
		self.children.push(Element::Section(section));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	pub fn children(&self) -> &[Element] {
		&self.children
	}

	/// Nested sections, direct children only
	pub fn sections(&self) -> impl Iterator<Item = &Section> {
		self.children.iter().filter_map(|child| match child {
			Element::Section(section) => Some(section),
			Element::Field(_) => None,
		})
	}

	/// All fields of the subtree, depth first in declaration order
	pub fn fields(&self) -> Box<dyn Iterator<Item = &Field> + '_> {
		Box::new(self.children.iter().flat_map(|child| -> Box<dyn Iterator<Item = &Field> + '_> {
			match child {
				Element::Field(field) => Box::new(std::iter::once(field)),
				Element::Section(section) => section.fields(),
			}
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldKind;
	use rstest::rstest;

	#[rstest]
	fn test_fields_preserve_declaration_order_across_nesting() {
		// Arrange
		let mut inner = Section::new("inner", "Inner");
		inner.add_field(Field::new("b", FieldKind::Text));
		let mut outer = Section::new("outer", "Outer");
		outer
			.add_field(Field::new("a", FieldKind::Text))
			.add_section(inner)
			.add_field(Field::new("c", FieldKind::Text));

		// Act
		let names: Vec<&str> = outer.fields().map(|f| f.name()).collect();

		// Assert
		assert_eq!(names, ["a", "b", "c"]);
		assert_eq!(outer.sections().count(), 1);
	}
}
