//! Flash messages
//!
//! Messages are kept in the session so they survive the redirect that
//! usually follows a POST, and are removed once read.

use foris_sessions::Session;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session key holding pending messages
pub const MESSAGES_KEY: &str = "foris_messages";

/// Severity of a message, ordered from the least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Debug,
	Info,
	Success,
	Warning,
	Error,
}

impl Level {
	/// CSS class of the level
	pub fn tag(self) -> &'static str {
		match self {
			Self::Debug => "debug",
			Self::Info => "info",
			Self::Success => "success",
			Self::Warning => "warning",
			Self::Error => "error",
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
	pub text: String,
	pub level: Level,
	#[serde(default)]
	pub extra_classes: Vec<String>,
}

impl Message {
	pub fn new(level: Level, text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			level,
			extra_classes: Vec::new(),
		}
	}

	pub fn with_class(mut self, class: impl Into<String>) -> Self {
		self.extra_classes.push(class.into());
		self
	}

	/// Space separated classes: the level tag and the extra ones
	pub fn classes(&self) -> String {
		std::iter::once(self.level.tag())
			.chain(self.extra_classes.iter().map(String::as_str))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Which pending messages to take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageFilter {
	#[default]
	All,
	Exactly(Level),
	AtLeast(Level),
}

impl MessageFilter {
	fn accepts(self, level: Level) -> bool {
		match self {
			Self::All => true,
			Self::Exactly(expected) => level == expected,
			Self::AtLeast(min) => level >= min,
		}
	}
}

fn pending(session: &Session) -> Vec<Message> {
	session.get_as(MESSAGES_KEY).unwrap_or_default()
}

/// Queues a message in the session
pub fn add_message(session: &mut Session, message: Message) {
	let mut messages = pending(session);
	messages.push(message);
	store(session, &messages);
}

/// Removes and returns the pending messages the filter accepts
///
/// # Examples
///
/// ```
/// use foris_core::messages::{Level, Message, MessageFilter, add_message, take_messages};
/// use foris_sessions::Session;
///
/// let mut session = Session::new();
/// add_message(&mut session, Message::new(Level::Info, "Rebooting"));
/// add_message(&mut session, Message::new(Level::Error, "Update failed"));
///
/// let alerts = take_messages(&mut session, MessageFilter::AtLeast(Level::Warning));
/// assert_eq!(alerts.len(), 1);
/// assert_eq!(take_messages(&mut session, MessageFilter::All)[0].text, "Rebooting");
/// ```
pub fn take_messages(session: &mut Session, filter: MessageFilter) -> Vec<Message> {
	let messages = pending(session);
	if messages.is_empty() {
		return messages;
	}
	let (taken, kept): (Vec<_>, Vec<_>) = messages
		.into_iter()
		.partition(|message| filter.accepts(message.level));
	store(session, &kept);
	taken
}

fn store(session: &mut Session, messages: &[Message]) {
	if messages.is_empty() {
		session.remove(MESSAGES_KEY);
		return;
	}
	match serde_json::to_value(messages) {
		Ok(value) => session.set(MESSAGES_KEY, value),
		Err(err) => tracing::warn!(error = %err, "Flash messages could not be stored"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(MessageFilter::All, 3)]
	#[case(MessageFilter::Exactly(Level::Success), 1)]
	#[case(MessageFilter::AtLeast(Level::Success), 2)]
	fn test_take_messages_filters(#[case] filter: MessageFilter, #[case] expected: usize) {
		// Arrange
		let mut session = Session::new();
		add_message(&mut session, Message::new(Level::Info, "a"));
		add_message(&mut session, Message::new(Level::Success, "b"));
		add_message(&mut session, Message::new(Level::Error, "c"));

		// Act
		let taken = take_messages(&mut session, filter);

		// Assert
		assert_eq!(taken.len(), expected);
		assert_eq!(take_messages(&mut session, MessageFilter::All).len(), 3 - expected);
	}

	#[rstest]
	fn test_taking_everything_clears_the_key() {
		// Arrange
		let mut session = Session::new();
		add_message(&mut session, Message::new(Level::Warning, "WAN cable is unplugged"));

		// Act
		take_messages(&mut session, MessageFilter::All);

		// Assert
		assert!(!session.contains(MESSAGES_KEY));
	}

	#[rstest]
	fn test_classes_include_level() {
		// Arrange
		let message = Message::new(Level::Error, "x").with_class("persistent");

		// Act & Assert
		assert_eq!(message.classes(), "error persistent");
	}
}
