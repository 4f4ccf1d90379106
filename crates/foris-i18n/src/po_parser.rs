//! Gettext .po file parser

use crate::catalog::MessageCatalog;
use std::io::{BufRead, BufReader};

#[derive(Debug, thiserror::Error)]
pub enum PoParseError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Parse error at line {line}: {message}")]
	Syntax { line: usize, message: String },
}

#[derive(Debug, Clone, Default)]
struct PoEntry {
	msgctxt: Option<String>,
	msgid: String,
	msgid_plural: Option<String>,
	msgstr: Vec<String>,
	fuzzy: bool,
}

#[derive(Debug, Clone, Copy)]
enum Target {
	Context,
	Id,
	Plural,
	Str(usize),
}

/// Parses a .po file into a catalog for `locale`
///
/// The header entry, fuzzy entries and untranslated entries are skipped.
///
/// # Examples
///
/// ```
/// use foris_i18n::parse_po_file;
///
/// let po = "msgid \"Reboot\"\nmsgstr \"Restartovat\"\n";
/// let catalog = parse_po_file(po.as_bytes(), "cs").unwrap();
/// assert_eq!(catalog.get("Reboot"), Some("Restartovat"));
/// ```
pub fn parse_po_file<R: std::io::Read>(
	reader: R,
	locale: &str,
) -> Result<MessageCatalog, PoParseError> {
	let mut catalog = MessageCatalog::new(locale);
	let mut entry = PoEntry::default();
	let mut target: Option<Target> = None;
	let mut pending_fuzzy = false;

	for (number, line) in BufReader::new(reader).lines().enumerate() {
		let line = line?;
		let trimmed = line.trim();
		let line_no = number + 1;

		if trimmed.is_empty() {
			continue;
		}
		if let Some(flags) = trimmed.strip_prefix("#,") {
			pending_fuzzy |= flags.split(',').any(|flag| flag.trim() == "fuzzy");
			continue;
		}
		if trimmed.starts_with('#') {
			continue;
		}

		let starts_entry = trimmed.starts_with("msgctxt")
			|| (trimmed.starts_with("msgid") && !trimmed.starts_with("msgid_plural"));
		if starts_entry && !matches!(target, Some(Target::Context)) {
			flush(&mut catalog, std::mem::take(&mut entry));
			entry.fuzzy = std::mem::take(&mut pending_fuzzy);
		}

		if let Some(value) = keyword(trimmed, "msgctxt", line_no)? {
			entry.msgctxt = Some(value);
			target = Some(Target::Context);
		} else if let Some(value) = keyword(trimmed, "msgid_plural", line_no)? {
			entry.msgid_plural = Some(value);
			target = Some(Target::Plural);
		} else if let Some(value) = keyword(trimmed, "msgid", line_no)? {
			entry.msgid = value;
			target = Some(Target::Id);
		} else if let Some((index, value)) = indexed_msgstr(trimmed, line_no)? {
			if entry.msgstr.len() <= index {
				entry.msgstr.resize(index + 1, String::new());
			}
			entry.msgstr[index] = value;
			target = Some(Target::Str(index));
		} else if let Some(value) = keyword(trimmed, "msgstr", line_no)? {
			entry.msgstr = vec![value];
			target = Some(Target::Str(0));
		} else if trimmed.starts_with('"') {
			let value = quoted(trimmed, line_no)?;
			match target {
				Some(Target::Context) => entry.msgctxt.get_or_insert_default().push_str(&value),
				Some(Target::Id) => entry.msgid.push_str(&value),
				Some(Target::Plural) => entry.msgid_plural.get_or_insert_default().push_str(&value),
				Some(Target::Str(index)) => {
					if let Some(existing) = entry.msgstr.get_mut(index) {
						existing.push_str(&value);
					}
				}
				None => {
					return Err(PoParseError::Syntax {
						line: line_no,
						message: "continuation string without a keyword".to_string(),
					});
				}
			}
		} else {
			return Err(PoParseError::Syntax {
				line: line_no,
				message: format!("unexpected content `{trimmed}`"),
			});
		}
	}
	flush(&mut catalog, entry);

	tracing::debug!(locale, entries = catalog.len(), "Parsed message catalog");
	Ok(catalog)
}

fn keyword(line: &str, keyword: &str, line_no: usize) -> Result<Option<String>, PoParseError> {
	let Some(rest) = line.strip_prefix(keyword) else {
		return Ok(None);
	};
	if !rest.starts_with(char::is_whitespace) {
		return Ok(None);
	}
	quoted(rest.trim(), line_no).map(Some)
}

fn indexed_msgstr(line: &str, line_no: usize) -> Result<Option<(usize, String)>, PoParseError> {
	let Some(rest) = line.strip_prefix("msgstr[") else {
		return Ok(None);
	};
	let Some((index, rest)) = rest.split_once(']') else {
		return Err(PoParseError::Syntax {
			line: line_no,
			message: "unterminated plural index".to_string(),
		});
	};
	let index = index.parse().map_err(|_| PoParseError::Syntax {
		line: line_no,
		message: format!("invalid plural index `{index}`"),
	})?;
	Ok(Some((index, quoted(rest.trim(), line_no)?)))
}

fn quoted(value: &str, line_no: usize) -> Result<String, PoParseError> {
	value
		.strip_prefix('"')
		.and_then(|v| v.strip_suffix('"'))
		.map(unescape_string)
		.ok_or_else(|| PoParseError::Syntax {
			line: line_no,
			message: "expected a quoted string".to_string(),
		})
}

fn unescape_string(s: &str) -> String {
	let mut result = String::with_capacity(s.len());
	let mut chars = s.chars();

	while let Some(ch) = chars.next() {
		if ch != '\\' {
			result.push(ch);
			continue;
		}
		match chars.next() {
			Some('n') => result.push('\n'),
			Some('t') => result.push('\t'),
			Some('r') => result.push('\r'),
			Some('"') => result.push('"'),
			Some('\\') => result.push('\\'),
			Some(other) => {
				result.push('\\');
				result.push(other);
			}
			None => result.push('\\'),
		}
	}
	result
}

fn flush(catalog: &mut MessageCatalog, entry: PoEntry) {
	if entry.msgid.is_empty() || entry.fuzzy || entry.msgstr.iter().all(String::is_empty) {
		return;
	}
	match (entry.msgctxt, entry.msgid_plural) {
		(_, Some(_)) => catalog.add_plural(entry.msgid, entry.msgstr),
		(Some(context), None) => catalog.add_context(context, entry.msgid, entry.msgstr[0].clone()),
		(None, None) => catalog.add_translation(entry.msgid, entry.msgstr[0].clone()),
	}
}
