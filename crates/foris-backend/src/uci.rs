//! UCI addressing and changes
//!
//! UCI stores router configuration as `config.section.option` triples. A
//! section is either named (`lan`) or anonymous and addressed by type and
//! index (`@system[0]`).

use crate::error::{BackendError, BackendResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Path to a UCI section or option
///
/// # Examples
///
/// ```
/// use foris_backend::UciPath;
///
/// let path: UciPath = "system.@system[0].zonename".parse().unwrap();
/// assert_eq!(path.config(), "system");
/// assert_eq!(path.section(), "@system[0]");
/// assert_eq!(path.option(), Some("zonename"));
/// assert_eq!(path.to_string(), "system.@system[0].zonename");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UciPath {
	config: String,
	section: String,
	option: Option<String>,
}

impl UciPath {
	pub fn config(&self) -> &str {
		&self.config
	}

	pub fn section(&self) -> &str {
		&self.section
	}

	pub fn option(&self) -> Option<&str> {
		self.option.as_deref()
	}

	/// Path of an option inside this path's section
	pub fn with_option(&self, option: impl Into<String>) -> Self {
		Self {
			config: self.config.clone(),
			section: self.section.clone(),
			option: Some(option.into()),
		}
	}
}

fn is_valid_name(name: &str) -> bool {
	!name.is_empty()
		&& name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_valid_section(section: &str) -> bool {
	if let Some(rest) = section.strip_prefix('@') {
		let Some((kind, index)) = rest.split_once('[') else {
			return false;
		};
		let Some(index) = index.strip_suffix(']') else {
			return false;
		};
		let index = index.strip_prefix('-').unwrap_or(index);
		is_valid_name(kind) && !index.is_empty() && index.chars().all(|c| c.is_ascii_digit())
	} else {
		is_valid_name(section)
	}
}

impl FromStr for UciPath {
	type Err = BackendError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.splitn(3, '.');
		let config = parts.next().unwrap_or_default();
		let section = parts.next().unwrap_or_default();
		let option = parts.next();

		if !is_valid_name(config) || !is_valid_section(section) {
			return Err(BackendError::InvalidPath(s.to_string()));
		}
		if let Some(option) = option
			&& !is_valid_name(option)
		{
			return Err(BackendError::InvalidPath(s.to_string()));
		}

		Ok(Self {
			config: config.to_string(),
			section: section.to_string(),
			option: option.map(str::to_string),
		})
	}
}

impl TryFrom<String> for UciPath {
	type Error = BackendError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<UciPath> for String {
	fn from(path: UciPath) -> Self {
		path.to_string()
	}
}

impl fmt::Display for UciPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.config, self.section)?;
		if let Some(option) = &self.option {
			write!(f, ".{}", option)?;
		}
		Ok(())
	}
}

/// Operation applied to a UCI path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum UciOp {
	/// Set an option (or list) to a value
	Set(Value),
	/// Delete an option or a whole section
	Delete,
	/// Append an item to a list option
	AddList(String),
	/// Remove an item from a list option
	DelList(String),
}

/// A single queued configuration change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UciChange {
	pub path: UciPath,
	#[serde(flatten)]
	pub op: UciOp,
}

impl UciChange {
	/// Set `path` to `value`
	///
	/// # Examples
	///
	/// ```
	/// use foris_backend::{UciChange, UciOp};
	/// use serde_json::json;
	///
	/// let change = UciChange::set("network.wan.proto", "dhcp").unwrap();
	/// assert_eq!(change.op, UciOp::Set(json!("dhcp")));
	///
	/// assert!(UciChange::set("not a path", "x").is_err());
	/// ```
	pub fn set(path: &str, value: impl Into<Value>) -> BackendResult<Self> {
		Ok(Self {
			path: path.parse()?,
			op: UciOp::Set(value.into()),
		})
	}

	/// Set `path` to a UCI boolean (`"1"` or `"0"`)
	pub fn set_bool(path: &str, value: bool) -> BackendResult<Self> {
		Self::set(path, uci_bool(value))
	}

	pub fn delete(path: &str) -> BackendResult<Self> {
		Ok(Self {
			path: path.parse()?,
			op: UciOp::Delete,
		})
	}

	pub fn add_list(path: &str, item: impl Into<String>) -> BackendResult<Self> {
		Ok(Self {
			path: path.parse()?,
			op: UciOp::AddList(item.into()),
		})
	}

	pub fn del_list(path: &str, item: impl Into<String>) -> BackendResult<Self> {
		Ok(Self {
			path: path.parse()?,
			op: UciOp::DelList(item.into()),
		})
	}
}

/// Encodes a boolean the way UCI stores it
pub fn uci_bool(value: bool) -> &'static str {
	if value { "1" } else { "0" }
}

/// Parses a UCI boolean
///
/// UCI accepts several spellings; anything else is not a boolean.
///
/// # Examples
///
/// ```
/// use foris_backend::parse_uci_bool;
/// use serde_json::json;
///
/// assert_eq!(parse_uci_bool(&json!("1")), Some(true));
/// assert_eq!(parse_uci_bool(&json!("off")), Some(false));
/// assert_eq!(parse_uci_bool(&json!(true)), Some(true));
/// assert_eq!(parse_uci_bool(&json!("maybe")), None);
/// ```
pub fn parse_uci_bool(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(b) => Some(*b),
		Value::Number(n) => n.as_i64().map(|n| n != 0),
		Value::String(s) => match s.to_ascii_lowercase().as_str() {
			"1" | "yes" | "on" | "true" | "enabled" => Some(true),
			"0" | "no" | "off" | "false" | "disabled" => Some(false),
			_ => None,
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("network.lan", "network", "lan", None)]
	#[case("network.lan.ipaddr", "network", "lan", Some("ipaddr"))]
	#[case("wireless.@wifi-iface[1].ssid", "wireless", "@wifi-iface[1]", Some("ssid"))]
	#[case("system.@system[-1].hostname", "system", "@system[-1]", Some("hostname"))]
	fn test_parse_valid_paths(
		#[case] input: &str,
		#[case] config: &str,
		#[case] section: &str,
		#[case] option: Option<&str>,
	) {
		// Act
		let path: UciPath = input.parse().unwrap();

		// Assert
		assert_eq!(path.config(), config);
		assert_eq!(path.section(), section);
		assert_eq!(path.option(), option);
		assert_eq!(path.to_string(), input);
	}

	#[rstest]
	#[case("")]
	#[case("network")]
	#[case("network.")]
	#[case("network.lan.")]
	#[case("net work.lan")]
	#[case("system.@system.hostname")]
	#[case("system.@system[x].hostname")]
	fn test_parse_invalid_paths(#[case] input: &str) {
		// Act
		let result = input.parse::<UciPath>();

		// Assert
		assert!(matches!(result, Err(BackendError::InvalidPath(_))));
	}

	#[rstest]
	fn test_with_option_keeps_section() {
		// Arrange
		let section: UciPath = "dhcp.lan".parse().unwrap();

		// Act
		let option = section.with_option("start");

		// Assert
		assert_eq!(option.to_string(), "dhcp.lan.start");
	}

	#[rstest]
	fn test_set_bool_encodes_uci_boolean() {
		// Act
		let on = UciChange::set_bool("dhcp.lan.ignore", true).unwrap();
		let off = UciChange::set_bool("dhcp.lan.ignore", false).unwrap();

		// Assert
		assert_eq!(on.op, UciOp::Set(json!("1")));
		assert_eq!(off.op, UciOp::Set(json!("0")));
	}

	#[rstest]
	fn test_change_serializes_with_flat_op() {
		// Arrange
		let change = UciChange::add_list("network.wan.dns", "8.8.8.8").unwrap();

		// Act
		let value = serde_json::to_value(&change).unwrap();

		// Assert
		assert_eq!(
			value,
			json!({"path": "network.wan.dns", "op": "add_list", "value": "8.8.8.8"})
		);
	}

	#[rstest]
	#[case(json!("yes"), Some(true))]
	#[case(json!("enabled"), Some(true))]
	#[case(json!("0"), Some(false))]
	#[case(json!("disabled"), Some(false))]
	#[case(json!(0), Some(false))]
	#[case(json!(null), None)]
	#[case(json!(""), None)]
	fn test_parse_uci_bool(#[case] input: Value, #[case] expected: Option<bool>) {
		assert_eq!(parse_uci_bool(&input), expected);
	}
}
