//! Field and form validators
//!
//! Field validators check a single value and may look at the rest of the form
//! data. Form validators run once all fields passed and check relations that
//! span several fields.
//!
//! Each field validator can describe its rule for the client side, rendered as
//! a `data-parsley-*` attribute of the input.

use crate::data::{FormData, is_empty_value};
use crate::field::{FieldError, FieldResult};
use chrono::NaiveDateTime;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("TIME_REGEX: invalid regex pattern")
});

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([a-zA-Z0-9-]{1,63}\.?)*$").expect("DOMAIN_REGEX: invalid regex pattern")
});

static MAC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([a-fA-F0-9]{2}:){5}[a-fA-F0-9]{2}$").expect("MAC_REGEX: invalid regex pattern")
});

// Colons between byte pairs are optional.
static DUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([0-9a-fA-F]{2}:?){3}[0-9a-fA-F]{2}(:?[0-9a-fA-F]{2})*$")
		.expect("DUID_REGEX: invalid regex pattern")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client side rule of a validator
///
/// Rendered as the attribute `data-parsley-<name>="<value>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRule {
	pub name: String,
	pub value: String,
}

impl ClientRule {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}

	/// Attribute name including the `data-parsley-` prefix
	pub fn attribute(&self) -> String {
		format!("data-parsley-{}", self.name)
	}
}

/// Validator of a single field value
pub trait Validator: Send + Sync + fmt::Debug {
	/// Checks `value`; `context` holds the merged data of the whole form
	fn validate(&self, value: &Value, context: &FormData) -> FieldResult<()>;

	fn client_rule(&self) -> Option<ClientRule> {
		None
	}
}

/// Validator of relations between several fields
pub trait FormValidator: Send + Sync + fmt::Debug {
	/// Checks the effective data of the form
	fn validate(&self, data: &FormData) -> FieldResult<()>;

	/// Field the error is reported on, or `None` for a form-wide error
	fn field(&self) -> Option<&str> {
		None
	}
}

/// Text form of scalar values; numbers are formatted, other values have none
fn as_text(value: &Value) -> Option<Cow<'_, str>> {
	match value {
		Value::String(s) => Some(Cow::Borrowed(s)),
		Value::Number(n) => Some(Cow::Owned(n.to_string())),
		_ => None,
	}
}

fn as_integer(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n.as_i64(),
		other => as_text(other)?.trim().parse().ok(),
	}
}

fn check(ok: bool, message: &Option<String>, default: &str) -> FieldResult<()> {
	if ok {
		Ok(())
	} else {
		Err(FieldError::Validation(
			message.as_deref().unwrap_or(default).to_string(),
		))
	}
}

fn text_check<F>(value: &Value, message: &Option<String>, default: &str, test: F) -> FieldResult<()>
where
	F: FnOnce(&str) -> bool,
{
	let ok = as_text(value).is_some_and(|text| test(&text));
	check(ok, message, default)
}

macro_rules! with_message {
	($ty:ident) => {
		impl $ty {
			/// Replaces the default error message
			pub fn with_message(mut self, message: impl Into<String>) -> Self {
				self.message = Some(message.into());
				self
			}
		}
	};
}

/// Rejects empty values; implied by required fields
///
/// # Examples
///
/// ```
/// use foris_forms::{FormData, Validator};
/// use foris_forms::validators::NotEmpty;
/// use serde_json::json;
///
/// let context = FormData::new();
/// assert!(NotEmpty::new().validate(&json!("x"), &context).is_ok());
/// assert!(NotEmpty::new().validate(&json!(""), &context).is_err());
/// assert!(NotEmpty::new().validate(&json!([]), &context).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NotEmpty {
	message: Option<String>,
}

impl NotEmpty {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(NotEmpty);

impl Validator for NotEmpty {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		if is_empty_value(value) {
			Err(FieldError::Required(
				self.message
					.as_deref()
					.unwrap_or("This field is required.")
					.to_string(),
			))
		} else {
			Ok(())
		}
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("notblank", "true"))
	}
}

/// Full match of a regular expression
#[derive(Debug, Clone)]
pub struct RegExp {
	message: String,
	pattern: Regex,
}

impl RegExp {
	/// Compiles `pattern` anchored at both ends
	pub fn new(message: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self {
			message: message.into(),
			pattern: Regex::new(&anchored(pattern))?,
		})
	}
}

fn anchored(pattern: &str) -> String {
	let mut anchored = String::with_capacity(pattern.len() + 2);
	if !pattern.starts_with('^') {
		anchored.push('^');
	}
	anchored.push_str(pattern);
	if !pattern.ends_with('$') {
		anchored.push('$');
	}
	anchored
}

impl Validator for RegExp {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		let ok = as_text(value).is_some_and(|text| self.pattern.is_match(&text));
		if ok {
			Ok(())
		} else {
			Err(FieldError::Validation(self.message.clone()))
		}
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("pattern", self.pattern.as_str()))
	}
}

/// IPv4 address in dotted quad notation
#[derive(Debug, Clone, Default)]
pub struct IPv4 {
	message: Option<String>,
}

impl IPv4 {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(IPv4);

impl Validator for IPv4 {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "Not a valid IPv4 address.", |s| {
			s.parse::<Ipv4Addr>().is_ok()
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "ipv4"))
	}
}

/// IPv4 netmask: ones followed only by zeros
///
/// # Examples
///
/// ```
/// use foris_forms::{FormData, Validator};
/// use foris_forms::validators::IPv4Netmask;
/// use serde_json::json;
///
/// let context = FormData::new();
/// let validator = IPv4Netmask::new();
/// assert!(validator.validate(&json!("255.255.255.0"), &context).is_ok());
/// assert!(validator.validate(&json!("255.0.255.0"), &context).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct IPv4Netmask {
	message: Option<String>,
}

impl IPv4Netmask {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(IPv4Netmask);

/// Whether `mask` has no one bit after its first zero bit
pub fn is_contiguous_netmask(mask: Ipv4Addr) -> bool {
	let bits = u32::from(mask);
	bits.leading_ones() + bits.trailing_zeros() >= 32
}

impl Validator for IPv4Netmask {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "Not a valid IPv4 netmask address.", |s| {
			s.parse::<Ipv4Addr>().is_ok_and(is_contiguous_netmask)
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "ipv4netmask"))
	}
}

#[derive(Debug, Clone, Default)]
pub struct IPv6 {
	message: Option<String>,
}

impl IPv6 {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(IPv6);

impl Validator for IPv6 {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "Not a valid IPv6 address.", |s| {
			s.parse::<Ipv6Addr>().is_ok()
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "ipv6"))
	}
}

/// IPv4 or IPv6 address
#[derive(Debug, Clone, Default)]
pub struct AnyIP {
	message: Option<String>,
}

impl AnyIP {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(AnyIP);

impl Validator for AnyIP {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "This is not a valid IPv4 or IPv6 address.", |s| {
			s.parse::<IpAddr>().is_ok()
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "anyip"))
	}
}

fn is_prefix<A: std::str::FromStr>(value: &str, max_len: u8) -> bool {
	let Some((address, length)) = value.split_once('/') else {
		return false;
	};
	address.parse::<A>().is_ok() && length.parse::<u8>().is_ok_and(|len| len <= max_len)
}

/// IPv4 address with a prefix length, `192.168.1.0/24`
#[derive(Debug, Clone, Default)]
pub struct IPv4Prefix {
	message: Option<String>,
}

impl IPv4Prefix {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(IPv4Prefix);

impl Validator for IPv4Prefix {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(
			value,
			&self.message,
			"This is not an IPv4 address with prefix length.",
			|s| is_prefix::<Ipv4Addr>(s, 32),
		)
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "ipv4prefix"))
	}
}

/// IPv6 address with a prefix length, `2001:db8::/48`
#[derive(Debug, Clone, Default)]
pub struct IPv6Prefix {
	message: Option<String>,
}

impl IPv6Prefix {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(IPv6Prefix);

impl Validator for IPv6Prefix {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(
			value,
			&self.message,
			"This is not an IPv6 address with prefix length.",
			|s| is_prefix::<Ipv6Addr>(s, 128),
		)
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "ipv6prefix"))
	}
}

/// Non-negative integer
#[derive(Debug, Clone, Default)]
pub struct PositiveInteger {
	message: Option<String>,
}

impl PositiveInteger {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(PositiveInteger);

impl Validator for PositiveInteger {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		check(
			as_integer(value).is_some_and(|n| n >= 0),
			&self.message,
			"Is not a number.",
		)
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("type", "digits"))
	}
}

/// Time of day as `HH:MM`
#[derive(Debug, Clone, Default)]
pub struct Time {
	message: Option<String>,
}

impl Time {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(Time);

impl Validator for Time {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(
			value,
			&self.message,
			"This is not valid time in HH:MM format.",
			|s| TIME_REGEX.is_match(s),
		)
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("pattern", TIME_REGEX.as_str()))
	}
}

/// Date and time as `YYYY-MM-DD HH:MM:SS`
#[derive(Debug, Clone, Default)]
pub struct Datetime {
	message: Option<String>,
}

impl Datetime {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a value accepted by this validator
	pub fn parse(value: &str) -> Option<NaiveDateTime> {
		NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).ok()
	}
}

with_message!(Datetime);

impl Validator for Datetime {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(
			value,
			&self.message,
			"This is not a valid time (YYYY-MM-DD HH:MM:SS).",
			|s| Self::parse(s).is_some(),
		)
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "datetime"))
	}
}

#[derive(Debug, Clone, Default)]
pub struct Domain {
	message: Option<String>,
}

impl Domain {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(Domain);

impl Validator for Domain {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "This is not a valid domain name.", |s| {
			DOMAIN_REGEX.is_match(s)
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "domain"))
	}
}

#[derive(Debug, Clone, Default)]
pub struct MacAddress {
	message: Option<String>,
}

impl MacAddress {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(MacAddress);

impl Validator for MacAddress {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "MAC address is not valid.", |s| {
			MAC_REGEX.is_match(s)
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "macaddress"))
	}
}

/// DHCP unique identifier; an empty value unsets it
#[derive(Debug, Clone, Default)]
pub struct Duid {
	message: Option<String>,
}

impl Duid {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(Duid);

impl Validator for Duid {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "Duid is not valid.", |s| {
			s.is_empty() || DUID_REGEX.is_match(s)
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("extratype", "duid"))
	}
}

#[derive(Debug, Clone, Default)]
pub struct Email {
	message: Option<String>,
}

impl Email {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(Email);

impl Validator for Email {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "This is not a valid email address.", |s| {
			EMAIL_REGEX.is_match(s)
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("type", "email"))
	}
}

/// Integer within inclusive bounds
///
/// # Examples
///
/// ```
/// use foris_forms::{FormData, Validator};
/// use foris_forms::validators::InRange;
/// use serde_json::json;
///
/// let context = FormData::new();
/// let port = InRange::new(1, 65535);
/// assert!(port.validate(&json!("11884"), &context).is_ok());
/// assert!(port.validate(&json!(65535), &context).is_ok());
/// assert!(port.validate(&json!("0"), &context).is_err());
/// assert_eq!(port.client_rule().unwrap().value, "[1,65535]");
/// ```
#[derive(Debug, Clone)]
pub struct InRange {
	low: i64,
	high: i64,
	message: Option<String>,
}

impl InRange {
	pub fn new(low: i64, high: i64) -> Self {
		Self {
			low,
			high,
			message: None,
		}
	}
}

with_message!(InRange);

impl Validator for InRange {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		let default = format!("Not in a valid range {} - {}.", self.low, self.high);
		check(
			as_integer(value).is_some_and(|n| (self.low..=self.high).contains(&n)),
			&self.message,
			&default,
		)
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("range", format!("[{},{}]", self.low, self.high)))
	}
}

/// Decimal number within inclusive bounds
#[derive(Debug, Clone)]
pub struct FloatRange {
	low: f64,
	high: f64,
	message: Option<String>,
}

impl FloatRange {
	pub fn new(low: f64, high: f64) -> Self {
		Self {
			low,
			high,
			message: None,
		}
	}
}

with_message!(FloatRange);

impl Validator for FloatRange {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		let number = match value {
			Value::Number(n) => n.as_f64(),
			other => as_text(other).and_then(|s| s.trim().parse::<f64>().ok()),
		};
		let default = format!("This value should be between {} and {}.", self.low, self.high);
		check(
			number.is_some_and(|n| n >= self.low && n <= self.high),
			&self.message,
			&default,
		)
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("floatrange", format!("[{},{}]", self.low, self.high)))
	}
}

/// Text length in characters within inclusive bounds
#[derive(Debug, Clone)]
pub struct LenRange {
	low: usize,
	high: usize,
	message: Option<String>,
}

impl LenRange {
	pub fn new(low: usize, high: usize) -> Self {
		Self {
			low,
			high,
			message: None,
		}
	}
}

with_message!(LenRange);

impl Validator for LenRange {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		let default = format!("Length must be from {} to {} characters.", self.low, self.high);
		text_check(value, &self.message, &default, |s| {
			(self.low..=self.high).contains(&s.chars().count())
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("length", format!("[{},{}]", self.low, self.high)))
	}
}

/// Text length in UTF-8 bytes within inclusive bounds
///
/// SSIDs are limited in bytes, not in characters.
#[derive(Debug, Clone)]
pub struct ByteLenRange {
	low: usize,
	high: usize,
	message: Option<String>,
}

impl ByteLenRange {
	pub fn new(low: usize, high: usize) -> Self {
		Self {
			low,
			high,
			message: None,
		}
	}
}

with_message!(ByteLenRange);

impl Validator for ByteLenRange {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		let default = format!("Length must be from {} to {} characters.", self.low, self.high);
		text_check(value, &self.message, &default, |s| {
			(self.low..=self.high).contains(&s.len())
		})
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new("bytelength", format!("[{},{}]", self.low, self.high)))
	}
}

/// Time zone name from the tz database
#[derive(Debug, Clone, Default)]
pub struct Timezone {
	message: Option<String>,
}

impl Timezone {
	pub fn new() -> Self {
		Self::default()
	}
}

with_message!(Timezone);

impl Validator for Timezone {
	fn validate(&self, value: &Value, _context: &FormData) -> FieldResult<()> {
		text_check(value, &self.message, "Not a valid time zone.", |s| {
			s.parse::<chrono_tz::Tz>().is_ok()
		})
	}
}

/// Two fields of the form hold the same value
///
/// Attached to the confirming field; the rule references the HTML id of the
/// first field.
///
/// # Examples
///
/// ```
/// use foris_forms::{FormData, Validator};
/// use foris_forms::validators::EqualTo;
/// use serde_json::json;
///
/// let validator = EqualTo::new("password", "password_validation", "Passwords are not equal.");
///
/// let mut context = FormData::new();
/// context.insert("password".into(), json!("secret123"));
/// context.insert("password_validation".into(), json!("secret123"));
/// assert!(validator.validate(&json!("secret123"), &context).is_ok());
///
/// context.insert("password_validation".into(), json!("secret124"));
/// assert!(validator.validate(&json!("secret124"), &context).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EqualTo {
	field1: String,
	field2: String,
	message: String,
}

impl EqualTo {
	pub fn new(field1: impl Into<String>, field2: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			field1: field1.into(),
			field2: field2.into(),
			message: message.into(),
		}
	}
}

impl Validator for EqualTo {
	fn validate(&self, _value: &Value, context: &FormData) -> FieldResult<()> {
		let first = context.get(&self.field1);
		if first.is_some() && first == context.get(&self.field2) {
			Ok(())
		} else {
			Err(FieldError::Validation(self.message.clone()))
		}
	}

	fn client_rule(&self) -> Option<ClientRule> {
		Some(ClientRule::new(
			"equalto",
			format!("#{}{}", crate::form::ID_PREFIX, self.field1),
		))
	}
}

/// Fields that must be filled in together: when one has a value, all must
#[derive(Debug, Clone)]
pub struct RequiredWithOtherFields {
	fields: Vec<String>,
	message: String,
}

impl RequiredWithOtherFields {
	pub fn new<I, S>(fields: I, message: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			fields: fields.into_iter().map(Into::into).collect(),
			message: message.into(),
		}
	}
}

impl FormValidator for RequiredWithOtherFields {
	fn validate(&self, data: &FormData) -> FieldResult<()> {
		let filled: Vec<bool> = self
			.fields
			.iter()
			.map(|f| data.get(f).is_some_and(|v| !is_empty_value(v)))
			.collect();
		if filled.iter().any(|f| *f) && !filled.iter().all(|f| *f) {
			Err(FieldError::Validation(self.message.clone()))
		} else {
			Ok(())
		}
	}
}

fn ipv4_of(data: &FormData, field: &str) -> Option<Ipv4Addr> {
	data.get(field)
		.and_then(as_text)
		.and_then(|s| s.parse().ok())
}

fn u32_of(data: &FormData, field: &str) -> Option<u32> {
	data.get(field)
		.and_then(as_integer)
		.and_then(|n| u32::try_from(n).ok())
}

/// Names of the fields describing a LAN DHCP pool
#[derive(Debug, Clone)]
pub struct DhcpFields {
	pub router_ip: String,
	pub netmask: String,
	pub start: String,
	pub limit: String,
}

/// DHCP pool fits into the LAN network and leaves the router address out
///
/// The pool starts `start` addresses past the network address and spans
/// `limit` addresses. The check is skipped while any of the fields is inactive,
/// as when DHCP is disabled.
///
/// # Examples
///
/// ```
/// use foris_forms::{FormData, FormValidator};
/// use foris_forms::validators::{DhcpFields, DhcpRange};
/// use serde_json::json;
///
/// let validator = DhcpRange::new(
/// 	DhcpFields {
/// 		router_ip: "lan_ipaddr".into(),
/// 		netmask: "lan_netmask".into(),
/// 		start: "dhcp_start".into(),
/// 		limit: "dhcp_limit".into(),
/// 	},
/// 	"DHCP range is not within the LAN network.",
/// );
///
/// let mut data = FormData::new();
/// data.insert("lan_ipaddr".into(), json!("192.168.1.1"));
/// data.insert("lan_netmask".into(), json!("255.255.255.0"));
/// data.insert("dhcp_start".into(), json!("100"));
/// data.insert("dhcp_limit".into(), json!("150"));
/// assert!(validator.validate(&data).is_ok());
///
/// data.insert("dhcp_limit".into(), json!("200"));
/// assert!(validator.validate(&data).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DhcpRange {
	fields: DhcpFields,
	message: String,
}

impl DhcpRange {
	pub fn new(fields: DhcpFields, message: impl Into<String>) -> Self {
		Self {
			fields,
			message: message.into(),
		}
	}
}

impl FormValidator for DhcpRange {
	fn validate(&self, data: &FormData) -> FieldResult<()> {
		let names = [
			&self.fields.router_ip,
			&self.fields.netmask,
			&self.fields.start,
			&self.fields.limit,
		];
		if names.iter().any(|name| !data.contains_key(name.as_str())) {
			return Ok(());
		}

		let fail = || FieldError::Validation(self.message.clone());
		let router_ip = ipv4_of(data, &self.fields.router_ip).ok_or_else(fail)?;
		let netmask = ipv4_of(data, &self.fields.netmask).ok_or_else(fail)?;
		let start = u32_of(data, &self.fields.start).ok_or_else(fail)?;
		let limit = u32_of(data, &self.fields.limit).ok_or_else(fail)?;

		let mask = u32::from(netmask);
		let hosts = u64::from(!mask);
		let first = u64::from(start);
		let last = first + u64::from(limit);
		if first == 0 || last > hosts {
			return Err(fail());
		}

		let router_offset = u64::from(u32::from(router_ip) & !mask);
		if (first..=last).contains(&router_offset) {
			return Err(fail());
		}
		Ok(())
	}

	fn field(&self) -> Option<&str> {
		Some(&self.fields.limit)
	}
}
