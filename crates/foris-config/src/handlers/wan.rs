//! WAN interface

use crate::error::ConfigResult;
use crate::handler::FormBuilder;
use crate::values::{flag, required_text, text};
use foris_backend::UciChange;
use foris_core::RequestContext;
use foris_forms::validators::{AnyIP, IPv4, IPv4Netmask, IPv6, IPv6Prefix, MacAddress};
use foris_forms::{
	CallbackOutcome, Field, FieldKind, ForisForm, FormData, FormResult, Preprocessor, Section,
	SubmittedData,
};
use serde_json::Value;

pub const WAN_DHCP: &str = "dhcp";
pub const WAN_STATIC: &str = "static";
pub const WAN_PPPOE: &str = "pppoe";

pub const WAN6_NONE: &str = "none";
pub const WAN6_DHCP: &str = "dhcpv6";
pub const WAN6_STATIC: &str = "static";

#[derive(Debug, Clone, Copy, Default)]
pub struct WanHandler;

impl FormBuilder for WanHandler {
	fn title(&self) -> &str {
		"WAN"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let mut form = ForisForm::new("wan", data).with_backend(ctx.app().backend_handle());
		let mut section = Section::new("set_wan", ctx.gettext(self.title())).with_description(
			ctx.gettext(
				"Here you specify your WAN port settings. Usually, you can leave these options untouched unless instructed otherwise by your internet service provider.",
			),
		);

		section
			.add_field(
				Field::new("proto", FieldKind::Dropdown)
					.with_label(ctx.gettext("IPv4 protocol"))
					.with_choices([
						(WAN_DHCP, ctx.gettext("DHCP (automatic configuration)")),
						(WAN_STATIC, ctx.gettext("Static IP address (manual configuration)")),
						(WAN_PPPOE, ctx.gettext("PPPoE (for DSL bridges, Modem Turris, etc.)")),
					])
					.with_default(WAN_DHCP)
					.with_backend("network.wan.proto")?,
			)
			.add_field(
				Field::new("ipaddr", FieldKind::Text)
					.with_label(ctx.gettext("IP address"))
					.required()
					.with_validator(IPv4::new())
					.requires_value("proto", WAN_STATIC)
					.with_backend("network.wan.ipaddr")?,
			)
			.add_field(
				Field::new("netmask", FieldKind::Text)
					.with_label(ctx.gettext("Network mask"))
					.required()
					.with_validator(IPv4Netmask::new())
					.requires_value("proto", WAN_STATIC)
					.with_backend("network.wan.netmask")?,
			)
			.add_field(
				Field::new("gateway", FieldKind::Text)
					.with_label(ctx.gettext("Gateway"))
					.required()
					.with_validator(IPv4::new())
					.requires_value("proto", WAN_STATIC)
					.with_backend("network.wan.gateway")?,
			);

		let dns_hint = ctx.gettext(
			"DNS server address is not required as the built-in DNS resolver is capable of working without it.",
		);
		for (index, name) in ["dns1", "dns2"].into_iter().enumerate() {
			section.add_field(
				Field::new(name, FieldKind::Text)
					.with_label(ctx.gettext(&format!("DNS server {}", index + 1)))
					.with_hint(dns_hint.clone())
					.with_validator(AnyIP::new())
					.requires_value("proto", WAN_STATIC)
					.with_backend("network.wan.dns")?
					.with_preprocessor(Preprocessor::ListItem(index)),
			);
		}

		section
			.add_field(
				Field::new("username", FieldKind::Text)
					.with_label(ctx.gettext("PAP/CHAP username"))
					.required()
					.requires_value("proto", WAN_PPPOE)
					.with_backend("network.wan.username")?,
			)
			.add_field(
				Field::new("password", FieldKind::Password)
					.with_label(ctx.gettext("PAP/CHAP password"))
					.required()
					.requires_value("proto", WAN_PPPOE)
					.with_backend("network.wan.password")?,
			)
			.add_field(
				Field::new("wan6_proto", FieldKind::Dropdown)
					.with_label(ctx.gettext("IPv6 protocol"))
					.with_choices([
						(WAN6_NONE, ctx.gettext("Disable IPv6")),
						(WAN6_DHCP, ctx.gettext("DHCPv6 (automatic configuration)")),
						(WAN6_STATIC, ctx.gettext("Static IP address (manual configuration)")),
					])
					.with_default(WAN6_NONE)
					.with_backend("network.wan6.proto")?,
			)
			.add_field(
				Field::new("ip6addr", FieldKind::Text)
					.with_label(ctx.gettext("IPv6 address"))
					.with_hint(ctx.gettext(
						"IPv6 address and prefix length for WAN interface, e.g. 2001:db8:be13:37da::1/64",
					))
					.required()
					.with_validator(IPv6Prefix::new())
					.requires_value("wan6_proto", WAN6_STATIC)
					.with_backend("network.wan6.ip6addr")?,
			)
			.add_field(
				Field::new("ip6gw", FieldKind::Text)
					.with_label(ctx.gettext("IPv6 gateway"))
					.with_validator(IPv6::new())
					.requires_value("wan6_proto", WAN6_STATIC)
					.with_backend("network.wan6.ip6gw")?,
			)
			.add_field(
				Field::new("ip6prefix", FieldKind::Text)
					.with_label(ctx.gettext("IPv6 prefix"))
					.with_hint(ctx.gettext("Address range for local network, e.g. 2001:db8:be13:37da::/64"))
					.with_validator(IPv6Prefix::new())
					.requires_value("wan6_proto", WAN6_STATIC)
					.with_backend("network.wan6.ip6prefix")?,
			)
			.add_field(
				Field::new("custom_mac", FieldKind::Checkbox)
					.with_label(ctx.gettext("Custom MAC address"))
					.with_hint(ctx.gettext(
						"Useful in cases, when a specific MAC address is required by your internet service provider.",
					))
					.with_backend("network.wan.macaddr")?
					.with_preprocessor(Preprocessor::custom(|value| {
						Some(Value::Bool(value.as_str().is_some_and(|mac| !mac.is_empty())))
					})),
			)
			.add_field(
				Field::new("macaddr", FieldKind::Text)
					.with_label(ctx.gettext("MAC address"))
					.with_hint(ctx.gettext("Separator is a colon, for example 00:11:22:33:44:55"))
					.required()
					.with_validator(MacAddress::new())
					.requires_value("custom_mac", true)
					.with_backend("network.wan.macaddr")?,
			);
		form.add_section(section)?;

		form.add_callback(|data| Ok(CallbackOutcome::EditConfig(wan_changes(data)?)));
		Ok(Some(form))
	}
}

fn set_or_delete(path: &str, value: Option<String>) -> FormResult<UciChange> {
	Ok(match value {
		Some(value) => UciChange::set(path, value)?,
		None => UciChange::delete(path)?,
	})
}

fn wan_changes(data: &FormData) -> FormResult<Vec<UciChange>> {
	let proto = required_text(data, "proto")?;
	let mut changes = vec![UciChange::set("network.wan.proto", proto.as_str())?];

	let macaddr = if flag(data, "custom_mac") {
		Some(required_text(data, "macaddr")?)
	} else {
		None
	};
	changes.push(set_or_delete("network.wan.macaddr", macaddr)?);

	match proto.as_str() {
		WAN_PPPOE => {
			changes.push(UciChange::set("network.wan.username", required_text(data, "username")?)?);
			changes.push(UciChange::set("network.wan.password", required_text(data, "password")?)?);
		}
		WAN_STATIC => {
			for option in ["ipaddr", "netmask", "gateway"] {
				changes.push(UciChange::set(
					&format!("network.wan.{option}"),
					required_text(data, option)?,
				)?);
			}
			let servers: Vec<String> = ["dns1", "dns2"]
				.into_iter()
				.filter_map(|field| text(data, field))
				.collect();
			let dns = (!servers.is_empty()).then(|| servers.join(" "));
			changes.push(set_or_delete("network.wan.dns", dns)?);
		}
		_ => {}
	}

	let wan6_proto = text(data, "wan6_proto").unwrap_or_else(|| WAN6_NONE.to_string());
	changes.push(UciChange::set("network.wan6.ifname", "@wan")?);
	changes.push(UciChange::set("network.wan6.proto", wan6_proto.as_str())?);
	let is_static = wan6_proto == WAN6_STATIC;
	for option in ["ip6addr", "ip6gw", "ip6prefix"] {
		let value = if is_static { text(data, option) } else { None };
		changes.push(set_or_delete(&format!("network.wan6.{option}"), value)?);
	}

	Ok(changes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use foris_backend::UciOp;
	use rstest::rstest;
	use serde_json::json;

	fn data(pairs: &[(&str, Value)]) -> FormData {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	fn op<'a>(changes: &'a [UciChange], path: &str) -> Option<&'a UciOp> {
		changes
			.iter()
			.find(|change| change.path.to_string() == path)
			.map(|change| &change.op)
	}

	#[rstest]
	fn test_static_joins_dns_servers() {
		// Arrange
		let data = data(&[
			("proto", json!("static")),
			("ipaddr", json!("10.0.0.2")),
			("netmask", json!("255.255.255.0")),
			("gateway", json!("10.0.0.1")),
			("dns1", json!("1.1.1.1")),
			("dns2", json!("")),
			("custom_mac", json!(false)),
			("wan6_proto", json!("none")),
		]);

		// Act
		let changes = wan_changes(&data).unwrap();

		// Assert
		assert_eq!(op(&changes, "network.wan.dns"), Some(&UciOp::Set(json!("1.1.1.1"))));
		assert_eq!(op(&changes, "network.wan.gateway"), Some(&UciOp::Set(json!("10.0.0.1"))));
		assert_eq!(op(&changes, "network.wan.macaddr"), Some(&UciOp::Delete));
		assert_eq!(op(&changes, "network.wan6.ip6addr"), Some(&UciOp::Delete));
	}

	#[rstest]
	fn test_dhcp_leaves_static_options_alone() {
		// Arrange
		let data = data(&[
			("proto", json!("dhcp")),
			("custom_mac", json!(true)),
			("macaddr", json!("00:11:22:33:44:55")),
			("wan6_proto", json!("static")),
			("ip6addr", json!("2001:db8::2/64")),
		]);

		// Act
		let changes = wan_changes(&data).unwrap();

		// Assert
		assert_eq!(op(&changes, "network.wan.ipaddr"), None);
		assert_eq!(
			op(&changes, "network.wan.macaddr"),
			Some(&UciOp::Set(json!("00:11:22:33:44:55")))
		);
		assert_eq!(
			op(&changes, "network.wan6.ip6addr"),
			Some(&UciOp::Set(json!("2001:db8::2/64")))
		);
		assert_eq!(op(&changes, "network.wan6.ip6gw"), Some(&UciOp::Delete));
	}
}
