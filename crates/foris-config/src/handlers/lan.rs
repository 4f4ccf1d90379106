//! Local network and its DHCP server

use crate::error::ConfigResult;
use crate::handler::FormBuilder;
use crate::values::{flag, integer, required_text};
use foris_backend::UciChange;
use foris_core::RequestContext;
use foris_forms::validators::{DhcpFields, DhcpRange, IPv4, IPv4Netmask, PositiveInteger};
use foris_forms::{
	CallbackOutcome, Field, FieldKind, ForisForm, FormData, FormResult, Preprocessor, Section,
	SubmittedData,
};

pub const DEFAULT_NETMASK: &str = "255.255.255.0";

#[derive(Debug, Clone, Copy, Default)]
pub struct LanHandler;

impl FormBuilder for LanHandler {
	fn title(&self) -> &str {
		"LAN"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let mut form = ForisForm::new("lan", data).with_backend(ctx.app().backend_handle());
		let mut section = Section::new("set_lan", ctx.gettext(self.title())).with_description(
			ctx.gettext(
				"This section contains settings for the local network (LAN). The provided defaults are suitable for most networks. If you change the router IP address, all computers in LAN will need to obtain a new IP address.",
			),
		);
		section
			.add_field(
				Field::new("lan_ipaddr", FieldKind::Text)
					.with_label(ctx.gettext("Router IP address"))
					.with_hint(ctx.gettext(
						"Router's IP address in inner network. Also defines the range of assigned IP addresses.",
					))
					.required()
					.with_validator(IPv4::new())
					.with_backend("network.lan.ipaddr")?,
			)
			.add_field(
				Field::new("lan_netmask", FieldKind::Hidden)
					.with_default(DEFAULT_NETMASK)
					.with_validator(IPv4Netmask::new())
					.with_backend("network.lan.netmask")?,
			)
			.add_field(
				Field::new("dhcp_enabled", FieldKind::Checkbox)
					.with_label(ctx.gettext("Enable DHCP"))
					.with_hint(ctx.gettext(
						"Enable this option to automatically assign IP addresses to the devices connected to the router.",
					))
					.with_default(true)
					.with_backend("dhcp.lan.ignore")?
					.with_preprocessor(Preprocessor::InvertedBool),
			)
			.add_field(
				Field::new("dhcp_min", FieldKind::Text)
					.with_label(ctx.gettext("DHCP start"))
					.required()
					.with_validator(PositiveInteger::new())
					.requires_value("dhcp_enabled", true)
					.with_backend("dhcp.lan.start")?,
			)
			.add_field(
				Field::new("dhcp_max", FieldKind::Text)
					.with_label(ctx.gettext("DHCP max leases"))
					.required()
					.with_validator(PositiveInteger::new())
					.requires_value("dhcp_enabled", true)
					.with_backend("dhcp.lan.limit")?,
			);
		form.add_section(section)?;

		form.add_validator(DhcpRange::new(
			DhcpFields {
				router_ip: "lan_ipaddr".into(),
				netmask: "lan_netmask".into(),
				start: "dhcp_min".into(),
				limit: "dhcp_max".into(),
			},
			ctx.gettext(
				"DHCP start and DHCP max leases do not fit into the LAN network or cover the router IP address.",
			),
		));
		form.add_callback(|data| Ok(CallbackOutcome::EditConfig(lan_changes(data)?)));
		Ok(Some(form))
	}
}

fn lan_changes(data: &FormData) -> FormResult<Vec<UciChange>> {
	let router_ip = required_text(data, "lan_ipaddr")?;
	let mut changes = vec![
		UciChange::set("network.lan.ipaddr", router_ip.as_str())?,
		// Clients get the router as their DNS server
		UciChange::set("dhcp.lan.dhcp_option", vec![format!("6,{router_ip}")])?,
	];
	if flag(data, "dhcp_enabled") {
		changes.push(UciChange::set_bool("dhcp.lan.ignore", false)?);
		changes.push(UciChange::set("dhcp.lan.start", integer(data, "dhcp_min")?.to_string())?);
		changes.push(UciChange::set("dhcp.lan.limit", integer(data, "dhcp_max")?.to_string())?);
	} else {
		changes.push(UciChange::set_bool("dhcp.lan.ignore", true)?);
	}
	Ok(changes)
}
