//! DNS resolver

use crate::error::ConfigResult;
use crate::handler::FormBuilder;
use crate::values::{flag, text};
use foris_backend::{BackendExt, UciChange};
use foris_conf::Device;
use foris_core::RequestContext;
use foris_forms::validators::Domain;
use foris_forms::{CallbackOutcome, Field, FieldKind, ForisForm, Preprocessor, Section, SubmittedData};

/// Resolvers able to publish DHCP client names
const DYNAMIC_DOMAIN_RESOLVERS: [&str; 2] = ["kresd", "unbound"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DnsHandler;

impl FormBuilder for DnsHandler {
	fn title(&self) -> &str {
		"DNS"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let omnia = ctx.settings().device == Device::Omnia;
		let resolver = ctx.backend().fetch_str("resolver.common.prefered_resolver")?;
		let dynamic_domains = resolver
			.as_deref()
			.is_some_and(|name| DYNAMIC_DOMAIN_RESOLVERS.contains(&name));

		let mut form = ForisForm::new("dns", data).with_backend(ctx.app().backend_handle());
		let mut section = Section::new("set_dns", ctx.gettext(self.title()));
		section.add_field(
			Field::new("forward_upstream", FieldKind::Checkbox)
				.with_label(ctx.gettext("Use forwarding"))
				.with_default(true)
				.with_backend("resolver.common.forward_upstream")?
				.with_preprocessor(Preprocessor::Bool),
		);
		if omnia {
			section.add_field(
				Field::new("ignore_root_key", FieldKind::Checkbox)
					.with_label(ctx.gettext("Disable DNSSEC"))
					.with_default(false)
					.with_backend("resolver.common.ignore_root_key")?
					.with_preprocessor(Preprocessor::Bool),
			);
		}
		if dynamic_domains {
			section
				.add_field(
					Field::new("dhcp_from_dns", FieldKind::Checkbox)
						.with_label(ctx.gettext("Enable DHCP clients in DNS"))
						.with_hint(ctx.gettext(
							"This will enable your DNS resolver to place DHCP client's names among the local DNS records.",
						))
						.with_default(false)
						.with_backend("resolver.common.dynamic_domains")?
						.with_preprocessor(Preprocessor::Bool),
				)
				.add_field(
					Field::new("dhcp_dns_domain", FieldKind::Text)
						.with_label(ctx.gettext("Domain of DHCP clients in DNS"))
						.with_default("lan")
						.with_validator(Domain::new())
						.requires_value("dhcp_from_dns", true)
						.with_backend("dhcp.@dnsmasq[0].local")?
						.with_preprocessor(Preprocessor::custom(|value| {
							value.as_str().map(|local| local.trim_matches('/').into())
						})),
				);
		}
		form.add_section(section)?;

		form.add_callback(move |data| {
			let mut changes = vec![UciChange::set_bool(
				"resolver.common.forward_upstream",
				flag(data, "forward_upstream"),
			)?];
			if omnia {
				changes.push(UciChange::set_bool(
					"resolver.common.ignore_root_key",
					flag(data, "ignore_root_key"),
				)?);
			}
			if data.contains_key("dhcp_from_dns") {
				changes.push(UciChange::set_bool(
					"resolver.common.dynamic_domains",
					flag(data, "dhcp_from_dns"),
				)?);
			}
			if let Some(domain) = text(data, "dhcp_dns_domain") {
				changes.push(UciChange::set(
					"dhcp.@dnsmasq[0].local",
					format!("/{}/", domain.trim_matches('/')),
				)?);
			}
			Ok(CallbackOutcome::EditConfig(changes))
		});
		Ok(Some(form))
	}
}
