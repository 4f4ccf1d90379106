//! Wireless networks, one section per radio

use crate::error::ConfigResult;
use crate::handler::FormBuilder;
use crate::values::{flag, required_text, text};
use foris_backend::{BackendExt, UciChange, WifiRadio};
use foris_core::RequestContext;
use foris_forms::validators::ByteLenRange;
use foris_forms::{
	CallbackOutcome, Field, FieldKind, ForisForm, FormData, FormResult, Preprocessor, Section,
	SubmittedData,
};
use serde_json::Value;

pub const HWMODE_2G4: &str = "11g";
pub const HWMODE_5G: &str = "11a";
pub const ENCRYPTION: &str = "psk2+tkip+aes";

/// A radio and the index of the first interface section it drives
#[derive(Debug, Clone)]
struct RadioSlot {
	name: String,
	iface: usize,
}

impl RadioSlot {
	fn field(&self, name: &str) -> String {
		format!("{}-{}", self.name, name)
	}

	fn iface_path(&self, option: &str) -> String {
		format!("wireless.@wifi-iface[{}].{}", self.iface, option)
	}

	fn device_path(&self, option: &str) -> String {
		format!("wireless.{}.{}", self.name, option)
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WifiHandler;

impl WifiHandler {
	fn add_radio(
		&self,
		ctx: &RequestContext<'_>,
		form: &mut ForisForm,
		slot: &RadioSlot,
		radio: &WifiRadio,
	) -> ConfigResult<()> {
		let enabled = slot.field("wifi_enabled");
		let mut section = Section::new(slot.field("set_wifi"), ctx.gettext("Wi-Fi")).with_description(
			ctx.gettext(
				"If you want to use your router as a Wi-Fi access point, enable Wi-Fi here and fill in an SSID (the name of the access point) and a corresponding password.",
			),
		);
		section
			.add_field(
				Field::new(enabled.as_str(), FieldKind::Checkbox)
					.with_label(format!("{} {}", ctx.gettext("Enable Wi-Fi"), slot.iface + 1))
					.with_default(true)
					.with_backend(&slot.iface_path("disabled"))?
					.with_preprocessor(Preprocessor::InvertedBool),
			)
			.add_field(
				Field::new(slot.field("ssid"), FieldKind::Text)
					.with_label(ctx.gettext("SSID"))
					.required()
					.with_validator(ByteLenRange::new(1, 32))
					.requires_value(enabled.as_str(), true)
					.with_backend(&slot.iface_path("ssid"))?,
			)
			.add_field(
				Field::new(slot.field("ssid_hidden"), FieldKind::Checkbox)
					.with_label(ctx.gettext("Hide SSID"))
					.with_hint(ctx.gettext(
						"If set, network is not visible when scanning for available networks.",
					))
					.with_default(false)
					.requires_value(enabled.as_str(), true)
					.with_backend(&slot.iface_path("hidden"))?
					.with_preprocessor(Preprocessor::Bool),
			);

		let band = |hwmode: &str| radio.bands.iter().find(|band| band.hwmode == hwmode);
		let dual_band = band(HWMODE_2G4).is_some() && band(HWMODE_5G).is_some();
		let hwmode = slot.field("hwmode");
		if dual_band {
			section.add_field(
				Field::new(hwmode.as_str(), FieldKind::Radio)
					.with_label(ctx.gettext("Wi-Fi mode"))
					.with_choices([(HWMODE_2G4, "2.4 GHz (g)"), (HWMODE_5G, "5 GHz (a)")])
					.with_default(HWMODE_2G4)
					.requires_value(enabled.as_str(), true)
					.with_backend(&slot.device_path("hwmode"))?
					// Older configurations store 11ng and 11na
					.with_preprocessor(Preprocessor::custom(|value| {
						value.as_str().map(|mode| Value::from(mode.replace('n', "")))
					})),
			);
		}

		section.add_field(
			Field::new(slot.field("htmode"), FieldKind::Dropdown)
				.with_label(ctx.gettext("802.11n mode"))
				.with_choices([
					("NOHT", ctx.gettext("Disabled")),
					("HT20", ctx.gettext("802.11n - 20 MHz wide channel")),
					("HT40", ctx.gettext("802.11n - 40 MHz wide channel")),
				])
				.with_default("HT20")
				.requires_value(enabled.as_str(), true)
				.with_backend(&slot.device_path("htmode"))?,
		);

		for (hwmode_value, name) in [(HWMODE_2G4, "channel2g4"), (HWMODE_5G, "channel5g")] {
			let Some(band) = band(hwmode_value) else {
				continue;
			};
			let mut choices: Vec<(String, String)> = Vec::new();
			if hwmode_value == HWMODE_2G4 {
				choices.push(("auto".to_string(), ctx.gettext("auto")));
			}
			choices.extend(band.channels.iter().map(|ch| (ch.to_string(), ch.to_string())));
			let Some(first) = choices.first().map(|(value, _)| value.clone()) else {
				continue;
			};
			let mut field = Field::new(slot.field(name), FieldKind::Dropdown)
				.with_label(ctx.gettext("Network channel"))
				.with_choices(choices)
				.with_default(first)
				.requires_value(enabled.as_str(), true)
				.with_backend(&slot.device_path("channel"))?;
			if dual_band {
				field = field.requires_value(hwmode.as_str(), hwmode_value);
			}
			section.add_field(field);
		}

		section.add_field(
			Field::new(slot.field("key"), FieldKind::Password)
				.with_label(ctx.gettext("Network password"))
				.with_hint(ctx.gettext(
					"WPA2 pre-shared key, that is required to connect to the network. Minimum length is 8 characters.",
				))
				.required()
				.with_validator(ByteLenRange::new(8, 63))
				.requires_value(enabled.as_str(), true)
				.with_backend(&slot.iface_path("key"))?,
		);
		form.add_section(section)?;
		Ok(())
	}
}

impl FormBuilder for WifiHandler {
	fn title(&self) -> &str {
		"Wi-Fi"
	}

	fn build_form(
		&self,
		ctx: &RequestContext<'_>,
		data: SubmittedData,
	) -> ConfigResult<Option<ForisForm>> {
		let mut radios = ctx.backend().wifi_radios()?;
		if radios.is_empty() {
			tracing::debug!("No wireless radios, Wi-Fi form skipped");
			return Ok(None);
		}
		radios.sort_by(|a, b| a.name.cmp(&b.name));

		let mut form = ForisForm::new("wifi", data).with_backend(ctx.app().backend_handle());
		let mut slots = Vec::with_capacity(radios.len());
		for (iface, radio) in radios.iter().enumerate() {
			let slot = RadioSlot {
				name: radio.name.clone(),
				iface,
			};
			self.add_radio(ctx, &mut form, &slot, radio)?;
			slots.push(slot);
		}

		form.add_callback(move |data| Ok(CallbackOutcome::EditConfig(wifi_changes(&slots, data)?)));
		Ok(Some(form))
	}
}

fn wifi_changes(slots: &[RadioSlot], data: &FormData) -> FormResult<Vec<UciChange>> {
	let mut changes = Vec::new();
	for slot in slots {
		let enabled = flag(data, &slot.field("wifi_enabled"));
		changes.push(UciChange::set_bool(&slot.iface_path("disabled"), !enabled)?);
		changes.push(UciChange::set_bool(&slot.device_path("disabled"), !enabled)?);
		if !enabled {
			continue;
		}

		changes.push(UciChange::set(&slot.iface_path("ssid"), required_text(data, &slot.field("ssid"))?)?);
		changes.push(UciChange::set_bool(
			&slot.iface_path("hidden"),
			flag(data, &slot.field("ssid_hidden")),
		)?);
		changes.push(UciChange::set(&slot.iface_path("encryption"), ENCRYPTION)?);
		changes.push(UciChange::set(&slot.iface_path("key"), required_text(data, &slot.field("key"))?)?);

		let channel = text(data, &slot.field("channel2g4"))
			.or_else(|| text(data, &slot.field("channel5g")))
			.unwrap_or_else(|| {
				tracing::warn!(radio = %slot.name, "Saving Wi-Fi without a channel, using auto");
				"auto".to_string()
			});
		if let Some(hwmode) = text(data, &slot.field("hwmode")) {
			changes.push(UciChange::set(&slot.device_path("hwmode"), hwmode)?);
		}
		let htmode = text(data, &slot.field("htmode")).unwrap_or_else(|| "HT20".to_string());
		changes.push(UciChange::set(&slot.device_path("htmode"), htmode)?);
		changes.push(UciChange::set(&slot.device_path("channel"), channel)?);
	}
	Ok(changes)
}
