//! Plugins contributing pages and translations

use crate::error::{ConfigError, ConfigResult};
use crate::page::ConfigPage;
use crate::registry::PageRegistry;
use foris_i18n::{MessageCatalog, Translator};

pub const DEFAULT_LOAD_ORDER: u32 = 50;

/// Extension of the interface
///
/// Pages of a plugin should be identified by `PageId::Plugin`.
pub trait ForisPlugin: Send + Sync {
	/// Unique name, matched against the `plugins` setting
	fn name(&self) -> &str;

	/// Plugins load in ascending order, ties broken by name
	fn load_order(&self) -> u32 {
		DEFAULT_LOAD_ORDER
	}

	fn pages(&self) -> Vec<ConfigPage>;

	fn translations(&self) -> Vec<MessageCatalog> {
		Vec::new()
	}
}

/// Loads plugins into the page registry and translator
///
/// Returns the names of the loaded plugins in load order.
///
/// # Errors
///
/// Fails when two plugins share a name or a plugin page reuses a slug.
pub fn load_plugins(
	mut plugins: Vec<Box<dyn ForisPlugin>>,
	registry: &mut PageRegistry,
	translator: &mut Translator,
) -> ConfigResult<Vec<String>> {
	plugins.sort_by(|a, b| {
		a.load_order()
			.cmp(&b.load_order())
			.then_with(|| a.name().cmp(b.name()))
	});

	let mut loaded: Vec<String> = Vec::with_capacity(plugins.len());
	for plugin in plugins {
		let name = plugin.name().to_string();
		if loaded.contains(&name) {
			return Err(ConfigError::PluginAlreadyLoaded(name));
		}
		for page in plugin.pages() {
			registry.register(page)?;
		}
		for catalog in plugin.translations() {
			translator.add_catalog(catalog);
		}
		tracing::info!(plugin = %name, order = plugin.load_order(), "Plugin loaded");
		loaded.push(name);
	}
	Ok(loaded)
}

/// Keeps the plugins enabled in the settings, warning about unknown names
pub fn enabled_plugins(
	available: Vec<Box<dyn ForisPlugin>>,
	enabled: &[String],
) -> Vec<Box<dyn ForisPlugin>> {
	for name in enabled {
		if !available.iter().any(|plugin| plugin.name() == name) {
			tracing::warn!(plugin = %name, "Enabled plugin is not available");
		}
	}
	available
		.into_iter()
		.filter(|plugin| enabled.iter().any(|name| name == plugin.name()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::PageId;
	use rstest::rstest;

	struct TestPlugin {
		name: &'static str,
		order: u32,
	}

	impl ForisPlugin for TestPlugin {
		fn name(&self) -> &str {
			self.name
		}

		fn load_order(&self) -> u32 {
			self.order
		}

		fn pages(&self) -> Vec<ConfigPage> {
			vec![ConfigPage::new(PageId::Plugin(self.name.to_string()), self.name, 60)]
		}
	}

	fn plugin(name: &'static str, order: u32) -> Box<dyn ForisPlugin> {
		Box::new(TestPlugin { name, order })
	}

	#[rstest]
	fn test_plugins_load_in_order() {
		// Arrange
		let mut registry = PageRegistry::new();
		let mut translator = Translator::new("en");

		// Act
		let loaded = load_plugins(
			vec![plugin("zeta", 10), plugin("beta", 50), plugin("alpha", 50)],
			&mut registry,
			&mut translator,
		)
		.unwrap();

		// Assert
		assert_eq!(loaded, vec!["zeta", "alpha", "beta"]);
		assert!(registry.get("alpha").is_ok());
	}

	#[rstest]
	fn test_duplicate_plugin_name_rejected() {
		// Arrange
		let mut registry = PageRegistry::new();
		let mut translator = Translator::new("en");

		// Act
		let result = load_plugins(
			vec![plugin("openvpn", 10), plugin("openvpn", 20)],
			&mut registry,
			&mut translator,
		);

		// Assert
		assert!(matches!(result, Err(ConfigError::PluginAlreadyLoaded(name)) if name == "openvpn"));
	}

	#[rstest]
	fn test_enabled_plugins_filters_by_name() {
		// Act
		let enabled = enabled_plugins(
			vec![plugin("openvpn", 50), plugin("diagnostics", 50)],
			&["diagnostics".to_string(), "missing".to_string()],
		);

		// Assert
		assert_eq!(enabled.len(), 1);
		assert_eq!(enabled[0].name(), "diagnostics");
	}
}
