use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::template::Template;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub defaults: FormDefaults,
    pub timing: Timing,
    pub pricing: Pricing,
    /// Empty the cart once a simulated checkout completes.
    pub clear_cart_after_checkout: bool,
}

/// Initial values for a fresh wizard form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormDefaults {
    pub name: String,
    pub description: String,
    pub templates: Vec<Template>,
    pub primary_color: String,
    pub secondary_color: String,
    pub welcome_message: String,
    pub auto_show: bool,
    pub delay_time: u32,
    pub collect_email: bool,
    pub fallback_contact: bool,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            templates: Vec::new(),
            primary_color: "#0070f3".to_string(),
            secondary_color: "#f5f5f5".to_string(),
            welcome_message: "Hi there! How can I help you today?".to_string(),
            auto_show: false,
            delay_time: 5,
            collect_email: true,
            fallback_contact: true,
        }
    }
}

/// Simulated delays, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub reply_delay_ms: u64,
    pub add_to_cart_delay_ms: u64,
    pub checkout_delay_ms: u64,
    pub sign_in_delay_ms: u64,
    /// Interval between simulated upload progress steps.
    pub upload_step_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1500,
            add_to_cart_delay_ms: 1000,
            checkout_delay_ms: 2000,
            sign_in_delay_ms: 1000,
            upload_step_ms: 300,
        }
    }
}

impl Timing {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn add_to_cart_delay(&self) -> Duration {
        Duration::from_millis(self.add_to_cart_delay_ms)
    }

    pub fn checkout_delay(&self) -> Duration {
        Duration::from_millis(self.checkout_delay_ms)
    }

    pub fn sign_in_delay(&self) -> Duration {
        Duration::from_millis(self.sign_in_delay_ms)
    }

    pub fn upload_step(&self) -> Duration {
        Duration::from_millis(self.upload_step_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// Orders strictly above this subtotal ship free.
    pub free_shipping_threshold: Decimal,
    pub flat_shipping: Decimal,
    pub tax_rate: Decimal,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            free_shipping_threshold: dec!(50),
            flat_shipping: dec!(9.99),
            tax_rate: dec!(0.08),
        }
    }
}

impl Settings {
    /// Load settings from an explicit path, or from the first file found on
    /// the search path. No file at all means built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        for path in config_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Settings::default())
    }

    fn from_file(path: &Path) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(settings)
    }
}

fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Project-local: ./.chatforge/config.json
    paths.push(PathBuf::from(".chatforge").join(CONFIG_FILE));

    // 2. User config: ~/.config/chatforge/config.json
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("chatforge").join(CONFIG_FILE));
    }

    // 3. Next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("chatforge").join(CONFIG_FILE));
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{
            "defaults": {
                "name": "Helpdesk",
                "templates": ["customer-support", "sales-assistant"],
                "delayTime": 10
            },
            "timing": { "reply_delay_ms": 10 },
            "pricing": { "tax_rate": "0.1" },
            "clear_cart_after_checkout": true
        }"#;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.defaults.name, "Helpdesk");
        assert_eq!(
            settings.defaults.templates,
            vec![Template::CustomerSupport, Template::SalesAssistant]
        );
        assert_eq!(settings.defaults.delay_time, 10);
        // untouched fields keep their defaults
        assert_eq!(settings.defaults.primary_color, "#0070f3");
        assert!(settings.defaults.collect_email);
        assert_eq!(settings.timing.reply_delay(), Duration::from_millis(10));
        assert_eq!(settings.timing.checkout_delay_ms, 2000);
        assert_eq!(settings.timing.upload_step(), Duration::from_millis(300));
        assert_eq!(settings.pricing.tax_rate, dec!(0.1));
        assert_eq!(settings.pricing.flat_shipping, dec!(9.99));
        assert!(settings.clear_cart_after_checkout);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"{{ "timing": {{ "checkout_delay_ms": 5 }} }}"#).unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.timing.checkout_delay_ms, 5);
        assert_eq!(settings.timing.reply_delay_ms, 1500);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
