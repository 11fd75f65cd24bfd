// Grid settings
// Loaded from ~/.config/gridkit/settings.json

use gridkit_engine::{DisplayLocale, Modifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keyboard modifier style preference (primarily for macOS users)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierStyle {
    /// Use platform-native modifier (Cmd on macOS, Ctrl on Windows/Linux)
    #[default]
    Platform,
    /// Always use Ctrl (for users who prefer Windows-style shortcuts on Mac)
    Ctrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Display
    #[serde(rename = "display.yesLabel")]
    pub yes_label: String,

    #[serde(rename = "display.noLabel")]
    pub no_label: String,

    /// Empty string disables digit grouping
    #[serde(rename = "display.thousandsSeparator")]
    pub thousands_separator: String,

    #[serde(rename = "display.decimalSeparator")]
    pub decimal_separator: String,

    /// chrono format string
    #[serde(rename = "display.dateFormat")]
    pub date_format: String,

    #[serde(rename = "display.itemsNoun")]
    pub items_noun: String,

    // Keyboard
    #[serde(rename = "keyboard.modifierStyle")]
    pub modifier_style: ModifierStyle,
}

impl Default for Settings {
    fn default() -> Self {
        let locale = DisplayLocale::default();
        Self {
            yes_label: locale.yes,
            no_label: locale.no,
            thousands_separator: locale.thousands_separator.map(String::from).unwrap_or_default(),
            decimal_separator: locale.decimal_separator.to_string(),
            date_format: locale.date_format,
            items_noun: locale.items_noun,
            modifier_style: ModifierStyle::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridkit");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load a specific settings file. Unreadable or invalid files give defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Display text (also used for copy/paste)
    "display.yesLabel": "Yes",
    "display.noLabel": "No",
    "display.thousandsSeparator": ",",
    "display.decimalSeparator": ".",
    "display.dateFormat": "%-m/%-d/%Y",
    "display.itemsNoun": "items",

    // Keyboard (macOS only: "platform" = Cmd, "ctrl" = Ctrl)
    "keyboard.modifierStyle": "platform"
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }

    /// Display conventions for the value codec.
    ///
    /// Separators use the first character of their setting. A decimal
    /// separator equal to the grouping separator disables grouping.
    pub fn display_locale(&self) -> DisplayLocale {
        let defaults = DisplayLocale::default();
        let decimal_separator = self.decimal_separator.chars().next().unwrap_or(defaults.decimal_separator);
        let thousands_separator = self
            .thousands_separator
            .chars()
            .next()
            .filter(|&c| c != decimal_separator);

        DisplayLocale {
            yes: non_empty(&self.yes_label).unwrap_or(defaults.yes),
            no: non_empty(&self.no_label).unwrap_or(defaults.no),
            thousands_separator,
            decimal_separator,
            date_format: non_empty(&self.date_format).unwrap_or(defaults.date_format),
            items_noun: non_empty(&self.items_noun).unwrap_or(defaults.items_noun),
        }
    }

    /// Modifier set of the copy/paste shortcuts on this platform.
    pub fn command_modifiers(&self) -> Modifiers {
        match self.modifier_style {
            ModifierStyle::Platform if cfg!(target_os = "macos") => Modifiers::meta(),
            _ => Modifiers::ctrl(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}
