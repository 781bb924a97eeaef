use serde::{Deserialize, Serialize};
use std::{fs, io::Write, path::PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub default_sheet: Option<String>,
    #[serde(default = "default_empty_cell_text")]
    pub empty_cell_text: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_empty_cell_text() -> String {
    String::new()
}

fn default_log_filter() -> String {
    "gridtab=warn".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_sheet: None,
            empty_cell_text: default_empty_cell_text(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::config_path()?;

        // Create directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // First run: write the commented default file
        if !config_path.exists() {
            Self::write_default_config(&config_path)?;
        }

        let content = fs::read_to_string(&config_path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    fn write_default_config(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        const DEFAULT_CONFIG: &str = include_str!("../settings.toml");
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("GRIDTAB_TEST_HOME")
            .or_else(|_| std::env::var("HOME"))
            .or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home).join(".gridtab").join("settings.toml"))
    }
}
