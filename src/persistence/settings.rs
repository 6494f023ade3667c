use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    // Remote store endpoint; passed into HttpRemote, never read from a global
    #[serde(default = "ClientSettings::default_api_url")]
    pub api_url: String,
    // Fixed step count sent with every simulation request
    #[serde(default = "ClientSettings::default_sim_steps")]
    pub sim_steps: u32,
    // Where dataset exports land when the caller names no path
    #[serde(default)]
    pub export_override: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: Self::default_api_url(),
            sim_steps: Self::default_sim_steps(),
            export_override: None,
        }
    }
}

impl ClientSettings {
    fn config_dir() -> PathBuf {
        // Cross-platform user config dir
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join("Library").join("Application Support").join("Stockflow");
        }
        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                return PathBuf::from(appdata).join("Stockflow");
            }
            return PathBuf::from("Stockflow");
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            // $XDG_CONFIG_HOME/stockflow or ~/.config/stockflow
            if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg).join("stockflow");
            }
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join(".config").join("stockflow");
        }
    }

    /// Directory holding `settings.json` for this user.
    pub fn settings_dir() -> PathBuf {
        Self::config_dir()
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_dir().join("settings.json"))
    }

    // A missing file is not an error, just defaults
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let mut f = fs::File::open(path)?;
            let mut s = String::new();
            f.read_to_string(&mut s)?;
            return Ok(serde_json::from_str(&s)?);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_dir())
    }

    pub fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(dir)?;
        let s = serde_json::to_string_pretty(self)?;
        let mut f = fs::File::create(dir.join("settings.json"))?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Where exports land when no explicit path is given: the override
    /// directory if set, otherwise a fixed spot under the OS temp dir.
    pub fn export_dir(&self) -> PathBuf {
        match &self.export_override {
            Some(p) => p.clone(),
            None => std::env::temp_dir().join("stockflow").join("exports"),
        }
    }

    pub(crate) fn default_api_url() -> String { "http://127.0.0.1:2000".to_string() }
    pub(crate) fn default_sim_steps() -> u32 { 30 }
}
