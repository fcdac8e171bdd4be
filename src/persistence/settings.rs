use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    // If None, exports go to the OS temporary directory
    pub export_override: Option<PathBuf>,
    // If None, command logs go to the OS temporary directory
    #[serde(default)]
    pub command_log_override: Option<PathBuf>,
    // Upper bound for random generation
    #[serde(default = "AppSettings::default_generate_max")]
    pub generate_max_nodes: usize,
    // Initial form colors for new nodes and edges
    #[serde(default = "AppSettings::default_node_color")]
    pub default_node_color: String,
    #[serde(default = "AppSettings::default_edge_color")]
    pub default_edge_color: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            export_override: None,
            command_log_override: None,
            generate_max_nodes: Self::default_generate_max(),
            default_node_color: Self::default_node_color(),
            default_edge_color: Self::default_edge_color(),
        }
    }
}

impl AppSettings {
    fn config_dir() -> PathBuf {
        // Cross-platform user config dir
        #[cfg(target_os = "macos")]
        {
            // ~/Library/Application Support/Graph-Sketch
            let home = std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("~"));
            return home
                .join("Library")
                .join("Application Support")
                .join("Graph-Sketch");
        }
        #[cfg(target_os = "windows")]
        {
            // %APPDATA%\Graph-Sketch
            if let Ok(appdata) = std::env::var("APPDATA") {
                return PathBuf::from(appdata).join("Graph-Sketch");
            }
            return PathBuf::from("Graph-Sketch");
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            // $XDG_CONFIG_HOME/Graph-Sketch or ~/.config/Graph-Sketch
            if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg).join("Graph-Sketch");
            }
            let home = std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("~"));
            return home.join(".config").join("Graph-Sketch");
        }
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_dir().join("settings.json");
        if path.exists() {
            let mut f = std::fs::File::open(path)?;
            let mut s = String::new();
            f.read_to_string(&mut s)?;
            let v: Self = serde_json::from_str(&s)?;
            return Ok(v);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join("settings.json");
        let s = serde_json::to_string_pretty(self)?;
        let mut f = std::fs::File::create(path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Directory holding settings.json, also used for shell history.
    pub fn settings_dir() -> PathBuf {
        Self::config_dir()
    }

    /// Default export directory when no override is set: OS temporary
    /// directory, e.g. {temp_dir}/Graph-Sketch/exports
    pub fn export_default_dir() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push("Graph-Sketch");
        p.push("exports");
        p
    }

    pub fn export_dir(&self) -> PathBuf {
        if let Some(p) = &self.export_override {
            return p.clone();
        }
        Self::export_default_dir()
    }

    /// Default command-log directory when no override is set.
    pub fn command_log_default_dir() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push("Graph-Sketch");
        p.push("logs");
        p
    }

    pub fn command_log_dir(&self) -> PathBuf {
        if let Some(p) = &self.command_log_override {
            return p.clone();
        }
        Self::command_log_default_dir()
    }

    pub(crate) fn default_generate_max() -> usize {
        30
    }

    pub(crate) fn default_node_color() -> String {
        crate::editor::session::DEFAULT_NODE_COLOR.to_string()
    }

    pub(crate) fn default_edge_color() -> String {
        crate::editor::session::DEFAULT_EDGE_COLOR.to_string()
    }
}
