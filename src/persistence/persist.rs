use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use time::macros::format_description;
use time::OffsetDateTime;

use super::document::{slug_file_name, GraphDocument};
use super::settings::AppSettings;

static SETTINGS_OVERRIDE: OnceCell<AppSettings> = OnceCell::new();

pub fn set_settings_override(settings: AppSettings) {
    let _ = SETTINGS_OVERRIDE.set(settings);
}

fn effective_settings() -> AppSettings {
    if let Some(settings) = SETTINGS_OVERRIDE.get() {
        return settings.clone();
    }
    AppSettings::load().unwrap_or_default()
}

pub fn export_dir() -> PathBuf {
    effective_settings().export_dir()
}

pub fn command_log_dir() -> PathBuf {
    effective_settings().command_log_dir()
}

/// Export path used when the user gives none: timestamped so repeated
/// exports of the same graph never clobber each other.
pub fn timestamped_export_path(graph_name: &str) -> PathBuf {
    let now = OffsetDateTime::now_utc();
    let fmt = format_description!("[year][month][day]_[hour][minute][second]");
    let stamp = now.format(fmt).unwrap_or_else(|_| "unknown".to_string());
    let file = slug_file_name(graph_name);
    let stem = file.trim_end_matches(".json");
    export_dir().join(format!("{stem}_{stamp}.json"))
}

fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut f = File::create(&tmp_path)?;
        f.write_all(data)?;
        f.flush()?;
    }
    fs::rename(tmp_path, path)?;
    Ok(())
}

/// Serialize and write a document. With no explicit path the export lands
/// in the configured export directory under a timestamped name.
pub fn save_document(document: &GraphDocument, path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => timestamped_export_path(document.name.as_deref().unwrap_or("graph")),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = document.to_json()?;
    atomic_write(&path, json.as_bytes())?;
    log::info!("exported graph to {}", path.display());
    Ok(path)
}

/// Read and parse a document. Parsing happens before any caller state is
/// touched, so a bad file leaves the session exactly as it was.
pub fn load_document(path: &Path) -> anyhow::Result<GraphDocument> {
    let mut f = File::open(path)?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    GraphDocument::from_json_str(&buf)
}

/// Write `{base}_nodes.csv` and `{base}_links.csv` next to each other.
pub fn export_csv(
    document: &GraphDocument,
    base_path: &Path,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let parent = base_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let stem = base_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("graph");
    let nodes_path = parent.join(format!("{stem}_nodes.csv"));
    let links_path = parent.join(format!("{stem}_links.csv"));

    {
        let mut wtr = csv::Writer::from_path(&nodes_path)?;
        wtr.write_record(["id", "name", "val", "color"])?;
        for n in &document.nodes {
            wtr.write_record(&[
                n.id.clone(),
                n.name.clone(),
                n.val.to_string(),
                n.color.clone(),
            ])?;
        }
        wtr.flush()?;
    }
    {
        let mut wtr = csv::Writer::from_path(&links_path)?;
        wtr.write_record(["source", "target", "value", "color", "label"])?;
        for l in &document.links {
            wtr.write_record(&[
                l.source.clone(),
                l.target.clone(),
                l.value.to_string(),
                l.color.clone(),
                l.label.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    }
    Ok((nodes_path, links_path))
}
