// ABOUTME: Dock entry model and config.json parsing into an ordered list of icons with bound actions
// ABOUTME: Key order in the JSON object is display order; icons that cannot be read get a placeholder

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What a left-click on an icon does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    LaunchProcess { command: String },
    OpenUrl { url: String },
    /// Unrecognized `type`; clicking does nothing.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconSource {
    Image(PathBuf),
    Placeholder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DockEntry {
    pub label: String, // Identifier and tooltip text
    pub icon: IconSource,
    pub action: Action,
}

impl DockEntry {
    pub fn new(label: String, icon: IconSource, action: Action) -> Self {
        Self { label, icon, action }
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    icon: String,
    #[serde(rename = "type")]
    kind: String,
    exec: Option<String>,
    url: Option<String>,
}

pub fn load_entries(path: &Path) -> Result<Vec<DockEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dock entries file: {}", path.display()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_entries(&content, base_dir)
}

pub fn parse_entries(content: &str, base_dir: &Path) -> Result<Vec<DockEntry>> {
    let root: serde_json::Value =
        serde_json::from_str(content).context("Failed to parse dock entries")?;

    let object = root
        .as_object()
        .ok_or_else(|| anyhow!("Dock entries must be a JSON object of label -> entry"))?;

    let mut entries = Vec::with_capacity(object.len());
    for (label, value) in object {
        let raw: RawEntry = serde_json::from_value(value.clone())
            .with_context(|| format!("Invalid dock entry '{label}'"))?;

        let action = resolve_action(label, &raw)?;
        let icon = resolve_icon(label, &raw.icon, base_dir);
        entries.push(DockEntry::new(label.clone(), icon, action));
    }

    tracing::debug!("Loaded {} dock entries", entries.len());
    Ok(entries)
}

fn resolve_action(label: &str, raw: &RawEntry) -> Result<Action> {
    match raw.kind.as_str() {
        "open_app" => {
            let command = raw
                .exec
                .clone()
                .ok_or_else(|| anyhow!("Dock entry '{label}' has type open_app but no exec"))?;
            Ok(Action::LaunchProcess { command })
        }
        "open_url" => {
            let url = raw
                .url
                .clone()
                .ok_or_else(|| anyhow!("Dock entry '{label}' has type open_url but no url"))?;
            Ok(Action::OpenUrl { url })
        }
        other => {
            tracing::debug!("Dock entry '{}' has unknown type '{}', clicks are ignored", label, other);
            Ok(Action::None)
        }
    }
}

fn resolve_icon(label: &str, icon: &str, base_dir: &Path) -> IconSource {
    let path = Path::new(icon);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };

    match image::image_dimensions(&path) {
        Ok(_) => IconSource::Image(path),
        Err(e) => {
            tracing::warn!(
                "Icon for '{}' could not be read ({}): {}; using placeholder",
                label,
                path.display(),
                e
            );
            IconSource::Placeholder
        }
    }
}
