//! Visual style presets with a JSON-backed store for custom styles.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Most styles the store will hold. Adding past the cap drops the oldest
/// custom entry.
const MAX_STYLES: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StylePreset {
    pub name: String,
    /// Appended to every image prompt.
    pub suffix: String,
}

/// Style presets persisted to a JSON file. Custom styles go to the front
/// so the most recently added is the first suggestion.
#[derive(Debug)]
pub struct StyleStore {
    path: PathBuf,
    styles: Vec<StylePreset>,
}

fn builtin_styles() -> Vec<StylePreset> {
    let presets = [
        (
            "cinematic",
            "cinematic lighting, shallow depth of field, film grain, 35mm",
        ),
        (
            "anime",
            "anime style, vibrant colors, detailed backgrounds, studio quality",
        ),
        (
            "photorealistic",
            "photorealistic, natural lighting, high detail, 8k",
        ),
        (
            "watercolor",
            "watercolor painting, soft edges, pastel palette, textured paper",
        ),
        (
            "pixel-art",
            "pixel art, 16-bit, limited palette, crisp sprites",
        ),
    ];
    presets
        .iter()
        .map(|(name, suffix)| StylePreset {
            name: name.to_string(),
            suffix: suffix.to_string(),
        })
        .collect()
}

impl StyleStore {
    /// Load the store, seeding the file with built-in presets if absent.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let styles = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading styles file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing styles file {}", path.display()))?
        } else {
            let styles = builtin_styles();
            let store = Self {
                path: path.clone(),
                styles,
            };
            store.save()?;
            return Ok(store);
        };
        Ok(Self { path, styles })
    }

    pub fn styles(&self) -> &[StylePreset] {
        &self.styles
    }

    /// Find a style by name, case-insensitively.
    pub fn by_name(&self, name: &str) -> Option<&StylePreset> {
        self.styles
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Add a custom style at the front, evicting from the back past the cap.
    pub fn add(&mut self, preset: StylePreset) -> anyhow::Result<()> {
        self.styles.retain(|s| !s.name.eq_ignore_ascii_case(&preset.name));
        self.styles.insert(0, preset);
        self.styles.truncate(MAX_STYLES);
        self.save()
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.styles)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing styles file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, StyleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StyleStore::load(dir.path().join("styles.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn seeds_builtins_on_first_load() {
        let (_dir, store) = temp_store();
        assert!(store.by_name("cinematic").is_some());
        assert!(store.by_name("CINEMATIC").is_some());
    }

    #[test]
    fn custom_styles_go_to_front_and_persist() {
        let (dir, mut store) = temp_store();
        store
            .add(StylePreset {
                name: "noir".into(),
                suffix: "black and white, hard shadows".into(),
            })
            .unwrap();
        assert_eq!(store.styles()[0].name, "noir");

        let reloaded = StyleStore::load(dir.path().join("styles.json")).unwrap();
        assert_eq!(reloaded.styles()[0].name, "noir");
    }

    #[test]
    fn caps_store_size() {
        let (_dir, mut store) = temp_store();
        for i in 0..30 {
            store
                .add(StylePreset {
                    name: format!("style-{i}"),
                    suffix: "x".into(),
                })
                .unwrap();
        }
        assert_eq!(store.styles().len(), MAX_STYLES);
        assert_eq!(store.styles()[0].name, "style-29");
    }

    #[test]
    fn adding_same_name_replaces() {
        let (_dir, mut store) = temp_store();
        let before = store.styles().len();
        store
            .add(StylePreset {
                name: "cinematic".into(),
                suffix: "new suffix".into(),
            })
            .unwrap();
        assert_eq!(store.styles().len(), before);
        assert_eq!(store.by_name("cinematic").unwrap().suffix, "new suffix");
    }
}
