//! Bundler asset-manifest input and the manifest-asset records derived
//! from it.
//!
//! The bundler writes a `webpack-assets.json` file mapping each entry point
//! to the files it emitted, grouped by asset kind. A group holds either a
//! single path or an array of paths. The manifest is read-only input; this
//! module flattens it and derives the records that become `<item>` rows in
//! the package document.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::media_types;

/// The bundler's emitted-asset manifest: entry name -> asset kind -> paths.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, BTreeMap<String, AssetGroup>>,
}

/// A group of emitted paths for one asset kind; the bundler writes a bare
/// string when only one file was emitted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AssetGroup {
    One(String),
    Many(Vec<String>),
}

impl AssetGroup {
    fn paths(&self) -> &[String] {
        match self {
            AssetGroup::One(path) => std::slice::from_ref(path),
            AssetGroup::Many(paths) => paths,
        }
    }
}

impl AssetManifest {
    /// Read and parse the manifest JSON. A missing or malformed file aborts
    /// packaging; there is no fallback.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read asset manifest {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse asset manifest {}", path.display()))
    }

    /// Every emitted file path across all entries and asset kinds, flattened
    /// into one sequence.
    pub fn emitted_files(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .values()
            .flat_map(|kinds| kinds.values())
            .flat_map(|group| group.paths().iter().map(String::as_str))
    }
}

/// One `<item>` row of the package manifest. Exists only long enough to be
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestAsset {
    /// Path relative to the package root (one leading separator stripped).
    pub href: String,
    /// Media type looked up from the extension table.
    pub media_type: &'static str,
    /// The file's base name.
    pub id: String,
}

impl ManifestAsset {
    /// Derive a manifest record from an emitted path. Returns `None` when
    /// the extension has no entry in the media-type table, which excludes
    /// the file from the package.
    pub fn from_path(path: &str) -> Option<Self> {
        let extension = path.rsplit('.').next().unwrap_or(path);
        let media_type = media_types::media_type(extension)?;

        let href = path.strip_prefix('/').unwrap_or(path).to_string();
        let id = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());

        Some(Self {
            href,
            media_type,
            id,
        })
    }
}
