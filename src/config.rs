//! `epub-scaffold.toml` configuration.
//!
//! Two sections: `[site]` describes where the generator put its output and
//! where the bundler's asset manifest lives, `[metadata]` carries the values
//! rendered into the package document. Optional values use empty-value
//! sentinels with `..._opt()`/`..._path()` accessors rather than `Option`s
//! so the generated config file shows every key.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Package-document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Title for the package's dc:title element.
    pub title: String,
    /// Language code (BCP 47 format, e.g., "en", "en-GB", "fr").
    pub language: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Site input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory the generator rendered pages into. This becomes the EPUB
    /// content directory; the EPUB root is its parent.
    pub out_dir: PathBuf,
    /// Explicit page list relative to `out_dir`, in reading order. Empty to
    /// discover pages by walking `out_dir`.
    pub pages: Vec<PathBuf>,
    /// Path to the bundler's `webpack-assets.json`. Empty string for the
    /// conventional location under the site's plugin directory.
    pub asset_manifest: String,
    /// Reserved option carried over from the original plugin interface;
    /// parsed but not acted on.
    pub count: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("builds/dist.epub/OEBPS"),
            pages: Vec::new(),
            asset_manifest: String::new(),
            count: 0,
        }
    }
}

impl SiteConfig {
    /// Returns the explicit page list, if configured.
    pub fn pages_opt(&self) -> Option<&[PathBuf]> {
        if self.pages.is_empty() {
            None
        } else {
            Some(&self.pages)
        }
    }

    /// Resolve the asset-manifest location. When not configured explicitly,
    /// falls back to the conventional offset the bundler plugin writes to,
    /// relative to the given output directory.
    pub fn asset_manifest_path(&self, out_dir: &Path) -> PathBuf {
        if self.asset_manifest.is_empty() {
            out_dir.join("../../../../.vuepress/epub-scaffold/webpack-assets.json")
        } else {
            PathBuf::from(&self.asset_manifest)
        }
    }
}

/// Complete configuration for an epub-scaffold project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub site: SiteConfig,
    pub metadata: MetadataConfig,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_serialize_configuration() {
        let config = Configuration::default();
        toml::to_string(&config).expect("can serialize Configuration to TOML");
    }

    #[test]
    fn can_roundtrip_configuration() {
        let config = Configuration::default();
        let toml_str = toml::to_string(&config).expect("can serialize");
        let deserialized: Configuration = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(deserialized.metadata.title, config.metadata.title);
        assert_eq!(
            deserialized.site.out_dir.to_string_lossy(),
            config.site.out_dir.to_string_lossy()
        );
    }

    #[test]
    fn asset_manifest_defaults_to_conventional_offset() {
        let site = SiteConfig::default();
        let path = site.asset_manifest_path(Path::new("builds/dist.epub/OEBPS"));
        assert_eq!(
            path,
            PathBuf::from(
                "builds/dist.epub/OEBPS/../../../../.vuepress/epub-scaffold/webpack-assets.json"
            )
        );
    }

    #[test]
    fn explicit_asset_manifest_wins() {
        let site = SiteConfig {
            asset_manifest: "manifest/assets.json".to_string(),
            ..SiteConfig::default()
        };
        let path = site.asset_manifest_path(Path::new("out"));
        assert_eq!(path, PathBuf::from("manifest/assets.json"));
    }
}
