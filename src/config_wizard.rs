//! Interactive configuration wizard for creating `epub-scaffold.toml`.
//!
//! Prompts for the package metadata and the site's output layout, then
//! writes the config to the current directory, asking before overwriting an
//! existing file.

use crate::config::{Configuration, MetadataConfig, SiteConfig};
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::path::PathBuf;

/// Run the interactive configuration wizard.
pub fn run() -> Result<()> {
    let theme = ColorfulTheme::default();

    let title: String = Input::with_theme(&theme)
        .with_prompt("Book title")
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain title")?;

    let language: String = Input::with_theme(&theme)
        .with_prompt("Language code")
        .default("en".to_string())
        .interact()
        .with_context(|| "Failed to obtain language")?;

    let out_dir: String = Input::with_theme(&theme)
        .with_prompt("Rendered site output directory (becomes the EPUB content directory)")
        .default("builds/dist.epub/OEBPS".to_string())
        .interact()
        .with_context(|| "Failed to obtain output directory")?;

    let asset_manifest: String = Input::with_theme(&theme)
        .with_prompt("webpack-assets.json path (leave empty for the conventional location)")
        .allow_empty(true)
        .interact()
        .with_context(|| "Failed to obtain asset manifest path")?;

    let config = Configuration {
        site: SiteConfig {
            out_dir: PathBuf::from(out_dir),
            asset_manifest: asset_manifest.trim().to_string(),
            ..SiteConfig::default()
        },
        metadata: MetadataConfig { title, language },
    };

    let config = toml::to_string_pretty(&config)
        .with_context(|| "Failed to convert configuration to TOML")?;

    let config_path = PathBuf::from("epub-scaffold.toml");
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt("epub-scaffold.toml already exists, do you want to override it?")
            .interact()?
    {
        println!("Configuration:");
        println!("{}", config);
    } else {
        std::fs::write("epub-scaffold.toml", config)
            .with_context(|| "Failed to write configuration file")?;
        println!("epub-scaffold.toml written!");
    }

    Ok(())
}
