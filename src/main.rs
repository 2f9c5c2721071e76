use anyhow::{Context, Result};
use cli::Cli;
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;

mod assets;
mod cli;
mod config;
mod config_wizard;
mod format;
mod media_types;
mod package;
mod pages;
mod scaffold;
mod template;
mod write;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Config => config_wizard::run(),
        cli::Commands::Scaffold => {
            println!("Loading configuration...");
            let contents = std::fs::read_to_string("epub-scaffold.toml")
                .with_context(|| "Failed to load epub-scaffold.toml contents")?;
            let config: Configuration =
                toml::from_str(&contents).with_context(|| "Failed to parse TOML")?;

            let out_dir = config.site.out_dir.clone();
            let pages = match config.site.pages_opt() {
                Some(listed) => listed.iter().map(|page| out_dir.join(page)).collect(),
                None => pages::discover_pages(&out_dir).with_context(|| {
                    format!("Failed to find rendered pages in {}", out_dir.display())
                })?,
            };
            let build = scaffold::SiteBuild { out_dir, pages };

            let progress = ProgressBar::new(build.pages.len() as u64);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("can parse progress style")
                    .progress_chars("#>-"),
            );
            progress.set_message("Scaffolding EPUB...");

            let stats = scaffold::scaffold_site(&config, &build, &progress)
                .with_context(|| "Failed to scaffold EPUB")?;
            progress.finish_with_message("EPUB scaffolded");

            println!();
            println!("  EPUB root: {}", stats.epub_root.display());
            println!(
                "  Pages:     {} in the spine ({} failed to reformat)",
                stats.page_count, stats.failed_pages
            );
            println!("  Assets:    {} in the package manifest", stats.asset_count);

            Ok(())
        }
    }
}
