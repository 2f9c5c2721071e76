//! The post-generation packaging step.
//!
//! Once the site generator has rendered every page to disk, this module
//! turns the output directory into an exploded EPUB container: the fixed
//! `mimetype` file and `META-INF/container.xml` pointer at the EPUB root
//! (the output directory's parent), the `content.opf` package document
//! inside the content directory, and the pages themselves reformatted in
//! place.
//!
//! Failure modes differ by step: a page that cannot be reformatted is
//! reported and skipped, while a missing or malformed asset manifest aborts
//! packaging. In that case mimetype and container.xml have already been
//! written and content.opf is missing; re-running after fixing the manifest
//! completes the container, since every write is an idempotent overwrite.

use crate::assets::AssetManifest;
use crate::config::Configuration;
use crate::format;
use crate::package::{self, PackageData};
use crate::template::Template;
use crate::write;
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// Explicit build inputs: the content directory pages were rendered into,
/// and the rendered pages in reading order.
pub struct SiteBuild {
    pub out_dir: PathBuf,
    pub pages: Vec<PathBuf>,
}

/// Statistics from scaffolding, for user feedback.
pub struct ScaffoldStats {
    /// Root directory of the EPUB container skeleton.
    pub epub_root: PathBuf,
    /// Number of pages in the spine.
    pub page_count: usize,
    /// Number of `<item>` rows in the package manifest.
    pub asset_count: usize,
    /// Pages that could not be reformatted.
    pub failed_pages: usize,
}

struct ContainerData {
    opf_path: String,
}

fn mimetype_template() -> Template<()> {
    Template::new().text("application/epub+zip")
}

fn container_template() -> Template<ContainerData> {
    Template::new()
        .text(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <container xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\" version=\"1.0\">\n\
             \x20 <rootfiles>\n\
             \x20   <rootfile full-path=\"",
        )
        .slot(|d: &ContainerData| d.opf_path.clone())
        .text(
            "\" media-type=\"application/oebps-package+xml\"/>\n\
             \x20 </rootfiles>\n\
             </container>\n",
        )
}

/// Run the packaging step against a rendered site.
pub fn scaffold_site(
    config: &Configuration,
    build: &SiteBuild,
    progress: &ProgressBar,
) -> Result<ScaffoldStats> {
    let out_dir = &build.out_dir;
    let epub_root = out_dir.parent().ok_or_else(|| {
        anyhow!(
            "Output directory {} has no parent to hold the EPUB container",
            out_dir.display()
        )
    })?;
    let content_dir = out_dir
        .file_name()
        .ok_or_else(|| anyhow!("Output directory {} has no name", out_dir.display()))?
        .to_string_lossy()
        .to_string();
    let opf_path = format!("{}/content.opf", content_dir);

    // reformat pages in place; failures are reported, never fatal
    progress.set_message("Reformatting pages...");
    let failures = format::format_pages(&build.pages, progress);
    for (page, e) in &failures {
        eprintln!(
            "{} failed to reformat {}: {:#}",
            console::style("warning").yellow(),
            page.display(),
            e
        );
    }

    write::write_rendered(&mimetype_template(), &(), &epub_root.join("mimetype"))?;
    write::write_rendered(
        &container_template(),
        &ContainerData { opf_path },
        &epub_root.join("META-INF").join("container.xml"),
    )?;

    progress.set_message("Assembling package document...");
    let manifest_path = config.site.asset_manifest_path(out_dir);
    let manifest = AssetManifest::load(&manifest_path)?;

    let package_pages = build
        .pages
        .iter()
        .map(|page| package_path(out_dir, &content_dir, page))
        .collect::<Result<Vec<String>>>()?;
    let assets = package::collect_assets(&manifest, &package_pages);

    let data = PackageData {
        title: config.metadata.title.clone(),
        language: config.metadata.language.clone(),
        assets,
        pages: package_pages,
    };
    write::write_rendered(
        &package::package_template(),
        &data,
        &out_dir.join("content.opf"),
    )?;

    Ok(ScaffoldStats {
        epub_root: epub_root.to_path_buf(),
        page_count: data.pages.len(),
        asset_count: data.assets.len(),
        failed_pages: failures.len(),
    })
}

/// Convert a page's filesystem path into its package-root-relative form
/// with a leading separator, e.g. `/OEBPS/guide/index.html`.
fn package_path(out_dir: &Path, content_dir: &str, page: &Path) -> Result<String> {
    let rel = page.strip_prefix(out_dir).with_context(|| {
        format!(
            "Page {} is not under the output directory {}",
            page.display(),
            out_dir.display()
        )
    })?;

    let mut path = format!("/{}", content_dir);
    for component in rel.components() {
        path.push('/');
        path.push_str(&component.as_os_str().to_string_lossy());
    }
    Ok(path)
}
