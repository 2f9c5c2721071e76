//! Package-document (content.opf) assembly.
//!
//! Builds the flat list of manifest assets from the bundler manifest plus
//! the rendered pages, and renders the OPF package document: `<metadata>`
//! with the configured title, `<manifest>` with one `<item>` per asset, and
//! `<spine>` with one `<itemref>` per page in reading order.
//!
//! The spine references pages by base name and manifest ids carry an `a-`
//! prefix, matching the layout readers of these packages already expect.

use crate::assets::{AssetManifest, ManifestAsset};
use crate::template::Template;

/// Everything the package template interpolates.
pub struct PackageData {
    /// Title for `dc:title`; escaped at the slot before interpolation.
    pub title: String,
    /// Language code for the package's `xml:lang` attribute.
    pub language: String,
    /// Manifest rows, bundler assets first, then pages.
    pub assets: Vec<ManifestAsset>,
    /// Package-root-relative page paths (leading separator), in reading
    /// order.
    pub pages: Vec<String>,
}

/// Flatten the bundler manifest, drop files with unmapped extensions, and
/// append every rendered page as an asset of its own.
pub fn collect_assets(manifest: &AssetManifest, pages: &[String]) -> Vec<ManifestAsset> {
    manifest
        .emitted_files()
        .filter_map(ManifestAsset::from_path)
        .chain(pages.iter().filter_map(|page| ManifestAsset::from_path(page)))
        .collect()
}

/// The content.opf document template.
pub fn package_template() -> Template<PackageData> {
    Template::new()
        .text(r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?><package xmlns="http://www.idpf.org/2007/opf" prefix="ibooks: http://vocabulary.itunes.apple.com/rdf/ibooks/vocabulary-extensions-1.0/ rdf: http://www.w3.org/1999/02/22-rdf-syntax-ns#" unique-identifier="isbn" version="3.0" xml:lang=""#)
        .slot(|d: &PackageData| d.language.clone())
        .text(r#""><metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>"#)
        .slot(|d: &PackageData| html_escape::encode_text(&d.title).into_owned())
        .text("</dc:title></metadata><manifest>")
        .slot(|d: &PackageData| {
            d.assets
                .iter()
                .map(|asset| {
                    format!(
                        r#"<item href="{}" id="a-{}" media-type="{}"/>"#,
                        asset.href, asset.id, asset.media_type
                    )
                })
                .collect()
        })
        .text(r#"</manifest><spine toc="toc">"#)
        .slot(|d: &PackageData| {
            d.pages
                .iter()
                .map(|page| format!(r#"<itemref idref="{}"/>"#, base_name(page)))
                .collect()
        })
        .text("</spine></package>")
}

/// The final path segment of a slash-separated package path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<String> {
        vec!["/out/ch1.html".to_string(), "/out/ch2.html".to_string()]
    }

    #[test]
    fn collects_bundle_assets_and_pages() {
        let json = r#"{"app":{"js":["/out/app.js"],"css":["/out/app.css"]}}"#;
        let manifest: AssetManifest = serde_json::from_str(json).expect("can parse");

        let assets = collect_assets(&manifest, &pages());
        let hrefs: Vec<&str> = assets.iter().map(|a| a.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["out/app.css", "out/app.js", "out/ch1.html", "out/ch2.html"]
        );
    }

    #[test]
    fn excludes_unmapped_extensions_from_manifest() {
        let json = r#"{"app":{"js":["/out/app.js","/out/app.js.map"],"wasm":["/out/app.wasm"]}}"#;
        let manifest: AssetManifest = serde_json::from_str(json).expect("can parse");

        let assets = collect_assets(&manifest, &[]);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].href, "out/app.js");
    }

    #[test]
    fn spine_lists_every_page_once_in_order() {
        let json = r#"{"app":{"css":["/out/app.css"]}}"#;
        let manifest: AssetManifest = serde_json::from_str(json).expect("can parse");
        let pages = pages();

        let data = PackageData {
            title: "Guide".to_string(),
            language: "en".to_string(),
            assets: collect_assets(&manifest, &pages),
            pages,
        };
        let opf = package_template().render(&data);

        assert_eq!(opf.matches(r#"<itemref idref="ch1.html"/>"#).count(), 1);
        assert_eq!(opf.matches(r#"<itemref idref="ch2.html"/>"#).count(), 1);
        let ch1 = opf.find(r#"<itemref idref="ch1.html"/>"#).unwrap();
        let ch2 = opf.find(r#"<itemref idref="ch2.html"/>"#).unwrap();
        assert!(ch1 < ch2);
    }

    #[test]
    fn renders_items_with_href_id_and_media_type() {
        let json = r#"{"app":{"css":["/out/app.css"]}}"#;
        let manifest: AssetManifest = serde_json::from_str(json).expect("can parse");
        let pages = pages();

        let data = PackageData {
            title: "Guide".to_string(),
            language: "en".to_string(),
            assets: collect_assets(&manifest, &pages),
            pages,
        };
        let opf = package_template().render(&data);

        assert!(opf.contains(r#"<item href="out/app.css" id="a-app.css" media-type="text/css"/>"#));
        assert!(opf.contains(
            r#"<item href="out/ch1.html" id="a-ch1.html" media-type="application/xhtml+xml"/>"#
        ));
    }

    #[test]
    fn escapes_the_title() {
        let data = PackageData {
            title: "Tom & Jerry <Guide>".to_string(),
            language: "en".to_string(),
            assets: Vec::new(),
            pages: Vec::new(),
        };
        let opf = package_template().render(&data);
        assert!(opf.contains("<dc:title>Tom &amp; Jerry &lt;Guide&gt;</dc:title>"));
    }
}
