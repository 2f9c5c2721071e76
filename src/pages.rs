//! Discovery and ordering of rendered site pages.
//!
//! The site generator drops `*.html` files all over the output directory.
//! The spine's reading order comes from the order pages are supplied, so
//! discovery must be deterministic: files sort before subdirectories at
//! each level, and `index.html` leads its siblings so every section starts
//! at its landing page.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Collect every rendered page under `out_dir`, in reading order.
pub fn discover_pages(out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in WalkBuilder::new(out_dir).standard_filters(false).build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", out_dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_some_and(|t| t.is_file())
            && path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("html"))
        {
            pages.push(path.to_path_buf());
        }
    }

    pages.sort_by(|a, b| {
        reading_order(
            a.strip_prefix(out_dir).unwrap_or(a),
            b.strip_prefix(out_dir).unwrap_or(b),
        )
    });
    Ok(pages)
}

/// Compare two pages by reading order: files before directories at each
/// level, `index.html` before its siblings, lexicographic otherwise.
pub fn reading_order(a: &Path, b: &Path) -> Ordering {
    let a: Vec<_> = a.components().collect();
    let b: Vec<_> = b.components().collect();

    let mut i = 0;
    loop {
        match (a.get(i), b.get(i)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let a_leaf = i + 1 == a.len();
                let b_leaf = i + 1 == b.len();

                if x == y {
                    if a_leaf && b_leaf {
                        return Ordering::Equal;
                    }
                    i += 1;
                    continue;
                }

                return match (a_leaf, b_leaf) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (true, true) => {
                        let x_is_index = x.as_os_str() == "index.html";
                        let y_is_index = y.as_os_str() == "index.html";
                        match (x_is_index, y_is_index) {
                            (true, false) => Ordering::Less,
                            (false, true) => Ordering::Greater,
                            _ => x.cmp(y),
                        }
                    }
                    (false, false) => x.cmp(y),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_sort_before_directories() {
        let mut paths = vec![
            PathBuf::from("guide/setup.html"),
            PathBuf::from("about.html"),
        ];
        paths.sort_by(|a, b| reading_order(a, b));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("about.html"),
                PathBuf::from("guide/setup.html"),
            ]
        );
    }

    #[test]
    fn index_leads_its_siblings() {
        let mut paths = vec![
            PathBuf::from("about.html"),
            PathBuf::from("index.html"),
            PathBuf::from("guide/setup.html"),
            PathBuf::from("guide/index.html"),
        ];
        paths.sort_by(|a, b| reading_order(a, b));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("index.html"),
                PathBuf::from("about.html"),
                PathBuf::from("guide/index.html"),
                PathBuf::from("guide/setup.html"),
            ]
        );
    }

    #[test]
    fn discovers_only_html_files() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        std::fs::write(dir.path().join("index.html"), "<html/>").expect("can write");
        std::fs::write(dir.path().join("app.css"), "body{}").expect("can write");
        std::fs::create_dir(dir.path().join("guide")).expect("can create dir");
        std::fs::write(dir.path().join("guide/setup.html"), "<html/>").expect("can write");

        let pages = discover_pages(dir.path()).expect("can discover");
        let names: Vec<PathBuf> = pages
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("index.html"), PathBuf::from("guide/setup.html")]
        );
    }
}
