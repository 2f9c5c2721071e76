//! File-writing helper for the scaffold artifacts.
//!
//! Every artifact write goes through here: the destination's parent
//! directories are created as needed and existing files are overwritten, so
//! re-running the scaffold is idempotent. Failures are propagated to the
//! caller with context rather than swallowed, so a failed write never
//! reports success.

use crate::template::Template;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write `contents` to `path`, creating any missing parent directories.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    println!("{} {} written", console::style("success").green(), name);
    Ok(())
}

/// Render a template against a data record and write the result to `path`.
pub fn write_rendered<T>(template: &Template<T>, data: &T, path: &Path) -> Result<()> {
    write_file(path, template.render(data).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_write_through_missing_directories() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("META-INF").join("deep").join("container.xml");

        write_file(&path, b"<container/>").expect("can write");
        assert_eq!(fs::read(&path).expect("can read back"), b"<container/>");
    }

    #[test]
    fn overwrites_existing_files() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("mimetype");

        write_file(&path, b"first").expect("can write");
        write_file(&path, b"second").expect("can rewrite");
        assert_eq!(fs::read(&path).expect("can read back"), b"second");
    }

    #[test]
    fn can_write_rendered_template() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("out.txt");
        let template = Template::new().text("title: ").slot(|d: &String| d.clone());

        write_rendered(&template, &"hello".to_string(), &path).expect("can write");
        assert_eq!(
            fs::read_to_string(&path).expect("can read back"),
            "title: hello"
        );
    }
}
