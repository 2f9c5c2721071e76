//! In-place reformatting of rendered pages.
//!
//! The site generator emits XHTML-compatible markup on one long line. This
//! module re-indents it for the EPUB content documents: one tag per line,
//! two-space indentation, empty elements collapsed to self-closing form.
//! Text runs are copied verbatim and tags adjacent to text stay glued to
//! it, so whitespace the page depends on is never disturbed; `<pre>`,
//! `<textarea>`, `<script>`, and `<style>` subtrees pass through untouched.
//!
//! Pages are independent: they are reformatted in parallel and a failure on
//! one page is collected for reporting without aborting the others.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Elements whose content is whitespace-significant.
const PRESERVED: &[&str] = &["pre", "textarea", "script", "style"];

/// Reformat every page in place, in parallel.
///
/// Returns the pages that could not be reformatted, with their errors, so
/// the caller observes completion of the whole batch and decides how to
/// report the failures.
pub fn format_pages(
    pages: &[PathBuf],
    progress: &ProgressBar,
) -> Vec<(PathBuf, anyhow::Error)> {
    pages
        .par_iter()
        .filter_map(|page| {
            let outcome = format_page(page);
            progress.inc(1);
            outcome.err().map(|e| (page.clone(), e))
        })
        .collect()
}

/// Read a page, pretty-print it, and overwrite it in place.
pub fn format_page(page: &Path) -> Result<()> {
    let html = std::fs::read_to_string(page)
        .with_context(|| format!("Failed to read page {}", page.display()))?;
    let pretty = format_xhtml(&html)
        .with_context(|| format!("Failed to reformat page {}", page.display()))?;
    std::fs::write(page, pretty).with_context(|| format!("Failed to write page {}", page.display()))
}

/// Pretty-print an XHTML document.
pub fn format_xhtml(input: &str) -> Result<String> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().check_end_names = true;
    let mut events = Vec::new();
    loop {
        let position = reader.buffer_position();
        match reader
            .read_event()
            .with_context(|| format!("Malformed markup at byte {}", position))?
        {
            Event::Eof => break,
            event => events.push(event.into_owned()),
        }
    }
    Ok(render_events(&events))
}

/// Rebuild a start tag's interior (name plus attributes) from the event.
fn tag_interior(e: &BytesStart) -> String {
    let mut tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    for attr in e.attributes().flatten() {
        tag.push(' ');
        tag.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
        tag.push_str("=\"");
        tag.push_str(&String::from_utf8_lossy(&attr.value));
        tag.push('"');
    }
    tag
}

fn is_preserved(e: &BytesStart) -> bool {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
    PRESERVED.contains(&name.as_str())
}

fn break_line(out: &mut String, depth: usize) {
    if out.is_empty() {
        return;
    }
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn render_events(events: &[Event<'static>]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    // set while inside a whitespace-significant subtree; holds the depth at
    // which the subtree was entered
    let mut preserve_until: Option<usize> = None;
    // suppress the line break before the next tag (start of document, or the
    // previous output was inline text)
    let mut glue = false;

    let mut i = 0;
    while i < events.len() {
        let event = &events[i];

        if let Some(entry_depth) = preserve_until {
            match event {
                Event::Start(e) => {
                    out.push('<');
                    out.push_str(&tag_interior(e));
                    out.push('>');
                    depth += 1;
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    out.push_str("</");
                    out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                    out.push('>');
                    if depth == entry_depth {
                        preserve_until = None;
                        glue = false;
                    }
                }
                Event::Empty(e) => {
                    out.push('<');
                    out.push_str(&tag_interior(e));
                    out.push_str("/>");
                }
                Event::Text(e) => out.push_str(&String::from_utf8_lossy(e.as_ref())),
                Event::GeneralRef(e) => {
                    out.push('&');
                    out.push_str(&String::from_utf8_lossy(e.as_ref()));
                    out.push(';');
                }
                Event::CData(e) => {
                    out.push_str("<![CDATA[");
                    out.push_str(&String::from_utf8_lossy(e));
                    out.push_str("]]>");
                }
                Event::Comment(e) => {
                    out.push_str("<!--");
                    out.push_str(&String::from_utf8_lossy(e.as_ref()));
                    out.push_str("-->");
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        match event {
            Event::Start(e) => {
                // collapse <x></x> into <x/>
                if let Some(Event::End(end)) = events.get(i + 1) {
                    if end.name() == e.name() {
                        if !glue {
                            break_line(&mut out, depth);
                        }
                        out.push('<');
                        out.push_str(&tag_interior(e));
                        out.push_str("/>");
                        glue = false;
                        i += 2;
                        continue;
                    }
                }

                if !glue {
                    break_line(&mut out, depth);
                }
                out.push('<');
                out.push_str(&tag_interior(e));
                out.push('>');
                if is_preserved(e) {
                    preserve_until = Some(depth);
                }
                depth += 1;
                glue = false;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if !glue {
                    break_line(&mut out, depth);
                }
                out.push_str("</");
                out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                out.push('>');
                glue = false;
            }
            Event::Empty(e) => {
                if !glue {
                    break_line(&mut out, depth);
                }
                out.push('<');
                out.push_str(&tag_interior(e));
                out.push_str("/>");
                glue = false;
            }
            Event::Text(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                if text.trim().is_empty() {
                    // whitespace spanning lines is formatting noise; a bare
                    // run of spaces separates inline content and stays
                    if text.contains('\n') {
                        glue = false;
                    } else {
                        out.push_str(&text);
                        glue = true;
                    }
                } else {
                    out.push_str(&text);
                    glue = true;
                }
            }
            Event::GeneralRef(e) => {
                out.push('&');
                out.push_str(&String::from_utf8_lossy(e.as_ref()));
                out.push(';');
                glue = true;
            }
            Event::CData(e) => {
                out.push_str("<![CDATA[");
                out.push_str(&String::from_utf8_lossy(e));
                out.push_str("]]>");
                glue = true;
            }
            Event::Comment(e) => {
                if !glue {
                    break_line(&mut out, depth);
                }
                out.push_str("<!--");
                out.push_str(&String::from_utf8_lossy(e.as_ref()));
                out.push_str("-->");
                glue = false;
            }
            Event::Decl(e) => {
                out.push_str("<?xml version=\"");
                let version = e
                    .version()
                    .map(|v| String::from_utf8_lossy(&v).into_owned())
                    .unwrap_or_else(|_| "1.0".to_string());
                out.push_str(&version);
                out.push('"');
                if let Some(Ok(encoding)) = e.encoding() {
                    out.push_str(" encoding=\"");
                    out.push_str(&String::from_utf8_lossy(&encoding));
                    out.push('"');
                }
                if let Some(Ok(standalone)) = e.standalone() {
                    out.push_str(" standalone=\"");
                    out.push_str(&String::from_utf8_lossy(&standalone));
                    out.push('"');
                }
                out.push_str("?>");
                glue = false;
            }
            Event::DocType(e) => {
                if !glue {
                    break_line(&mut out, depth);
                }
                out.push_str("<!DOCTYPE ");
                out.push_str(String::from_utf8_lossy(e.as_ref()).trim());
                out.push('>');
                glue = false;
            }
            // processing instructions do not occur in generated pages
            Event::PI(_) | Event::Eof => {}
        }
        i += 1;
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
