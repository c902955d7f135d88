//! Merge numbered HTML fragments into one viewer page
//!
//! Content bundles arrive as a directory of `N-Title.html` fragments. The
//! merged page embeds each fragment in an auto-resizing iframe via `srcdoc`,
//! which only requires quote escaping; the markup itself stays intact.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

const PAGE_STYLE: &str = r#"        body {
            font-family:Sans-Serif;
        }
        .content-block {
            margin: 0;
            padding: 20px;
            border: 1px solid #ccc;
            border-radius: 8px;
            display: block;
            overflow: hidden;
        }
        iframe {
            width: 100%;
            border: 0;
            display: block;
            overflow: hidden;
            scrollbar-width: none;
        }
        iframe::-webkit-scrollbar {
            display: none;
        }
        h2 {
            text-align: center;
            color: #1a73d9;
            border-top: 4px solid #1a73d9;
            margin-top: 40px;
            padding-top: 20px;
        }
"#;

const RESIZE_SCRIPT: &str = r#"        function resizeIframe(iframe) {
            iframe.style.height = (iframe.contentWindow.document.body.scrollHeight + 50) + 'px';
            setTimeout(function() {
                iframe.style.height = (iframe.contentWindow.document.body.scrollHeight + 50) + 'px';
            }, 500);
        }
"#;

/// One numbered fragment file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    number: u64,
    title: String,
    path: PathBuf,
}

/// Escape quotes so the fragment survives inside a `srcdoc` attribute.
fn escape_for_srcdoc(html: &str) -> String {
    html.replace('\'', "&#39;").replace('"', "&quot;")
}

/// Fragments carry a 20px body margin meant for standalone viewing; zero it
/// out before embedding.
fn normalize_margins(html: &str) -> String {
    let regex = Regex::new(r#"(<div style=")margin: 20px 20px;"#).expect("margin pattern");
    regex.replace_all(html, "${1}margin: 0;").into_owned()
}

fn collect_fragments(dir: &Path) -> Result<Vec<Fragment>> {
    let name_pattern = Regex::new(r"^(\d+).*\.html$").expect("fragment name pattern");
    let title_prefix = Regex::new(r"^\d+-").expect("title prefix pattern");

    let mut fragments = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(captures) = name_pattern.captures(&file_name) else {
            continue;
        };
        let number: u64 = captures[1]
            .parse()
            .map_err(|e| Error::Input(format!("fragment number in {file_name}: {e}")))?;
        let stem = file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(&file_name);
        let title = title_prefix.replace(stem, "").into_owned();
        fragments.push(Fragment {
            number,
            title,
            path: entry.path(),
        });
    }

    fragments.sort_by_key(|f| f.number);
    Ok(fragments)
}

/// Merge every numbered fragment in `dir` into `dir/index.html`.
///
/// Returns the output path and the number of fragments merged.
pub fn merge_directory(dir: &Path) -> Result<(PathBuf, usize)> {
    let fragments = collect_fragments(dir)?;
    if fragments.is_empty() {
        return Err(Error::Input(format!(
            "no numbered HTML fragments found in {}",
            dir.display()
        )));
    }

    let page_title = dir
        .file_name()
        .map(|n| n.to_string_lossy().replace('-', " "))
        .unwrap_or_default();

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang='fr'>\n<head>\n");
    page.push_str("    <meta charset='UTF-8'>\n");
    page.push_str("    <meta name='viewport' content='width=device-width, initial-scale=1.0'>\n");
    page.push_str(&format!("    <title>{page_title}</title>\n"));
    page.push_str("    <style>\n");
    page.push_str(PAGE_STYLE);
    page.push_str("    </style>\n    <script>\n");
    page.push_str(RESIZE_SCRIPT);
    page.push_str("    </script>\n</head>\n<body>\n");
    page.push_str(&format!(
        "    <h1 style=\"text-align:center;\">{page_title}</h1>\n"
    ));

    for fragment in &fragments {
        info!("merging fragment: {}", fragment.path.display());
        let html = std::fs::read_to_string(&fragment.path)?;
        let embedded = escape_for_srcdoc(&normalize_margins(&html));
        page.push_str(&format!(
            "    <h2>{}. {}</h2>\n\
                 <div class='content-block' style=\"margin: 0;\">\n\
                     <iframe srcdoc=\"{}\" onload=\"resizeIframe(this)\" style=\"width: 100%; border: 0;\"></iframe>\n\
                 </div>\n",
            fragment.number, fragment.title, embedded
        ));
    }

    page.push_str("</body>\n</html>\n");

    let output = dir.join("index.html");
    std::fs::write(&output, page)?;
    Ok((output, fragments.len()))
}
