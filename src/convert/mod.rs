//! Batch presentation conversion
//!
//! Runs an external converter over one `.pptx` file or a directory of them.
//! Each presentation becomes a ZIP bundle next to the source with `index.html`
//! as the entry point. Unlike the assignment pipeline, conversion keeps going
//! past per-file failures and lists them in the final summary.

use crate::error::{Error, Result};
use crate::subprocess::{ProcessCommand, ProcessRunner};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<PathBuf>,
}

/// Fixed converter argument set: solid single-page output, zipped next to the
/// source, full-width, original image quality, no player skin.
pub fn converter_args(pptx: &Path, archive: &Path, html: &Path) -> Vec<String> {
    vec![
        "h".into(),
        "-f".into(),
        "solid".into(),
        "-z".into(),
        "-zof".into(),
        archive.to_string_lossy().into_owned(),
        "-fw".into(),
        "-piq".into(),
        "0".into(),
        "-giq".into(),
        "0".into(),
        "--advanced-smart-art-processing".into(),
        "-om".into(),
        "on".into(),
        "--skin".into(),
        "none".into(),
        "-v".into(),
        pptx.to_string_lossy().into_owned(),
        html.to_string_lossy().into_owned(),
    ]
}

fn is_pptx(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "pptx")
}

fn collect_presentations(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_pptx(path))
            .collect();
        files.sort();
        Ok(files)
    } else if input.is_file() && is_pptx(input) {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(Error::Convert(format!(
            "unsupported input '{}': expected a .pptx file or a directory",
            input.display()
        )))
    }
}

async fn convert_one(
    runner: &dyn ProcessRunner,
    converter: &Path,
    pptx: &Path,
    index: usize,
    total: usize,
) -> Result<bool> {
    let base_dir = pptx.parent().unwrap_or(Path::new("."));
    let stem = pptx
        .file_stem()
        .ok_or_else(|| Error::Convert(format!("no file stem: {}", pptx.display())))?;
    let archive = base_dir.join(format!("{}.zip", stem.to_string_lossy()));
    // The converter always names the main page index.html.
    let html = base_dir.join("index.html");

    println!("\n---{index}/{total}--------------------------");
    println!("Processing file: {}", pptx.display());

    let command = ProcessCommand::new(converter.to_string_lossy().into_owned())
        .args(converter_args(pptx, &archive, &html));
    let output = runner
        .run(command)
        .await
        .map_err(|e| Error::Convert(e.to_string()))?;

    if output.status.success() {
        println!(
            "Successfully converted: {} to {}",
            pptx.display(),
            archive.display()
        );
        println!(" - Processing time: {:.2} seconds", output.duration.as_secs_f64());
        info!("converted {} in {:?}", pptx.display(), output.duration);
        Ok(true)
    } else {
        warn!(
            "converter exited with {:?} for {}",
            output.status.code(),
            pptx.display()
        );
        println!("Error converting {}:", pptx.display());
        println!(" - Exit Code: {:?}", output.status.code());
        println!(" - Stderr: {}", output.stderr.trim());
        Ok(false)
    }
}

/// Convert a `.pptx` file, or every `.pptx` in a directory, continuing past
/// per-file failures.
pub async fn convert_path(
    runner: &dyn ProcessRunner,
    converter: &Path,
    input: &Path,
) -> Result<ConversionSummary> {
    if !converter.is_file() {
        return Err(Error::Environment(format!(
            "converter executable '{}' does not exist",
            converter.display()
        )));
    }
    if !input.exists() {
        return Err(Error::Environment(format!(
            "input path '{}' does not exist",
            input.display()
        )));
    }

    let presentations = collect_presentations(input)?;
    let mut summary = ConversionSummary {
        total: presentations.len(),
        ..Default::default()
    };

    for (index, pptx) in presentations.iter().enumerate() {
        if convert_one(runner, converter, pptx, index + 1, summary.total).await? {
            summary.succeeded += 1;
        } else {
            summary.failed.push(pptx.clone());
        }
    }

    println!("\n--- Conversion Summary ---");
    println!("Total files processed: {}", summary.total);
    println!("Successfully converted: {}", summary.succeeded);
    if summary.failed.is_empty() {
        println!("No errors encountered.");
    } else {
        println!("Files with errors ({}):", summary.failed.len());
        for path in &summary.failed {
            println!(" - {}", path.display());
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::MockProcessRunner;

    fn fake_converter(dir: &Path) -> PathBuf {
        let path = dir.join("converter");
        std::fs::write(&path, "").unwrap();
        path
    }

    #[tokio::test]
    async fn converts_every_presentation_in_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let converter = fake_converter(dir.path());
        std::fs::write(dir.path().join("a.pptx"), "").unwrap();
        std::fs::write(dir.path().join("b.pptx"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let runner = MockProcessRunner::new();
        let summary = convert_path(&runner, &converter, dir.path()).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 2);
        assert!(summary.failed.is_empty());
        assert_eq!(runner.call_history().len(), 2);
    }

    #[tokio::test]
    async fn continues_past_a_failing_file() {
        let dir = tempfile::tempdir().unwrap();
        let converter = fake_converter(dir.path());
        std::fs::write(dir.path().join("a.pptx"), "").unwrap();
        std::fs::write(dir.path().join("b.pptx"), "").unwrap();

        let runner = MockProcessRunner::new();
        runner.queue_failure(1, "cannot open");
        let summary = convert_path(&runner, &converter, dir.path()).await.unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, vec![dir.path().join("a.pptx")]);
        assert_eq!(runner.call_history().len(), 2);
    }

    #[tokio::test]
    async fn archive_lands_next_to_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let converter = fake_converter(dir.path());
        let pptx = dir.path().join("deck.pptx");
        std::fs::write(&pptx, "").unwrap();

        let runner = MockProcessRunner::new();
        convert_path(&runner, &converter, &pptx).await.unwrap();

        let call = &runner.call_history()[0];
        let zip = dir.path().join("deck.zip");
        assert!(call.args.contains(&zip.to_string_lossy().into_owned()));
        assert_eq!(call.args[0], "h");
    }

    #[tokio::test]
    async fn rejects_non_pptx_single_files() {
        let dir = tempfile::tempdir().unwrap();
        let converter = fake_converter(dir.path());
        let doc = dir.path().join("deck.pdf");
        std::fs::write(&doc, "").unwrap();

        assert!(convert_path(&MockProcessRunner::new(), &converter, &doc)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn missing_converter_fails_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pptx"), "").unwrap();

        let runner = MockProcessRunner::new();
        let result = convert_path(&runner, Path::new("/missing/conv"), dir.path()).await;
        assert!(result.is_err());
        assert!(runner.call_history().is_empty());
    }
}
