//*** START FILE: src/batch.rs ***//
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::pipeline::Simplifier;

use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct BatchArgs {
    /// Text file naming one input document per line.
    pub list_path: PathBuf,
    pub out_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<PathBuf>,
    /// Inputs that could not be simplified, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Reads the list file. Blank lines and `#` comments are ignored; relative
/// paths are taken relative to the list file.
pub fn read_input_list(list_path: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(list_path)
        .map_err(|e| Error::Io(std::io::Error::new(e.kind(), format!("{:?}: {}", list_path, e))))?;
    let base = list_path.parent().unwrap_or_else(|| Path::new(""));
    let mut inputs = Vec::new();
    for line_result in BufReader::new(file).lines() {
        let line = line_result?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        let path = Path::new(entry);
        inputs.push(if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        });
    }
    Ok(inputs)
}

/// `chapter1.txt` becomes `<out_dir>/chapter1.simple.txt`.
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    out_dir.join(format!("{}.simple.txt", stem))
}

/// Simplifies every listed document. One bad document is recorded and
/// skipped; only list or output-directory problems fail the run.
pub fn run_batch(simplifier: &Simplifier, config: &PipelineConfig, args: &BatchArgs) -> Result<BatchReport> {
    let inputs = read_input_list(&args.list_path)?;
    fs::create_dir_all(&args.out_dir)?;
    log::info!(
        "[Batch] {} documents listed in {:?}",
        inputs.len(),
        args.list_path
    );

    let mut report = BatchReport::default();
    for input in inputs {
        match simplify_file(simplifier, config, &input, &args.out_dir) {
            Ok(out_path) => {
                log::info!("[Batch] {:?} -> {:?}", input, out_path);
                report.processed.push(input);
            }
            Err(e) => {
                log::warn!("[Batch] Skipping {:?}: {}", input, e);
                report.skipped.push((input, e.to_string()));
            }
        }
    }
    Ok(report)
}

fn simplify_file(simplifier: &Simplifier, config: &PipelineConfig, input: &Path, out_dir: &Path) -> Result<PathBuf> {
    let raw = fs::read_to_string(input)?;
    let text = simplifier.simplify_text(&raw, config)?;
    let out_path = output_path_for(input, out_dir);
    fs::write(&out_path, text)?;
    Ok(out_path)
}

//*** END FILE: src/batch.rs ***//
