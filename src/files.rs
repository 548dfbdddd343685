//! Circuit files on disk: locating them and evaluating their contents.

use crate::document::{evaluate_document, render_labels, EvalOptions, Outcome, OutcomeRecord};
use anyhow::{anyhow, Context, Result};
use glob::glob;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Evaluation results for every board in one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    path: &'a Path,
    #[serde(flatten)]
    outcome: OutcomeRecord,
}

impl FileReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Label lines for the file, `off`/`on` one per board.
    pub fn labels(&self) -> Result<String> {
        render_labels(&self.outcomes).with_context(|| format!("evaluating {}", self.path.display()))
    }

    /// One JSON object per board, newline separated.
    pub fn to_ndjson(&self) -> Result<String> {
        let mut lines = Vec::with_capacity(self.outcomes.len());
        for outcome in &self.outcomes {
            let line = ReportLine {
                path: &self.path,
                outcome: outcome.record(),
            };
            lines.push(serde_json::to_string(&line)?);
        }
        Ok(lines.join("\n"))
    }
}

fn is_pattern(input: &str) -> bool {
    input.contains(|c: char| matches!(c, '*' | '?' | '['))
}

/// Resolves command-line inputs to files.
///
/// Each input may hold several comma-separated entries; an entry with glob
/// metacharacters is expanded, anything else is taken as a path. The result
/// is sorted and free of duplicates.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for input in inputs {
        for entry in input.split(',') {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !is_pattern(trimmed) {
                paths.push(PathBuf::from(trimmed));
                continue;
            }
            let before = paths.len();
            for found in glob(trimmed).with_context(|| format!("bad pattern {trimmed:?}"))? {
                match found {
                    Ok(p) => paths.push(p),
                    Err(e) => warn!(error = %e, "skipping unreadable glob match"),
                }
            }
            debug!(pattern = trimmed, matched = paths.len() - before, "expanded pattern");
        }
    }
    paths.sort();
    paths.dedup();
    if paths.is_empty() {
        return Err(anyhow!("no circuit files matched {}", inputs.join(" ")));
    }
    Ok(paths)
}

pub fn read_circuit_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn evaluate_file(path: &Path, options: &EvalOptions) -> Result<FileReport> {
    let text = read_circuit_file(path)?;
    let outcomes = evaluate_document(&text, options);
    let report = FileReport {
        path: path.to_path_buf(),
        outcomes,
    };
    for outcome in &report.outcomes {
        if let Err(e) = &outcome.result {
            warn!(path = %path.display(), board = outcome.index, error = %e, "board could not be evaluated");
        }
    }
    info!(
        path = %path.display(),
        boards = report.outcomes.len(),
        failures = report.failures(),
        "evaluated circuit file"
    );
    Ok(report)
}
