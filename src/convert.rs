//! # Batch Conversion
//!
//! File and directory drivers for the three converters. Each file is
//! converted in memory and written through a temp file in the target
//! directory, so a failed conversion never leaves partial output.
//! Directory inputs fan out over a rayon pool; one file failing does not
//! stop the others.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::ConvertConfig;
use crate::model::{Annotation, Metadata, Sentence};
use crate::{exchange, penman, Error, Result};

// ============================================================================
// Direction
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    JsonToPenman,
    PenmanToJson,
    /// One record per sentence line, no graph yet.
    TextToJson,
}

impl Direction {
    /// Extension of the files picked up from a directory.
    pub fn input_extension(self) -> &'static str {
        match self {
            Direction::JsonToPenman => "json",
            Direction::PenmanToJson => "penman",
            Direction::TextToJson => "txt",
        }
    }

    /// Output file name for `input`: `x.json → x.penman`,
    /// `x.penman → x.json`, `x.txt → x.<annotator>.json`.
    pub fn output_name(self, input: &Path, annotator: &str) -> Result<String> {
        let stem = file_stem(input)?;
        Ok(match self {
            Direction::JsonToPenman => format!("{stem}.penman"),
            Direction::PenmanToJson => format!("{stem}.json"),
            Direction::TextToJson => format!("{stem}.{annotator}.json"),
        })
    }

    /// Convert file contents. `stem` names records imported from text.
    pub fn convert_str(self, input: &str, stem: &str, config: &ConvertConfig) -> Result<String> {
        match self {
            Direction::JsonToPenman => {
                let annotations = exchange::read_document(input)?;
                let mut out = Vec::new();
                let written = penman::write_document(
                    &mut out,
                    &annotations,
                    &config.serialize_options(),
                    config.keep_empty,
                )?;
                debug!(records = annotations.len(), written, "printed penman");
                String::from_utf8(out)
                    .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
            }
            Direction::PenmanToJson => {
                let annotations = penman::read_document(input)?;
                exchange::write_document(&annotations)
            }
            Direction::TextToJson => {
                let annotations = import_sentences(input, stem, &config.annotator);
                exchange::write_document(&annotations)
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::JsonToPenman => write!(f, "json-to-penman"),
            Direction::PenmanToJson => write!(f, "penman-to-json"),
            Direction::TextToJson => write!(f, "text-to-json"),
        }
    }
}

/// Records for a sentence-per-line file. Ids use the line index, so blank
/// lines are skipped without renumbering the rest.
pub fn import_sentences(text: &str, stem: &str, annotator: &str) -> Vec<Annotation> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            Annotation::new(Sentence::from_text(line)).with_metadata(Metadata {
                id: Some(format!("{stem}.{i}")),
                save_date: Some(today.clone()),
                annotator: Some(annotator.to_string()),
            })
        })
        .collect()
}

// ============================================================================
// Reports
// ============================================================================

/// A file that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    /// Stable error kind, see [`Error::kind`].
    pub kind: &'static str,
    pub message: String,
}

impl FileFailure {
    pub fn new(path: impl Into<PathBuf>, error: &Error) -> Self {
        Self { path: path.into(), kind: error.kind(), message: error.to_string() }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path.display(), self.kind, self.message)
    }
}

/// Outcome of converting a file or directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Output files, in input order.
    pub converted: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.converted.len() + self.failures.len()
    }

    fn record(&mut self, input: &Path, outcome: Result<PathBuf>) {
        match outcome {
            Ok(output) => self.converted.push(output),
            Err(e) => {
                warn!(path = %input.display(), kind = e.kind(), "conversion failed: {e}");
                self.failures.push(FileFailure::new(input, &e));
            }
        }
    }
}

// ============================================================================
// Drivers
// ============================================================================

/// Convert one file and return the path written.
///
/// `output` may name a directory (the file goes inside it under
/// [`Direction::output_name`]) or the output file itself. A path that
/// exists as a directory or ends with a separator is a directory and is
/// created if missing. Without it the file lands next to the input. A sentence file whose annotation already
/// exists is left alone: the existing file is returned untouched.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    direction: Direction,
    config: &ConvertConfig,
) -> Result<PathBuf> {
    let name = direction.output_name(input, &config.annotator)?;
    let target = match output {
        Some(path) if path.is_dir() || ends_with_separator(path) => path.join(name),
        Some(path) => path.to_path_buf(),
        None => parent_dir(input).join(name),
    };

    if direction == Direction::TextToJson && target.exists() {
        info!(path = %target.display(), "annotation exists, keeping it");
        return Ok(target);
    }

    let text = std::fs::read_to_string(input)?;
    let converted = direction.convert_str(&text, &file_stem(input)?, config)?;
    write_atomic(&target, converted.as_bytes())?;

    info!(input = %input.display(), output = %target.display(), %direction, "converted");
    Ok(target)
}

/// Convert a file, or every matching file of a directory.
///
/// For a directory input `output` is the output directory (created if
/// missing) and defaults to the input directory itself.
pub fn convert_path(
    input: &Path,
    output: Option<&Path>,
    direction: Direction,
    config: &ConvertConfig,
) -> BatchReport {
    let mut report = BatchReport::default();

    if !input.is_dir() {
        let outcome = if input.exists() {
            convert_file(input, output, direction, config)
        } else {
            Err(Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory")))
        };
        report.record(input, outcome);
        return report;
    }

    let out_dir = output.unwrap_or(input);
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        report.record(out_dir, Err(e.into()));
        return report;
    }

    let files = match list_inputs(input, direction) {
        Ok(files) => files,
        Err(e) => {
            report.record(input, Err(e));
            return report;
        }
    };
    info!(dir = %input.display(), files = files.len(), %direction, "converting directory");

    let run = || -> Vec<Result<PathBuf>> {
        files
            .par_iter()
            .map(|file| convert_file(file, Some(out_dir), direction, config))
            .collect()
    };
    let outcomes = match config.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!("cannot build a pool of {jobs} threads ({e}), using the global pool");
                run()
            }
        },
        None => run(),
    };

    for (file, outcome) in files.iter().zip(outcomes) {
        report.record(file, outcome);
    }
    report
}

/// Matching files directly inside `dir`, sorted by path.
fn list_inputs(dir: &Path, direction: Direction) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{escaped}/*.{}", direction.input_extension());
    let entries = glob::glob(&pattern).map_err(|e| Error::Config(format!("bad input pattern: {e}")))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = parent_dir(target);
    std::fs::create_dir_all(&dir)?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(target).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .chars()
        .next_back()
        .is_some_and(std::path::is_separator)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Config(format!("'{}' has no file name", path.display())))
}
