//! Batch Export/Import Drivers
//!
//! Moves whole collections between the JSON corpus and the guide tree.
//! Failures stay at single-record granularity: they are accumulated into
//! the run report and never abort the batch.
//!
//! Export writes strictly sequentially, one record at a time, then
//! regenerates the index. Import decoding fans out with rayon (each
//! document is independent) and reassembles results in lexicographic path
//! order so repeated runs are deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use thiserror::Error;
use walkdir::WalkDir;

use crate::codec::document::{self, DecodedDocument};
use crate::index;
use crate::layout;
use crate::model::Record;

/// Index artifact written at the guide tree root.
pub const INDEX_FILE_NAME: &str = "_index.json";

/// How many error messages a summary prints before eliding the rest.
pub const ERROR_PREVIEW_LIMIT: usize = 10;

/// Per-record failure taxonomy for batch runs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed document {path}: {message}")]
    MalformedDocument { path: String, message: String },
    #[error("record '{label}' has no company")]
    MissingCompany { label: String },
    #[error("io failure at {path}: {message}")]
    Io { path: String, message: String },
    #[cfg(feature = "fetch")]
    #[error("network failure for item {id}: {message}")]
    Network { id: u32, message: String },
}

/// Outcome of one export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: usize,
    /// Records excluded for having no company. Counted, not errored.
    pub skipped: Vec<CatalogError>,
    pub errors: Vec<CatalogError>,
    pub index_path: PathBuf,
}

/// Outcome of one import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub records: Vec<Record>,
    /// Guide files discovered under the tree.
    pub scanned: usize,
    /// Documents that decoded to a company-less record.
    pub skipped: Vec<CatalogError>,
    pub errors: Vec<CatalogError>,
    /// Documents that decoded with degradations (unknown keys, unparsed
    /// front matter). The partial record is still imported.
    pub advisories: Vec<CatalogError>,
}

/// Reset the owned output tree: delete it if present, then recreate it
/// empty. Idempotent. This is the single destructive step of an export
/// run and the caller decides which directory is owned.
pub fn reset_guide_tree(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to clear guide tree at {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create guide tree at {}", dir.display()))?;
    Ok(())
}

/// Write one document per record under `dir`, then regenerate the index
/// over the full input collection.
///
/// Records without a company are skipped and counted. Per-record I/O
/// failures are recorded and the batch continues. Records projecting to
/// the same path overwrite each other; the last write wins.
pub fn export_tree(records: &[Record], dir: &Path) -> Result<ExportReport> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create guide tree at {}", dir.display()))?;

    let mut report = ExportReport {
        index_path: dir.join(INDEX_FILE_NAME),
        ..ExportReport::default()
    };

    for record in records {
        if !record.has_company() {
            report.skipped.push(CatalogError::MissingCompany {
                label: record_label(record),
            });
            continue;
        }
        let relative = layout::path_for(record);
        match write_document(dir, &relative, record) {
            Ok(()) => report.written += 1,
            Err(err) => report.errors.push(CatalogError::Io {
                path: relative,
                message: err.to_string(),
            }),
        }
    }

    let catalog_index = index::build(records);
    let json =
        serde_json::to_string_pretty(&catalog_index).context("failed to serialize index")?;
    fs::write(&report.index_path, json)
        .with_context(|| format!("failed to write {}", report.index_path.display()))?;

    Ok(report)
}

/// Decode every guide document under `dir` back into records.
///
/// Documents are discovered by the `.md` convention; names starting with
/// `_` are reserved for artifacts like the index and ignored. Unreadable
/// files become per-path errors; undecodable content degrades to partial
/// records with advisories. Invalid UTF-8 is replaced, not fatal.
pub fn import_tree(dir: &Path) -> Result<ImportReport> {
    anyhow::ensure!(dir.is_dir(), "guide tree {} does not exist", dir.display());

    let mut report = ImportReport::default();
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let path = entry.into_path();
                if is_guide_file(&path) {
                    paths.push(path);
                }
            }
            Ok(_) => {}
            Err(err) => report.errors.push(CatalogError::Io {
                path: err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| dir.display().to_string()),
                message: err.to_string(),
            }),
        }
    }
    paths.sort();
    report.scanned = paths.len();

    let outcomes: Vec<(PathBuf, std::io::Result<DecodedDocument>)> = paths
        .into_par_iter()
        .map(|path| {
            let outcome = fs::read(&path)
                .map(|bytes| document::decode_document(&String::from_utf8_lossy(&bytes)));
            (path, outcome)
        })
        .collect();

    for (path, outcome) in outcomes {
        let relative = path
            .strip_prefix(dir)
            .unwrap_or(&path)
            .display()
            .to_string();
        match outcome {
            Ok(decoded) => {
                for advisory in &decoded.advisories {
                    report.advisories.push(CatalogError::MalformedDocument {
                        path: relative.clone(),
                        message: advisory.clone(),
                    });
                }
                if decoded.record.has_company() {
                    report.records.push(decoded.record);
                } else {
                    report.skipped.push(CatalogError::MissingCompany { label: relative });
                }
            }
            Err(err) => report.errors.push(CatalogError::Io {
                path: relative,
                message: err.to_string(),
            }),
        }
    }

    Ok(report)
}

/// First [`ERROR_PREVIEW_LIMIT`] error messages, plus an elision line when
/// there are more.
pub fn error_preview(errors: &[CatalogError]) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .iter()
        .take(ERROR_PREVIEW_LIMIT)
        .map(|err| err.to_string())
        .collect();
    if errors.len() > ERROR_PREVIEW_LIMIT {
        lines.push(format!("... {} more", errors.len() - ERROR_PREVIEW_LIMIT));
    }
    lines
}

fn write_document(dir: &Path, relative: &str, record: &Record) -> std::io::Result<()> {
    // join segment by segment; an empty category collapses instead of
    // producing an absolute path that would escape the tree
    let mut path = dir.to_path_buf();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, document::encode_document(record))
}

fn record_label(record: &Record) -> String {
    if record.id.trim().is_empty() {
        format!("{} / {}", record.category, record.product_type)
    } else {
        record.id.clone()
    }
}

fn is_guide_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".md") && !name.starts_with('_')
}
