use crate::error::EngineError;
use crate::model::RawPlayEvent;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const HISTORY_PREFIX: &str = "StreamingHistory";
const HISTORY_EXTENSION: &str = ".json";

pub fn find_history_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() && is_history_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_history_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name.strip_prefix(HISTORY_PREFIX)
        .and_then(|rest| rest.strip_suffix(HISTORY_EXTENSION))
        .is_some_and(|index| !index.is_empty() && index.chars().all(|ch| ch.is_ascii_digit()))
}

pub fn parse_batch(raw: &str, batch: usize) -> Result<Vec<RawPlayEvent>, EngineError> {
    let document: Value = serde_json::from_str(raw).map_err(|err| EngineError::MalformedBatch {
        batch,
        reason: err.to_string(),
    })?;
    let Value::Array(records) = document else {
        return Err(EngineError::MalformedBatch {
            batch,
            reason: String::from("expected a JSON array of plays"),
        });
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            RawPlayEvent::from_json(record).map_err(|err| EngineError::MalformedRecord {
                batch,
                index,
                field: err.field,
                reason: err.reason,
            })
        })
        .collect()
}

pub fn load_history_dir(dir: &Path) -> Result<Vec<Vec<RawPlayEvent>>> {
    let files = find_history_files(dir)?;
    if files.is_empty() {
        bail!(
            "no {HISTORY_PREFIX}N{HISTORY_EXTENSION} files found in {}",
            dir.display()
        );
    }

    let mut batches = Vec::with_capacity(files.len());
    for (batch, path) in files.iter().enumerate() {
        log::info!("matched input file {}", path.display());
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let records =
            parse_batch(&raw, batch).with_context(|| format!("failed to parse {}", path.display()))?;
        if records.is_empty() {
            log::warn!("{} contains no plays", path.display());
        }
        batches.push(records);
    }
    Ok(batches)
}
