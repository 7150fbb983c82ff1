use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Size and modification time of an archive, as observed when it was indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileWatermark {
    pub file_size: u64,
    pub last_write_time: SystemTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    Missing,
    NotAFile,
    MetadataUnavailable,
    SizeChanged,
    ModifiedTimeChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct StaleAssessment {
    pub stale: bool,
    pub reasons: Vec<StaleReason>,
}

impl StaleAssessment {
    fn from_reasons(reasons: Vec<StaleReason>) -> Self {
        Self {
            stale: !reasons.is_empty(),
            reasons,
        }
    }
}

/// Re-stat `path` and compare against the watermark taken at scan time.
///
/// Every filesystem error is folded into a reason; this never fails.
#[must_use]
pub fn assess_staleness(path: &Path, indexed: &FileWatermark) -> StaleAssessment {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return StaleAssessment::from_reasons(vec![StaleReason::Missing]);
        }
        Err(_) => return StaleAssessment::from_reasons(vec![StaleReason::MetadataUnavailable]),
    };

    if meta.is_dir() {
        return StaleAssessment::from_reasons(vec![StaleReason::NotAFile]);
    }

    let mut reasons = Vec::new();
    if meta.len() != indexed.file_size {
        reasons.push(StaleReason::SizeChanged);
    }
    match meta.modified() {
        Ok(modified) if modified != indexed.last_write_time => {
            reasons.push(StaleReason::ModifiedTimeChanged);
        }
        Ok(_) => {}
        Err(_) => reasons.push(StaleReason::MetadataUnavailable),
    }

    StaleAssessment::from_reasons(reasons)
}
