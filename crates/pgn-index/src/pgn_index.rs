use crate::error::{PgnIndexError, Result};
use crate::header_bag::GameHeaderBag;
use crate::scanner::{scan_games, GameEntry};
use crate::staleness::{assess_staleness, FileWatermark, StaleAssessment};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// In-memory index of a PGN archive: one entry per game with headers.
///
/// Built by a single pass in [`PgnIndex::open`] and immutable afterwards. To pick up
/// changes to the archive, check [`PgnIndex::is_valid`] and open a new index.
#[derive(Debug, Clone)]
pub struct PgnIndex {
    path: PathBuf,
    watermark: FileWatermark,
    games: Vec<GameEntry>,
}

impl PgnIndex {
    /// Scan the archive at `path`.
    ///
    /// Fails if the path is missing, unreadable, a directory, or its metadata cannot be
    /// read. The file is closed before this returns on every path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let meta = std::fs::metadata(&path)?;
        if meta.is_dir() {
            return Err(PgnIndexError::InvalidPath(format!(
                "Path is a directory: {}",
                path.display()
            )));
        }
        let last_write_time = meta.modified()?;

        let mut reader = BufReader::new(File::open(&path)?);
        let games = scan_games(&mut reader)?;
        let file_size = reader.seek(SeekFrom::End(0))?;

        log::debug!(
            "Indexed {} games in {} ({} bytes)",
            games.len(),
            path.display(),
            file_size
        );

        Ok(Self {
            path,
            watermark: FileWatermark {
                file_size,
                last_write_time,
            },
            games,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Archive size in bytes at scan time.
    #[must_use]
    pub const fn file_size(&self) -> u64 {
        self.watermark.file_size
    }

    /// Archive modification time at scan time.
    #[must_use]
    pub const fn last_write_time(&self) -> SystemTime {
        self.watermark.last_write_time
    }

    #[must_use]
    pub const fn watermark(&self) -> &FileWatermark {
        &self.watermark
    }

    /// Number of indexed games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn game(&self, index: usize) -> Result<&GameEntry> {
        self.games.get(index).ok_or(PgnIndexError::GameNotFound {
            index,
            len: self.games.len(),
        })
    }

    pub fn game_headers(&self, index: usize) -> Result<&GameHeaderBag> {
        self.game(index).map(|entry| &entry.headers)
    }

    pub fn game_offset(&self, index: usize) -> Result<u64> {
        self.game(index).map(|entry| entry.offset)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEntry> {
        self.games.iter()
    }

    /// Open the archive positioned at the offset recorded for game `index`.
    ///
    /// Each call opens its own handle; the index itself never keeps the file open.
    pub fn open_game(&self, index: usize) -> Result<BufReader<File>> {
        let offset = self.game_offset(index)?;
        let mut reader = BufReader::new(File::open(&self.path)?);
        reader.seek(SeekFrom::Start(offset))?;
        Ok(reader)
    }

    #[must_use]
    pub fn assess_staleness(&self) -> StaleAssessment {
        let out = assess_staleness(&self.path, &self.watermark);
        if out.stale {
            log::debug!(
                "Index of {} is stale: {:?}",
                self.path.display(),
                out.reasons
            );
        }
        out
    }

    /// Whether the archive still has the size and modification time seen at scan time.
    ///
    /// Filesystem errors count as invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.assess_staleness().stale
    }
}

impl<'a> IntoIterator for &'a PgnIndex {
    type Item = &'a GameEntry;
    type IntoIter = std::slice::Iter<'a, GameEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
