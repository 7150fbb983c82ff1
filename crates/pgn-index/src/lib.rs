//! # Chess PGN Index
//!
//! File-backed index of game offsets and header tags for PGN archives.
//!
//! ## Pipeline
//!
//! ```text
//! archive.pgn
//!     │
//!     ├──> Scanner (one forward pass, line by line)
//!     │      ├─ [Tag "Value"] lines ─> GameHeaderBag
//!     │      └─ other lines ─> commit (offset, headers)
//!     │
//!     └──> PgnIndex
//!            ├─ games: Vec<GameEntry>
//!            └─ watermark: size + mtime at scan time
//! ```
//!
//! Movetext is never parsed; a game's offset is where a reader resumes streaming it.
//!
//! ## Example
//!
//! ```no_run
//! use chess_pgn_index::PgnIndex;
//!
//! fn main() -> chess_pgn_index::Result<()> {
//!     let mut index = PgnIndex::open("games.pgn")?;
//!     if !index.is_valid() {
//!         index = PgnIndex::open(index.path())?;
//!     }
//!
//!     for game in &index {
//!         println!("{} @ {}", game.headers.get("Event")?, game.offset);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod header_bag;
mod pgn_index;
mod scanner;
mod staleness;

pub use error::{PgnIndexError, Result};
pub use header_bag::GameHeaderBag;
pub use pgn_index::PgnIndex;
pub use scanner::GameEntry;
pub use staleness::{assess_staleness, FileWatermark, StaleAssessment, StaleReason};
