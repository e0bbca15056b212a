#![forbid(unsafe_code)]

//! Scores: a capacity-bounded, time-ranked record list with persistence.
//!
//! # Role in knoblock
//! The engine reports a completion time; whoever hosts the puzzle pushes
//! it here. The board keeps at most [`MAX_RECORDS`] records, sorted
//! ascending by seconds (lower is better), truncating on insert.
//!
//! # On-disk format
//! Explicit little-endian fixed layout, independent of native struct
//! packing:
//!
//! ```text
//! count:   u64 LE
//! records: count × { seconds: u32 LE, name: [u8; 28] NUL-padded }
//! ```
//!
//! # Failure Modes
//!
//! - Missing file on first run is expected steady-state: `load` returns
//!   `Err` and the in-memory list is left untouched; the puzzle stays
//!   playable without persisted scores.
//! - A short or lying file (declared count exceeding the payload) is
//!   rejected as [`ScoreError::Corrupt`] before anything is replaced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Maximum number of persisted records.
pub const MAX_RECORDS: usize = 10;
/// Maximum stored name length, in bytes.
pub const MAX_NAME_BYTES: usize = 27;

/// On-disk name field width: name bytes plus at least one NUL.
const NAME_FIELD_BYTES: usize = MAX_NAME_BYTES + 1;
/// On-disk size of one record.
const RECORD_BYTES: usize = 4 + NAME_FIELD_BYTES;

/// One completed game: time taken and who did it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Completion time in whole seconds. Always positive.
    pub seconds: u32,
    /// Player name, at most [`MAX_NAME_BYTES`] bytes.
    pub name: String,
}

/// The high-score table, backed by one file.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    path: PathBuf,
    records: Vec<ScoreRecord>,
}

impl ScoreBoard {
    /// Create an empty board persisted at `path`. Nothing is read until
    /// [`ScoreBoard::load`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record at `index` (0 = best time).
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn record(&self, index: usize) -> &ScoreRecord {
        &self.records[index]
    }

    /// Iterate records, best time first.
    pub fn iter(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter()
    }

    /// Insert a completion record, keeping the list sorted ascending by
    /// seconds and truncated to [`MAX_RECORDS`].
    ///
    /// The name is clamped to [`MAX_NAME_BYTES`] on a UTF-8 boundary.
    /// Ties sort after existing records (stable insert).
    ///
    /// # Panics
    /// Panics if `seconds` is zero or `name` is empty — nobody solves a
    /// puzzle in zero time, and an empty name is a caller bug.
    pub fn add_record(&mut self, seconds: u32, name: &str) {
        assert!(seconds > 0, "a completion time must be positive");
        assert!(!name.is_empty(), "a record needs a name");

        self.records.push(ScoreRecord {
            seconds,
            name: clamp_name(name).to_owned(),
        });
        self.records.sort_by_key(|record| record.seconds);
        self.records.truncate(MAX_RECORDS);
    }

    /// Write the table to the backing file.
    pub fn save(&self) -> Result<(), ScoreError> {
        let mut bytes = Vec::with_capacity(8 + self.records.len() * RECORD_BYTES);
        bytes.extend_from_slice(&(self.records.len() as u64).to_le_bytes());
        for record in &self.records {
            bytes.extend_from_slice(&record.seconds.to_le_bytes());
            let mut name = [0u8; NAME_FIELD_BYTES];
            name[..record.name.len()].copy_from_slice(record.name.as_bytes());
            bytes.extend_from_slice(&name);
        }
        fs::write(&self.path, bytes).map_err(|err| {
            warn!(path = %self.path.display(), %err, "score save failed");
            ScoreError::Io(err)
        })
    }

    /// Read the table from the backing file, replacing the in-memory list
    /// only on success.
    ///
    /// A missing file is reported as `Err(ScoreError::Io)` with
    /// `ErrorKind::NotFound` — expected on first run, and the current
    /// list (typically empty) survives untouched.
    pub fn load(&mut self) -> Result<(), ScoreError> {
        let bytes = fs::read(&self.path).map_err(|err| {
            // A missing file on first run is steady-state, not a fault.
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), %err, "score load failed");
            }
            ScoreError::Io(err)
        })?;
        self.records = parse(&bytes).inspect_err(|err| {
            warn!(path = %self.path.display(), %err, "score load failed");
        })?;
        Ok(())
    }
}

/// Clamp a name to [`MAX_NAME_BYTES`], never splitting a UTF-8 sequence.
fn clamp_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_BYTES {
        return name;
    }
    let mut end = MAX_NAME_BYTES;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn parse(bytes: &[u8]) -> Result<Vec<ScoreRecord>, ScoreError> {
    let header: [u8; 8] = bytes
        .get(..8)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(ScoreError::Corrupt("missing record count"))?;
    let count = u64::from_le_bytes(header) as usize;

    // Validate the declared count against the payload before allocating.
    let payload = &bytes[8..];
    if payload.len() / RECORD_BYTES < count {
        return Err(ScoreError::Corrupt("record count exceeds payload"));
    }

    let mut records = Vec::with_capacity(count);
    for chunk in payload.chunks_exact(RECORD_BYTES).take(count) {
        let seconds = u32::from_le_bytes(
            chunk[..4]
                .try_into()
                .expect("chunk is exactly one record wide"),
        );
        let name_field = &chunk[4..];
        let name_len = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_BYTES)
            .min(MAX_NAME_BYTES);
        // Lossy decoding can grow the name: each invalid byte becomes the
        // 3-byte U+FFFD. Re-clamp so a loaded record always satisfies the
        // name-length bound and the next save cannot overflow its field.
        let decoded = String::from_utf8_lossy(&name_field[..name_len]);
        let name = clamp_name(&decoded).to_owned();
        records.push(ScoreRecord { seconds, name });
    }
    Ok(records)
}

/// Errors raised by score persistence.
#[derive(Debug)]
pub enum ScoreError {
    /// The backing file could not be read or written.
    Io(io::Error),
    /// The backing file does not follow the record layout.
    Corrupt(&'static str),
}

impl From<io::Error> for ScoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "score file error: {err}"),
            Self::Corrupt(what) => write!(f, "score file corrupt: {what}"),
        }
    }
}

impl std::error::Error for ScoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_at(dir: &tempfile::TempDir) -> ScoreBoard {
        ScoreBoard::new(dir.path().join("scores"))
    }

    #[test]
    fn records_sort_ascending_and_truncate_to_ten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);

        for seconds in (1..=11).rev() {
            board.add_record(seconds * 10, "player");
        }

        assert_eq!(board.len(), MAX_RECORDS);
        let times: Vec<u32> = board.iter().map(|r| r.seconds).collect();
        assert_eq!(times, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        // The worst time fell off the table.
        assert!(board.iter().all(|r| r.seconds <= 100));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);
        board.add_record(30, "first");
        board.add_record(30, "second");
        board.add_record(10, "best");

        assert_eq!(board.record(0).name, "best");
        assert_eq!(board.record(1).name, "first");
        assert_eq!(board.record(2).name, "second");
    }

    #[test]
    fn save_load_round_trips_identically() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);
        board.add_record(125, "ada");
        board.add_record(17, "grace");
        board.add_record(60, "edsger");
        board.save().expect("save");

        let mut reloaded = board_at(&dir);
        reloaded.load().expect("load");
        assert_eq!(reloaded.len(), 3);
        let pairs: Vec<(u32, &str)> = reloaded
            .iter()
            .map(|r| (r.seconds, r.name.as_str()))
            .collect();
        assert_eq!(pairs, vec![(17, "grace"), (60, "edsger"), (125, "ada")]);
    }

    #[test]
    fn load_missing_file_leaves_board_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);
        board.add_record(42, "keep me");

        let err = board.load().unwrap_err();
        assert!(matches!(
            err,
            ScoreError::Io(ref e) if e.kind() == io::ErrorKind::NotFound
        ));
        assert_eq!(board.len(), 1);
        assert_eq!(board.record(0).name, "keep me");
    }

    #[test]
    fn load_rejects_short_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores");
        fs::write(&path, [1, 2, 3]).expect("write");

        let mut board = ScoreBoard::new(path);
        assert!(matches!(board.load(), Err(ScoreError::Corrupt(_))));
    }

    #[test]
    fn load_rejects_lying_record_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1000u64.to_le_bytes());
        bytes.extend_from_slice(&[0u8; RECORD_BYTES]); // one record's worth
        fs::write(&path, bytes).expect("write");

        let mut board = ScoreBoard::new(path);
        assert!(matches!(board.load(), Err(ScoreError::Corrupt(_))));
        assert!(board.is_empty());
    }

    #[test]
    fn load_clamps_non_utf8_name_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&[0xFF; NAME_FIELD_BYTES]);
        fs::write(&path, bytes).expect("write");

        let mut board = ScoreBoard::new(path);
        board.load().expect("load");

        // Each invalid byte decodes to the 3-byte U+FFFD; the name must
        // still respect the length bound after decoding.
        assert_eq!(board.len(), 1);
        assert!(board.record(0).name.len() <= MAX_NAME_BYTES);
        assert_eq!(board.record(0).name, "\u{FFFD}".repeat(9));

        // And the re-clamped record must fit its field on the way back out.
        board.save().expect("save");
        let mut reloaded = ScoreBoard::new(board.path().to_path_buf());
        reloaded.load().expect("reload");
        assert_eq!(reloaded.record(0).name, board.record(0).name);
    }

    #[test]
    fn long_names_clamp_on_utf8_boundary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);

        // 26 ASCII bytes then a 2-byte char straddling the 27-byte limit.
        let name = format!("{}é!", "x".repeat(26));
        board.add_record(5, &name);
        assert_eq!(board.record(0).name, "x".repeat(26));
        assert!(board.record(0).name.len() <= MAX_NAME_BYTES);

        board.save().expect("save");
        let mut reloaded = board_at(&dir);
        reloaded.load().expect("load");
        assert_eq!(reloaded.record(0).name, "x".repeat(26));
    }

    #[test]
    fn max_length_name_survives_the_name_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);
        let name = "n".repeat(MAX_NAME_BYTES);
        board.add_record(9, &name);
        board.save().expect("save");

        let mut reloaded = board_at(&dir);
        reloaded.load().expect("load");
        assert_eq!(reloaded.record(0).name, name);
    }

    #[test]
    #[should_panic(expected = "completion time must be positive")]
    fn zero_seconds_panics() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);
        board.add_record(0, "cheater");
    }

    #[test]
    #[should_panic(expected = "record needs a name")]
    fn empty_name_panics() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = board_at(&dir);
        board.add_record(1, "");
    }
}
