//! Rotating text files of search results.
//!
//! Every record is one line:
//!
//! ```text
//! 0,1,0,2,0,0,...,0,<visits>,<wins>
//! ```
//!
//! The prefix is the board after the move was played, the suffix the merged
//! visit count and win score of that move. Only searched moves are recorded;
//! a forced move has no statistics. Files are named
//! `<prefix><unix-millis>-<seq>.txt` and rotated once they reach the size
//! limit, so a long self-play run leaves a series of bounded files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

/// Writes dataset lines into size-bounded files.
///
/// No file is created until the first record. Call [`DatasetWriter::finish`]
/// to flush the open file and observe write errors; dropping the writer
/// flushes on a best-effort basis.
#[derive(Debug)]
pub struct DatasetWriter {
    dir: PathBuf,
    prefix: String,
    max_bytes: u64,
    current: Option<BufWriter<File>>,
    current_bytes: u64,
    files: Vec<PathBuf>,
    records: u64,
}

impl DatasetWriter {
    /// Create a writer. `max_bytes` of 0 puts each record in its own file.
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
            max_bytes,
            current: None,
            current_bytes: 0,
            files: Vec::new(),
            records: 0,
        }
    }

    /// Append one record.
    pub fn write_record(&mut self, key: &str, visits: u64, wins: f64) -> io::Result<()> {
        let line = format_record(key, visits, wins);

        if self.current.is_some() && self.current_bytes >= self.max_bytes {
            self.close_current()?;
        }

        if self.current.is_none() {
            self.open_next()?;
        }
        if let Some(file) = self.current.as_mut() {
            writeln!(file, "{line}")?;
        }

        self.current_bytes += line.len() as u64 + 1;
        self.records += 1;
        Ok(())
    }

    /// Flush and close the open file, if any.
    pub fn finish(&mut self) -> io::Result<()> {
        self.close_current()?;
        debug!(files = self.files.len(), records = self.records, "Dataset writer finished");
        Ok(())
    }

    /// Files created so far, oldest first.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Records written so far.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.records
    }

    fn open_next(&mut self) -> io::Result<()> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = self
            .dir
            .join(format!("{}{}-{}.txt", self.prefix, millis, self.files.len()));

        let file = File::create(&path)?;
        info!(path = %path.display(), "Opened dataset file");

        self.files.push(path);
        self.current = Some(BufWriter::new(file));
        self.current_bytes = 0;
        Ok(())
    }

    fn close_current(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.current.take() {
            file.flush()?;
        }
        Ok(())
    }
}

/// One dataset line without the trailing newline.
#[must_use]
pub fn format_record(key: &str, visits: u64, wins: f64) -> String {
    format!("{key}{visits},{wins:.1}")
}
