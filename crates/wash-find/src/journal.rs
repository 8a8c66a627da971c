//! An append-only activity journal.
//!
//! `wash-find --journal PATH` records each query it runs. Journal failures
//! never abort a search; they are reported as warnings instead.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

pub trait Journal: Send + Sync {
    fn record(&self, message: &str) -> io::Result<()>;
}

/// A journal appending one line per record to a file.
#[derive(Debug)]
pub struct FileJournal {
    file: Mutex<File>,
}

impl FileJournal {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Journal for FileJournal {
    fn record(&self, message: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("journal lock poisoned"))?;
        writeln!(file, "{message}")
    }
}

/// Records `args` in `journal`, falling back to a warning.
pub fn log(journal: Option<&dyn Journal>, args: fmt::Arguments<'_>) {
    let message = args.to_string();
    let Some(journal) = journal else {
        log::warn!("Unable to log to journal: {message}");
        return;
    };
    if let Err(err) = journal.record(&message) {
        log::warn!("Unable to log to journal: {message}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_journal_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("find.log");
        let journal = FileJournal::open(&path).unwrap();
        log(Some(&journal), format_args!("first {}", 1));
        log(Some(&journal), format_args!("second"));
        drop(journal);

        let reopened = FileJournal::open(&path).unwrap();
        reopened.record("third").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first 1\nsecond\nthird\n");
    }

    #[test]
    fn missing_journal_is_not_an_error() {
        log(None, format_args!("nothing to see"));
    }
}
