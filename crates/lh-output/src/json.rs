//! JSON backend.
//!
//! The document goes to `<path>.tmp` first and is renamed over `<path>` once
//! fully flushed, so a failed run never leaves a truncated file behind.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{OutputDocument, OutputError, OutputResult};

/// Writes an [`OutputDocument`] to one JSON file.
pub struct JsonWriter {
    path:   PathBuf,
    pretty: bool,
}

impl JsonWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), pretty: true }
    }

    /// Single-line output instead of indented.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Sibling temp path: `routes.json` → `routes.json.tmp`.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Serialize `doc` and atomically replace the target file.
    pub fn write(&self, doc: &OutputDocument) -> OutputResult<()> {
        let tmp = self.temp_path();
        if let Err(e) = self.write_to(&tmp, doc) {
            // Best effort; the original error is what matters.
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &self.path).map_err(|source| OutputError::Io { path: self.path.clone(), source })?;
        log::info!(
            "wrote {} routes, {} timeline routes, {} timeline points, {} visits to {}",
            doc.routes.len(),
            doc.routes_timeline.len(),
            doc.timeline.len(),
            doc.visits.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_to(&self, tmp: &Path, doc: &OutputDocument) -> OutputResult<()> {
        let io_err = |source: std::io::Error| OutputError::Io { path: tmp.to_path_buf(), source };

        let file = File::create(tmp).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, doc)?;
        } else {
            serde_json::to_writer(&mut out, doc)?;
        }
        out.flush().map_err(io_err)?;
        let file = out.into_inner().map_err(|e| io_err(e.into_error()))?;
        file.sync_all().map_err(io_err)?;
        Ok(())
    }
}
