use crate::error::Result;
use crate::models::Summary;
use crate::utils::constants::SUMMARY_EXTENSION;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination of finished summaries; each summary is written exactly once.
pub trait SummarySink: Send + Sync {
    /// Persist a summary and return where it was stored
    fn write(&self, summary: &Summary) -> Result<PathBuf>;

    /// Remove a document previously returned by `write`
    fn discard(&self, path: &Path) -> Result<()>;
}

/// Writes each summary as a JSON document named after its pollutant and station.
pub struct JsonWriter {
    storage: PathBuf,
    pretty: bool,
}

impl JsonWriter {
    pub fn new(storage: impl Into<PathBuf>) -> Self {
        Self {
            storage: storage.into(),
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn storage(&self) -> &Path {
        &self.storage
    }

    /// `<storage>/pollutant_<pollutant_id>_station_<station_id>.json`
    pub fn destination(&self, summary: &Summary) -> PathBuf {
        self.storage
            .join(summary.document_stem())
            .with_extension(SUMMARY_EXTENSION)
    }

    /// Read a persisted summary back
    pub fn read_summary(&self, path: &Path) -> Result<Summary> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

impl SummarySink for JsonWriter {
    fn write(&self, summary: &Summary) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.storage)?;
        let path = self.destination(summary);

        let mut writer = BufWriter::new(File::create(&path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, summary)?;
        } else {
            serde_json::to_writer(&mut writer, summary)?;
        }
        writer.flush()?;

        debug!(path = %path.display(), rows = summary.row_count(), "wrote summary");
        Ok(path)
    }

    fn discard(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path)?;
        debug!(path = %path.display(), "discarded summary");
        Ok(())
    }
}
