use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use time::format_description::well_known::Rfc3339;

/// One feedback round as written to the history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub query: String,
    pub precision: f64,
    pub relevant: Vec<String>,
    pub irrelevant: Vec<String>,
    pub expansion: Vec<String>,
    pub timestamp: String,
}

impl RoundRecord {
    pub fn new(round: usize, query: &[String], precision: f64, relevant: Vec<String>, irrelevant: Vec<String>) -> Self {
        Self {
            round,
            query: query.join(" "),
            precision,
            relevant,
            irrelevant,
            expansion: Vec::new(),
            timestamp: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        }
    }
}

/// Appends rounds as JSON lines.
pub struct HistoryWriter {
    out: BufWriter<File>,
}

impl HistoryWriter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(dir) = path.as_ref().parent() {
            std::fs::create_dir_all(dir)?;
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { out: BufWriter::new(f) })
    }

    pub fn append(&mut self, rec: &RoundRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, rec)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
