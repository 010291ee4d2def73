//! CSV serialization of the collected vocabulary.
//!
//! Every field is quoted, embedded quotes are doubled and records end with
//! a bare `\n`, matching what spreadsheet and flashcard importers expect.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::collection::VocabCollection;
use crate::error::{Error, Result};

/// Column names, in order.
pub const HEADER: [&str; 3] = ["word", "description", "progress"];

/// Writes `vocab` as CSV into `writer`.
pub fn write_csv<W: Write>(vocab: &VocabCollection, writer: W) -> Result<()> {
    let mut out = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(HEADER)?;
    for entry in vocab {
        out.write_record([
            entry.term.as_str(),
            entry.meaning.as_str(),
            entry.level.label(),
        ])?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Renders `vocab` as a CSV string.
pub fn to_csv_string(vocab: &VocabCollection) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(vocab, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::config(format!("CSV output is not UTF-8: {e}")))
}

/// File name used when no output path is given.
pub fn default_file_name(now: DateTime<Utc>) -> String {
    format!("bunpro_vocab_all_levels_{}.csv", now.timestamp_millis())
}

/// Writes `vocab` to `path`, creating parent directories as needed.
pub fn write_to_path(vocab: &VocabCollection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    let file = std::fs::File::create(path).map_err(|e| Error::io_with_path(e, path))?;
    write_csv(vocab, std::io::BufWriter::new(file))?;
    tracing::info!(path = %path.display(), rows = vocab.len(), "CSV written");
    Ok(())
}
