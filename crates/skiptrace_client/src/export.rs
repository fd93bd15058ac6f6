use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::ResultRecord;

pub const EXPORT_HEADERS: [&str; 4] = [
    "Business Name",
    "Business Address",
    "Contact Numbers",
    "Search Resources",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Renders rows as CSV: a bare header line, then every field double-quoted
/// with embedded quotes doubled. Missing fields become empty strings.
pub fn rows_to_csv(rows: &[ResultRecord]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record([
            row.business_name.as_deref().unwrap_or(""),
            row.business_address.as_deref().unwrap_or(""),
            row.contact_numbers.as_deref().unwrap_or(""),
            row.search_resources.as_deref().unwrap_or(""),
        ])?;
    }

    let body = writer.into_inner().map_err(|err| err.into_error())?;
    let mut out = EXPORT_HEADERS.join(",");
    out.push('\n');
    out.push_str(&String::from_utf8(body)?);
    Ok(out)
}

pub fn save_rows_csv(
    output_dir: &Path,
    filename: &str,
    rows: &[ResultRecord],
) -> Result<PathBuf, ExportError> {
    let content = rows_to_csv(rows)?;
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    Ok(writer.write(filename, content.as_bytes())?)
}
