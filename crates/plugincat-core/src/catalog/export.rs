/// CSV export of catalog entries.
///
/// Columns are fixed: `Name, Vendor, Format, Bitness, Favorite, Notes, Path`,
/// with Favorite rendered as `Yes`/`No`. Quoting follows RFC 4180 via the
/// `csv` crate, so notes containing commas, quotes, or newlines survive.
use crate::error::ExportError;
use crate::model::PluginRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header row, in column order.
pub const CSV_HEADER: [&str; 7] = [
    "Name", "Vendor", "Format", "Bitness", "Favorite", "Notes", "Path",
];

/// Write `records` as CSV to any writer.
pub fn write_csv<'a, W, I>(records: I, writer: W) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a PluginRecord>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for record in records {
        let path = record.path.to_string_lossy();
        csv.write_record([
            record.name.as_str(),
            record.vendor.as_str(),
            record.format.label(),
            record.bitness.label(),
            if record.favorite { "Yes" } else { "No" },
            record.notes.as_str(),
            path.as_ref(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `records` as CSV to a new file at `path`, replacing any existing file.
///
/// Failure to create the destination is returned, never swallowed.
pub fn export_csv<'a, I>(records: I, path: &Path) -> Result<(), ExportError>
where
    I: IntoIterator<Item = &'a PluginRecord>,
{
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(records, file)?;
    tracing::info!("Exported catalog to {}", path.display());
    Ok(())
}
