use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SeedError;

/// Writes `header` followed by one row per record, replacing whatever was at `path`.
/// Missing parent directories are created. Returns the number of records written.
///
/// Records must serialize their fields in the same order as `header`.
///
/// # Errors
/// Errors when the directories or file cannot be created, or a record fails to serialize
pub fn write_records<T, I, P>(records: I, header: &[&str], path: P) -> Result<usize, SeedError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;

    let mut written = 0;
    for record in records {
        writer.serialize(record)?;
        written += 1;
    }
    writer.flush()?;

    info!("Saved {} records to {}", written, path.display());
    Ok(written)
}

/// Reads back a file produced by [`write_records`], matching columns to fields by header name
///
/// # Errors
/// Errors when the file cannot be opened or a row does not deserialize into `T`
pub fn read_records<T, P>(path: P) -> Result<Vec<T>, SeedError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let mut reader = ReaderBuilder::new().from_path(path)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(SeedError::from)
}
