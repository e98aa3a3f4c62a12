use std::{
    fs::File,
    path::{Path, PathBuf},
};

use csv::{ByteRecord, Reader, ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{LoadError, Result};
use crate::process::record::InputRecord;
use crate::schema::SchemaVariant;

/// Reads typed records from one CSV file whose header row names the fields.
pub struct TweetCsvReader {
    path: PathBuf,
    reader: Reader<File>,
    headers: StringRecord,
    raw: ByteRecord,
}

impl TweetCsvReader {
    /// Open `path` and check its header row against `variant`.
    pub fn open(path: &Path, variant: SchemaVariant) -> Result<Self> {
        let file_access = |source| LoadError::FileAccess {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(file_access)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(|source| LoadError::MalformedRecord {
                path: path.to_path_buf(),
                line: 1,
                source,
            })?
            .clone();
        validate_headers(path, &headers, variant)?;
        debug!(path = %path.display(), columns = headers.len(), "header ok");

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
            raw: ByteRecord::new(),
        })
    }

    /// Next record in file order, or `None` at end of file. Text fields are
    /// checked for UTF-8 before typed deserialisation.
    pub fn next_record(&mut self) -> Result<Option<InputRecord>> {
        let malformed = |path: &Path, line, source| LoadError::MalformedRecord {
            path: path.to_path_buf(),
            line,
            source,
        };

        let more = self
            .reader
            .read_byte_record(&mut self.raw)
            .map_err(|e| malformed(&self.path, self.reader.position().line(), e))?;
        if !more {
            return Ok(None);
        }
        let line = self.raw.position().map_or(0, |p| p.line());

        let record = StringRecord::from_byte_record(self.raw.clone()).map_err(|e| {
            let field = self
                .headers
                .get(e.utf8_error().field())
                .unwrap_or("?")
                .to_string();
            LoadError::Decode {
                path: self.path.clone(),
                line,
                field,
            }
        })?;

        record
            .deserialize(Some(&self.headers))
            .map(Some)
            .map_err(|e| malformed(&self.path, line, e))
    }
}

/// Every header the variant needs must be present; anything the record type
/// does not know is rejected.
fn validate_headers(path: &Path, headers: &StringRecord, variant: SchemaVariant) -> Result<()> {
    if let Some(unknown) = headers
        .iter()
        .find(|h| !SchemaVariant::is_known_input_field(h))
    {
        return Err(LoadError::UnknownColumn {
            path: path.to_path_buf(),
            column: unknown.to_string(),
        });
    }
    if let Some(missing) = variant
        .required_input_fields()
        .find(|field| !headers.iter().any(|h| h == *field))
    {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }
    Ok(())
}
