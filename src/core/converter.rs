use crate::domain::mapping::map_record;
use crate::domain::model::{SourceRecord, DESTINATION_HEADER};
use crate::utils::error::{ConvertError, Result};
use csv::{ByteRecord, QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub rows: u64,
    pub output: PathBuf,
}

/// Converts a ratings export into the 7-column import format.
#[derive(Debug, Clone)]
pub struct ImdbConverter {
    input: PathBuf,
}

impl ImdbConverter {
    /// Fails with `InputNotFound` unless `input` is an existing regular file.
    pub fn new(input: impl Into<PathBuf>) -> Result<Self> {
        let input = input.into();
        let is_file = fs::metadata(&input).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            return Err(ConvertError::InputNotFound { path: input });
        }
        Ok(Self { input })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Rows go to a temporary file beside `output`, which replaces `output`
    /// only once every row has been written.
    pub fn convert(&self, output: impl AsRef<Path>) -> Result<ConversionSummary> {
        let output = output.as_ref();

        let source = File::open(&self.input).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConvertError::InputNotFound {
                path: self.input.clone(),
            },
            _ => ConvertError::Io(e),
        })?;
        tracing::info!("📂 Reading {}", self.input.display());

        let staging = staging_file(output)?;
        tracing::debug!("Staging output in {}", staging.path().display());

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(staging);
        writer.write_record(DESTINATION_HEADER)?;

        let mut rows = 0u64;
        for record in SourceRows::new(source)? {
            let (row, record) = record?;
            let mapped = map_record(&record).map_err(|e| e.at_row(row))?;
            tracing::trace!("row {}: {}", row, mapped.imdb_id);
            writer.serialize(&mapped)?;
            rows = row;
        }

        writer.flush()?;
        let staging = writer
            .into_inner()
            .map_err(|e| ConvertError::Io(std::io::Error::new(e.error().kind(), e.to_string())))?;
        staging.as_file().sync_all()?;
        staging
            .persist(output)
            .map_err(|e| ConvertError::OutputUnwritable {
                path: output.to_path_buf(),
                source: e.error,
            })?;

        tracing::info!("✅ Wrote {} rows to {}", rows, output.display());
        Ok(ConversionSummary {
            rows,
            output: output.to_path_buf(),
        })
    }
}

pub fn convert(input: impl Into<PathBuf>, output: impl AsRef<Path>) -> Result<ConversionSummary> {
    ImdbConverter::new(input)?.convert(output)
}

fn staging_file(output: &Path) -> Result<NamedTempFile> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".letterconv-").suffix(".tmp");
    if let Some(permissions) = output_permissions(output) {
        builder.permissions(permissions);
    }

    builder
        .tempfile_in(dir)
        .map_err(|source| ConvertError::OutputUnwritable {
            path: output.to_path_buf(),
            source,
        })
}

/// Mode the output should end up with: an existing output keeps its own,
/// a new one gets the usual `0o666` minus umask instead of tempfile's `0o600`.
fn output_permissions(output: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(output) {
        return Some(meta.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o666))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

const DELIMITER: u8 = b',';
const QUOTE: u8 = b'"';

/// Follows quoting across physical lines so a quoted field may span them.
struct QuoteScan {
    quoted: bool,
    closing: bool,
    field_start: bool,
}

impl QuoteScan {
    fn new() -> Self {
        Self {
            quoted: false,
            closing: false,
            field_start: true,
        }
    }

    fn feed(&mut self, line: &[u8]) {
        for &byte in line {
            if self.quoted {
                if self.closing {
                    self.closing = false;
                    if byte == QUOTE {
                        continue;
                    }
                    self.quoted = false;
                } else {
                    self.closing = byte == QUOTE;
                    continue;
                }
            }

            match byte {
                DELIMITER | b'\n' => self.field_start = true,
                QUOTE if self.field_start => {
                    self.quoted = true;
                    self.field_start = false;
                }
                _ => self.field_start = false,
            }
        }
    }

    fn in_quoted_field(&self) -> bool {
        self.quoted && !self.closing
    }
}

/// Data rows of an export, header line already consumed. Yields each row
/// with its 1-based number; a blank line is a row with no fields.
pub struct SourceRows<R: Read> {
    source: BufReader<R>,
    row: u64,
}

impl<R: Read> SourceRows<R> {
    pub fn new(source: R) -> Result<Self> {
        let mut source = BufReader::new(source);

        // 第一行是標題，內容不檢查
        let mut header = Vec::new();
        source.read_until(b'\n', &mut header)?;

        Ok(Self { source, row: 0 })
    }

    fn next_text(&mut self) -> Result<Option<Vec<u8>>> {
        let mut text = Vec::new();
        let mut scan = QuoteScan::new();
        loop {
            let start = text.len();
            if self.source.read_until(b'\n', &mut text)? == 0 {
                break;
            }
            scan.feed(&text[start..]);
            if !scan.in_quoted_field() {
                break;
            }
        }

        if text.is_empty() {
            return Ok(None);
        }
        if text.last() == Some(&b'\n') {
            text.pop();
            if text.last() == Some(&b'\r') {
                text.pop();
            }
        }
        Ok(Some(text))
    }
}

fn parse_record(text: &[u8]) -> Result<SourceRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .from_reader(text);

    // empty text leaves the record with no fields
    let mut record = ByteRecord::new();
    reader.read_byte_record(&mut record)?;
    let record = StringRecord::from_byte_record(record)
        .map_err(|source| ConvertError::InvalidText { row: None, source })?;

    SourceRecord::try_from(&record)
}

impl<R: Read> Iterator for SourceRows<R> {
    type Item = Result<(u64, SourceRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = match self.next_text() {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        self.row += 1;
        let row = self.row;
        Some(
            parse_record(&text)
                .map(|record| (row, record))
                .map_err(|e| e.at_row(row)),
        )
    }
}
