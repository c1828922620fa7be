// CSV/TSV import/export
//
// The codec is strict about shape: record 0 is the header, and every
// data record must match its field count. Parsing is atomic - a bad
// record yields an error and no document.

use std::fmt;
use std::io::Read;
use std::path::Path;

use gridpad_engine::codec::{ParseError, TextCodec};
use gridpad_engine::document::Document;

/// Delimited-text codec bound to one delimiter. This is the [`TextCodec`]
/// an [`gridpad_engine::session::EditorSession`] runs on.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedCodec {
    delimiter: u8,
}

impl DelimitedCodec {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Codec with the delimiter implied by the file extension.
    pub fn for_path(path: &Path) -> Self {
        Self::new(delimiter_for_path(path))
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

impl TextCodec for DelimitedCodec {
    fn parse(&self, text: &str) -> Result<Document, ParseError> {
        parse_str(text, self.delimiter)
    }

    fn serialize(&self, doc: &Document) -> String {
        serialize_str(doc, self.delimiter)
    }
}

/// `.tsv` means tab; everything else is treated as comma-separated.
pub fn delimiter_for_path(path: &Path) -> u8 {
    let is_tsv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv {
        b'\t'
    } else {
        b','
    }
}

/// Parse delimited text into a document.
///
/// Record 0 becomes the header; any later record whose field count
/// differs fails with the 1-based line number (the first data record is
/// line 2). Empty input is an empty document, not an error.
pub fn parse_str(text: &str, delimiter: u8) -> Result<Document, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                // Reader-level failures (e.g. a malformed quote sequence)
                // carry no field count; report the record position.
                let line = err
                    .position()
                    .map(|p| p.record() as usize + 1)
                    .unwrap_or(idx + 1);
                let expected = records.first().map(Vec::len).unwrap_or(0);
                return Err(ParseError { line, expected, actual: 0 });
            }
        };
        records.push(record.iter().map(str::to_string).collect());
    }

    let mut records = records.into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => return Ok(Document::new()),
    };
    let expected = header.len();
    let mut rows = Vec::new();
    for (idx, record) in records.enumerate() {
        if record.len() != expected {
            return Err(ParseError {
                line: idx + 2,
                expected,
                actual: record.len(),
            });
        }
        rows.push(record);
    }
    Ok(Document { header, rows })
}

/// Serialize a document back to delimited text, quoting fields that
/// contain the delimiter, quote characters, or line breaks. An empty
/// header suppresses the header record.
pub fn serialize_str(doc: &Document, delimiter: u8) -> String {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(Vec::new());

    if !doc.header.is_empty() {
        writer
            .write_record(&doc.header)
            .expect("writing to Vec<u8> cannot fail");
    }
    for row in &doc.rows {
        writer
            .write_record(row)
            .expect("writing to Vec<u8> cannot fail");
    }

    let bytes = writer
        .into_inner()
        .expect("writing to Vec<u8> cannot fail");
    String::from_utf8(bytes).expect("csv output of UTF-8 input is UTF-8")
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines. Used for content without a trusted extension.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per
/// line. The delimiter that produces the most consistent field count
/// (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        // Higher field count breaks ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252,
/// Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Why a file could not be opened as a document.
#[derive(Debug)]
pub enum ImportError {
    /// The file could not be read.
    Io(String),
    /// The content was read but failed validation. The raw text is kept
    /// so the caller can open an error-state session without losing it.
    Parse { error: ParseError, raw_text: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(msg) => write!(f, "{}", msg),
            ImportError::Parse { error, .. } => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for ImportError {}

/// Open a file as a document, choosing the delimiter from the extension.
pub fn import(path: &Path) -> Result<Document, ImportError> {
    let content = read_file_as_utf8(path).map_err(ImportError::Io)?;
    parse_str(&content, delimiter_for_path(path)).map_err(|error| ImportError::Parse {
        error,
        raw_text: content,
    })
}

/// Write a document to disk with the given delimiter.
pub fn export(doc: &Document, path: &Path, delimiter: u8) -> Result<(), String> {
    std::fs::write(path, serialize_str(doc, delimiter)).map_err(|e| e.to_string())
}
