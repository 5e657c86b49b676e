//! CSV reading and writing helpers.
//!
//! All file I/O in the pipeline flows through this module:
//!
//! - **Reader/writer construction** for comma-delimited files.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Quoting**: snapshot output uses `QuoteStyle::Always` for round-trip
//!   safety.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn open_csv_reader(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(b',')
        .double_quote(true)
        .flexible(true);
    Ok(builder.from_reader(BufReader::new(file)))
}

pub fn open_csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(QuoteStyle::Always)
        .double_quote(true);
    Ok(builder.from_writer(BufWriter::new(file)))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: std::io::Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_encoding_defaults_to_utf8() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some("utf-8")).unwrap(), UTF_8);
    }

    #[test]
    fn resolve_encoding_rejects_unknown_labels() {
        assert!(resolve_encoding(Some("utf-99")).is_err());
    }

    #[test]
    fn decode_bytes_handles_windows_1252() {
        let encoding = resolve_encoding(Some("windows-1252")).unwrap();
        let decoded = decode_bytes(&[0x43, 0x61, 0x66, 0xE9], encoding).unwrap();
        assert_eq!(decoded, "Café");
    }
}
