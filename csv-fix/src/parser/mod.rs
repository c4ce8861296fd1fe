//! CSV dialect and source-row access.
//!
//! Reading and writing both use the RFC 4180 dialect: comma delimiter,
//! double-quote quoting (only when needed), doubled quotes as escapes and
//! CRLF record terminators. Rows are strict: a data row whose field count
//! differs from the header is rejected by the reader.

use csv::{QuoteStyle, Reader, ReaderBuilder, StringRecord, Terminator, Writer, WriterBuilder};
use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::FixResult;

/// Build a reader for header-first CSV input
pub fn reader<R: Read>(input: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .delimiter(b',')
        .quote(b'"')
        .double_quote(true)
        .from_reader(input)
}

/// Build a writer for fixed CSV output
pub fn writer<W: Write>(output: W) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .quote(b'"')
        .double_quote(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(output)
}

/// Source column names mapped to their position in each record.
///
/// Lookups go by name so reordered source columns are harmless. When a
/// header repeats a name, the last column with that name wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, positions }
    }

    /// Read the header row of `reader`.
    ///
    /// An empty input yields an empty index. Column names are trimmed.
    pub fn read<R: Read>(reader: &mut Reader<R>) -> FixResult<Self> {
        let names = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        Ok(Self::new(names))
    }

    /// Column names in input order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One input record viewed through its header
#[derive(Debug, Clone, Copy)]
pub struct SourceRow<'a> {
    headers: &'a HeaderIndex,
    record: &'a StringRecord,
}

impl<'a> SourceRow<'a> {
    pub fn new(headers: &'a HeaderIndex, record: &'a StringRecord) -> Self {
        Self { headers, record }
    }

    /// Value of `field`, or `None` when the header has no such column
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.headers
            .position(field)
            .and_then(|i| self.record.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FixError;

    fn records(csv: &str) -> (HeaderIndex, Vec<StringRecord>) {
        let mut rdr = reader(csv.as_bytes());
        let headers = HeaderIndex::read(&mut rdr).unwrap();
        let rows = rdr.records().collect::<Result<Vec<_>, _>>().unwrap();
        (headers, rows)
    }

    #[test]
    fn test_lookup_by_name() {
        let (headers, rows) = records("b,a\n2,1\n");
        let row = SourceRow::new(&headers, &rows[0]);

        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some("2"));
        assert_eq!(row.get("c"), None);
    }

    #[test]
    fn test_empty_value_is_present() {
        let (headers, rows) = records("a,b\n,2\n");
        let row = SourceRow::new(&headers, &rows[0]);
        assert_eq!(row.get("a"), Some(""));
    }

    #[test]
    fn test_quoted_delimiters_and_newlines() {
        let (headers, rows) = records("name,note\n\"Fox, Red\",\"line one\nline two\"\n");
        let row = SourceRow::new(&headers, &rows[0]);

        assert_eq!(row.get("name"), Some("Fox, Red"));
        assert_eq!(row.get("note"), Some("line one\nline two"));
    }

    #[test]
    fn test_header_names_trimmed() {
        let (headers, _) = records(" id , name \n1,x\n");
        assert_eq!(headers.names(), &["id".to_string(), "name".to_string()]);
        assert!(headers.contains("name"));
    }

    #[test]
    fn test_utf8_bom_ignored() {
        let (headers, rows) = records("\u{feff}id,name\n1,x\n");
        let row = SourceRow::new(&headers, &rows[0]);
        assert_eq!(row.get("id"), Some("1"));
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let (headers, rows) = records("a,a\n1,2\n");
        let row = SourceRow::new(&headers, &rows[0]);
        assert_eq!(row.get("a"), Some("2"));
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let mut rdr = reader("".as_bytes());
        let headers = HeaderIndex::read(&mut rdr).unwrap();
        assert!(headers.is_empty());
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut rdr = reader("a,b\n1,2,3\n".as_bytes());
        HeaderIndex::read(&mut rdr).unwrap();
        let err: FixError = rdr.records().next().unwrap().unwrap_err().into();

        match err {
            FixError::MalformedInput { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_writer_quotes_when_needed() {
        let mut wtr = writer(Vec::new());
        wtr.write_record(["plain", "with,comma", "say \"hi\""]).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(out, "plain,\"with,comma\",\"say \"\"hi\"\"\"\r\n");
    }
}
