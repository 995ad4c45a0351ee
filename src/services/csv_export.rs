use std::string::FromUtf8Error;

use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvExportError {
    #[error("failed to write csv record: {0}")]
    Write(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Flush(String),
    #[error("csv output is not valid utf-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Writes `rows` as CSV text. Rows may differ in length.
pub fn rows_to_csv<I, R>(rows: I, quote_style: QuoteStyle) -> Result<String, CsvExportError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .quote_style(quote_style)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| CsvExportError::Flush(error.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_every_field_when_asked() {
        let csv = rows_to_csv(vec![vec!["a", "b \"c\""]], QuoteStyle::Always).unwrap();
        assert_eq!(csv, "\"a\",\"b \"\"c\"\"\"\n");
    }

    #[test]
    fn allows_rows_of_different_length() {
        let rows = vec![vec!["Summary Metrics:"], vec!["Total Man-hours", "58"]];
        let csv = rows_to_csv(rows, QuoteStyle::Necessary).unwrap();
        assert_eq!(csv, "Summary Metrics:\nTotal Man-hours,58\n");
    }
}
