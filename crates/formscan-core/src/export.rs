//! CSV export boundary.
//!
//! One header row of the 43 vocabulary names in column order, then one row
//! per record with the empty string standing in for "not found". Every
//! value is quoted and embedded quotes are doubled, so arbitrary extracted
//! text round-trips.

use std::collections::BTreeMap;
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};

use crate::error::ExportError;
use crate::models::{Field, Record};

/// Fixed file name of the exported document.
pub const EXPORT_FILE_NAME: &str = "extracted_data.csv";

/// Media type of the exported document.
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

/// Serialize records to the delimited document as a string.
pub fn csv_string(records: &[Record]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(Field::ALL.iter().map(|f| f.name()))?;

    for record in records {
        writer.write_record(Field::ALL.iter().map(|f| record.value(*f).unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

/// Serialize records and write them to `path`.
pub fn write_csv(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let document = csv_string(records)?;
    std::fs::write(path, document)?;
    Ok(())
}

/// Parse an exported document back into per-record field maps, empty cells
/// omitted. Columns must all belong to the vocabulary.
pub fn read_csv(document: &str) -> Result<Vec<BTreeMap<Field, String>>, ExportError> {
    let mut reader = ReaderBuilder::new().from_reader(document.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Field> = headers
        .iter()
        .map(|h| {
            Field::from_name(h)
                .ok_or_else(|| ExportError::MalformedRow(format!("unknown column: {h}")))
        })
        .collect::<Result<_, _>>()?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut map = BTreeMap::new();
        for (field, value) in columns.iter().zip(row.iter()) {
            if !value.is_empty() {
                map.insert(*field, value.to_string());
            }
        }
        rows.push(map);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, RuleKind};
    use pretty_assertions::assert_eq;

    fn record_with(id: u32, values: &[(Field, &str)]) -> Record {
        let mut record = Record::new(id);
        for (field, value) in values {
            record
                .fields
                .insert(*field, FieldValue::new(*value, RuleKind::Header, 0.9));
        }
        record
    }

    #[test]
    fn test_header_row_is_vocabulary_in_order() {
        let document = csv_string(&[]).unwrap();
        let first_line = document.lines().next().unwrap();

        assert!(first_line.starts_with("\"IMAGE NAME\",\"EMAIL ADDRESS\""));
        assert!(first_line.ends_with("\"TABLETS\",\"SHIPPING COST\""));
        assert_eq!(first_line.split(',').count(), 43);
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let record = record_with(1, &[(Field::EmailAddress, "a@b.com")]);
        let document = csv_string(&[record]).unwrap();
        let row = document.lines().nth(1).unwrap();

        assert!(row.contains("\"a@b.com\""));
        assert!(row.starts_with("\"\",\"a@b.com\""));
    }

    #[test]
    fn test_round_trip_with_embedded_quotes() {
        let record = record_with(
            1,
            &[
                (Field::Remark, "He said \"hi\""),
                (Field::CustomerName, "A M Bibbs"),
                (Field::TotalAmt, "$250.00"),
            ],
        );
        let document = csv_string(&[record.clone()]).unwrap();

        let rows = read_csv(&document).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][&Field::Remark], "He said \"hi\"");
        assert_eq!(rows[0][&Field::CustomerName], "A M Bibbs");
        assert_eq!(rows[0][&Field::TotalAmt], "$250.00");
        assert_eq!(rows[0].len(), record.fields.len());
    }

    #[test]
    fn test_multiple_records_preserve_order() {
        let records = vec![
            record_with(1, &[(Field::Height, "183")]),
            record_with(5, &[(Field::Height, "158")]),
        ];
        let document = csv_string(&records).unwrap();

        let rows = read_csv(&document).unwrap();
        assert_eq!(rows[0][&Field::Height], "183");
        assert_eq!(rows[1][&Field::Height], "158");
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let bogus = "\"NOT A FIELD\"\n\"x\"\n";
        assert!(read_csv(bogus).is_err());
    }
}
