use crate::core::schema::OUTPUT_HEADERS;
use crate::domain::model::OutputRow;
use crate::utils::error::{ImportError, Result};
use csv::WriterBuilder;

/// 以固定 18 欄表頭輸出 CSV
pub fn project(rows: &[OutputRow]) -> Result<String> {
    project_with_delimiter(rows, b',')
}

/// 表頭永遠輸出；缺少的欄位輸出為空字串。引號與跳脫交給 csv writer
pub fn project_with_delimiter(rows: &[OutputRow], delimiter: u8) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_HEADERS)?;
    for row in rows {
        writer.write_record(OUTPUT_HEADERS.iter().map(|column| row.text(column)))?;
    }

    let bytes = writer.into_inner().map_err(|e| ImportError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::MalformedInput {
        message: format!("projected output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema;
    use crate::domain::model::CellValue;

    fn read_back(text: &str) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(text.as_bytes());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_is_written_for_empty_rows() {
        let text = project(&[]).unwrap();
        let records = read_back(&text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0], OUTPUT_HEADERS.to_vec());
    }

    #[test]
    fn test_every_row_has_all_columns() {
        let rows = vec![
            OutputRow::new()
                .with(schema::HANDLE, CellValue::text("a"))
                .with(schema::PUBLISHED, CellValue::Flag(true)),
            OutputRow::new().with(schema::IMAGE_POSITION, CellValue::Integer(2)),
        ];

        let records = read_back(&project(&rows).unwrap());

        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.len(), 18);
        }
        assert_eq!(records[1][0], "a");
        assert_eq!(records[1][3], "TRUE");
        assert_eq!(records[2][8], "2");
        assert_eq!(records[2][0], "");
    }

    #[test]
    fn test_quoting_of_special_characters() {
        let rows = vec![OutputRow::new()
            .with(schema::TITLE, CellValue::text("Dress, \"Red\""))
            .with(schema::BODY_HTML, CellValue::text("line one\nline two"))];

        let text = project(&rows).unwrap();

        assert!(text.contains("\"Dress, \"\"Red\"\"\""));
        let records = read_back(&text);
        assert_eq!(records[1][1], "Dress, \"Red\"");
        assert_eq!(records[1][4], "line one\nline two");
    }

    #[test]
    fn test_tab_delimited_projection() {
        let rows = vec![OutputRow::new().with(schema::HANDLE, CellValue::text("a"))];

        let text = project_with_delimiter(&rows, b'\t').unwrap();
        let first_line = text.lines().next().unwrap();

        assert_eq!(first_line.split('\t').count(), 18);
        assert!(first_line.starts_with("Handle\tTitle\tVendor"));
    }

    #[test]
    fn test_columns_outside_header_are_not_projected() {
        let rows = vec![OutputRow::new()
            .with(schema::HANDLE, CellValue::text("a"))
            .with(schema::VARIANT_INVENTORY_POLICY, CellValue::text("deny"))];

        let text = project(&rows).unwrap();

        assert!(!text.contains("deny"));
    }
}
