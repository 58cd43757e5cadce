use tracing::warn;

use crate::error::{PipelineError, RowParseError};

use super::{REQUIRED_COLUMNS, RawRow};

#[derive(Debug)]
pub struct LoadedSheet {
    pub rows: Vec<RawRow>,
    pub skipped: Vec<RowParseError>,
}

/// Reads a comma separated table with a header line. Rows that cannot be read
/// are skipped and reported in `skipped`; a table without the required
/// columns is rejected as a whole.
pub fn parse_sheet(body: &str) -> Result<LoadedSheet, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| PipelineError::MalformedSource(format!("unreadable header: {err}")))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::MalformedSource(format!(
            "missing columns {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    for result in reader.deserialize::<RawRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(source) => {
                let err = RowParseError {
                    line: source.position().map(|p| p.line()).unwrap_or_default(),
                    source,
                };
                warn!("{err}");
                skipped.push(err);
            }
        }
    }

    Ok(LoadedSheet { rows, skipped })
}

#[cfg(test)]
mod test {
    use super::parse_sheet;
    use crate::error::PipelineError;

    #[test]
    fn rows_are_read_by_column_name() {
        let body = "\"Operation_Date\",\"Status\",\"Card\",\"Category\",\"Payment_Amount\"\n\
                    \"2023-03-01 12:00:00\",\"OK\",\"*1234\",\"Кофе\",\"-150,5\"\n\
                    \"2023-03-02 09:15:00\",\"FAILED\",\"*1234\",\"Такси\",\"-999\"\n";

        let loaded = parse_sheet(body).expect("parse");

        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.rows[0].status, "OK");
        assert_eq!(loaded.rows[0].operation_date, "2023-03-01 12:00:00");
        assert_eq!(loaded.rows[0].category, "Кофе");
        assert_eq!(loaded.rows[0].payment_amount, "-150,5");
        assert_eq!(loaded.rows[1].status, "FAILED");
    }

    #[test]
    fn rows_with_wrong_column_count_are_skipped() {
        let body = "Status,Operation_Date,Category,Payment_Amount\n\
                    OK,2023-03-01,Кофе,-150\n\
                    OK,2023-03-01,Кофе,-1,50\n\
                    OK,2023-03-02\n\
                    OK,2023-03-03,Такси,-300\n";

        let loaded = parse_sheet(body).expect("parse");

        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.skipped.len(), 2);
        assert_eq!(loaded.skipped[0].line, 3);
        assert_eq!(loaded.skipped[1].line, 4);
        assert_eq!(loaded.rows[1].category, "Такси");
    }

    #[test]
    fn missing_required_column_is_malformed() {
        let body = "Status,Operation_Date,Category\nOK,2023-03-01,Кофе\n";

        let err = parse_sheet(body).expect_err("malformed");

        match err {
            PipelineError::MalformedSource(message) => {
                assert!(message.contains("Payment_Amount"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn header_only_is_an_empty_table() {
        let loaded = parse_sheet("Status,Operation_Date,Category,Payment_Amount\n").expect("parse");

        assert!(loaded.rows.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn empty_body_is_malformed() {
        assert!(matches!(
            parse_sheet(""),
            Err(PipelineError::MalformedSource(_))
        ));
    }
}
