use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{error::PipelineError, ingest::RawRow};

use super::Transaction;

const DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Coerces `Payment_Amount` and `Operation_Date`. The first cell that fails
/// to convert aborts the whole run.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn normalize(rows: Vec<RawRow>) -> Result<Vec<Transaction>, PipelineError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| -> Result<Transaction, PipelineError> {
            let row_number = index + 1;

            let payment_amount =
                parse_amount(&row.payment_amount).map_err(|reason| PipelineError::Conversion {
                    column: "Payment_Amount",
                    row: row_number,
                    value: row.payment_amount.clone(),
                    reason,
                })?;

            let operation_date = parse_operation_date(&row.operation_date).ok_or_else(|| {
                PipelineError::Conversion {
                    column: "Operation_Date",
                    row: row_number,
                    value: row.operation_date.clone(),
                    reason: "unrecognized date-time format".to_owned(),
                }
            })?;

            Ok(Transaction {
                status: row.status,
                operation_date,
                category: row.category,
                payment_amount,
            })
        })
        .collect()
}

/// `,` is read as the decimal separator, never as a thousands separator:
/// `"1,234"` is 1.234 and rounds to 1. Halves round to the even neighbour.
pub fn parse_amount(value: &str) -> Result<i64, String> {
    let value = value.replace(',', ".");
    let value = value.trim();

    if value.is_empty() {
        return Err("empty amount".to_owned());
    }

    let amount = value
        .parse::<f64>()
        .map_err(|err| format!("not a decimal number: {err}"))?;

    if !amount.is_finite() {
        return Err("amount is not finite".to_owned());
    }

    let rounded = amount.round_ties_even();

    // `i64::MAX as f64` rounds up to 2^63; `i64::MIN` is excluded so the
    // amount can always be negated.
    if rounded <= i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err("amount does not fit in a 64-bit integer".to_owned());
    }

    Ok(rounded as i64)
}

pub fn parse_operation_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::{normalize, parse_amount, parse_operation_date};
    use crate::{error::PipelineError, ingest::RawRow};

    #[test]
    fn comma_is_a_decimal_separator() {
        assert_eq!(parse_amount("1,234"), Ok(1));
        assert_eq!(parse_amount("50"), Ok(50));
        assert_eq!(parse_amount("-150"), Ok(-150));
        assert_eq!(parse_amount(" -420,6 "), Ok(-421));
        assert_eq!(parse_amount("99.5"), Ok(100));
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(parse_amount("2,5"), Ok(2));
        assert_eq!(parse_amount("3,5"), Ok(4));
        assert_eq!(parse_amount("-0,5"), Ok(0));
    }

    #[test]
    fn unparseable_amounts_are_rejected() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("1,234,56").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn out_of_range_amounts_are_rejected() {
        assert!(parse_amount("1e300").is_err());
        assert!(parse_amount("-1e300").is_err());
        assert!(parse_amount("9223372036854775807").is_err());
        assert!(parse_amount("-9223372036854775808").is_err());
        assert_eq!(parse_amount("-9e18"), Ok(-9_000_000_000_000_000_000));
    }

    #[test]
    fn operation_dates_in_common_sheet_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 1)
            .expect("date")
            .and_hms_opt(14, 30, 0)
            .expect("time");

        assert_eq!(parse_operation_date("2023-03-01 14:30:00"), Some(expected));
        assert_eq!(parse_operation_date("2023-03-01T14:30:00"), Some(expected));
        assert_eq!(parse_operation_date("2023-03-01 14:30"), Some(expected));
        assert_eq!(parse_operation_date("01.03.2023 14:30:00"), Some(expected));
        assert_eq!(parse_operation_date("03/01/2023 14:30:00"), Some(expected));
        assert_eq!(
            parse_operation_date("2023-03-01T17:30:00+03:00"),
            Some(expected)
        );

        let midnight = NaiveDate::from_ymd_opt(2023, 3, 1)
            .expect("date")
            .and_hms_opt(0, 0, 0)
            .expect("time");
        assert_eq!(parse_operation_date("2023-03-01"), Some(midnight));
        assert_eq!(parse_operation_date("01.03.2023"), Some(midnight));
        assert_eq!(parse_operation_date("03/01/2023"), Some(midnight));

        assert_eq!(parse_operation_date(""), None);
        assert_eq!(parse_operation_date("первое марта"), None);
    }

    #[test]
    fn bad_date_reports_column_and_value() {
        let rows = vec![RawRow {
            status: "OK".to_owned(),
            operation_date: "not a date".to_owned(),
            category: "Кофе".to_owned(),
            payment_amount: "-1".to_owned(),
        }];

        let err = normalize(rows).expect_err("conversion error");

        match err {
            PipelineError::Conversion {
                column, row, value, ..
            } => {
                assert_eq!(column, "Operation_Date");
                assert_eq!(row, 1);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn other_columns_pass_through() {
        let rows = vec![RawRow {
            status: "OK".to_owned(),
            operation_date: "2023-03-01".to_owned(),
            category: " Кофе ".to_owned(),
            payment_amount: "-1,4".to_owned(),
        }];

        let transactions = normalize(rows).expect("normalize");

        assert_eq!(transactions[0].status, "OK");
        assert_eq!(transactions[0].category, " Кофе ");
        assert_eq!(transactions[0].payment_amount, -1);
    }
}
