use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::error::PipelineError;

use super::{CategoryTotal, Transaction};

/// Sums payment amounts per category. Keys compare as exact strings, so
/// `"Кофе"` and `"кофе "` are different categories. Rows without a category
/// are left out.
pub fn aggregate(rows: Vec<Transaction>) -> Result<Vec<CategoryTotal>, PipelineError> {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    let mut uncategorized = 0;

    for tx in rows {
        if tx.category.trim().is_empty() {
            uncategorized += 1;
            continue;
        }

        let sum = totals
            .get(&tx.category)
            .copied()
            .unwrap_or_default()
            .checked_add(tx.payment_amount)
            .ok_or_else(|| PipelineError::AmountOverflow {
                category: tx.category.clone(),
            })?;
        totals.insert(tx.category, sum);
    }

    if uncategorized > 0 {
        warn!(rows = uncategorized, "dropped transactions without a category");
    }
    info!(categories = totals.len(), "aggregated transactions");

    Ok(totals
        .into_iter()
        .map(|(category, total_amount)| CategoryTotal {
            category,
            total_amount,
        })
        .collect())
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::aggregate;
    use crate::{
        error::PipelineError,
        pipeline::{CategoryTotal, Transaction},
    };

    fn tx(category: &str, amount: i64) -> Transaction {
        Transaction {
            status: "OK".to_owned(),
            operation_date: NaiveDate::from_ymd_opt(2023, 3, 1)
                .expect("date")
                .and_hms_opt(0, 0, 0)
                .expect("time"),
            category: category.to_owned(),
            payment_amount: amount,
        }
    }

    fn total(category: &str, total_amount: i64) -> CategoryTotal {
        CategoryTotal {
            category: category.to_owned(),
            total_amount,
        }
    }

    #[test]
    fn one_row_per_category_with_exact_sums() {
        let totals = aggregate(vec![
            tx("Кофе", -150),
            tx("Такси", -300),
            tx("Кофе", -200),
            tx("Зарплата", 1000),
            tx("Возврат", 50),
            tx("Возврат", -50),
        ])
        .expect("aggregate");

        assert_eq!(
            totals,
            vec![
                total("Возврат", 0),
                total("Зарплата", 1000),
                total("Кофе", -350),
                total("Такси", -300),
            ]
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let rows = vec![
            tx("Кофе", -150),
            tx("Такси", -300),
            tx("Кофе", -200),
            tx("Дом", -1),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        assert_eq!(
            aggregate(rows).expect("aggregate"),
            aggregate(reversed).expect("aggregate")
        );
    }

    #[test]
    fn keys_are_case_and_whitespace_sensitive() {
        let totals = aggregate(vec![tx("Кофе", -1), tx("кофе", -2), tx("Кофе ", -3)])
            .expect("aggregate");

        assert_eq!(totals.len(), 3);
    }

    #[test]
    fn no_rows_no_totals() {
        assert!(aggregate(vec![]).expect("aggregate").is_empty());
    }

    #[test]
    fn rows_without_a_category_are_left_out() {
        let totals = aggregate(vec![tx("Кофе", -150), tx("", -70), tx("  ", -30)])
            .expect("aggregate");

        assert_eq!(totals, vec![total("Кофе", -150)]);
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let err = aggregate(vec![
            tx("Кофе", -9_000_000_000_000_000_000),
            tx("Кофе", -9_000_000_000_000_000_000),
        ])
        .expect_err("overflow");

        match err {
            PipelineError::AmountOverflow { category } => assert_eq!(category, "Кофе"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
