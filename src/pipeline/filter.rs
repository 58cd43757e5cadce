use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tracing::info;

use super::Transaction;

pub const FAILED_STATUS: &str = "FAILED";

#[derive(Debug, Clone)]
pub struct Filters {
    /// Earliest operation date kept, inclusive.
    pub cutoff: NaiveDateTime,
    pub excluded_categories: BTreeSet<String>,
}

impl Filters {
    pub fn retains(&self, tx: &Transaction) -> bool {
        tx.status != FAILED_STATUS
            && tx.operation_date >= self.cutoff
            && !self.excluded_categories.contains(&tx.category)
    }

    pub fn apply(&self, rows: Vec<Transaction>) -> Vec<Transaction> {
        let before = rows.len();

        let retained: Vec<Transaction> = rows.into_iter().filter(|tx| self.retains(tx)).collect();

        info!(
            retained = retained.len(),
            dropped = before - retained.len(),
            "filtered transactions"
        );

        retained
    }
}
