use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::{error::PipelineError, ingest::RawRow};

pub mod aggregate;
pub mod classify;
pub mod filter;
pub mod normalize;

use classify::GroupDefinitions;
use filter::Filters;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub status: String,
    pub operation_date: NaiveDateTime,
    pub category: String,
    pub payment_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: i64,
}

/// An aggregated category with a non-positive net amount, assigned to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub category: String,
    pub total_amount: i64,
    /// `|total_amount|`, used for chart sizing.
    pub expense_amount: i64,
    pub group: String,
}

/// Normalize → filter → aggregate → classify.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn run(
    rows: Vec<RawRow>,
    filters: &Filters,
    groups: &GroupDefinitions,
) -> Result<Vec<Expense>, PipelineError> {
    let transactions = normalize::normalize(rows)?;
    let retained = filters.apply(transactions);
    let totals = aggregate::aggregate(retained)?;
    let expenses = classify::classify(totals, groups)?;

    info!(categories = expenses.len(), "classified expense categories");
    for expense in &expenses {
        debug!(
            category = %expense.category,
            total_amount = expense.total_amount,
            group = %expense.group,
            "expense"
        );
    }

    Ok(expenses)
}
