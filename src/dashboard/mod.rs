use serde::Serialize;

use crate::pipeline::Expense;

pub mod page;
pub mod views;

use views::Figure;

/// The four views of the page, built once from the final expense table.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub table: Figure,
    pub bar: Figure,
    pub sunburst: Figure,
    pub total: Figure,
}

impl Dashboard {
    pub fn build(expenses: &[Expense]) -> Self {
        Self {
            table: views::table(expenses),
            bar: views::bar(expenses),
            sunburst: views::sunburst(expenses),
            total: views::total(expenses),
        }
    }
}
