//! Plotly figures. Each view is a complete `{data, layout}`
//! figure that plotly.js can draw as-is.
//!
//! The expense amounts passed in are expected to sum without overflow, which
//! `pipeline::classify` guarantees.

use indexmap::IndexMap;
use serde::Serialize;

use crate::pipeline::Expense;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Table(TableTrace),
    Bar(BarTrace),
    Sunburst(SunburstTrace),
    Indicator(IndicatorTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct TableTrace {
    pub header: TableSection<[&'static str; 2]>,
    pub cells: TableSection<(Vec<String>, Vec<i64>)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSection<T> {
    pub values: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    pub align: &'static str,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fill {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub color: &'static str,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub name: &'static str,
    pub x: Vec<i64>,
    pub y: Vec<String>,
    pub orientation: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SunburstTrace {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<i64>,
    pub branchvalues: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorTrace {
    pub mode: &'static str,
    pub value: i64,
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Margin {
    pub l: u32,
    pub b: u32,
    pub t: u32,
    pub r: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub categoryorder: &'static str,
}

/// Category and signed net amount, in expense-table order.
pub fn table(expenses: &[Expense]) -> Figure {
    let font = |size| Font {
        color: "black",
        size,
    };

    Figure {
        data: vec![Trace::Table(TableTrace {
            header: TableSection {
                values: ["Category", "Cost"],
                fill: Some(Fill { color: "lavender" }),
                align: "left",
                font: font(12),
            },
            cells: TableSection {
                values: (
                    expenses.iter().map(|e| e.category.to_owned()).collect(),
                    expenses.iter().map(|e| e.total_amount).collect(),
                ),
                fill: None,
                align: "left",
                font: font(11),
            },
        })],
        layout: Layout {
            margin: Margin {
                l: 20,
                b: 0,
                t: 0,
                r: 0,
            },
            ..Default::default()
        },
    }
}

/// One bar per category, longest first.
pub fn bar(expenses: &[Expense]) -> Figure {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| {
        b.expense_amount
            .cmp(&a.expense_amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    Figure {
        data: vec![Trace::Bar(BarTrace {
            name: "Cost",
            x: sorted.iter().map(|e| e.expense_amount).collect(),
            y: sorted.iter().map(|e| e.category.to_owned()).collect(),
            orientation: "h",
        })],
        layout: Layout {
            margin: Margin {
                l: 20,
                b: 20,
                t: 30,
                r: 20,
            },
            barmode: Some("stack"),
            yaxis: Some(Axis {
                categoryorder: "total descending",
            }),
            ..Default::default()
        },
    }
}

/// Group → category hierarchy sized by expense amount. Group nodes carry the
/// sum of their categories.
pub fn sunburst(expenses: &[Expense]) -> Figure {
    let mut group_totals: IndexMap<&str, i64> = IndexMap::new();
    for expense in expenses {
        *group_totals.entry(expense.group.as_str()).or_default() += expense.expense_amount;
    }

    let mut trace = SunburstTrace {
        ids: Vec::with_capacity(group_totals.len() + expenses.len()),
        labels: Vec::with_capacity(group_totals.len() + expenses.len()),
        parents: Vec::with_capacity(group_totals.len() + expenses.len()),
        values: Vec::with_capacity(group_totals.len() + expenses.len()),
        branchvalues: "total",
    };

    for (group, value) in &group_totals {
        trace.ids.push(group.to_string());
        trace.labels.push(group.to_string());
        trace.parents.push(String::new());
        trace.values.push(*value);
    }

    for expense in expenses {
        trace
            .ids
            .push(format!("{}/{}", expense.group, expense.category));
        trace.labels.push(expense.category.to_owned());
        trace.parents.push(expense.group.to_owned());
        trace.values.push(expense.expense_amount);
    }

    Figure {
        data: vec![Trace::Sunburst(trace)],
        layout: Layout::default(),
    }
}

pub fn total(expenses: &[Expense]) -> Figure {
    Figure {
        data: vec![Trace::Indicator(IndicatorTrace {
            mode: "number",
            value: expenses.iter().map(|e| e.expense_amount).sum(),
            title: Title { text: "Total" },
        })],
        layout: Layout {
            margin: Margin {
                l: 20,
                b: 0,
                t: 30,
                r: 20,
            },
            height: Some(160),
            ..Default::default()
        },
    }
}
