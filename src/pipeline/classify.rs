use std::collections::BTreeSet;

use anyhow::{Context, bail};
use indexmap::IndexMap;
use tracing::warn;

use crate::error::PipelineError;

use super::{CategoryTotal, Expense};

pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct GroupDefinition {
    pub name: String,
    pub categories: BTreeSet<String>,
}

/// Ordered group definitions. A category listed under several groups belongs
/// to the first one.
#[derive(Debug, Clone, Default)]
pub struct GroupDefinitions {
    groups: Vec<GroupDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub category: String,
    pub kept: String,
    pub shadowed: String,
}

impl GroupDefinitions {
    /// Reads a JSON object of `group name -> [category, ...]`. Key order is
    /// evaluation order.
    pub fn from_json(raw: &str) -> Result<Self, anyhow::Error> {
        let parsed: IndexMap<String, Vec<String>> =
            serde_json::from_str(raw).context("expected an object of group name to categories")?;

        let mut groups = Vec::with_capacity(parsed.len());
        for (name, categories) in parsed {
            if name.trim().is_empty() {
                bail!("group names must not be empty");
            }

            groups.push(GroupDefinition {
                name,
                categories: categories.into_iter().collect(),
            });
        }

        let definitions = Self { groups };

        for overlap in definitions.overlaps() {
            warn!(
                category = %overlap.category,
                kept = %overlap.kept,
                shadowed = %overlap.shadowed,
                "category is listed in more than one group, the first listed group wins"
            );
        }

        Ok(definitions)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.name.as_str())
    }

    pub fn group_for(&self, category: &str) -> &str {
        self.groups
            .iter()
            .find(|group| group.categories.contains(category))
            .map(|group| group.name.as_str())
            .unwrap_or(UNKNOWN_GROUP)
    }

    pub fn overlaps(&self) -> Vec<Overlap> {
        let mut overlaps = Vec::new();

        for (index, group) in self.groups.iter().enumerate() {
            for category in &group.categories {
                let earlier = self.groups[..index]
                    .iter()
                    .find(|earlier| earlier.categories.contains(category));

                if let Some(earlier) = earlier {
                    overlaps.push(Overlap {
                        category: category.to_owned(),
                        kept: earlier.name.to_owned(),
                        shadowed: group.name.to_owned(),
                    });
                }
            }
        }

        overlaps
    }
}

/// Keeps non-positive totals, largest expense first, and assigns each a group.
/// The expense amounts of the result add up without overflowing `i64`.
pub fn classify(
    totals: Vec<CategoryTotal>,
    groups: &GroupDefinitions,
) -> Result<Vec<Expense>, PipelineError> {
    let mut kept: Vec<CategoryTotal> = totals
        .into_iter()
        .filter(|total| total.total_amount <= 0)
        .collect();

    kept.sort_by_key(|total| total.total_amount);

    let mut overall: i64 = 0;
    let mut expenses = Vec::with_capacity(kept.len());

    for total in kept {
        let expense_amount = total
            .total_amount
            .checked_abs()
            .and_then(|amount| {
                overall = overall.checked_add(amount)?;
                Some(amount)
            })
            .ok_or_else(|| PipelineError::AmountOverflow {
                category: total.category.clone(),
            })?;

        expenses.push(Expense {
            group: groups.group_for(&total.category).to_owned(),
            expense_amount,
            category: total.category,
            total_amount: total.total_amount,
        });
    }

    Ok(expenses)
}
