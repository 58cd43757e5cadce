use std::{collections::BTreeSet, path::Path};

use anyhow::Context;
use chrono::NaiveDateTime;
use dotenv::dotenv;
use serde::Deserialize;
use tracing::warn;

use crate::pipeline::{
    classify::GroupDefinitions, filter::Filters, normalize::parse_operation_date,
};

const DEFAULT_SHEET_NAME: &str = "operations";
const DEFAULT_SHEET_BASE_URL: &str = "https://docs.google.com";
const DEFAULT_CUTOFF_DATE: &str = "2023-02-01 00:00:00";
const DEFAULT_EXCLUDED_CATEGORIES: [&str; 2] = ["Переводы", "Вне бюджета"];
const DEFAULT_GROUPS_FILE: &str = "groups.json";
const DEFAULT_PORT: u16 = 8050;

#[derive(Debug, Deserialize)]
pub struct EnvironmentVariables {
    pub sheet_id: String,
    pub sheet_name: Option<String>,
    pub sheet_base_url: Option<String>,
    pub cutoff_date: Option<String>,
    pub excluded_categories: Option<Vec<String>>,
    pub groups_file: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug)]
pub struct Config {
    pub sheet_id: String,
    pub sheet_name: String,
    pub sheet_base_url: String,
    pub cutoff: NaiveDateTime,
    pub excluded_categories: BTreeSet<String>,
    pub groups: GroupDefinitions,
    pub port: u16,
}

impl Config {
    pub fn new() -> Result<Self, anyhow::Error> {
        let _ = dotenv().map_err(|err| warn!("error loading .env: {:?}", err));

        let envs =
            envy::from_env::<EnvironmentVariables>().context("invalid environment variables")?;

        return Self::from_envs(envs);
    }

    pub fn from_envs(envs: EnvironmentVariables) -> Result<Self, anyhow::Error> {
        let cutoff_date = envs
            .cutoff_date
            .unwrap_or_else(|| DEFAULT_CUTOFF_DATE.to_owned());
        let cutoff = parse_operation_date(&cutoff_date)
            .with_context(|| format!("invalid CUTOFF_DATE {cutoff_date:?}"))?;

        let excluded_categories: BTreeSet<String> = match envs.excluded_categories {
            Some(categories) => categories
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect(),
            None => DEFAULT_EXCLUDED_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        };

        let groups_file = envs
            .groups_file
            .unwrap_or_else(|| DEFAULT_GROUPS_FILE.to_owned());
        let groups = load_groups(Path::new(&groups_file))?;

        return Ok(Config {
            sheet_id: envs.sheet_id,
            sheet_name: envs
                .sheet_name
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_owned()),
            sheet_base_url: envs
                .sheet_base_url
                .unwrap_or_else(|| DEFAULT_SHEET_BASE_URL.to_owned()),
            cutoff,
            excluded_categories,
            groups,
            port: envs.port.unwrap_or(DEFAULT_PORT),
        });
    }

    pub fn filters(&self) -> Filters {
        Filters {
            cutoff: self.cutoff,
            excluded_categories: self.excluded_categories.clone(),
        }
    }
}

fn load_groups(path: &Path) -> Result<GroupDefinitions, anyhow::Error> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("error reading group definitions from {}", path.display()))?;

    GroupDefinitions::from_json(&raw)
        .with_context(|| format!("invalid group definitions in {}", path.display()))
}
