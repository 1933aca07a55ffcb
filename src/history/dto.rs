use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{money, repo::MealEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Dineout,
    Cook,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Dineout => "dineout",
            MealType::Cook => "cook",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dineout" => Ok(MealType::Dineout),
            "cook" => Ok(MealType::Cook),
            other => Err(anyhow::anyhow!("unknown meal type {other:?}")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateHistoryRequest {
    pub meal_type: MealType,
    pub meal_name: String,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    pub expense: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub meal_type: Option<MealType>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub days: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub meal_type: MealType,
    pub meal_name: String,
    pub restaurant_name: Option<String>,
    pub expense: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub eaten_at: OffsetDateTime,
}

impl TryFrom<MealEntry> for HistoryEntryResponse {
    type Error = anyhow::Error;

    fn try_from(e: MealEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: e.id,
            meal_type: e.meal_type.parse()?,
            meal_name: e.meal_name,
            restaurant_name: e.restaurant_name,
            expense: money::from_cents(e.expense_cents),
            eaten_at: e.eaten_at,
        })
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TypeSummary {
    pub meal_type: MealType,
    pub entries: i64,
    pub total_expense: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HistorySummary {
    pub total_expense: f64,
    pub entries: i64,
    pub by_type: Vec<TypeSummary>,
}
