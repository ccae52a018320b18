use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::point_of_interest::PointOfInterest;
use crate::filter::FilterRecord;

pub const CITIES_TABLE: &str = "cities";

/// Stored city. `points_of_interest` is only populated when explicitly requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
}

/// City as submitted for insertion; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCity {
    pub name: String,
    pub description: Option<String>,
}

/// Row shape of the `cities` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CityRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            points_of_interest: vec![],
        }
    }
}

impl FilterRecord for City {
    fn field(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(json!(self.id)),
            "name" => Some(Value::String(self.name.clone())),
            "description" => self.description.clone().map(Value::String),
            _ => None,
        }
    }
}
