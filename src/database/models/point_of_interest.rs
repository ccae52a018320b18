use serde::{Deserialize, Serialize};

pub const POINTS_OF_INTEREST_TABLE: &str = "points_of_interest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PointOfInterest {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPointOfInterest {
    pub name: String,
    pub description: Option<String>,
}
