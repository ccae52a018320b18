use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use super::manager::DatabaseError;
use super::models::city::CityRow;
use super::models::{City, NewCity, NewPointOfInterest, PointOfInterest};
use super::query_builder::QueryBuilder;
use super::repository::{cities_query, CityInfoRepository};
use crate::filter::CityFilter;
use crate::pagination::PageRequest;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(name) <= 50),
        description TEXT CHECK (description IS NULL OR length(description) <= 200)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS points_of_interest (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        city_id INTEGER NOT NULL REFERENCES cities (id) ON DELETE CASCADE,
        name TEXT NOT NULL CHECK (length(name) <= 50),
        description TEXT CHECK (description IS NULL OR length(description) <= 200)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_points_of_interest_city_id ON points_of_interest (city_id)",
];

/// SQLite-backed repository
#[derive(Clone)]
pub struct SqlRepository {
    pool: SqlitePool,
}

impl SqlRepository {
    /// Open a pool for `url` and create the schema if it is missing
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `sqlite::memory:` opens a separate database, so the
        // pool must keep exactly one connection alive for the process lifetime.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    async fn fetch_points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError> {
        let rows = sqlx::query_as::<_, PointOfInterest>(
            "SELECT id, city_id, name, description FROM points_of_interest WHERE city_id = ? ORDER BY id ASC",
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl CityInfoRepository for SqlRepository {
    async fn count_cities(&self, filter: &CityFilter) -> Result<u64, DatabaseError> {
        let query = cities_query(filter, None)?;
        QueryBuilder::<CityRow>::new(query).count(&self.pool).await
    }

    async fn list_cities(&self, filter: &CityFilter, page: PageRequest) -> Result<Vec<City>, DatabaseError> {
        let query = cities_query(filter, Some(page))?;
        let rows = QueryBuilder::<CityRow>::new(query).select_all(&self.pool).await?;
        Ok(rows.into_iter().map(City::from).collect())
    }

    async fn get_city(&self, city_id: i64, include_points_of_interest: bool) -> Result<Option<City>, DatabaseError> {
        let row = sqlx::query_as::<_, CityRow>("SELECT id, name, description FROM cities WHERE id = ?")
            .bind(city_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else { return Ok(None) };
        let mut city = City::from(row);
        if include_points_of_interest {
            city.points_of_interest = self.fetch_points_of_interest(city_id).await?;
        }
        Ok(Some(city))
    }

    async fn city_exists(&self, city_id: i64) -> Result<bool, DatabaseError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM cities WHERE id = ?")
            .bind(city_id)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    async fn city_name_matches_city_id(&self, city_name: Option<&str>, city_id: i64) -> Result<bool, DatabaseError> {
        let Some(city_name) = city_name else { return Ok(false) };
        let row = sqlx::query("SELECT COUNT(*) AS count FROM cities WHERE id = ? AND name = ?")
            .bind(city_id)
            .bind(city_name)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    async fn get_points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError> {
        self.fetch_points_of_interest(city_id).await
    }

    async fn get_point_of_interest(
        &self,
        city_id: i64,
        point_of_interest_id: i64,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        let row = sqlx::query_as::<_, PointOfInterest>(
            "SELECT id, city_id, name, description FROM points_of_interest WHERE city_id = ? AND id = ?",
        )
        .bind(city_id)
        .bind(point_of_interest_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_city(&self, city: NewCity) -> Result<City, DatabaseError> {
        let result = sqlx::query("INSERT INTO cities (name, description) VALUES (?, ?)")
            .bind(&city.name)
            .bind(&city.description)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_rowid();
        debug!("Inserted city {}", id);
        Ok(City {
            id,
            name: city.name,
            description: city.description,
            points_of_interest: vec![],
        })
    }

    async fn save_city(&self, city: &City) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE cities SET name = ?, description = ? WHERE id = ?")
            .bind(&city.name)
            .bind(&city.description)
            .bind(city.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("city {}", city.id)));
        }
        Ok(())
    }

    async fn delete_city(&self, city_id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let children = sqlx::query("DELETE FROM points_of_interest WHERE city_id = ?")
            .bind(city_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(city_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!(
            "Deleted city {} with {} points of interest",
            city_id,
            children.rows_affected()
        );
        Ok(result.rows_affected() > 0)
    }

    async fn add_point_of_interest(
        &self,
        city_id: i64,
        point_of_interest: NewPointOfInterest,
    ) -> Result<PointOfInterest, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT COUNT(*) AS count FROM cities WHERE id = ?")
            .bind(city_id)
            .fetch_one(&mut *tx)
            .await?;
        let count: i64 = row.try_get("count")?;
        if count == 0 {
            return Err(DatabaseError::NotFound(format!("city {}", city_id)));
        }

        let result = sqlx::query("INSERT INTO points_of_interest (city_id, name, description) VALUES (?, ?, ?)")
            .bind(city_id)
            .bind(&point_of_interest.name)
            .bind(&point_of_interest.description)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(PointOfInterest {
            id: result.last_insert_rowid(),
            city_id,
            name: point_of_interest.name,
            description: point_of_interest.description,
        })
    }

    async fn save_point_of_interest(&self, point_of_interest: &PointOfInterest) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE points_of_interest SET name = ?, description = ? WHERE id = ? AND city_id = ?")
            .bind(&point_of_interest.name)
            .bind(&point_of_interest.description)
            .bind(point_of_interest.id)
            .bind(point_of_interest.city_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("point of interest {}", point_of_interest.id)));
        }
        Ok(())
    }

    async fn delete_point_of_interest(&self, point_of_interest: &PointOfInterest) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM points_of_interest WHERE id = ? AND city_id = ?")
            .bind(point_of_interest.id)
            .bind(point_of_interest.city_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
