//! LocationStore and GameSystemStore implementations for PgStorage.

use super::*;

use crate::traits::{GameSystemStore, LocationStore};
use async_trait::async_trait;
use eventboard_core::{make_slug, slug_candidates};

#[async_trait]
impl LocationStore for PgStorage {
    async fn list_locations(&self) -> Result<Vec<Location>, StorageError> {
        let rows =
            sqlx::query(&format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY name, id"))
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(row_to_location).collect()
    }

    async fn get_or_create_location(&self, name: &str) -> Result<Location, StorageError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(&format!(
            "INSERT INTO locations (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {LOCATION_COLUMNS}"
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        row_to_location(&row)
    }
}

impl PgStorage {
    async fn find_game_system(&self, name: &str) -> Result<Option<GameSystem>, StorageError> {
        let row =
            sqlx::query(&format!("SELECT {GAME_SYSTEM_COLUMNS} FROM game_systems WHERE name = $1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| row_to_game_system(&r)).transpose()
    }
}

#[async_trait]
impl GameSystemStore for PgStorage {
    async fn list_game_systems(&self) -> Result<Vec<GameSystem>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {GAME_SYSTEM_COLUMNS} FROM game_systems ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_game_system).collect()
    }

    async fn get_or_create_game_system(&self, name: &str) -> Result<GameSystem, StorageError> {
        if let Some(existing) = self.find_game_system(name).await? {
            return Ok(existing);
        }
        let base = make_slug(name);
        for slug in slug_candidates(&base) {
            let inserted = sqlx::query(&format!(
                "INSERT INTO game_systems (name, slug) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING
                 RETURNING {GAME_SYSTEM_COLUMNS}"
            ))
            .bind(name)
            .bind(&slug)
            .fetch_optional(&self.pool)
            .await?;
            if let Some(row) = inserted {
                tracing::debug!(name, slug = %slug, "created game system");
                return row_to_game_system(&row);
            }
            // Either the slug is taken or a concurrent insert won the name.
            if let Some(existing) = self.find_game_system(name).await? {
                return Ok(existing);
            }
        }
        Err(StorageError::Duplicate(format!("no free slug for game system {name}")))
    }
}
