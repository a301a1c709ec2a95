use async_trait::async_trait;
use eventboard_core::{GameSystem, Location};

use crate::error::StorageError;

/// Venues hosting events.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// All locations ordered by name.
    async fn list_locations(&self) -> Result<Vec<Location>, StorageError>;

    /// Find a location by exact name, creating a bare one if absent.
    async fn get_or_create_location(&self, name: &str) -> Result<Location, StorageError>;
}

/// Game systems and their slugs.
#[async_trait]
pub trait GameSystemStore: Send + Sync {
    /// All game systems ordered by name.
    async fn list_game_systems(&self) -> Result<Vec<GameSystem>, StorageError>;

    /// Find a game system by exact name, creating it if absent.
    ///
    /// New systems get `make_slug(name)`, suffixed `-1`, `-2`, ... until unique.
    async fn get_or_create_game_system(&self, name: &str) -> Result<GameSystem, StorageError>;
}
