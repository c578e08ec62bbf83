//! Map/zone service: positions, floor items and map-wide statuses.
use async_trait::async_trait;

use crate::ids::{EntityId, ItemId, MapStatusId, Position};

#[async_trait]
pub trait MapOracle: Send + Sync {
    fn position(&self, id: EntityId) -> Option<Position>;

    /// Characters within `radius` tiles of `center`, sorted by id.
    fn characters_within(&self, center: Position, radius: u32) -> Vec<EntityId>;

    fn items_at(&self, position: Position) -> Vec<ItemId>;

    fn has_map_status(&self, status: &MapStatusId) -> bool;

    fn map_statuses(&self) -> Vec<MapStatusId>;

    async fn drop_item(&self, position: Position, item: ItemId);

    async fn remove_item(&self, position: Position, item: &ItemId) -> bool;

    /// False when the status was already active.
    async fn add_map_status(&self, status: MapStatusId) -> bool;

    async fn remove_map_status(&self, status: &MapStatusId) -> bool;

    /// Tile distance between two characters, if both are placed.
    fn distance(&self, a: EntityId, b: EntityId) -> Option<u32> {
        Some(self.position(a)?.distance(self.position(b)?))
    }
}
