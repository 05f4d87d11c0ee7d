use std::collections::HashMap;

use chrono::{DateTime, Utc};
use encore_domain::Seat;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

const MAX_GRID_DIMENSION: u32 = 200;

/// Seat grid dimensions for an event's venue. Seeding materializes
/// rows x columns AVAILABLE seats in the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeatMapLayout {
    pub rows: u32,
    pub columns: u32,
    /// Per-seat price in minor currency units
    pub seat_price: i64,
}

impl SeatMapLayout {
    pub fn generate_seats(&self, event_id: Uuid) -> Vec<Seat> {
        let mut seats = Vec::with_capacity((self.rows * self.columns) as usize);
        for row in 1..=self.rows {
            for column in 1..=self.columns {
                seats.push(Seat::available(event_id, row, column, self.seat_price));
            }
        }
        seats
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub name: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub layout: SeatMapLayout,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid seat layout: {0}")]
    InvalidLayout(String),
}

/// In-memory event catalog. Read-only to the reservation core; the seat
/// registry learns about an event exactly once, at seeding time.
pub struct EventCatalog {
    events: RwLock<HashMap<Uuid, EventSummary>>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_event(
        &self,
        name: String,
        venue: String,
        starts_at: DateTime<Utc>,
        layout: SeatMapLayout,
    ) -> Result<EventSummary, CatalogError> {
        if layout.rows == 0 || layout.columns == 0 {
            return Err(CatalogError::InvalidLayout(
                "grid must have at least one row and one column".to_string(),
            ));
        }
        if layout.rows > MAX_GRID_DIMENSION || layout.columns > MAX_GRID_DIMENSION {
            return Err(CatalogError::InvalidLayout(format!(
                "grid dimensions capped at {}",
                MAX_GRID_DIMENSION
            )));
        }
        if layout.seat_price < 0 {
            return Err(CatalogError::InvalidLayout(
                "seat price must not be negative".to_string(),
            ));
        }

        let event = EventSummary {
            id: Uuid::new_v4(),
            name,
            venue,
            starts_at,
            layout,
            created_at: Utc::now(),
        };
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    pub async fn get_event(&self, event_id: Uuid) -> Result<EventSummary, CatalogError> {
        self.events
            .read()
            .await
            .get(&event_id)
            .cloned()
            .ok_or(CatalogError::NotFound(event_id))
    }

    /// All events ordered by start time.
    pub async fn list_events(&self) -> Vec<EventSummary> {
        let mut events: Vec<EventSummary> = self.events.read().await.values().cloned().collect();
        events.sort_by_key(|e| e.starts_at);
        events
    }

    pub async fn remove_event(&self, event_id: Uuid) -> Result<EventSummary, CatalogError> {
        self.events
            .write()
            .await
            .remove(&event_id)
            .ok_or(CatalogError::NotFound(event_id))
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rows: u32, columns: u32) -> SeatMapLayout {
        SeatMapLayout {
            rows,
            columns,
            seat_price: 4500,
        }
    }

    #[tokio::test]
    async fn test_event_lifecycle() {
        let catalog = EventCatalog::new();
        let event = catalog
            .create_event(
                "Night Concert".to_string(),
                "Grand Hall".to_string(),
                Utc::now(),
                layout(5, 8),
            )
            .await
            .unwrap();

        assert_eq!(catalog.get_event(event.id).await.unwrap().name, "Night Concert");
        assert_eq!(catalog.list_events().await.len(), 1);

        catalog.remove_event(event.id).await.unwrap();
        assert!(matches!(
            catalog.get_event(event.id).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_layout_validation() {
        let catalog = EventCatalog::new();
        let err = catalog
            .create_event("X".to_string(), "Y".to_string(), Utc::now(), layout(0, 8))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidLayout(_)));
    }

    #[test]
    fn test_generate_seats_covers_grid() {
        let event_id = Uuid::new_v4();
        let seats = layout(3, 4).generate_seats(event_id);
        assert_eq!(seats.len(), 12);
        assert!(seats.iter().all(|s| s.event_id == event_id));
        assert_eq!(seats.last().map(|s| (s.row, s.column)), Some((3, 4)));
    }
}
