pub mod app_config;
pub mod catalog;

pub use app_config::Config;
pub use catalog::{CatalogError, EventCatalog, EventSummary, SeatMapLayout};
