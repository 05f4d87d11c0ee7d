pub mod memory;
pub mod repository;

pub use memory::MemorySeatStore;
pub use repository::{RegistryError, SeatStore};
