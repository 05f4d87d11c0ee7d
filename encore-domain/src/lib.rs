pub mod booking;
pub mod events;
pub mod policy;
pub mod seat;

pub use booking::Booking;
pub use events::SeatEvent;
pub use policy::HoldPolicy;
pub use seat::{Seat, SeatState, SeatStatus};
