pub mod coordinator;
pub mod finalizer;
pub mod sweeper;
pub mod timer;

pub use coordinator::{LockCoordinator, LockOutcome};
pub use finalizer::BookingFinalizer;
pub use sweeper::ExpirySweeper;
pub use timer::{reconcile_session, HoldSession};
