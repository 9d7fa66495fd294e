//! Booking store implementations

pub mod booking_factory;
pub mod booking_memory;
pub mod booking_sql;

pub use booking_factory::BookingStoreFactory;
pub use booking_memory::InMemoryBookingStore;
pub use booking_sql::SqlBookingStore;
