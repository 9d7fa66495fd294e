// --- File: crates/salon_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod availability; // busy schedule, slot filtering, first-fit assignment
#[cfg(test)]
mod availability_proptest;
pub mod booking; // async booking service over a BookingStore
#[cfg(test)]
mod booking_test;
pub mod catalog;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod hours;
pub mod presentation;
pub mod routes;
pub mod salon;
pub mod slots;
#[cfg(test)]
mod slots_proptest;

pub use availability::{assign_stylist, filter_slots_any, filter_slots_for_stylist, BusySchedule};
pub use booking::{
    normalize_phone, AvailableTimes, BlockTimeRequest, BookingRequest, BookingStage,
    SchedulingService,
};
pub use error::SchedulingError;
pub use salon::Salon;
pub use slots::{generate_slots, SLOT_STEP_MINUTES};
