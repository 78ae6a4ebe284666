pub mod client;
pub mod listen;

pub use client::StoreClient;
pub use listen::{subscribe_appointments, AppointmentSubscription, SnapshotEvent};
