pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use handlers::BookingContext;
pub use router::{admin_routes, client_routes};
