pub mod guard;
pub mod handlers;
pub mod router;
pub mod services;

pub use guard::require_admin;
pub use services::session::SessionService;
