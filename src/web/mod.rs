pub mod auth_handler;
pub mod cors;
pub mod db_info;
pub mod fallback;
pub mod health;
pub mod post_handler;
pub mod response;
pub mod router;

pub use router::{build_router, AppState};
