//! Web server module
//!
//! Serves field markup and the per-field search action.

mod handlers;
mod routes;
mod state;
mod templates;

pub use handlers::PJAX_HEADER;
pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
