// handlers/mod.rs - HTTP handlers, one module per endpoint
//
// Handlers stay thin: decode the body, call the matching service with
// collaborators from AppState, and map service errors into ApiError.

pub mod auth;     // POST /register, POST /login
pub mod insights; // GET /insights
pub mod query;    // POST /query
pub mod root;     // GET /, GET /health
pub mod submit;   // POST /submit

pub use auth::{login_post, register_post};
pub use insights::insights_get;
pub use query::query_post;
pub use root::{health, root};
pub use submit::submit_post;
