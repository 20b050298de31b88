// handlers/auth/mod.rs - Registration and login handlers
//
// Both endpoints delegate to the identity provider through AuthGateway.
// Nothing is stored here; the access token goes back to the caller as issued.

use serde::Deserialize;

pub mod login;    // POST /login - exchange credentials for a session
pub mod register; // POST /register - create a provider account

pub use login::login_post;
pub use register::register_post;

/// Body shared by /submit, /register and /login
#[derive(Debug, Clone, Deserialize)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub password: String,
}
