mod auth;

pub use auth::TokenManager;
pub use auth::parse_expires_at;
