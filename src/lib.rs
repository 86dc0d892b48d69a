//! SpotHelper relay library
//!
//! This library implements a stateless HTTP relay for bulk operations on
//! Spotify playlists and saved tracks: listing playlists, paging through the
//! tracks of a playlist (including the "Liked Songs" pseudo-playlist), adding,
//! removing and moving tracks in chunks, and checking which tracks are saved.
//! Callers authenticate through the OAuth authorization-code flow and keep
//! their tokens themselves; every request carries them.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the relay
//! - `config` - Configuration loaded from environment variables and `.env` files
//! - `error` - Error type shared by all modules and its HTTP representation
//! - `management` - Validation of the caller-supplied credentials
//! - `server` - Router and server startup
//! - `spotify` - Spotify Web API client and the operations built on it
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spothelper::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spothelper::Result<()> {
//!     config::load_env().await.ok();
//!     let config = Arc::new(config::Config::from_env()?);
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{AppError, Result};

/// Console line with a blue `o` marker, for CLI output that is not a log event.
///
/// ```
/// info!("Using Spotify API at {}", api_url);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Console line with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with status 1.
///
/// Only for startup failures of the binary; request handling never exits.
///
/// ```
/// error!("Cannot load configuration. Err: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Console line with a yellow `!` marker for recoverable problems.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
