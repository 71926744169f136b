//! Async client and view-state controller for a lottery statistics service.
//!
//! Lotto Stats talks to a statistics service for Mega Millions and Powerball
//! and keeps one observable [`SessionState`] per game: frequency tables, the
//! latest draws (paged), a picked combination with its history lookup, and a
//! search over past draws.
//!
//! # Features
//!
//! - **Typed wire model**: Tolerant decoding of both games' payload shapes
//! - **Concurrent loading**: Frequencies and draws fetched in parallel, committed atomically
//! - **Observable state**: Snapshots and a `watch`-backed update stream
//! - **Pluggable sources**: Any [`StatsProvider`] can back a session
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lotto_stats::{ClientConfig, Game, LottoStats};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> lotto_stats::Result<()> {
//!     let session = LottoStats::open(Game::MegaMillions, ClientConfig::default())?;
//!     let mut updates = session.updates();
//!
//!     session.load_all().await;
//!     if let Some(state) = updates.next().await {
//!         println!("{} draws loaded", state.paging.results.len());
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod config;
mod error;
#[cfg(test)]
mod test_utils;
pub mod types;

// Providers and the session controller
pub mod provider;
pub mod providers;
pub mod session;

// Core exports
pub use config::*;
pub use error::*;
pub use types::*;

// Main API exports
pub use provider::StatsProvider;
pub use providers::HttpProvider;
pub use session::{FrequencyData, Lifecycle, Paging, SearchState, Selection, SessionController, SessionState};

use std::sync::Arc;

/// Entry point for statistics sessions backed by the HTTP service.
///
/// # Examples
///
/// ```rust,no_run
/// use lotto_stats::{Game, LottoStats};
///
/// # #[tokio::main]
/// # async fn main() -> lotto_stats::Result<()> {
/// let session = LottoStats::connect(Game::Powerball, "http://localhost:8000")?;
/// session.load_all().await;
/// # Ok(())
/// # }
/// ```
pub struct LottoStats;

impl LottoStats {
    /// Create an idle session for `game` using `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from the config.
    pub fn open(game: Game, config: ClientConfig) -> Result<SessionController<HttpProvider>> {
        let page_size = config.page_size;
        let provider = HttpProvider::new(config)?;
        Ok(SessionController::new(game, Arc::new(provider), page_size))
    }

    /// Create an idle session for `game` against the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` is not an absolute http(s) URL.
    pub fn connect(game: Game, base_url: &str) -> Result<SessionController<HttpProvider>> {
        Self::open(game, ClientConfig::new(base_url)?)
    }
}
