//! Domain types for lottery statistics.
//!
//! Plain data plus the decoding rules needed for the service's wire format:
//! - [`Game`] fixes number ranges, naming, and endpoint slugs per game
//! - [`DrawResult`] and [`LatestResultsPage`] hold historical draws
//! - [`NumberFrequency`] and [`PositionFrequencyGroup`] hold frequency tables
//! - [`CombinationQueryResult`] and [`GeneratedCombination`] hold combination data
//!
//! ## Tolerant decoding
//!
//! Both games share one schema but spell the special ball differently. Records
//! accept either spelling and always encode as `special_ball`:
//!
//! ```rust
//! use lotto_stats::DrawResult;
//!
//! let json = r#"{"draw_date": "2025-02-26", "main_numbers": [28, 48, 55, 60, 62],
//!                "powerball": 20, "multiplier": 2.0}"#;
//! let draw: DrawResult = serde_json::from_str(json).unwrap();
//! assert_eq!(draw.special_ball, 20);
//! assert_eq!(draw.multiplier, Some(2));
//! ```

mod combination;
mod draw;
mod envelope;
mod frequency;
mod game;
mod wire;

pub use combination::{
    CheckCombinationRequest, CombinationMatch, CombinationQueryResult, GeneratedCombination,
};
pub use draw::{DrawResult, LatestResultsPage};
pub use envelope::{ApiEnvelope, ErrorEnvelope};
pub use frequency::{
    NumberFrequency, PositionFrequency, PositionFrequencyGroup, backfill_range, group_by_position,
};
pub(crate) use frequency::{FrequencyPayload, PositionFrequencyPayload};
pub use game::{FrequencyCategory, Game, GenerationMode, MAIN_NUMBER_COUNT};
