//! Provider trait for statistics sources

use crate::Result;
use crate::types::{
    CombinationQueryResult, FrequencyCategory, Game, GeneratedCombination, GenerationMode,
    LatestResultsPage, NumberFrequency, PositionFrequency,
};

/// Trait for lottery statistics sources
///
/// Providers abstract over where statistics come from (the HTTP service, or
/// an in-memory fake in tests). Each call is a single attempt: providers never
/// retry and never cache.
#[async_trait::async_trait]
pub trait StatsProvider: Send + Sync + 'static {
    /// Frequency table for main numbers or special balls
    async fn fetch_frequencies(
        &self,
        game: Game,
        category: FrequencyCategory,
    ) -> Result<Vec<NumberFrequency>>;

    /// Position-tagged frequencies, optionally restricted to one position
    async fn fetch_position_frequencies(
        &self,
        game: Game,
        position: Option<u8>,
    ) -> Result<Vec<PositionFrequency>>;

    /// One page of the latest draws; pages are 1-based
    async fn fetch_latest_results(
        &self,
        game: Game,
        page: u32,
        page_size: u32,
    ) -> Result<LatestResultsPage>;

    /// Look up a combination in the draw history
    ///
    /// Numbers are sent in the order given; callers sort them.
    async fn check_combination(
        &self,
        game: Game,
        numbers: Vec<u8>,
        special_ball: Option<u8>,
    ) -> Result<CombinationQueryResult>;

    /// Ask the service to generate a combination
    async fn generate_combination(
        &self,
        game: Game,
        mode: GenerationMode,
    ) -> Result<GeneratedCombination>;
}
