//! Published session state
//!
//! [`SessionState`] is the immutable snapshot a display layer renders. The
//! synchronous transitions (selection and search toggles) live here so they
//! can be tested without a runtime; the controller applies them atomically.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace};

use crate::types::{
    CombinationQueryResult, DrawResult, Game, GeneratedCombination, LatestResultsPage,
    MAIN_NUMBER_COUNT, NumberFrequency, PositionFrequency, PositionFrequencyGroup, backfill_range,
    group_by_position,
};

/// View lifecycle. Every state is re-enterable; none is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum Lifecycle {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last operation failed with this message
    Failed(String),
}

/// Frequency tables for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FrequencyData {
    pub overall: Vec<NumberFrequency>,
    pub by_position: Vec<PositionFrequencyGroup>,
    pub special_ball: Vec<NumberFrequency>,
}

impl FrequencyData {
    /// Build tables covering the game's full ranges.
    pub fn backfilled(
        game: Game,
        overall: Vec<NumberFrequency>,
        special_ball: Vec<NumberFrequency>,
        positions: Vec<PositionFrequency>,
    ) -> Self {
        let by_position = group_by_position(positions)
            .into_iter()
            .map(|group| PositionFrequencyGroup {
                position: group.position,
                entries: backfill_range(&group.entries, game.main_number_range()),
            })
            .collect();

        Self {
            overall: backfill_range(&overall, game.main_number_range()),
            by_position,
            special_ball: backfill_range(&special_ball, game.special_ball_range()),
        }
    }
}

/// The user's picked combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Selection {
    pub numbers: BTreeSet<u8>,
    pub special_ball: Option<u8>,
    /// Cleared whenever the selection changes
    pub last_check_result: Option<CombinationQueryResult>,
    /// Most recent generated combination, kept for display
    pub last_generated: Option<GeneratedCombination>,
}

/// Search for past draws matching a combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SearchState {
    pub active: bool,
    pub numbers: BTreeSet<u8>,
    pub special_ball: Option<u8>,
    pub results: Vec<DrawResult>,
}

/// Latest draws accumulated page by page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Paging {
    /// Append-only between full reloads
    pub results: Vec<DrawResult>,
    /// Last page loaded, 1-based
    pub page: u32,
    pub has_more: bool,
}

impl Default for Paging {
    fn default() -> Self {
        Self { results: Vec::new(), page: 1, has_more: false }
    }
}

impl Paging {
    /// Replace everything with the first page.
    pub(crate) fn reset(&mut self, first: LatestResultsPage) {
        self.results = first.results;
        self.page = 1;
        self.has_more = first.has_more;
    }

    /// Append `page`, skipping draws already present. Returns how many were added.
    pub(crate) fn append(&mut self, page_number: u32, page: LatestResultsPage) -> usize {
        let known: HashSet<NaiveDate> = self.results.iter().map(|draw| draw.draw_date).collect();
        let before = self.results.len();
        let incoming = page.results.len();

        self.results.extend(page.results.into_iter().filter(|draw| !known.contains(&draw.draw_date)));
        self.page = page_number;
        self.has_more = page.has_more;

        let added = self.results.len() - before;
        if added < incoming {
            debug!("Skipped {} draws already loaded from page {}", incoming - added, page_number);
        }
        added
    }
}

/// Everything a display layer needs for one game's view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SessionState {
    pub game: Game,
    pub lifecycle: Lifecycle,
    pub frequency_data: FrequencyData,
    pub selection: Selection,
    pub search: SearchState,
    pub paging: Paging,
}

/// Toggle `number` in a set capped at five members. Returns whether it changed.
fn toggle_capped(set: &mut BTreeSet<u8>, number: u8) -> bool {
    if set.remove(&number) {
        true
    } else if set.len() < MAIN_NUMBER_COUNT {
        set.insert(number)
    } else {
        false
    }
}

/// Select `number`, or clear it if already selected.
fn toggle_optional(slot: &mut Option<u8>, number: u8) {
    *slot = if *slot == Some(number) { None } else { Some(number) };
}

impl SessionState {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            lifecycle: Lifecycle::Idle,
            frequency_data: FrequencyData::default(),
            selection: Selection::default(),
            search: SearchState::default(),
            paging: Paging::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle == Lifecycle::Loading
    }

    /// Message of the last failure, if the session is failed.
    pub fn error(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn can_check_combination(&self) -> bool {
        self.selection.numbers.len() == MAIN_NUMBER_COUNT && self.selection.special_ball.is_some()
    }

    pub fn can_search(&self) -> bool {
        self.search.numbers.len() == MAIN_NUMBER_COUNT
    }

    /// Earliest draw date loaded so far.
    pub fn oldest_result_date(&self) -> Option<NaiveDate> {
        self.paging.results.iter().map(|draw| draw.draw_date).min()
    }

    /// Accumulated draws dated on or before `as_of`, in load order.
    pub fn filtered_results(&self, as_of: NaiveDate) -> Vec<DrawResult> {
        self.paging.results.iter().filter(|draw| draw.draw_date <= as_of).cloned().collect()
    }

    /// What a results list shows: search hits while searching, else filtered draws.
    pub fn displayed_results(&self, as_of: NaiveDate) -> Vec<DrawResult> {
        if self.search.active {
            self.search.results.clone()
        } else {
            self.filtered_results(as_of)
        }
    }

    /// Toggle a main number in the selection. Returns whether state changed.
    ///
    /// Adding beyond five numbers, or a number outside the game's range, is
    /// ignored. Any previous check result is discarded either way.
    pub fn toggle_number(&mut self, number: u8) -> bool {
        let changed = if self.game.main_number_range().contains(&number) {
            toggle_capped(&mut self.selection.numbers, number)
        } else {
            trace!("Ignoring out-of-range number {} for {}", number, self.game);
            false
        };
        changed | self.selection.last_check_result.take().is_some()
    }

    /// Select or clear the special ball. Returns whether state changed.
    pub fn select_special_ball(&mut self, number: u8) -> bool {
        let changed = if self.game.special_ball_range().contains(&number) {
            toggle_optional(&mut self.selection.special_ball, number);
            true
        } else {
            trace!("Ignoring out-of-range {} {}", self.game.special_ball_name(), number);
            false
        };
        changed | self.selection.last_check_result.take().is_some()
    }

    /// Toggle a main number in the search. Returns whether state changed.
    pub fn toggle_search_number(&mut self, number: u8) -> bool {
        if !self.game.main_number_range().contains(&number) {
            trace!("Ignoring out-of-range search number {} for {}", number, self.game);
            return false;
        }
        toggle_capped(&mut self.search.numbers, number)
    }

    /// Select or clear the search special ball. Returns whether state changed.
    pub fn toggle_search_special_ball(&mut self, number: u8) -> bool {
        if !self.game.special_ball_range().contains(&number) {
            return false;
        }
        toggle_optional(&mut self.search.special_ball, number);
        true
    }

    /// Reset the search to its initial values. Returns whether state changed.
    pub fn clear_search(&mut self) -> bool {
        let cleared = SearchState::default();
        if self.search == cleared {
            return false;
        }
        self.search = cleared;
        true
    }
}
