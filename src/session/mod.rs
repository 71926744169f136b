//! Session controller for one game's view
//!
//! A [`SessionController`] owns the published [`SessionState`] for a single
//! game and turns user intents into provider calls. State is published through
//! a `watch` channel: readers take a [`snapshot`](SessionController::snapshot)
//! or follow [`updates`](SessionController::updates), and every transition
//! lands as one atomic replacement.
//!
//! Concurrency rules:
//! - `load_all` fans out its four fetches concurrently and commits all or nothing
//! - a newer `load_all` supersedes an older one; stale completions are dropped
//! - at most one `load_more` runs at a time, and none while a full load is in flight
//! - a check result is kept only if the selection still matches what was checked
//! - search results are kept only if the active search still matches what was searched

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, trace, warn};

use crate::LottoError;
use crate::provider::StatsProvider;
use crate::types::{DrawResult, FrequencyCategory, Game, GenerationMode};

mod state;

pub use state::{FrequencyData, Lifecycle, Paging, SearchState, Selection, SessionState};


/// Clears the paging flag when a `load_more` finishes or is dropped.
struct PagingGuard<'a>(&'a AtomicBool);

impl<'a> PagingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).ok().map(|_| Self(flag))
    }
}

impl Drop for PagingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counts a `load_all` as pending until it finishes or is dropped.
struct PendingLoad<'a>(&'a AtomicUsize);

impl<'a> PendingLoad<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::AcqRel);
        Self(count)
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Drives one game's statistics view against a [`StatsProvider`].
pub struct SessionController<P: StatsProvider> {
    game: Game,
    provider: Arc<P>,
    page_size: u32,
    state: watch::Sender<SessionState>,
    /// Bumped by every `load_all`; completions from older loads are discarded
    load_generation: AtomicU64,
    /// Full loads still running, superseded ones included
    pending_loads: AtomicUsize,
    paging_in_flight: AtomicBool,
}

impl<P: StatsProvider> SessionController<P> {
    /// Create an idle controller. Nothing is fetched until [`load_all`](Self::load_all).
    pub fn new(game: Game, provider: Arc<P>, page_size: u32) -> Self {
        info!("Opening {} session (page size {})", game, page_size);
        let (state, _) = watch::channel(SessionState::new(game));
        Self {
            game,
            provider,
            page_size,
            state,
            load_generation: AtomicU64::new(0),
            pending_loads: AtomicUsize::new(0),
            paging_in_flight: AtomicBool::new(false),
        }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Stream of published states, starting with the current one.
    pub fn updates(&self) -> WatchStream<SessionState> {
        WatchStream::new(self.state.subscribe())
    }

    /// Accumulated draws dated on or before `as_of`.
    pub fn filtered_results(&self, as_of: NaiveDate) -> Vec<DrawResult> {
        self.state.borrow().filtered_results(as_of)
    }

    /// Search hits while a search is active, else [`filtered_results`](Self::filtered_results).
    pub fn displayed_results(&self, as_of: NaiveDate) -> Vec<DrawResult> {
        self.state.borrow().displayed_results(as_of)
    }

    /// Fetch frequencies, position frequencies and the first page of draws.
    ///
    /// The four requests run concurrently. On success all data is replaced
    /// at once and paging restarts at page 1; on the first failure the session
    /// becomes failed and previously loaded data is left untouched.
    pub async fn load_all(&self) {
        let _pending = PendingLoad::enter(&self.pending_loads);
        let generation = self.load_generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!("Loading {} statistics (load {})", self.game, generation);
        self.state.send_modify(|state| state.lifecycle = Lifecycle::Loading);

        let game = self.game;
        let fetched = tokio::try_join!(
            self.provider.fetch_frequencies(game, FrequencyCategory::Main),
            self.provider.fetch_frequencies(game, FrequencyCategory::Special),
            self.provider.fetch_position_frequencies(game, None),
            self.provider.fetch_latest_results(game, 1, self.page_size),
        );

        if self.is_superseded(generation) {
            debug!("Discarding superseded load {} for {}", generation, game);
            return;
        }

        match fetched {
            Ok((overall, special_ball, positions, first_page)) => {
                let frequency_data = FrequencyData::backfilled(game, overall, special_ball, positions);
                self.state.send_modify(|state| {
                    state.frequency_data = frequency_data;
                    state.paging.reset(first_page);
                    state.lifecycle = Lifecycle::Loaded;
                    info!(
                        "Loaded {} statistics: {} draws, more available: {}",
                        game,
                        state.paging.results.len(),
                        state.paging.has_more
                    );
                });
            }
            Err(e) => self.fail("load statistics", &e),
        }
    }

    /// Append the next page of latest draws.
    ///
    /// No-op when nothing more is available, while a full load is in flight,
    /// or while another `load_more` is running. A pending check, generation
    /// or search does not block paging.
    pub async fn load_more(&self) {
        let Some(_guard) = PagingGuard::acquire(&self.paging_in_flight) else {
            trace!("Next page already loading for {}", self.game);
            return;
        };

        let full_load_pending = self.pending_loads.load(Ordering::Acquire) > 0;
        let next_page = {
            let state = self.state.borrow();
            if !state.paging.has_more || full_load_pending {
                trace!(
                    "Skipping next page for {} (has_more: {}, full load pending: {})",
                    self.game,
                    state.paging.has_more,
                    full_load_pending
                );
                return;
            }
            state.paging.page + 1
        };

        let generation = self.load_generation.load(Ordering::Acquire);
        debug!("Loading page {} of {} draws", next_page, self.game);
        let fetched = self.provider.fetch_latest_results(self.game, next_page, self.page_size).await;

        if self.is_superseded(generation) {
            debug!("Discarding page {} of {}: a full reload started", next_page, self.game);
            return;
        }

        match fetched {
            Ok(page) => self.state.send_modify(|state| {
                let added = state.paging.append(next_page, page);
                debug!(
                    "Page {} added {} draws ({} total, more available: {})",
                    next_page,
                    added,
                    state.paging.results.len(),
                    state.paging.has_more
                );
            }),
            Err(e) => self.fail("load more draws", &e),
        }
    }

    /// Toggle a main number in the selection.
    pub fn toggle_number(&self, number: u8) {
        self.state.send_if_modified(|state| {
            let changed = state.toggle_number(number);
            trace!("Selection now {:?}", state.selection.numbers);
            changed
        });
    }

    /// Select the special ball, or clear it when selected again.
    pub fn select_special_ball(&self, number: u8) {
        self.state.send_if_modified(|state| state.select_special_ball(number));
    }

    /// Look up the selected combination in the draw history.
    ///
    /// No-op unless five numbers and a special ball are selected.
    pub async fn check_combination(&self) {
        let Some((numbers, special_ball)) = self.checkable_selection() else {
            trace!("Selection for {} is incomplete; not checking", self.game);
            return;
        };

        self.state.send_modify(|state| {
            state.selection.last_check_result = None;
            state.lifecycle = Lifecycle::Loading;
        });

        let sorted: Vec<u8> = numbers.iter().copied().collect();
        info!("Checking {} combination {:?} + {}", self.game, sorted, special_ball);

        match self.provider.check_combination(self.game, sorted, Some(special_ball)).await {
            Ok(result) => self.state.send_modify(|state| {
                if state.selection.numbers == numbers && state.selection.special_ball == Some(special_ball) {
                    debug!("Combination drawn before: {} ({} matches)", result.exists, result.matches.len());
                    state.selection.last_check_result = Some(result);
                } else {
                    debug!("Selection changed during check; dropping result");
                }
                state.lifecycle = Lifecycle::Loaded;
            }),
            Err(e) => self.fail("check combination", &e),
        }
    }

    /// Ask the service for a combination and make it the selection.
    pub async fn generate_combination(&self, mode: GenerationMode) {
        info!("Generating {:?} combination for {}", mode, self.game);
        self.state.send_modify(|state| state.lifecycle = Lifecycle::Loading);

        match self.provider.generate_combination(self.game, mode).await {
            Ok(combination) => {
                if combination.mode() != mode {
                    warn!("Requested {:?} generation but received {:?}", mode, combination.mode());
                }
                self.state.send_modify(|state| {
                    state.selection.numbers = combination.main_numbers.iter().copied().collect();
                    state.selection.special_ball = Some(combination.special_ball);
                    state.selection.last_check_result = None;
                    state.selection.last_generated = Some(combination);
                    state.lifecycle = Lifecycle::Loaded;
                });
            }
            Err(e) => self.fail("generate combination", &e),
        }
    }

    /// Toggle a main number in the search.
    pub fn toggle_search_number(&self, number: u8) {
        self.state.send_if_modified(|state| {
            let changed = state.toggle_search_number(number);
            trace!("Search numbers now {:?}", state.search.numbers);
            changed
        });
    }

    /// Select the search special ball, or clear it when selected again.
    pub fn toggle_search_special_ball(&self, number: u8) {
        self.state.send_if_modified(|state| state.toggle_search_special_ball(number));
    }

    /// Find past draws containing the searched numbers.
    ///
    /// No-op unless five search numbers are chosen. The special ball is
    /// optional. Results are shown in place of the latest draws until the
    /// search is cleared, and are dropped if the search numbers or ball
    /// changed while the request was in flight.
    pub async fn search_winning_numbers(&self) {
        let (searched, special_ball) = {
            let state = self.state.borrow();
            if !state.can_search() {
                trace!("Search for {} needs five numbers", self.game);
                return;
            }
            (state.search.numbers.clone(), state.search.special_ball)
        };
        let numbers: Vec<u8> = searched.iter().copied().collect();

        info!("Searching {} draws for {:?} + {:?}", self.game, numbers, special_ball);
        self.state.send_modify(|state| {
            state.search.active = true;
            state.search.results.clear();
            state.lifecycle = Lifecycle::Loading;
        });

        match self.provider.check_combination(self.game, numbers.clone(), special_ball).await {
            Ok(result) => {
                let results = result.into_draw_results(&numbers);
                self.state.send_modify(|state| {
                    if state.search.active
                        && state.search.numbers == searched
                        && state.search.special_ball == special_ball
                    {
                        debug!("Search found {} draws", results.len());
                        state.search.results = results;
                    } else {
                        debug!("Search changed before results arrived; dropping them");
                    }
                    state.lifecycle = Lifecycle::Loaded;
                });
            }
            Err(e) => self.fail("search draws", &e),
        }
    }

    /// Reset the search and return to the latest draws.
    pub fn clear_search(&self) {
        self.state.send_if_modified(|state| state.clear_search());
    }

    fn checkable_selection(&self) -> Option<(BTreeSet<u8>, u8)> {
        let state = self.state.borrow();
        if !state.can_check_combination() {
            return None;
        }
        Some((state.selection.numbers.clone(), state.selection.special_ball?))
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.load_generation.load(Ordering::Acquire) != generation
    }

    fn fail(&self, action: &str, error: &LottoError) {
        warn!("Failed to {} for {}: {}", action, self.game, error);
        if error.is_retryable() {
            debug!("Recovery: {}", error.recovery_suggestions().join("; "));
        }
        let message = error.to_string();
        self.state.send_modify(|state| state.lifecycle = Lifecycle::Failed(message));
    }
}
