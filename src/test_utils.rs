//! Test utilities: a scripted in-memory provider and fixture builders
//!
//! [`ScriptedProvider`] answers every [`StatsProvider`] call from canned
//! outcomes, records each call, and can delay or gate calls so tests can
//! exercise the session controller's concurrency rules deterministically.

#![cfg(test)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::Barrier;

use crate::provider::StatsProvider;
use crate::types::{
    CombinationMatch, CombinationQueryResult, DrawResult, FrequencyCategory, Game,
    GeneratedCombination, GenerationMode, LatestResultsPage, NumberFrequency, PositionFrequency,
};
use crate::{LottoError, Result};

/// Sequence of canned outcomes; the last one repeats once the rest are used.
#[derive(Debug)]
pub struct Script<T> {
    queue: VecDeque<std::result::Result<T, String>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self { queue: VecDeque::new() }
    }
}

impl<T: Clone> Script<T> {
    fn push(&mut self, outcome: std::result::Result<T, String>) {
        self.queue.push_back(outcome);
    }

    fn next(&mut self, what: &str) -> Result<T> {
        let outcome = if self.queue.len() > 1 { self.queue.pop_front() } else { self.queue.front().cloned() };
        match outcome {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(LottoError::server_error(message)),
            None => Err(LottoError::server_error(format!("{} not scripted", what))),
        }
    }
}

/// A call the scripted provider received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Frequencies(FrequencyCategory),
    PositionFrequencies(Option<u8>),
    LatestResults { page: u32, page_size: u32 },
    CheckCombination { numbers: Vec<u8>, special_ball: Option<u8> },
    Generate(GenerationMode),
}

/// In-memory [`StatsProvider`] answering from scripts.
#[derive(Default)]
pub struct ScriptedProvider {
    main_frequencies: Mutex<Script<Vec<NumberFrequency>>>,
    special_frequencies: Mutex<Script<Vec<NumberFrequency>>>,
    position_frequencies: Mutex<Script<Vec<PositionFrequency>>>,
    pages: Mutex<HashMap<u32, Script<LatestResultsPage>>>,
    checks: Mutex<Script<CombinationQueryResult>>,
    generated: Mutex<HashMap<GenerationMode, Script<GeneratedCombination>>>,
    page_delays: Mutex<VecDeque<Duration>>,
    check_delays: Mutex<VecDeque<Duration>>,
    gate: Mutex<Option<Arc<Barrier>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider answering every load-class call successfully.
    pub fn loaded() -> Self {
        let provider = Self::new();
        provider.script_frequencies(FrequencyCategory::Main, Ok(vec![frequency(1, 10)]));
        provider.script_frequencies(FrequencyCategory::Special, Ok(vec![frequency(2, 4)]));
        provider.script_position_frequencies(Ok(vec![position_frequency(1, 1, 3)]));
        provider.script_page(
            1,
            Ok(page(vec![draw("2025-02-25", [4, 8, 11, 32, 52], 13), draw("2025-02-21", [1, 13, 28, 37, 46], 10)], true)),
        );
        provider
    }

    pub fn script_frequencies(&self, category: FrequencyCategory, outcome: std::result::Result<Vec<NumberFrequency>, String>) {
        match category {
            FrequencyCategory::Main => self.main_frequencies.lock().unwrap().push(outcome),
            FrequencyCategory::Special => self.special_frequencies.lock().unwrap().push(outcome),
        }
    }

    pub fn script_position_frequencies(&self, outcome: std::result::Result<Vec<PositionFrequency>, String>) {
        self.position_frequencies.lock().unwrap().push(outcome);
    }

    pub fn script_page(&self, page: u32, outcome: std::result::Result<LatestResultsPage, String>) {
        self.pages.lock().unwrap().entry(page).or_default().push(outcome);
    }

    pub fn script_check(&self, outcome: std::result::Result<CombinationQueryResult, String>) {
        self.checks.lock().unwrap().push(outcome);
    }

    pub fn script_generate(&self, mode: GenerationMode, outcome: std::result::Result<GeneratedCombination, String>) {
        self.generated.lock().unwrap().entry(mode).or_default().push(outcome);
    }

    /// Delay successive latest-results calls by these durations, in order.
    pub fn delay_pages(&self, delays: impl IntoIterator<Item = Duration>) {
        self.page_delays.lock().unwrap().extend(delays);
    }

    /// Delay successive check calls by these durations, in order.
    ///
    /// Each call takes its scripted outcome before sleeping, so outcomes
    /// follow call order even when the calls finish out of order.
    pub fn delay_checks(&self, delays: impl IntoIterator<Item = Duration>) {
        self.check_delays.lock().unwrap().extend(delays);
    }

    /// Make every load-class call wait on `barrier` before answering.
    pub fn gate_loads(&self, barrier: Arc<Barrier>) {
        *self.gate.lock().unwrap() = Some(barrier);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, predicate: impl Fn(&RecordedCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(barrier) = gate {
            barrier.wait().await;
        }
    }
}

#[async_trait::async_trait]
impl StatsProvider for ScriptedProvider {
    async fn fetch_frequencies(&self, _game: Game, category: FrequencyCategory) -> Result<Vec<NumberFrequency>> {
        self.record(RecordedCall::Frequencies(category));
        self.pass_gate().await;
        match category {
            FrequencyCategory::Main => self.main_frequencies.lock().unwrap().next("main frequencies"),
            FrequencyCategory::Special => self.special_frequencies.lock().unwrap().next("special frequencies"),
        }
    }

    async fn fetch_position_frequencies(&self, _game: Game, position: Option<u8>) -> Result<Vec<PositionFrequency>> {
        self.record(RecordedCall::PositionFrequencies(position));
        self.pass_gate().await;
        self.position_frequencies.lock().unwrap().next("position frequencies")
    }

    async fn fetch_latest_results(&self, _game: Game, page: u32, page_size: u32) -> Result<LatestResultsPage> {
        self.record(RecordedCall::LatestResults { page, page_size });
        let delay = self.page_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.pass_gate().await;
        // Take the outcome only after the delay so later scripts are visible
        self.pages.lock().unwrap().entry(page).or_default().next(&format!("page {}", page))
    }

    async fn check_combination(
        &self,
        _game: Game,
        numbers: Vec<u8>,
        special_ball: Option<u8>,
    ) -> Result<CombinationQueryResult> {
        self.record(RecordedCall::CheckCombination { numbers, special_ball });
        let outcome = self.checks.lock().unwrap().next("check combination");
        let delay = self.check_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    async fn generate_combination(&self, _game: Game, mode: GenerationMode) -> Result<GeneratedCombination> {
        self.record(RecordedCall::Generate(mode));
        self.generated.lock().unwrap().entry(mode).or_default().next("generate")
    }
}

pub fn date(iso: &str) -> NaiveDate {
    iso.parse().expect("valid ISO date in test fixture")
}

pub fn draw(iso: &str, numbers: [u8; 5], special_ball: u8) -> DrawResult {
    DrawResult {
        draw_date: date(iso),
        main_numbers: numbers.to_vec(),
        special_ball,
        multiplier: Some(2),
        prize: None,
    }
}

pub fn page(results: Vec<DrawResult>, has_more: bool) -> LatestResultsPage {
    LatestResultsPage { results, has_more }
}

pub fn frequency(number: u8, count: u32) -> NumberFrequency {
    NumberFrequency { number, occurrence_count: count, percentage: f64::from(count) / 10.0 }
}

pub fn position_frequency(position: u8, number: u8, count: u32) -> PositionFrequency {
    PositionFrequency { position, number, count, percentage: f64::from(count) / 10.0 }
}

pub fn check_result(exists: bool, matches: Vec<(&str, u8)>) -> CombinationQueryResult {
    CombinationQueryResult {
        exists,
        total_occurrences: Some(matches.len() as u32),
        main_numbers: None,
        matches: matches
            .into_iter()
            .map(|(iso, special_ball)| CombinationMatch { date: date(iso), special_ball, prize: None })
            .collect(),
    }
}
