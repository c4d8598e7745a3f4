//! Per-player performance history
//!
//! Keeps a rolling window of derived session features for each player. Raw metrics
//! records are never retained, only what [`MetricsFeatureExtractor`] produced.
//!
//! [`MetricsFeatureExtractor`]: crate::features::MetricsFeatureExtractor

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::features::MetricsFeatures;

/// Default history window in sessions
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Rolling window of derived features for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceHistory {
    sessions: VecDeque<MetricsFeatures>,
    window_size: usize,
}

impl Default for PerformanceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl PerformanceHistory {
    /// Create an empty history holding at most `window_size` sessions
    pub fn new(window_size: usize) -> Self {
        Self {
            sessions: VecDeque::with_capacity(window_size),
            window_size: window_size.max(1),
        }
    }

    /// Append a session, evicting the oldest beyond the window
    pub fn push(&mut self, features: MetricsFeatures) {
        self.sessions.push_back(features);
        while self.sessions.len() > self.window_size {
            self.sessions.pop_front();
        }
    }

    /// Sessions oldest first
    pub fn sessions(&self) -> impl Iterator<Item = &MetricsFeatures> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Mean of one feature across the window, `None` when empty
    pub fn mean_of(&self, feature: impl Fn(&MetricsFeatures) -> f64) -> Option<f64> {
        if self.sessions.is_empty() {
            return None;
        }
        let sum: f64 = self.sessions.iter().map(feature).sum();
        Some(sum / self.sessions.len() as f64)
    }
}

/// Thread-safe map of player id to performance history
#[derive(Debug)]
pub struct HistoryStore {
    histories: RwLock<HashMap<String, PerformanceHistory>>,
    window_size: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl HistoryStore {
    pub fn new(window_size: usize) -> Self {
        Self {
            histories: RwLock::new(HashMap::new()),
            window_size,
        }
    }

    /// Record a session for a player and return the number of sessions now held
    pub fn record(&self, player_id: &str, features: MetricsFeatures) -> usize {
        let mut histories = self.histories.write();
        let history = histories
            .entry(player_id.to_string())
            .or_insert_with(|| PerformanceHistory::new(self.window_size));
        history.push(features);
        history.len()
    }

    /// Copy of a player's history; empty if the player has none
    pub fn get(&self, player_id: &str) -> PerformanceHistory {
        self.histories
            .read()
            .get(player_id)
            .cloned()
            .unwrap_or_else(|| PerformanceHistory::new(self.window_size))
    }

    pub fn remove(&self, player_id: &str) -> bool {
        self.histories.write().remove(player_id).is_some()
    }

    pub fn export(&self) -> HashMap<String, PerformanceHistory> {
        self.histories.read().clone()
    }

    /// Replace all histories
    pub fn import(&self, histories: HashMap<String, PerformanceHistory>) {
        *self.histories.write() = histories;
    }
}
