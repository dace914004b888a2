//! Score and ranking persistence.
//!
//! All reads and writes go through the [`KeyValue`] port so the stores never
//! touch `localStorage` directly: the browser build plugs in
//! [`BrowserStorage`], native tests and headless runs plug in
//! [`MemoryStorage`]. Malformed stored data decodes to the empty/default
//! value instead of failing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::GameError;
use crate::skin;

const BEST_SCORE_KEY: &str = "diploma-dash-best-score";
const LAST_NICKNAME_KEY: &str = "diploma-dash-last-nickname";
const RANKING_KEY: &str = "diploma-dash-ranking";
const SKIN_KEY: &str = "diploma-dash-skin";

/// Minimal persistence port over a string key-value namespace.
pub trait KeyValue {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
}

/// `window.localStorage` backend.
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Result<Self, GameError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(GameError::StorageUnavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValue for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn write(&mut self, key: &str, value: &str) {
        let _ = self.storage.set_item(key, value);
    }
}

/// In-memory backend for tests and headless runs.
#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl KeyValue for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub nickname: String,
    pub score: i64,
}

/// Best score and last-used nickname.
pub struct ScoreStore {
    kv: Box<dyn KeyValue>,
}

impl ScoreStore {
    pub fn new(kv: Box<dyn KeyValue>) -> Self {
        Self { kv }
    }

    pub fn best_score(&self) -> i64 {
        self.kv
            .read(BEST_SCORE_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }

    /// No-op unless `score` beats the stored best.
    pub fn save_best_score(&mut self, score: i64) {
        if score > self.best_score() {
            self.kv.write(BEST_SCORE_KEY, &score.to_string());
        }
    }

    pub fn last_nickname(&self) -> Option<String> {
        self.kv.read(LAST_NICKNAME_KEY).filter(|n| !n.is_empty())
    }

    pub fn save_last_nickname(&mut self, nickname: &str) {
        self.kv.write(LAST_NICKNAME_KEY, nickname);
    }
}

/// Persistent ranking plus the per-session run context (current player,
/// last score, selected skin).
pub struct RankingStore {
    kv: Box<dyn KeyValue>,
    current_player: Option<String>,
    last_score: i64,
    skin_id: String,
}

impl RankingStore {
    pub fn new(kv: Box<dyn KeyValue>) -> Self {
        let skin_id = kv
            .read(SKIN_KEY)
            .unwrap_or_else(|| skin::DEFAULT_SKIN_ID.to_owned());
        Self {
            kv,
            current_player: None,
            last_score: 0,
            skin_id,
        }
    }

    pub fn set_current_player(&mut self, nickname: &str) {
        self.current_player = Some(nickname.to_owned());
    }

    pub fn current_player(&self) -> Option<&str> {
        self.current_player.as_deref()
    }

    pub fn set_last_score(&mut self, score: i64) {
        self.last_score = score;
    }

    pub fn last_score(&self) -> i64 {
        self.last_score
    }

    /// Stored ranking, sorted descending by score. Corrupt JSON reads as empty.
    pub fn load(&self) -> Vec<RankingEntry> {
        let mut entries: Vec<RankingEntry> = self
            .kv
            .read(RANKING_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }

    /// Upsert keeping the best score per nickname (case-insensitive).
    pub fn save_score(&mut self, nickname: &str, score: i64) {
        let mut entries = self.load();
        let lowered = nickname.to_lowercase();
        match entries
            .iter_mut()
            .find(|e| e.nickname.to_lowercase() == lowered)
        {
            Some(existing) => existing.score = existing.score.max(score),
            None => entries.push(RankingEntry {
                nickname: nickname.to_owned(),
                score,
            }),
        }
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        if let Ok(raw) = serde_json::to_string(&entries) {
            self.kv.write(RANKING_KEY, &raw);
        }
    }

    pub fn is_nickname_available(&self, nickname: &str) -> bool {
        let lowered = nickname.to_lowercase();
        !self
            .load()
            .iter()
            .any(|e| e.nickname.to_lowercase() == lowered)
    }

    pub fn skin_id(&self) -> &str {
        &self.skin_id
    }

    pub fn set_skin(&mut self, id: &str) {
        self.skin_id = id.to_owned();
        self.kv.write(SKIN_KEY, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_store() -> ScoreStore {
        ScoreStore::new(Box::new(MemoryStorage::default()))
    }

    fn ranking_store() -> RankingStore {
        RankingStore::new(Box::new(MemoryStorage::default()))
    }

    #[test]
    fn best_score_defaults_to_zero() {
        assert_eq!(score_store().best_score(), 0);
    }

    #[test]
    fn save_best_score_keeps_max() {
        let mut store = score_store();
        store.save_best_score(120);
        store.save_best_score(80);
        assert_eq!(store.best_score(), 120);
    }

    #[test]
    fn non_numeric_best_score_reads_as_zero() {
        let mut kv = MemoryStorage::default();
        kv.write(BEST_SCORE_KEY, "garbage");
        assert_eq!(ScoreStore::new(Box::new(kv)).best_score(), 0);
    }

    #[test]
    fn empty_last_nickname_reads_as_none() {
        let mut store = score_store();
        store.save_last_nickname("");
        assert_eq!(store.last_nickname(), None);
        store.save_last_nickname("Rafa");
        assert_eq!(store.last_nickname().as_deref(), Some("Rafa"));
    }

    #[test]
    fn ranking_sorted_descending() {
        let mut store = ranking_store();
        store.save_score("Ana", 100);
        store.save_score("Bia", 300);
        store.save_score("Caio", 200);
        let scores: Vec<i64> = store.load().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn corrupt_ranking_json_reads_as_empty() {
        let mut kv = MemoryStorage::default();
        kv.write(RANKING_KEY, "{not json");
        assert!(RankingStore::new(Box::new(kv)).load().is_empty());
    }

    #[test]
    fn upsert_is_case_insensitive() {
        let mut store = ranking_store();
        store.save_score("Ana", 50);
        store.save_score("ana", 90);
        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 90);
    }

    #[test]
    fn skin_id_round_trips_through_storage() {
        let mut store = ranking_store();
        assert_eq!(store.skin_id(), skin::DEFAULT_SKIN_ID);
        store.set_skin("leo");
        assert_eq!(store.skin_id(), "leo");
    }
}
