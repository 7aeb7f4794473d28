//! Memoization of wave results.
//!
//! The engine is deterministic, so a result can be reused for as long as the
//! meal, its day context and the engine config are unchanged. Entries are
//! keyed by the meal id plus a signature of the serialized inputs and expire
//! after a TTL. Every
//! method that needs the clock takes an `Instant` so callers and tests
//! control time.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::engine::wave::{WaveConfig, compute_insulin_wave_with};
use crate::models::{DayContext, MealNutrients, Profile, WaveResult};

/// Default entry lifetime.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Stable hash of the wave inputs, config included.
///
/// Hashes the JSON form so any field that reaches serialization takes part.
/// Floats hash by their printed value, so `0.1 + 0.2` and `0.3` differ.
pub fn context_signature(
    nutrients: &MealNutrients,
    context: &DayContext,
    profile: &Profile,
    config: &WaveConfig,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    for json in [
        serde_json::to_string(nutrients),
        serde_json::to_string(context),
        serde_json::to_string(profile),
        serde_json::to_string(config),
    ] {
        // Plain data models always serialize; an error hashes as a distinct marker.
        match json {
            Ok(text) => text.hash(&mut hasher),
            Err(_) => 0u8.hash(&mut hasher),
        }
    }
    hasher.finish()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: WaveResult,
    cached_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.cached_at) >= ttl
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    meal_id: String,
    signature: u64,
}

/// TTL cache of wave results keyed by `(meal_id, context_signature)`.
#[derive(Debug, Clone)]
pub struct WaveCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl Default for WaveCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl WaveCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation or the last `clear`.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Fresh cached result, if any. Expired entries are dropped on access.
    pub fn get(&mut self, meal_id: &str, signature: u64, now: Instant) -> Option<&WaveResult> {
        let key = CacheKey {
            meal_id: meal_id.to_string(),
            signature,
        };
        let expired = match self.entries.get(&key) {
            Some(entry) => entry.is_expired(self.ttl, now),
            None => {
                self.misses += 1;
                debug!(meal_id, signature, "wave cache miss");
                return None;
            }
        };
        if expired {
            self.entries.remove(&key);
            self.misses += 1;
            debug!(meal_id, signature, "wave cache entry expired");
            return None;
        }
        self.hits += 1;
        debug!(meal_id, signature, "wave cache hit");
        self.entries.get(&key).map(|e| &e.result)
    }

    pub fn insert(&mut self, meal_id: &str, signature: u64, result: WaveResult, now: Instant) {
        trace!(meal_id, signature, "wave cache insert");
        self.entries.insert(
            CacheKey {
                meal_id: meal_id.to_string(),
                signature,
            },
            CacheEntry {
                result,
                cached_at: now,
            },
        );
    }

    /// Cached result for the inputs, computing and storing it on a miss.
    pub fn get_or_compute(
        &mut self,
        meal_id: &str,
        nutrients: &MealNutrients,
        context: &DayContext,
        profile: &Profile,
        config: &WaveConfig,
        now: Instant,
    ) -> WaveResult {
        let signature = context_signature(nutrients, context, profile, config);
        if let Some(result) = self.get(meal_id, signature, now) {
            return result.clone();
        }
        let result = compute_insulin_wave_with(nutrients, context, profile, config);
        self.insert(meal_id, signature, result.clone(), now);
        result
    }

    /// Drop every entry of a meal, whatever its context. Returns how many went.
    pub fn invalidate(&mut self, meal_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.meal_id != meal_id);
        let removed = before - self.entries.len();
        debug!(meal_id, removed, "wave cache invalidated");
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Remove expired entries. Returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl, now));
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::wave::compute_insulin_wave;

    fn meal() -> MealNutrients {
        MealNutrients {
            carbs: 45.0,
            complex_carbs: 40.0,
            simple_carbs: 5.0,
            protein: 20.0,
            gi: 55.0,
            ..Default::default()
        }
    }

    fn day(meal_time: &str) -> DayContext {
        DayContext {
            meal_time: Some(meal_time.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_signature_tracks_inputs() {
        let p = Profile::default();
        let config = WaveConfig::default();
        let a = context_signature(&meal(), &day("12:00"), &p, &config);
        let b = context_signature(&meal(), &day("12:00"), &p, &config);
        let c = context_signature(&meal(), &day("19:00"), &p, &config);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let coarse = WaveConfig {
            sample_points: 20,
            ..Default::default()
        };
        assert_ne!(a, context_signature(&meal(), &day("12:00"), &p, &coarse));
    }

    #[test]
    fn test_hit_and_miss() {
        let now = Instant::now();
        let mut cache = WaveCache::default();
        let sig = context_signature(
            &meal(),
            &day("12:00"),
            &Profile::default(),
            &WaveConfig::default(),
        );
        assert!(cache.get("lunch", sig, now).is_none());

        let result = compute_insulin_wave(&meal(), &day("12:00"), &Profile::default());
        cache.insert("lunch", sig, result.clone(), now);
        assert_eq!(cache.get("lunch", sig, now), Some(&result));
        assert!(cache.get("lunch", sig + 1, now).is_none());
        assert_eq!(cache.stats(), (1, 2));
    }

    #[test]
    fn test_entries_expire() {
        let start = Instant::now();
        let mut cache = WaveCache::new(Duration::from_secs(60));
        let result = compute_insulin_wave(&meal(), &day("12:00"), &Profile::default());
        cache.insert("lunch", 1, result.clone(), start);
        cache.insert("dinner", 2, result, start + Duration::from_secs(50));

        let later = start + Duration::from_secs(61);
        assert_eq!(cache.purge_expired(later), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("lunch", 1, later).is_none());
        assert!(cache.get("dinner", 2, later).is_some());
        assert!(cache.get("dinner", 2, start + Duration::from_secs(120)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_meal() {
        let now = Instant::now();
        let mut cache = WaveCache::default();
        let result = compute_insulin_wave(&meal(), &day("12:00"), &Profile::default());
        cache.insert("lunch", 1, result.clone(), now);
        cache.insert("lunch", 2, result.clone(), now);
        cache.insert("dinner", 3, result, now);

        assert_eq!(cache.invalidate("lunch"), 2);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), (0, 0));
    }

    #[test]
    fn test_get_or_compute_reuses() {
        let now = Instant::now();
        let mut cache = WaveCache::default();
        let config = WaveConfig::default();
        let p = Profile::default();
        let first = cache.get_or_compute("lunch", &meal(), &day("12:00"), &p, &config, now);
        let second = cache.get_or_compute("lunch", &meal(), &day("12:00"), &p, &config, now);
        assert_eq!(first, second);
        assert_eq!(cache.stats(), (1, 1));

        cache.get_or_compute("lunch", &meal(), &day("18:00"), &p, &config, now);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_config_change_recomputes() {
        let now = Instant::now();
        let mut cache = WaveCache::default();
        let p = Profile::default();
        let coarse = WaveConfig {
            sample_points: 20,
            ..Default::default()
        };

        let fine = cache.get_or_compute("lunch", &meal(), &day("12:00"), &p, &WaveConfig::default(), now);
        let cached = cache.get_or_compute("lunch", &meal(), &day("12:00"), &p, &coarse, now);
        let direct = compute_insulin_wave_with(&meal(), &day("12:00"), &p, &coarse);

        assert_eq!(fine.curve.len(), 101);
        assert_eq!(cached.curve.len(), 21);
        assert_eq!(cached, direct);
        assert_eq!(cache.stats(), (0, 2));
        assert_eq!(cache.len(), 2);
    }
}
