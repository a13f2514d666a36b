//! Deviation rank of the current max-age against the recommendation.

use std::fmt;

use edge_cache::{CacheKey, CacheStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::advisor::MaxAgeAdvisor;
use crate::error::AdvisorError;

/// How far the current max-age falls short of the recommendation, 0 to 10.
///
/// 0 means the current value meets or exceeds the recommendation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DeviationRank(u8);

impl DeviationRank {
    /// Current value meets the recommendation.
    pub const OPTIMAL: Self = Self(0);
    /// Worst possible shortfall.
    pub const MAX: Self = Self(10);

    /// Build from any integer, clamped to 0..=10.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(0, 10) as u8)
    }

    /// Score `current` against `recommended`.
    pub fn compute(current: u64, recommended: u64) -> Self {
        if current >= recommended {
            return Self::OPTIMAL;
        }

        let shortfall = (recommended - current) as f64;
        let scaled = (shortfall / recommended as f64 * 10.0).round() as i64;
        Self(scaled.clamp(1, 10) as u8)
    }

    /// Read a memoized rank. Non-integers are rejected; integers are clamped.
    pub fn from_cached(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|_| i64::MAX))
                .map(Self::clamped),
            _ => None,
        }
    }

    /// Raw score.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Check if the current value meets the recommendation.
    pub fn is_optimal(&self) -> bool {
        self.0 == 0
    }

    /// Check if the shortfall is large enough to call "very low".
    pub fn is_very_low(&self) -> bool {
        self.0 > 3
    }
}

impl fmt::Display for DeviationRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rank together with how the cache was involved in producing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankLookup {
    /// The rank.
    pub rank: DeviationRank,
    /// Cache outcome.
    pub status: CacheStatus,
}

impl MaxAgeAdvisor {
    /// Current deviation rank.
    ///
    /// Never fails: cache trouble falls back to a fresh computation and an
    /// unreadable setting scores as optimal.
    pub fn current_rank(&self) -> DeviationRank {
        self.rank_lookup().rank
    }

    /// Current deviation rank with its cache outcome.
    pub fn rank_lookup(&self) -> RankLookup {
        let key = CacheKey::rank();

        let cache_failed = match self.cache.get(&key) {
            Ok(Some(cached)) => match DeviationRank::from_cached(&cached) {
                Some(rank) => {
                    tracing::debug!(rank = rank.value(), "max-age rank cache hit");
                    return RankLookup {
                        rank,
                        status: CacheStatus::Hit,
                    };
                }
                None => {
                    tracing::debug!(value = %cached, "ignoring malformed cached rank");
                    false
                }
            },
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "rank cache unavailable; computing fresh");
                true
            }
        };

        let recommended = self.recommended_max_age();
        let current = self.current_max_age().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "cannot read max-age; assuming recommended");
            recommended
        });
        let rank = DeviationRank::compute(current, recommended);

        let status = if cache_failed {
            CacheStatus::Error
        } else if rank.is_optimal() {
            CacheStatus::Bypass
        } else {
            match self.cache.set(&key, Value::from(rank.value()), self.policy.rank_ttl()) {
                Ok(()) => CacheStatus::Miss,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to memoize max-age rank");
                    CacheStatus::Error
                }
            }
        };

        tracing::debug!(
            rank = rank.value(),
            current,
            recommended,
            cache = %status,
            "computed max-age rank"
        );

        RankLookup { rank, status }
    }

    /// Drop the memoized rank so the next lookup recomputes it.
    pub fn invalidate_rank(&self) -> Result<(), AdvisorError> {
        self.cache.delete(&CacheKey::rank())?;
        tracing::debug!("invalidated max-age rank cache");
        Ok(())
    }

    /// Like [`invalidate_rank`](Self::invalidate_rank), but a cache failure
    /// is logged and swallowed. Returns whether the entry was dropped.
    pub(crate) fn forget_rank(&self) -> bool {
        match self.invalidate_rank() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "could not drop memoized max-age rank");
                false
            }
        }
    }

    /// Current rank without writing to the cache.
    ///
    /// A memoized rank is used when present; otherwise the rank is computed
    /// and discarded.
    pub fn peek_rank(&self) -> DeviationRank {
        if let Ok(Some(cached)) = self.cache.get(&CacheKey::rank()) {
            if let Some(rank) = DeviationRank::from_cached(&cached) {
                return rank;
            }
        }

        let recommended = self.recommended_max_age();
        let current = self.current_max_age().unwrap_or(recommended);
        DeviationRank::compute(current, recommended)
    }
}
