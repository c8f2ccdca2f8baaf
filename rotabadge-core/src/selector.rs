//! Slot selector - time-windowed permutation of the catalog
//!
//! Wall-clock time is bucketed into fixed windows. Each window yields a seed,
//! the seed drives a shuffle of the catalog indices, and slot `s` takes
//! position `(s - 1) mod N` of that shuffle. Within one window distinct slots
//! up to `N` therefore get distinct badges; the next window reshuffles.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::warn;

use crate::error::SelectError;

/// Default seed window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);

/// Seed for the window containing `unix_secs`.
///
/// Windows shorter than one second are treated as one second.
pub fn seed_for(unix_secs: u64, window: Duration) -> u64 {
    unix_secs / window.as_secs().max(1)
}

/// Seed for the window containing `time`. Times before the epoch map to 0.
pub fn seed_at(time: SystemTime, window: Duration) -> u64 {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    seed_for(secs, window)
}

/// Deterministic shuffle of `0..len` for `seed`
pub fn permutation(len: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

/// Caller-chosen rotation position, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u64);

impl Slot {
    pub const FIRST: Slot = Slot(1);

    /// Normalize a raw value: anything below 1 becomes slot 1
    pub fn new(value: i64) -> Self {
        if value < 1 {
            Self::FIRST
        } else {
            Self(value as u64)
        }
    }

    /// Parse a query value. Missing, non-numeric, or `< 1` values yield slot 1.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or(Self::FIRST)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Zero-based position in a permutation of length `len`
    pub fn position(self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.0 - 1) % len as u64) as usize
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pick the badge for `slot` under `seed`.
pub fn select<S: AsRef<str>>(names: &[S], slot: Slot, seed: u64) -> Result<&str, SelectError> {
    if names.is_empty() {
        return Err(SelectError::Empty);
    }

    let order = permutation(names.len(), seed);
    let position = slot.position(order.len());

    if let Some(name) = order.get(position).and_then(|&i| names.get(i)) {
        return Ok(name.as_ref());
    }

    warn!(
        %slot,
        seed,
        position,
        "Slot position out of bounds, serving first badge"
    );
    names
        .first()
        .map(AsRef::as_ref)
        .ok_or(SelectError::Inconsistent {
            permutation: order.len(),
            catalog: names.len(),
        })
}

/// Result of one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    pub badge: &'a str,
    pub slot: Slot,
    pub seed: u64,
}

/// Selector bound to a window length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    window: Duration,
}

impl Selector {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn seed_at(&self, time: SystemTime) -> u64 {
        seed_at(time, self.window)
    }

    pub fn current_seed(&self) -> u64 {
        self.seed_at(SystemTime::now())
    }

    /// Select for the window containing `time`
    pub fn select_at<'a, S: AsRef<str>>(
        &self,
        names: &'a [S],
        slot: Slot,
        time: SystemTime,
    ) -> Result<Selection<'a>, SelectError> {
        let seed = self.seed_at(time);
        let badge = select(names, slot, seed)?;
        Ok(Selection { badge, slot, seed })
    }

    /// Select for the current window
    pub fn select_now<'a, S: AsRef<str>>(
        &self,
        names: &'a [S],
        slot: Slot,
    ) -> Result<Selection<'a>, SelectError> {
        self.select_at(names, slot, SystemTime::now())
    }

    /// Badges for slots `1..=count` under one seed
    pub fn rotation<'a, S: AsRef<str>>(
        &self,
        names: &'a [S],
        count: u64,
        seed: u64,
    ) -> Result<Vec<(Slot, &'a str)>, SelectError> {
        (1..=count)
            .map(|n| {
                let slot = Slot(n);
                select(names, slot, seed).map(|badge| (slot, badge))
            })
            .collect()
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
