//! Weighted lottery draws.
//!
//! A draw walks the [`WeightTable`] in order and runs one proportional trial per
//! eligible candidate: with `remaining` the eligible weight not yet ruled out in this
//! pass, a candidate of weight `w` wins with probability `w / remaining`. A loser's
//! weight is removed from `remaining`, which raises the odds of everyone after it; a
//! winner's weight is not. When a pass ends short of `count` winners, another pass
//! starts over the whole table.
//!
//! For a single winner this is exactly proportional to weight. For several winners it
//! is a sequential weighted-without-replacement scheme (or with replacement, when
//! `allow_repeat` is set), distinct from A-Res or Gumbel-top-k.
//!
//! Policies layered on top:
//! - `count == 0` is a no-op and returns an empty result.
//! - `count >= table.len()` makes every candidate a winner, in table order.
//! - Once no eligible weight is left (all-zero tables, or only zero-weight candidates
//!   remain unpicked), the remaining slots are filled uniformly at random.
//!
//! Notes:
//! - `*_with_rng` functions take the randomness source explicitly and are deterministic
//!   for a seeded RNG. [`Sampler`] is a convenience handle that owns a seed (or uses
//!   `rand::rng()` when it has none).

use rand::prelude::*;
use rand::seq::index;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::{Result, SamplerError};
use crate::table::WeightTable;

/// Parameters of a single draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawRequest {
    /// Number of winners wanted.
    pub count: usize,
    /// Whether a candidate that already won may win again in the same draw.
    pub allow_repeat: bool,
}

impl Default for DrawRequest {
    fn default() -> Self {
        Self {
            count: 1,
            allow_repeat: false,
        }
    }
}

impl DrawRequest {
    /// Create a request for `count` winners without repeats.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Set whether a winner may win again.
    pub fn allow_repeat(mut self, allow_repeat: bool) -> Self {
        self.allow_repeat = allow_repeat;
        self
    }
}

/// Winners of a draw, in the order they were picked.
///
/// With `allow_repeat` the same candidate may appear more than once; use
/// [`DrawResult::distinct`] to collapse to one entry per candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DrawResult<K> {
    winners: Vec<K>,
}

impl<K> Default for DrawResult<K> {
    fn default() -> Self {
        Self {
            winners: Vec::new(),
        }
    }
}

impl<K> DrawResult<K> {
    /// Winners in draw order.
    pub fn winners(&self) -> &[K] {
        &self.winners
    }

    /// Number of wins, counting repeats.
    pub fn len(&self) -> usize {
        self.winners.len()
    }

    /// True if nobody won.
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    /// Iterate winners in draw order.
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.winners.iter()
    }

    /// Consume the result, keeping draw order and repeats.
    pub fn into_vec(self) -> Vec<K> {
        self.winners
    }
}

impl<K: PartialEq> DrawResult<K> {
    /// True if `id` won at least once.
    pub fn contains(&self, id: &K) -> bool {
        self.winners.contains(id)
    }

    /// How many times `id` won.
    pub fn count_of(&self, id: &K) -> usize {
        self.winners.iter().filter(|w| *w == id).count()
    }
}

impl<K: Eq + Hash + Clone> DrawResult<K> {
    /// Unique winners, ordered by first win.
    pub fn distinct(&self) -> Vec<K> {
        let mut seen = HashSet::with_capacity(self.winners.len());
        self.winners
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }

    /// Wins per candidate.
    pub fn tally(&self) -> HashMap<K, usize> {
        let mut out = HashMap::new();
        for id in &self.winners {
            *out.entry(id.clone()).or_insert(0) += 1;
        }
        out
    }
}

impl<K> IntoIterator for DrawResult<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.winners.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a DrawResult<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.winners.iter()
    }
}

/// Draw exactly one winner, weighted by the table.
///
/// # Errors
///
/// [`SamplerError::EmptyTable`] if the table has no candidates.
pub fn draw_one_with_rng<K, R>(table: &WeightTable<K>, rng: &mut R) -> Result<K>
where
    K: Clone,
    R: Rng + ?Sized,
{
    draw_many_with_rng(table, 1, false, rng)?
        .into_iter()
        .next()
        .ok_or(SamplerError::EmptyTable)
}

/// Draw up to `count` winners.
///
/// # Errors
///
/// [`SamplerError::EmptyTable`] if `count > 0` and the table has no candidates.
pub fn draw_many_with_rng<K, R>(
    table: &WeightTable<K>,
    count: usize,
    allow_repeat: bool,
    rng: &mut R,
) -> Result<DrawResult<K>>
where
    K: Clone,
    R: Rng + ?Sized,
{
    if count == 0 {
        return Ok(DrawResult::default());
    }
    if table.is_empty() {
        return Err(SamplerError::EmptyTable);
    }

    let n = table.len();
    if count >= n {
        debug!(count, candidates = n, "not enough candidates to be selective, all win");
        return Ok(DrawResult {
            winners: table.ids().cloned().collect(),
        });
    }

    let entries = table.entries();
    let picks = pick_indices(entries, count, allow_repeat, rng);
    Ok(DrawResult {
        winners: picks.into_iter().map(|i| entries[i].0.clone()).collect(),
    })
}

/// [`draw_many_with_rng`] driven by a [`DrawRequest`].
pub fn draw_with_rng<K, R>(
    table: &WeightTable<K>,
    request: &DrawRequest,
    rng: &mut R,
) -> Result<DrawResult<K>>
where
    K: Clone,
    R: Rng + ?Sized,
{
    draw_many_with_rng(table, request.count, request.allow_repeat, rng)
}

/// Upper bound on weighted passes before falling back to uniform fill.
///
/// Every pass that starts with positive eligible weight picks at least one candidate
/// (the last positive candidate faces `remaining == w`), so `count < n` passes always
/// suffice barring rounding.
fn max_passes(n: usize) -> usize {
    2 * n + 8
}

/// Requires `0 < count < entries.len()`.
fn pick_indices<K, R>(
    entries: &[(K, f64)],
    count: usize,
    allow_repeat: bool,
    rng: &mut R,
) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    let n = entries.len();
    let mut picked = vec![false; n];
    let mut order = Vec::with_capacity(count);

    for pass in 0..max_passes(n) {
        let total: f64 = entries
            .iter()
            .zip(&picked)
            .filter(|(_, &p)| allow_repeat || !p)
            .map(|((_, w), _)| *w)
            .sum();
        if total <= 0.0 {
            break;
        }

        let mut remaining = total;
        for (i, &(_, w)) in entries.iter().enumerate() {
            if !allow_repeat && picked[i] {
                continue;
            }
            if remaining <= 0.0 {
                break;
            }
            // u in [0, 1), so this holds with probability w / remaining.
            if rng.random::<f64>() * remaining < w {
                picked[i] = true;
                order.push(i);
                if order.len() == count {
                    return order;
                }
            } else {
                remaining -= w;
            }
        }
        trace!(pass, total, winners = order.len(), "weighted pass done");
    }

    let eligible: Vec<usize> = (0..n).filter(|&i| allow_repeat || !picked[i]).collect();
    let need = count - order.len();
    debug!(
        need,
        eligible = eligible.len(),
        "no eligible weight left, filling uniformly"
    );
    if allow_repeat {
        order.extend((0..need).map(|_| eligible[rng.random_range(0..eligible.len())]));
    } else {
        // eligible.len() == n - order.len() > count - order.len()
        let draws = index::sample(rng, eligible.len(), need);
        order.extend(draws.into_iter().map(|j| eligible[j]));
    }
    order
}

/// Convenience handle over the `*_with_rng` draws.
///
/// Holds configuration only. With a seed, every call reseeds a fresh `StdRng`, so the
/// same table and request always give the same result; without one, draws use
/// `rand::rng()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler {
    seed: Option<u64>,
}

impl Sampler {
    /// Create an unseeded sampler.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        }
    }

    /// See [`draw_one_with_rng`].
    pub fn draw_one<K: Clone>(&self, table: &WeightTable<K>) -> Result<K> {
        draw_one_with_rng(table, &mut self.rng())
    }

    /// See [`draw_many_with_rng`].
    pub fn draw_many<K: Clone>(
        &self,
        table: &WeightTable<K>,
        count: usize,
        allow_repeat: bool,
    ) -> Result<DrawResult<K>> {
        draw_many_with_rng(table, count, allow_repeat, &mut self.rng())
    }

    /// See [`draw_with_rng`].
    pub fn draw<K: Clone>(
        &self,
        table: &WeightTable<K>,
        request: &DrawRequest,
    ) -> Result<DrawResult<K>> {
        draw_with_rng(table, request, &mut self.rng())
    }
}
