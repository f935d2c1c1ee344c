//! `chusen`: weighted lottery draws.
//!
//! Given a table of candidates and relative weights, pick one or more winners with
//! probability proportional to weight. Built for small, business-sized candidate sets
//! (prize draws, ticket lotteries), not for sampling at scale.
//!
//! Exposed modules:
//! - `table`: `WeightTable` (ordered, validated candidate → weight map) and
//!   `build_weight_table` for projecting records.
//! - `draw`: the draw procedure (`draw_one`, `draw_many`), `DrawRequest`, `DrawResult`,
//!   and the seedable `Sampler` handle.
//! - `error`: `SamplerError`.
//!
//! Randomness is always passed in: every draw has a `*_with_rng` form, and `Sampler`
//! either reseeds from a fixed seed per call or uses `rand::rng()`.
//!
//! ```
//! use chusen::{draw_many_with_rng, WeightTable};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let table = WeightTable::try_from_pairs([("alice", 1.0), ("bob", 9.0), ("carol", 5.0)])?;
//! let mut rng = StdRng::seed_from_u64(7);
//! let winners = draw_many_with_rng(&table, 2, false, &mut rng)?;
//! assert_eq!(winners.len(), 2);
//! # Ok::<(), chusen::SamplerError>(())
//! ```

#![forbid(unsafe_code)]

pub mod draw;
pub mod error;
pub mod table;

pub use draw::{
    draw_many_with_rng, draw_one_with_rng, draw_with_rng, DrawRequest, DrawResult, Sampler,
};
pub use error::{Result, SamplerError};
pub use table::{build_weight_table, WeightTable};
