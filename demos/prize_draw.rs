//! Prize draw over a handful of entrants with ticket counts.
//!
//! Shows the three regimes: a weighted draw, a repeat-allowed draw, and the all-win
//! fallback when more prizes than entrants are on offer. Run with
//! `RUST_LOG=chusen=debug` to see the fallbacks being taken.

use chusen::{build_weight_table, draw_with_rng, DrawRequest, WeightTable};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

struct Entrant {
    name: &'static str,
    tickets: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let entrants = [
        Entrant { name: "ana", tickets: 12 },
        Entrant { name: "bo", tickets: 3 },
        Entrant { name: "chen", tickets: 7 },
        Entrant { name: "dara", tickets: 0 },
        Entrant { name: "eli", tickets: 1 },
    ];
    let table: WeightTable<&str> = build_weight_table(&entrants, |e| e.name, |e| e.tickets)?;

    println!("entrants:");
    for (name, w) in &table {
        println!("  {name:5}  tickets={w}");
    }
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for req in [
        DrawRequest::new(2),
        DrawRequest::new(3).allow_repeat(true),
        DrawRequest::new(10),
    ] {
        let result = draw_with_rng(&table, &req, &mut rng)?;
        println!(
            "count={:2} allow_repeat={:5} -> {:?} (distinct: {:?})",
            req.count,
            req.allow_repeat,
            result.winners(),
            result.distinct()
        );
    }

    Ok(())
}
