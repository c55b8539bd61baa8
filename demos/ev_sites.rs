//! Pick charging-station sites for a handful of EV locations.
//!
//! Usage: `cargo run --example ev_sites -- [k]` (default k = 3).
//! Set `RUST_LOG=kmedian=debug` to see per-iteration progress.

use kmedian::{locate_sites, KMedians};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let k: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);

    // (latitude, longitude) of registered vehicles, Washington State.
    let vehicles: Vec<Vec<f64>> = vec![
        // Seattle
        vec![47.6062, -122.3321],
        vec![47.6205, -122.3493],
        vec![47.6588, -122.3130],
        vec![47.5480, -122.3170],
        // Tacoma
        vec![47.2529, -122.4443],
        vec![47.2396, -122.4598],
        vec![47.2145, -122.4100],
        // Spokane
        vec![47.6588, -117.4260],
        vec![47.6720, -117.4100],
        vec![47.6300, -117.3900],
        // Olympia
        vec![47.0379, -122.9007],
        vec![47.0450, -122.8950],
        // Yakima
        vec![46.6021, -120.5059],
    ];

    let model = KMedians::new(k).with_seed(2024);
    let selection = match locate_sites(&vehicles, &model) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "=== K-medians (k={k}, {} iterations, converged: {}) ===",
        selection.fit().n_iter(),
        selection.converged()
    );
    for site in selection.sites() {
        println!(
            "  site {:2}  lat {:9.4}  lon {:10.4}  serves {} vehicle(s)",
            site.index,
            site.location[0],
            site.location[1],
            site.members.len()
        );
    }

    println!();
    for (i, label) in selection.labels().iter().enumerate() {
        println!(
            "  vehicle {:2} ({:8.4}, {:9.4}) => site {}",
            i, vehicles[i][0], vehicles[i][1], label
        );
    }
}
