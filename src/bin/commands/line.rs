use anyhow::{Context, Result};
use clap::Args;

use lattice_forge::Lattice;
use lattice_forge::ops::{LineConfig, expand_line};

/// Fills the gaps of a position-based sequence with explicit drifts.
#[derive(Debug, Args)]
pub struct LineArgs {
    /// Prefix for generated drift names.
    #[arg(long, value_name = "PREFIX", default_value = "drift_")]
    pub drift_prefix: String,
    /// Gaps and overlaps up to this size (m) are ignored.
    #[arg(long, value_name = "METRES", default_value_t = 1e-9)]
    pub tolerance: f64,
}

/// Expands the lattice and returns it with drifts in place.
pub fn run(lattice: &Lattice, args: &LineArgs) -> Result<Lattice> {
    let config = LineConfig {
        drift_prefix: args.drift_prefix.clone(),
        tolerance: args.tolerance,
    };

    let elements = expand_line(lattice, &config)
        .with_context(|| format!("Failed to expand lattice '{}' into a line", lattice.name))?;
    Ok(Lattice::from_sequence(&lattice.name, elements))
}
