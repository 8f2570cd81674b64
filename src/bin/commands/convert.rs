use anyhow::Result;
use clap::Args;
use log::info;

use lattice_forge::Lattice;
use lattice_forge::ops::strip_drifts;

/// Re-encodes a lattice, optionally dropping its drifts or renaming it.
#[derive(Debug, Default, Args)]
pub struct ConvertArgs {
    /// Remove every drift, leaving a position-based sequence.
    #[arg(long)]
    pub strip_drifts: bool,
    /// Replace the lattice name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Applies the requested conversion, returning the lattice to be written.
pub fn run(lattice: Lattice, args: &ConvertArgs) -> Result<Lattice> {
    let mut lattice = if args.strip_drifts {
        let stripped = strip_drifts(&lattice);
        info!(
            "Stripped {} drifts from '{}'",
            lattice.len() - stripped.len(),
            lattice.name
        );
        stripped
    } else {
        lattice
    };

    if let Some(name) = &args.name {
        lattice.name = name.clone();
    }
    Ok(lattice)
}
