//! Conversion between the position-based sequence and the explicit-drift line.
//!
//! A sequence stores only the elements that do something, each at an absolute position. A
//! line lists every element end to end, filling the gaps with drifts. Expanding a sequence
//! into a line fails when two elements physically overlap.

use crate::model::element::Element;
use crate::model::lattice::Lattice;
use crate::ops::error::Error;
use log::{debug, warn};

/// Settings controlling how gaps are turned into drifts.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Prefix of generated drift names; a running index is appended.
    pub drift_prefix: String,
    /// Gaps and overlaps up to this size, in metres, are treated as zero.
    pub tolerance: f64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            drift_prefix: "drift_".to_string(),
            tolerance: 1e-9,
        }
    }
}

impl LineConfig {
    /// Uses `prefix` for generated drift names and keeps the default tolerance.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            drift_prefix: prefix.to_string(),
            ..Default::default()
        }
    }
}

/// Expands a sequence into an end-to-end line with explicit drifts.
///
/// The line starts at s = 0, or at the first element's entry when that lies upstream of zero.
/// Existing drifts in the lattice are kept as they are. Generated drifts are positioned
/// absolutely (reference zero) and numbered in order of appearance.
///
/// # Arguments
///
/// * `lattice` - Sequence to expand, ordered by position.
/// * `config` - Drift naming and gap tolerance.
///
/// # Returns
///
/// Every element of the lattice plus the inserted drifts, in line order.
///
/// # Errors
///
/// Returns [`Error::Overlap`] when an element starts upstream of the furthest exit reached
/// so far by more than `config.tolerance`; the error names the element owning that exit.
pub fn expand_line(lattice: &Lattice, config: &LineConfig) -> Result<Vec<Element>, Error> {
    let mut line = Vec::with_capacity(lattice.len() * 2);
    let mut cursor = lattice
        .iter()
        .next()
        .map_or(0.0, |first| first.position.start().min(0.0));
    let mut upstream: Option<&Element> = None;
    let mut drift_index = 0usize;

    for element in lattice {
        let start = element.position.start();
        let gap = start - cursor;

        if gap > config.tolerance {
            let name = format!("{}{}", config.drift_prefix, drift_index);
            drift_index += 1;
            line.push(Element::drift(&name, gap).at(cursor + gap / 2.0));
        } else if gap < -config.tolerance {
            if let Some(previous) = upstream {
                return Err(Error::overlap(
                    previous.name.as_str(),
                    element.name.as_str(),
                    -gap,
                    start,
                ));
            }
        } else if gap != 0.0 {
            warn!(
                "absorbing {:.3e} m gap before '{}' in lattice '{}'",
                gap, element.name, lattice.name
            );
        }

        line.push(element.clone());
        if element.position.end() >= cursor {
            cursor = element.position.end();
            upstream = Some(element);
        }
    }

    debug!(
        "expanded lattice '{}' into {} line elements ({} drifts inserted)",
        lattice.name,
        line.len(),
        drift_index
    );
    Ok(line)
}

/// Removes every drift from a lattice, keeping the remaining positions unchanged.
pub fn strip_drifts(lattice: &Lattice) -> Lattice {
    let elements = lattice
        .iter()
        .filter(|e| !e.is_drift())
        .cloned()
        .collect();
    Lattice::from_sequence(&lattice.name, elements)
}
