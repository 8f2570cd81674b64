//! Lattice-level operations built on top of the element model.
//!
//! This module groups the public entry points that look up parts of a lattice and convert
//! between its two layouts: selection by class, name glob, name range or position range,
//! and expansion of a position-based sequence into an explicit-drift line. Every operation
//! reports failures through the shared [`Error`] type.

mod error;
mod line;
mod select;

pub use select::{find_elements, select_classes, slice_by_names, slice_by_positions};

pub use line::{LineConfig, expand_line, strip_drifts};

pub use error::Error;
