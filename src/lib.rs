//! # LatticeForge
//!
//! **LatticeForge** is a pure-Rust data model for particle-accelerator lattices: ordered collections of magnets, cavities, drifts and markers with positions, apertures and strengths. The crate keeps every derived quantity consistent with the fields it depends on, so element records stay valid however they are edited, and exposes a uniform named-property interface that engine adapters can be built on.
//!
//! ## Features
//!
//! - **Self-consistent element records** – `ElementPosition` recomputes start, centre and end on every write; multipole records trim and pad their coefficient arrays to the active order; rectangular apertures fold bound quadruples into size and offset.
//! - **Named property access** – Every record publishes its exported field list through the `Properties` trait, so adapters read and write `k1`, `kn`, `aperture_size` or `PassMethod` by name while going through the same typed setters.
//! - **Ordered lattices** – `Lattice` keeps elements sorted by centre position and converts between position-based sequences and end-to-end lines.
//! - **Composable operations** – Selection by class, glob, name range or position range and drift expansion live under `ops`, sharing a unified error type.
//! - **Portable files** – A compact TOML/JSON layout under `io` stores each element as its class plus set properties, and reloads through the same recomputation paths.

mod model;

pub mod io;
pub mod ops;

pub use model::aperture::Aperture;
pub use model::element::{Element, ElementKind};
pub use model::id::ElementId;
pub use model::lattice::Lattice;
pub use model::multipole::{
    MagnetOrder, MagnetStrength, MultipoleStrength, Octupolar, OctupoleData, Quadrupolar,
    QuadrupoleData, Sextupolar, SextupoleData, ThinMultipoleStrength, normalize as normalize_multipole,
};
pub use model::position::ElementPosition;
pub use model::properties::{Properties, PropertyError, PropertyValue};
pub use model::strength::{
    BendData, DipoleEdgeData, HKickerData, KickerData, PassData, RfCavityData, SolenoidData,
    ThinSolenoidData, VKickerData,
};
pub use model::types::{Anchor, ApertureType, EdgeSide, ElementClass};
