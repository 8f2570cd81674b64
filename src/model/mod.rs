//! Core data structures modeling accelerator lattices.
//!
//! This module defines the attribute records an element is composed of (identifiers,
//! position, aperture, strengths), the [`element::Element`] that ties them together, and the
//! position-ordered [`lattice::Lattice`] container. Every record exposes its exported fields
//! through [`properties::Properties`], the interface external engine adapters and the `io`
//! layer are built on.

pub mod aperture;
pub mod element;
pub mod id;
pub mod lattice;
pub mod multipole;
pub mod position;
pub mod properties;
pub mod strength;
pub mod types;
