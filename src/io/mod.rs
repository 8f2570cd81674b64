//! Reading and writing lattices in the crate's own TOML/JSON file layout.
//!
//! A file holds the lattice `name` and one table per element with its `name`, `class` and
//! the set exported properties of its records. Readers rebuild elements exclusively through
//! the property interface, so every derived field is recomputed on load.

mod error;
mod format;
mod reader;
mod schema;
mod writer;

pub use reader::{read as read_lattice, read_file as read_lattice_file};
pub use writer::{write as write_lattice, write_file as write_lattice_file};

pub use format::LatticeFormat;
pub use schema::{ElementRecord, LatticeFile};

pub use error::Error;
