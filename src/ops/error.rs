use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("element '{name}' not found in lattice '{lattice}'")]
    UnknownElement { lattice: String, name: String },

    #[error("invalid range in lattice '{lattice}': {reason}")]
    InvalidRange { lattice: String, reason: String },

    #[error("invalid element name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "elements '{upstream}' and '{downstream}' overlap by {overlap:.9} m at s = {position:.6} m"
    )]
    Overlap {
        upstream: String,
        downstream: String,
        overlap: f64,
        position: f64,
    },
}

impl Error {
    pub fn unknown_element(lattice: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownElement {
            lattice: lattice.into(),
            name: name.into(),
        }
    }

    pub fn invalid_range(lattice: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            lattice: lattice.into(),
            reason: reason.into(),
        }
    }

    pub fn overlap(
        upstream: impl Into<String>,
        downstream: impl Into<String>,
        overlap: f64,
        position: f64,
    ) -> Self {
        Self::Overlap {
            upstream: upstream.into(),
            downstream: downstream.into(),
            overlap,
            position,
        }
    }
}
