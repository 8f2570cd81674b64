use crate::model::properties::PropertyError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to parse {format} {path_desc}: {details}",
        path_desc = PathDisplay(path)
    )]
    Parse {
        format: &'static str,
        path: Option<PathBuf>,
        details: String,
    },

    #[error("failed to serialize lattice '{lattice}' as {format}: {details}")]
    Serialize {
        format: &'static str,
        lattice: String,
        details: String,
    },

    #[error("invalid property on element '{element}': {source}")]
    Property {
        element: String,
        #[source]
        source: PropertyError,
    },

    #[error("element '{element}' has unknown class '{class}'")]
    UnknownClass { element: String, class: String },

    #[error(
        "unable to infer lattice file format of {path_desc}",
        path_desc = PathDisplay(path)
    )]
    UnsupportedFormat { path: Option<PathBuf> },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn parse(format: &'static str, path: Option<PathBuf>, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            path,
            details: details.into(),
        }
    }

    pub fn serialize(
        format: &'static str,
        lattice: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::Serialize {
            format,
            lattice: lattice.into(),
            details: details.into(),
        }
    }

    pub fn property(element: impl Into<String>, source: PropertyError) -> Self {
        Self::Property {
            element: element.into(),
            source,
        }
    }

    pub fn unknown_class(element: impl Into<String>, class: impl Into<String>) -> Self {
        Self::UnknownClass {
            element: element.into(),
            class: class.into(),
        }
    }

    pub(crate) fn with_path(self, path: PathBuf) -> Self {
        match self {
            Self::Io { source, .. } => Self::Io {
                path: Some(path),
                source,
            },
            Self::Parse {
                format, details, ..
            } => Self::Parse {
                format,
                path: Some(path),
                details,
            },
            other => other,
        }
    }
}

struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}
