use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Text encodings of the lattice file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LatticeFormat {
    #[default]
    Toml,
    Json,
}

impl LatticeFormat {
    /// Attempts to infer a format from a file path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LatticeFormat::Toml => "TOML",
            LatticeFormat::Json => "JSON",
        }
    }
}

impl fmt::Display for LatticeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LatticeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| format!("unknown lattice format '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_uses_extension_case_insensitively() {
        assert_eq!(
            LatticeFormat::from_path(Path::new("ring.TOML")),
            Some(LatticeFormat::Toml)
        );
        assert_eq!(
            LatticeFormat::from_path(Path::new("dir/ring.json")),
            Some(LatticeFormat::Json)
        );
        assert_eq!(LatticeFormat::from_path(Path::new("ring.seq")), None);
        assert_eq!(LatticeFormat::from_path(Path::new("ring")), None);
    }

    #[test]
    fn from_str_accepts_format_names() {
        assert_eq!("json".parse(), Ok(LatticeFormat::Json));
        assert_eq!("Toml".parse(), Ok(LatticeFormat::Toml));
        assert!("madx".parse::<LatticeFormat>().is_err());
    }
}
