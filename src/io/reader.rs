use super::error::Error;
use super::format::LatticeFormat;
use super::schema::LatticeFile;
use crate::model::element::Element;
use crate::model::lattice::Lattice;
use crate::model::types::ElementClass;
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Reads a lattice from a TOML or JSON stream.
///
/// Every element table is turned into an [`Element`] of the named class, after which its
/// remaining keys are applied through the exported property interface. The resulting
/// lattice is ordered by centre position.
///
/// # Errors
///
/// Returns [`Error::Io`] if the stream cannot be read, [`Error::Parse`] if the text does
/// not match the lattice layout, [`Error::UnknownClass`] for an unrecognised class name,
/// and [`Error::Property`] when a property is unknown to the element or has a bad value.
pub fn read<R: BufRead>(mut reader: R, format: LatticeFormat) -> Result<Lattice, Error> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| Error::from_io(e, None))?;

    let file: LatticeFile = match format {
        LatticeFormat::Toml => {
            toml::from_str(&content).map_err(|e| Error::parse("TOML", None, e.to_string()))?
        }
        LatticeFormat::Json => serde_json::from_str(&content)
            .map_err(|e| Error::parse("JSON", None, e.to_string()))?,
    };

    let lattice = build_lattice(file)?;
    info!(
        "read {} lattice '{}' with {} elements",
        format,
        lattice.name,
        lattice.len()
    );
    Ok(lattice)
}

/// Reads a lattice file, inferring the format from its extension.
pub fn read_file(path: &Path) -> Result<Lattice, Error> {
    let format = LatticeFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
        path: Some(path.to_path_buf()),
    })?;
    let file = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    read(BufReader::new(file), format).map_err(|e| e.with_path(path.to_path_buf()))
}

fn build_lattice(file: LatticeFile) -> Result<Lattice, Error> {
    let mut elements = Vec::with_capacity(file.elements.len());
    let mut seen = HashSet::new();

    for record in file.elements {
        let class: ElementClass = record
            .class
            .parse()
            .map_err(|_| Error::unknown_class(&record.name, &record.class))?;

        let mut element = Element::new(&record.name, class);
        element
            .apply_properties(record.properties.iter().map(|(k, v)| (k.as_str(), v)))
            .map_err(|source| Error::property(&record.name, source))?;

        if !element.is_drift() && !seen.insert(element.name.clone()) {
            warn!(
                "duplicate element name '{}' in lattice '{}'",
                element.name, file.name
            );
        }
        elements.push(element);
    }

    Ok(Lattice::from_sequence(&file.name, elements))
}
