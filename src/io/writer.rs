use super::error::Error;
use super::format::LatticeFormat;
use super::schema::{ElementRecord, LatticeFile};
use crate::model::element::Element;
use crate::model::lattice::Lattice;
use crate::model::properties::PropertyValue;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a lattice as TOML or JSON.
///
/// Each element is written as one table holding its name, class and every exported property
/// that currently has a value. Elements appear in lattice order.
pub fn write<W: Write>(mut writer: W, lattice: &Lattice, format: LatticeFormat) -> Result<(), Error> {
    let file = to_file(lattice);

    if format == LatticeFormat::Json {
        if let Some((element, key)) = first_non_finite(&file) {
            return Err(Error::serialize(
                "JSON",
                &lattice.name,
                format!("property '{key}' of element '{element}' is not a finite number"),
            ));
        }
    }

    let mut text = match format {
        LatticeFormat::Toml => toml::to_string_pretty(&file)
            .map_err(|e| Error::serialize("TOML", &lattice.name, e.to_string()))?,
        LatticeFormat::Json => serde_json::to_string_pretty(&file)
            .map_err(|e| Error::serialize("JSON", &lattice.name, e.to_string()))?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::from_io(e, None))?;
    writer.flush().map_err(|e| Error::from_io(e, None))?;

    info!(
        "wrote {} lattice '{}' with {} elements",
        format,
        lattice.name,
        lattice.len()
    );
    Ok(())
}

/// Writes a lattice file, inferring the format from its extension.
pub fn write_file(path: &Path, lattice: &Lattice) -> Result<(), Error> {
    let format = LatticeFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
        path: Some(path.to_path_buf()),
    })?;
    let file = File::create(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    write(BufWriter::new(file), lattice, format).map_err(|e| e.with_path(path.to_path_buf()))
}

/// JSON has no literal for NaN or infinities; TOML does.
fn first_non_finite(file: &LatticeFile) -> Option<(&str, &str)> {
    file.elements.iter().find_map(|record| {
        record
            .properties
            .iter()
            .find(|(_, value)| match value {
                PropertyValue::Float(v) => !v.is_finite(),
                PropertyValue::Array(values) => values.iter().any(|v| !v.is_finite()),
                PropertyValue::Int(_) | PropertyValue::Text(_) => false,
            })
            .map(|(key, _)| (record.name.as_str(), key.as_str()))
    })
}

fn to_file(lattice: &Lattice) -> LatticeFile {
    LatticeFile {
        name: lattice.name.clone(),
        elements: lattice.iter().map(to_record).collect(),
    }
}

fn to_record(element: &Element) -> ElementRecord {
    ElementRecord {
        name: element.name.to_string(),
        class: element.class().name().to_string(),
        properties: element
            .properties()
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::read;
    use crate::model::aperture::Aperture;
    use std::io::Cursor;

    fn sample() -> Lattice {
        Lattice::from_sequence(
            "sample",
            vec![
                Element::quadrupole("qf", 0.5, 0.8)
                    .at(1.0)
                    .with_aperture(Aperture::ellipse(0.03, 0.02)),
                Element::sbend("mb", 2.0, 0.01).at(2.5),
                Element::thin_multipole("mult", &[0.0, 0.0, 0.3], &[]).at(4.0),
            ],
        )
    }

    #[test]
    fn write_toml_emits_element_tables() {
        let mut buffer = Vec::new();
        write(&mut buffer, &sample(), LatticeFormat::Toml).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("name = \"sample\""));
        assert_eq!(text.matches("[[elements]]").count(), 3);
        assert!(text.contains("class = \"Quadrupole\""));
        assert!(text.contains("aperture_type = \"ellipse\""));
        assert!(!text.contains("kmax"));
        assert!(!text.contains("slot_id"));
    }

    #[test]
    fn written_lattice_reads_back_equal() {
        let lattice = sample();
        for format in [LatticeFormat::Toml, LatticeFormat::Json] {
            let mut buffer = Vec::new();
            write(&mut buffer, &lattice, format).unwrap();
            let restored = read(Cursor::new(buffer), format).unwrap();
            assert_eq!(restored, lattice, "{format} round trip");
        }
    }

    #[test]
    fn write_json_rejects_non_finite_values() {
        let lattice = Lattice::from_sequence(
            "rf",
            vec![Element::rf_cavity("cav", 0.3, 2.0, 400.0e6, f64::NAN).at(1.0)],
        );
        let mut buffer = Vec::new();
        let err = write(&mut buffer, &lattice, LatticeFormat::Json).unwrap_err();

        match err {
            Error::Serialize { format, details, .. } => {
                assert_eq!(format, "JSON");
                assert!(details.contains("'lag'"));
                assert!(details.contains("'cav'"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn write_toml_keeps_non_finite_values() {
        let lattice = Lattice::from_sequence(
            "rf",
            vec![Element::rf_cavity("cav", 0.3, 2.0, 400.0e6, f64::INFINITY).at(1.0)],
        );
        let mut buffer = Vec::new();
        write(&mut buffer, &lattice, LatticeFormat::Toml).unwrap();
        let restored = read(Cursor::new(buffer), LatticeFormat::Toml).unwrap();

        assert_eq!(
            restored.element("cav").unwrap().property("lag"),
            Some(PropertyValue::Float(f64::INFINITY))
        );
    }

    #[test]
    fn write_json_ends_with_newline() {
        let mut buffer = Vec::new();
        write(&mut buffer, &Lattice::new("empty"), LatticeFormat::Json).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("}\n"));
    }
}
