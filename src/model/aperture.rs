//! Transverse aperture of an element.

use super::properties::{
    PropertyError, PropertyValue, Properties, expect_array, expect_text,
};
use super::types::ApertureType;
use std::fmt;

/// Aperture shape with its size parameters and transverse offset, in metres.
///
/// For rectangles the size may be given as the four bounds `[left, right, bottom, up]`;
/// these are folded into a centred half-width/half-height pair plus an offset as soon as
/// both the four-entry size and the rectangle type are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Aperture {
    size: Vec<f64>,
    kind: ApertureType,
    offset: Vec<f64>,
}

impl Default for Aperture {
    fn default() -> Self {
        Self {
            size: vec![0.0],
            kind: ApertureType::Circle,
            offset: vec![0.0],
        }
    }
}

impl Aperture {
    pub fn new(kind: ApertureType, size: Vec<f64>) -> Self {
        let mut aperture = Self {
            size,
            kind,
            offset: vec![0.0],
        };
        aperture.normalize_rectangle();
        aperture
    }

    pub fn circle(radius: f64) -> Self {
        Self::new(ApertureType::Circle, vec![radius])
    }

    pub fn ellipse(half_width: f64, half_height: f64) -> Self {
        Self::new(ApertureType::Ellipse, vec![half_width, half_height])
    }

    /// Builds a rectangle from its absolute bounds.
    pub fn rectangle_from_bounds(left: f64, right: f64, bottom: f64, up: f64) -> Self {
        Self::new(ApertureType::Rectangle, vec![left, right, bottom, up])
    }

    pub fn with_offset(mut self, offset: Vec<f64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn size(&self) -> &[f64] {
        &self.size
    }

    pub fn kind(&self) -> ApertureType {
        self.kind
    }

    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    pub fn set_size(&mut self, size: Vec<f64>) {
        self.size = size;
        self.normalize_rectangle();
    }

    pub fn set_kind(&mut self, kind: ApertureType) {
        self.kind = kind;
        self.normalize_rectangle();
    }

    pub fn set_offset(&mut self, offset: Vec<f64>) {
        self.offset = offset;
    }

    fn normalize_rectangle(&mut self) {
        if self.kind != ApertureType::Rectangle || self.size.len() != 4 {
            return;
        }
        let (left, right, bottom, up) = (self.size[0], self.size[1], self.size[2], self.size[3]);
        let x_offset = (left + right) / 2.0;
        let y_offset = (bottom + up) / 2.0;
        self.offset = vec![x_offset, y_offset];
        self.size = vec![x_offset - left, y_offset - bottom];
    }
}

impl fmt::Display for Aperture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Aperture {{ type: {}, size: {:?}, offset: {:?} }}",
            self.kind, self.size, self.offset
        )
    }
}

impl Properties for Aperture {
    const RECORD: &'static str = "ApertureData";

    fn init_properties(&self) -> &'static [&'static str] {
        match self.kind {
            ApertureType::Circle => &["aperture_size", "aperture_type"],
            _ => &["aperture_size", "aperture_type", "aperture_offset"],
        }
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "aperture_size" => Some(self.size.clone().into()),
            "aperture_type" => Some(self.kind.name().into()),
            "aperture_offset" => Some(self.offset.clone().into()),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "aperture_size" => self.set_size(expect_array(key, &value)?),
            "aperture_type" => {
                let kind = expect_text(key, &value)?
                    .parse::<ApertureType>()
                    .map_err(|e| PropertyError::invalid(key, e))?;
                self.set_kind(kind);
            }
            "aperture_offset" => self.set_offset(expect_array(key, &value)?),
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }

    fn has_property(&self, key: &str) -> bool {
        matches!(key, "aperture_size" | "aperture_type" | "aperture_offset")
    }
}
