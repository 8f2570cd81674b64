//! Longitudinal placement of an element along the reference orbit.
//!
//! An element is placed by its `location` relative to a `reference` point (itself usually the
//! position of a `reference_element`). The centre, entry and exit positions are derived
//! quantities; they are cached and recomputed every time one of their inputs changes, so
//! reads never observe a stale value.

use super::properties::{
    PropertyError, PropertyValue, Properties, expect_f64, expect_text,
};
use super::types::Anchor;
use std::fmt;

/// Derived start, centre and end positions, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Span {
    start: f64,
    centre: f64,
    end: f64,
}

impl Span {
    fn compute(length: f64, location: f64, reference: f64) -> Self {
        let centre = location + reference;
        Self {
            start: centre - length / 2.0,
            centre,
            end: centre + length / 2.0,
        }
    }
}

/// Length and placement of an element, in metres.
///
/// `length`, `location` and `reference` are only writable through setters. Each setter
/// refreshes the cached [`Span`], which keeps `start + length == end` and
/// `position == (start + end) / 2` true at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementPosition {
    length: f64,
    location: f64,
    reference: f64,
    /// Name of the element the `reference` position was taken from, if any.
    pub reference_element: String,
    /// Mechanical separation between twin apertures.
    pub mech_sep: f64,
    span: Span,
}

impl Default for ElementPosition {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl ElementPosition {
    /// Creates a position record from its three independent inputs.
    ///
    /// # Arguments
    ///
    /// * `length` - Element length in metres.
    /// * `location` - Centre location relative to `reference`.
    /// * `reference` - Absolute position of the reference point.
    ///
    /// # Returns
    ///
    /// A record whose derived positions are already computed.
    pub fn new(length: f64, location: f64, reference: f64) -> Self {
        Self {
            length,
            location,
            reference,
            reference_element: String::new(),
            mech_sep: 0.0,
            span: Span::compute(length, location, reference),
        }
    }

    /// Creates a position record at an absolute centre position with no reference.
    pub fn at(length: f64, location: f64) -> Self {
        Self::new(length, location, 0.0)
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn location(&self) -> f64 {
        self.location
    }

    pub fn reference(&self) -> f64 {
        self.reference
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
        self.recompute();
    }

    pub fn set_location(&mut self, location: f64) {
        self.location = location;
        self.recompute();
    }

    pub fn set_reference(&mut self, reference: f64) {
        self.reference = reference;
        self.recompute();
    }

    /// Updates location and reference together with a single recomputation.
    ///
    /// # Arguments
    ///
    /// * `location` - New centre location relative to `reference`.
    /// * `reference` - New absolute reference position.
    pub fn set_position(&mut self, location: f64, reference: f64) {
        self.location = location;
        self.reference = reference;
        self.recompute();
    }

    /// Moves the element downstream by `ds` metres without touching its reference.
    pub fn shift(&mut self, ds: f64) {
        self.set_location(self.location + ds);
    }

    /// Entry position.
    pub fn start(&self) -> f64 {
        self.span.start
    }

    /// Centre position.
    pub fn position(&self) -> f64 {
        self.span.centre
    }

    /// Exit position.
    pub fn end(&self) -> f64 {
        self.span.end
    }

    /// Returns the derived position at the requested anchor.
    ///
    /// # Arguments
    ///
    /// * `anchor` - Which point of the element to report.
    ///
    /// # Returns
    ///
    /// The absolute position in metres.
    pub fn get(&self, anchor: Anchor) -> f64 {
        match anchor {
            Anchor::Start => self.span.start,
            Anchor::Centre => self.span.centre,
            Anchor::End => self.span.end,
        }
    }

    fn recompute(&mut self) {
        self.span = Span::compute(self.length, self.location, self.reference);
    }
}

impl fmt::Display for ElementPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ElementPosition {{ length: {:.6}, start: {:.6}, centre: {:.6}, end: {:.6} }}",
            self.length, self.span.start, self.span.centre, self.span.end
        )
    }
}

impl Properties for ElementPosition {
    const RECORD: &'static str = "ElementPosition";

    fn init_properties(&self) -> &'static [&'static str] {
        &[
            "length",
            "location",
            "reference",
            "reference_element",
            "mech_sep",
        ]
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "length" => Some(self.length.into()),
            "location" => Some(self.location.into()),
            "reference" => Some(self.reference.into()),
            "reference_element" => Some(self.reference_element.clone().into()),
            "mech_sep" => Some(self.mech_sep.into()),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "length" => self.set_length(expect_f64(key, &value)?),
            "location" => self.set_location(expect_f64(key, &value)?),
            "reference" => self.set_reference(expect_f64(key, &value)?),
            "reference_element" => self.reference_element = expect_text(key, &value)?.to_string(),
            "mech_sep" => self.mech_sep = expect_f64(key, &value)?,
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn element_position_default_is_zero_everywhere() {
        let pos = ElementPosition::default();
        assert_eq!(pos.length(), 0.0);
        assert_eq!(pos.start(), 0.0);
        assert_eq!(pos.position(), 0.0);
        assert_eq!(pos.end(), 0.0);
        assert!(pos.reference_element.is_empty());
    }

    #[test]
    fn element_position_new_derives_span() {
        let pos = ElementPosition::new(2.0, 3.0, 10.0);
        assert!(close(pos.position(), 13.0));
        assert!(close(pos.start(), 12.0));
        assert!(close(pos.end(), 14.0));
    }

    #[test]
    fn element_position_setters_recompute_span() {
        let mut pos = ElementPosition::at(1.0, 5.0);

        pos.set_length(3.0);
        assert!(close(pos.start(), 3.5));
        assert!(close(pos.end(), 6.5));

        pos.set_location(6.0);
        assert!(close(pos.position(), 6.0));

        pos.set_reference(100.0);
        assert!(close(pos.position(), 106.0));
        assert!(close(pos.start(), 104.5));
    }

    #[test]
    fn element_position_set_position_updates_both_inputs() {
        let mut pos = ElementPosition::at(2.0, 1.0);
        pos.set_position(0.5, 20.0);

        assert_eq!(pos.location(), 0.5);
        assert_eq!(pos.reference(), 20.0);
        assert!(close(pos.position(), 20.5));
    }

    #[test]
    fn element_position_get_matches_accessors() {
        let pos = ElementPosition::new(4.0, 1.0, 1.0);
        assert_eq!(pos.get(Anchor::Start), pos.start());
        assert_eq!(pos.get(Anchor::Centre), pos.position());
        assert_eq!(pos.get(Anchor::End), pos.end());
    }

    #[test]
    fn element_position_shift_moves_location_only() {
        let mut pos = ElementPosition::new(1.0, 2.0, 5.0);
        pos.shift(0.25);
        assert!(close(pos.location(), 2.25));
        assert_eq!(pos.reference(), 5.0);
        assert!(close(pos.position(), 7.25));
    }

    #[test]
    fn element_position_set_property_recomputes_span() {
        let mut pos = ElementPosition::default();
        pos.set_property("length", PropertyValue::Int(2)).unwrap();
        pos.set_property("location", PropertyValue::Float(4.0)).unwrap();
        pos.set_property("reference_element", PropertyValue::from("ip1"))
            .unwrap();

        assert!(close(pos.start(), 3.0));
        assert!(close(pos.end(), 5.0));
        assert_eq!(pos.reference_element, "ip1");
    }

    #[test]
    fn element_position_set_property_rejects_wrong_types() {
        let mut pos = ElementPosition::default();
        assert!(pos
            .set_property("length", PropertyValue::from("long"))
            .is_err());
        assert!(pos
            .set_property("reference_element", PropertyValue::Float(1.0))
            .is_err());
        assert!(pos.set_property("tilt", PropertyValue::Float(1.0)).is_err());
    }

    #[test]
    fn element_position_exports_all_fields() {
        let pos = ElementPosition::new(1.0, 2.0, 3.0);
        let keys: Vec<_> = pos.iter_properties().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["length", "location", "reference", "reference_element", "mech_sep"]
        );
        assert_eq!(pos.property("reference"), Some(PropertyValue::Float(3.0)));
    }

    #[test]
    fn element_position_display_reports_span() {
        let pos = ElementPosition::at(2.0, 1.0);
        assert_eq!(
            pos.to_string(),
            "ElementPosition { length: 2.000000, start: 0.000000, centre: 1.000000, end: 2.000000 }"
        );
    }

    proptest! {
        #[test]
        fn span_is_consistent_for_any_inputs(
            length in 0.0f64..1.0e4,
            location in -1.0e5f64..1.0e5,
            reference in -1.0e5f64..1.0e5,
        ) {
            let pos = ElementPosition::new(length, location, reference);
            let tol = 1e-9 * (1.0 + location.abs() + reference.abs() + length);

            prop_assert!((pos.start() + length - pos.end()).abs() <= tol);
            prop_assert!((pos.position() - (pos.start() + pos.end()) / 2.0).abs() <= tol);
        }

        #[test]
        fn span_stays_consistent_after_updates(
            length in 0.0f64..100.0,
            new_length in 0.0f64..100.0,
            location in -1.0e3f64..1.0e3,
            reference in -1.0e3f64..1.0e3,
        ) {
            let mut pos = ElementPosition::at(length, 0.0);
            pos.set_location(location);
            pos.set_reference(reference);
            pos.set_length(new_length);
            let tol = 1e-9 * (1.0 + location.abs() + reference.abs() + new_length);

            prop_assert!((pos.start() + new_length - pos.end()).abs() <= tol);
            prop_assert!((pos.position() - (location + reference)).abs() <= tol);
        }
    }
}
