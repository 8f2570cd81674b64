//! Accelerator element composed from the individual attribute records.
//!
//! An [`Element`] owns one record of each common concern (identifiers, position, optional
//! aperture, integrator hints) plus the strength record that its [`ElementKind`] carries.
//! The element-level property API concatenates the records' exported fields and routes
//! reads and writes to the record that owns each key.

use super::aperture::Aperture;
use super::id::ElementId;
use super::multipole::{
    MultipoleStrength, OctupoleData, QuadrupoleData, SextupoleData, ThinMultipoleStrength,
};
use super::position::ElementPosition;
use super::properties::{PropertyError, PropertyValue, Properties};
use super::strength::{
    BendData, DipoleEdgeData, HKickerData, KickerData, PassData, RfCavityData, SolenoidData,
    ThinSolenoidData, VKickerData,
};
use super::types::{ElementClass, EdgeSide};
use smol_str::SmolStr;
use std::fmt;

/// Element class together with its strength record.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Drift,
    Marker,
    Monitor,
    Collimator,
    SBend(BendData),
    RBend(BendData),
    DipoleEdge(DipoleEdgeData),
    Quadrupole(QuadrupoleData),
    Sextupole(SextupoleData),
    Octupole(OctupoleData),
    Multipole(MultipoleStrength),
    ThinMultipole(ThinMultipoleStrength),
    Solenoid(SolenoidData),
    ThinSolenoid(ThinSolenoidData),
    RfCavity(RfCavityData),
    HKicker(HKickerData),
    VKicker(VKickerData),
    Kicker(KickerData),
}

/// Runs `$body` with `$record` bound to the strength record, or evaluates `$none` for
/// classes that carry no strength.
macro_rules! with_record {
    ($kind:expr, $record:ident => $body:expr, $none:expr) => {
        match $kind {
            ElementKind::Drift
            | ElementKind::Marker
            | ElementKind::Monitor
            | ElementKind::Collimator => $none,
            ElementKind::SBend($record) | ElementKind::RBend($record) => $body,
            ElementKind::DipoleEdge($record) => $body,
            ElementKind::Quadrupole($record) => $body,
            ElementKind::Sextupole($record) => $body,
            ElementKind::Octupole($record) => $body,
            ElementKind::Multipole($record) => $body,
            ElementKind::ThinMultipole($record) => $body,
            ElementKind::Solenoid($record) => $body,
            ElementKind::ThinSolenoid($record) => $body,
            ElementKind::RfCavity($record) => $body,
            ElementKind::HKicker($record) => $body,
            ElementKind::VKicker($record) => $body,
            ElementKind::Kicker($record) => $body,
        }
    };
}

impl ElementKind {
    /// Builds the kind for `class` with a default strength record.
    pub fn default_for(class: ElementClass) -> Self {
        match class {
            ElementClass::Drift => ElementKind::Drift,
            ElementClass::Marker => ElementKind::Marker,
            ElementClass::Monitor => ElementKind::Monitor,
            ElementClass::Collimator => ElementKind::Collimator,
            ElementClass::SBend => ElementKind::SBend(BendData::default()),
            ElementClass::RBend => ElementKind::RBend(BendData::default()),
            ElementClass::DipoleEdge => {
                ElementKind::DipoleEdge(DipoleEdgeData::new(0.0, 0.0, EdgeSide::Entrance))
            }
            ElementClass::Quadrupole => ElementKind::Quadrupole(QuadrupoleData::default()),
            ElementClass::Sextupole => ElementKind::Sextupole(SextupoleData::default()),
            ElementClass::Octupole => ElementKind::Octupole(OctupoleData::default()),
            ElementClass::Multipole => ElementKind::Multipole(MultipoleStrength::default()),
            ElementClass::ThinMultipole => {
                ElementKind::ThinMultipole(ThinMultipoleStrength::default())
            }
            ElementClass::Solenoid => ElementKind::Solenoid(SolenoidData::default()),
            ElementClass::ThinSolenoid => ElementKind::ThinSolenoid(ThinSolenoidData::default()),
            ElementClass::RfCavity => ElementKind::RfCavity(RfCavityData::default()),
            ElementClass::HKicker => ElementKind::HKicker(HKickerData::default()),
            ElementClass::VKicker => ElementKind::VKicker(VKickerData::default()),
            ElementClass::Kicker => ElementKind::Kicker(KickerData::default()),
        }
    }

    pub fn class(&self) -> ElementClass {
        match self {
            ElementKind::Drift => ElementClass::Drift,
            ElementKind::Marker => ElementClass::Marker,
            ElementKind::Monitor => ElementClass::Monitor,
            ElementKind::Collimator => ElementClass::Collimator,
            ElementKind::SBend(_) => ElementClass::SBend,
            ElementKind::RBend(_) => ElementClass::RBend,
            ElementKind::DipoleEdge(_) => ElementClass::DipoleEdge,
            ElementKind::Quadrupole(_) => ElementClass::Quadrupole,
            ElementKind::Sextupole(_) => ElementClass::Sextupole,
            ElementKind::Octupole(_) => ElementClass::Octupole,
            ElementKind::Multipole(_) => ElementClass::Multipole,
            ElementKind::ThinMultipole(_) => ElementClass::ThinMultipole,
            ElementKind::Solenoid(_) => ElementClass::Solenoid,
            ElementKind::ThinSolenoid(_) => ElementClass::ThinSolenoid,
            ElementKind::RfCavity(_) => ElementClass::RfCavity,
            ElementKind::HKicker(_) => ElementClass::HKicker,
            ElementKind::VKicker(_) => ElementClass::VKicker,
            ElementKind::Kicker(_) => ElementClass::Kicker,
        }
    }

    /// Exported field names of the strength record, empty for passive classes.
    pub fn init_properties(&self) -> &'static [&'static str] {
        with_record!(self, record => record.init_properties(), &[])
    }

    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        with_record!(self, record => record.property(key), None)
    }

    pub fn has_property(&self, key: &str) -> bool {
        with_record!(self, record => record.has_property(key), false)
    }

    pub fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let class = self.class();
        with_record!(
            self,
            record => record.set_property(key, value),
            Err(PropertyError::unknown(class.name(), key))
        )
    }
}

/// Named lattice element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: SmolStr,
    pub id: ElementId,
    pub position: ElementPosition,
    pub aperture: Option<Aperture>,
    pub kind: ElementKind,
    pub pass: PassData,
}

const APERTURE_KEYS: [&str; 3] = ["aperture_size", "aperture_type", "aperture_offset"];

/// Keys holding coefficient or size arrays; scalar writes may address single entries of them.
const ARRAY_KEYS: [&str; 6] = ["kn", "ks", "knl", "ksl", "aperture_size", "aperture_offset"];

impl Element {
    /// Creates a zero-length element of `class` at s = 0 with default strengths.
    pub fn new(name: &str, class: ElementClass) -> Self {
        Self::with_kind(name, ElementKind::default_for(class))
    }

    pub fn with_kind(name: &str, kind: ElementKind) -> Self {
        Self {
            name: SmolStr::new(name),
            id: ElementId::default(),
            position: ElementPosition::default(),
            aperture: None,
            kind,
            pass: PassData::default(),
        }
    }

    pub fn drift(name: &str, length: f64) -> Self {
        Self::new(name, ElementClass::Drift).with_length(length)
    }

    pub fn marker(name: &str) -> Self {
        Self::new(name, ElementClass::Marker)
    }

    pub fn quadrupole(name: &str, length: f64, k1: f64) -> Self {
        Self::with_kind(name, ElementKind::Quadrupole(QuadrupoleData::new(k1, 0.0)))
            .with_length(length)
    }

    pub fn sextupole(name: &str, length: f64, k2: f64) -> Self {
        Self::with_kind(name, ElementKind::Sextupole(SextupoleData::new(k2, 0.0)))
            .with_length(length)
    }

    pub fn octupole(name: &str, length: f64, k3: f64) -> Self {
        Self::with_kind(name, ElementKind::Octupole(OctupoleData::new(k3, 0.0)))
            .with_length(length)
    }

    pub fn sbend(name: &str, length: f64, angle: f64) -> Self {
        Self::with_kind(name, ElementKind::SBend(BendData::new(angle))).with_length(length)
    }

    pub fn rbend(name: &str, length: f64, angle: f64) -> Self {
        Self::with_kind(name, ElementKind::RBend(BendData::new(angle))).with_length(length)
    }

    pub fn thin_multipole(name: &str, knl: &[f64], ksl: &[f64]) -> Self {
        Self::with_kind(
            name,
            ElementKind::ThinMultipole(ThinMultipoleStrength::new(knl, ksl)),
        )
    }

    pub fn solenoid(name: &str, length: f64, ks: f64) -> Self {
        Self::with_kind(name, ElementKind::Solenoid(SolenoidData { ks })).with_length(length)
    }

    pub fn rf_cavity(name: &str, length: f64, voltage: f64, frequency: f64, lag: f64) -> Self {
        Self::with_kind(
            name,
            ElementKind::RfCavity(RfCavityData {
                voltage,
                frequency,
                lag,
            }),
        )
        .with_length(length)
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.position.set_length(length);
        self
    }

    /// Places the element centre at `location` metres from its reference.
    pub fn at(mut self, location: f64) -> Self {
        self.position.set_location(location);
        self
    }

    /// Places the element relative to another element's position.
    pub fn from_reference(mut self, reference_element: &str, reference: f64) -> Self {
        self.position.reference_element = reference_element.to_string();
        self.position.set_reference(reference);
        self
    }

    pub fn with_aperture(mut self, aperture: Aperture) -> Self {
        self.aperture = Some(aperture);
        self
    }

    pub fn with_id(mut self, id: ElementId) -> Self {
        self.id = id;
        self
    }

    pub fn class(&self) -> ElementClass {
        self.kind.class()
    }

    pub fn length(&self) -> f64 {
        self.position.length()
    }

    pub fn is_thick(&self) -> bool {
        self.position.length() > 0.0
    }

    pub fn is_drift(&self) -> bool {
        matches!(self.kind, ElementKind::Drift)
    }

    /// Exported field names across all records, in export order.
    ///
    /// Order: identifiers, position, aperture (when present), strength, integrator hints.
    pub fn property_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        names.extend_from_slice(self.id.init_properties());
        names.extend_from_slice(self.position.init_properties());
        if let Some(aperture) = &self.aperture {
            names.extend_from_slice(aperture.init_properties());
        }
        names.extend_from_slice(self.kind.init_properties());
        names.extend_from_slice(self.pass.init_properties());
        names
    }

    /// Reads any exported field of the element.
    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        if self.id.has_property(key) {
            self.id.property(key)
        } else if self.position.has_property(key) {
            self.position.property(key)
        } else if APERTURE_KEYS.contains(&key) {
            self.aperture.as_ref().and_then(|a| a.property(key))
        } else if self.pass.has_property(key) {
            self.pass.property(key)
        } else {
            self.kind.property(key)
        }
    }

    /// Writes any exported field of the element.
    ///
    /// Writing an aperture field on an element without aperture attaches a default circular
    /// aperture first.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::UnknownProperty`] when no record of this element exports
    /// `key`, or the owning record's error when the value is rejected.
    pub fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        if self.id.has_property(key) {
            self.id.set_property(key, value)
        } else if self.position.has_property(key) {
            self.position.set_property(key, value)
        } else if APERTURE_KEYS.contains(&key) {
            self.aperture
                .get_or_insert_with(Aperture::default)
                .set_property(key, value)
        } else if self.pass.has_property(key) {
            self.pass.set_property(key, value)
        } else if self.kind.has_property(key) {
            self.kind.set_property(key, value)
        } else {
            Err(PropertyError::unknown(self.class().name(), key))
        }
    }

    /// Iterates every exported `(name, value)` pair in export order.
    pub fn properties(&self) -> Vec<(&'static str, Option<PropertyValue>)> {
        self.property_names()
            .into_iter()
            .map(|key| (key, self.property(key)))
            .collect()
    }

    /// Applies a batch of property writes.
    ///
    /// Array-typed keys are applied before the others so that a coefficient array and a scalar
    /// view onto one of its entries (for example `kn` and `k1`) combine the same way regardless
    /// of input order, even when the array arrives as a bare number.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected write and returns its error.
    pub fn apply_properties<'a, I>(&mut self, properties: I) -> Result<(), PropertyError>
    where
        I: IntoIterator<Item = (&'a str, &'a PropertyValue)>,
    {
        let (arrays, scalars): (Vec<_>, Vec<_>) = properties
            .into_iter()
            .partition(|(key, _)| ARRAY_KEYS.contains(key));
        for (key, value) in arrays.into_iter().chain(scalars) {
            self.set_property(key, value.clone())?;
        }
        Ok(())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Element {{ name: \"{}\", class: {}, s: {:.6}, length: {:.6} }}",
            self.name,
            self.class(),
            self.position.position(),
            self.length()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::ApertureType;

    #[test]
    fn element_new_uses_default_strength_for_class() {
        let element = Element::new("q0", ElementClass::Quadrupole);
        assert_eq!(element.class(), ElementClass::Quadrupole);
        match &element.kind {
            ElementKind::Quadrupole(quad) => assert_eq!(quad.order(), 2),
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(element.length(), 0.0);
        assert!(!element.is_thick());
    }

    #[test]
    fn every_class_round_trips_through_default_kind() {
        for class in ElementClass::ALL {
            assert_eq!(ElementKind::default_for(class).class(), class);
        }
    }

    #[test]
    fn quadrupole_constructor_sets_length_and_strength() {
        let quad = Element::quadrupole("q1", 1.0, 0.2).at(1.0);

        assert_eq!(quad.name, "q1");
        assert_eq!(quad.property("k1"), Some(PropertyValue::Float(0.2)));
        assert!((quad.position.start() - 0.5).abs() < 1e-12);
        assert!((quad.position.end() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn property_names_concatenate_records() {
        let element = Element::quadrupole("q1", 1.0, 0.2);
        assert_eq!(
            element.property_names(),
            vec![
                "slot_id",
                "assembly_id",
                "length",
                "location",
                "reference",
                "reference_element",
                "mech_sep",
                "k1",
                "k1s",
                "kmax",
                "kmin",
                "kn",
                "ks",
                "polarity",
                "NumIntSteps",
                "PassMethod",
            ]
        );
    }

    #[test]
    fn property_names_include_aperture_when_present() {
        let element = Element::drift("d1", 2.0).with_aperture(Aperture::ellipse(0.02, 0.01));
        let names = element.property_names();
        assert!(names.contains(&"aperture_offset"));
        assert!(!names.contains(&"k1"));
    }

    #[test]
    fn set_property_routes_to_owning_record() {
        let mut element = Element::new("s1", ElementClass::Sextupole);
        element.set_property("length", PropertyValue::Float(0.3)).unwrap();
        element.set_property("k2", PropertyValue::Float(1.5)).unwrap();
        element.set_property("slot_id", PropertyValue::Int(42)).unwrap();
        element
            .set_property("PassMethod", PropertyValue::from("StrMPoleSymplectic4Pass"))
            .unwrap();

        assert_eq!(element.length(), 0.3);
        assert_eq!(element.property("k2"), Some(PropertyValue::Float(1.5)));
        assert_eq!(element.id.slot_id(), Some(42));
        assert_eq!(element.pass.pass_method.as_deref(), Some("StrMPoleSymplectic4Pass"));
    }

    #[test]
    fn set_property_attaches_aperture_on_demand() {
        let mut element = Element::marker("m1");
        assert!(element.aperture.is_none());
        assert_eq!(element.property("aperture_type"), None);

        element
            .set_property("aperture_type", PropertyValue::from("rectangle"))
            .unwrap();
        let aperture = element.aperture.as_ref().unwrap();
        assert_eq!(aperture.kind(), ApertureType::Rectangle);
    }

    #[test]
    fn set_property_rejects_keys_of_other_classes() {
        let mut drift = Element::drift("d1", 1.0);
        let err = drift
            .set_property("k1", PropertyValue::Float(0.1))
            .unwrap_err();
        assert_eq!(
            err,
            PropertyError::UnknownProperty {
                record: "Drift",
                key: "k1".into()
            }
        );
    }

    #[test]
    fn dipole_edge_side_is_validated_through_element() {
        let mut edge = Element::new("e1", ElementClass::DipoleEdge);
        assert!(edge.set_property("side", PropertyValue::from("inside")).is_err());
        edge.set_property("side", PropertyValue::from("exit")).unwrap();
        assert_eq!(edge.property("side"), Some(PropertyValue::from("exit")));
    }

    #[test]
    fn apply_properties_applies_arrays_before_scalars() {
        let k1 = PropertyValue::Float(0.7);
        let kn = PropertyValue::Array(vec![0.0, 0.1, 0.2]);
        let mut quad = Element::new("q", ElementClass::Quadrupole);

        quad.apply_properties([("k1", &k1), ("kn", &kn)]).unwrap();

        assert_eq!(
            quad.property("kn"),
            Some(PropertyValue::Array(vec![0.0, 0.7, 0.2]))
        );
    }

    #[test]
    fn apply_properties_orders_by_key_not_by_value_shape() {
        let kn = PropertyValue::Float(0.5);
        let k1 = PropertyValue::Float(0.3);

        for batch in [[("kn", &kn), ("k1", &k1)], [("k1", &k1), ("kn", &kn)]] {
            let mut quad = Element::new("q", ElementClass::Quadrupole);
            quad.apply_properties(batch).unwrap();

            assert_eq!(quad.property("k1"), Some(PropertyValue::Float(0.3)));
            assert_eq!(
                quad.property("kn"),
                Some(PropertyValue::Array(vec![0.5, 0.3]))
            );
        }
    }

    #[test]
    fn apply_properties_stops_at_first_error() {
        let good = PropertyValue::Float(2.0);
        let bad = PropertyValue::from("nope");
        let mut drift = Element::drift("d", 1.0);

        let result = drift.apply_properties([("length", &good), ("location", &bad)]);

        assert!(result.is_err());
        assert_eq!(drift.length(), 2.0);
    }

    #[test]
    fn properties_pairs_names_with_values() {
        let cavity = Element::rf_cavity("rf", 0.5, 10.0, 400.0, 0.5);
        let props = cavity.properties();
        assert!(props.contains(&("voltage", Some(PropertyValue::Float(10.0)))));
        assert!(props.contains(&("slot_id", None)));
    }

    #[test]
    fn from_reference_places_relative_to_anchor() {
        let element = Element::marker("m").from_reference("ip", 100.0).at(-2.0);
        assert_eq!(element.position.reference_element, "ip");
        assert!((element.position.position() - 98.0).abs() < 1e-12);
    }

    #[test]
    fn element_display_formats_summary() {
        let element = Element::drift("d0", 1.0).at(0.5);
        assert_eq!(
            element.to_string(),
            "Element { name: \"d0\", class: Drift, s: 0.500000, length: 1.000000 }"
        );
    }
}
