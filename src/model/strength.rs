//! Strength records for bends, solenoids, cavities and kickers.
//!
//! Most of these are flat bags of floats; they share one macro-generated implementation of
//! [`Properties`]. Records with typed or optional fields implement it by hand.

use super::properties::{
    PropertyError, PropertyValue, Properties, expect_f64, expect_i64, expect_text,
};
use super::types::EdgeSide;

macro_rules! float_record {
    (
        $(#[$meta:meta])*
        $name:ident, $record:literal { $($(#[$field_meta:meta])* $field:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: f64,)+
        }

        impl Properties for $name {
            const RECORD: &'static str = $record;

            fn init_properties(&self) -> &'static [&'static str] {
                &[$(stringify!($field)),+]
            }

            fn property(&self, key: &str) -> Option<PropertyValue> {
                match key {
                    $(stringify!($field) => Some(PropertyValue::Float(self.$field)),)+
                    _ => None,
                }
            }

            fn set_property(
                &mut self,
                key: &str,
                value: PropertyValue,
            ) -> Result<(), PropertyError> {
                match key {
                    $(stringify!($field) => self.$field = expect_f64(key, &value)?,)+
                    _ => return Err(PropertyError::unknown(Self::RECORD, key)),
                }
                Ok(())
            }
        }
    };
}

float_record! {
    /// Sector or rectangular bend strength.
    BendData, "BendData" {
        /// Bending angle in radians.
        angle,
        /// Entrance pole-face rotation in radians.
        e1,
        /// Exit pole-face rotation in radians.
        e2,
        /// Dipole strength in 1/m.
        k0,
    }
}

float_record! {
    SolenoidData, "SolenoidData" {
        /// Solenoid strength in rad/m.
        ks,
    }
}

float_record! {
    ThinSolenoidData, "ThinSolenoidData" {
        /// Integrated solenoid strength in rad.
        ksi,
    }
}

float_record! {
    RfCavityData, "RFCavityData" {
        /// Peak voltage in MV.
        voltage,
        /// Frequency in MHz.
        frequency,
        /// Phase lag in units of 2π.
        lag,
    }
}

float_record! {
    HKickerData, "HKickerData" { hkick }
}

float_record! {
    VKickerData, "VKickerData" { vkick }
}

float_record! {
    KickerData, "KickerData" { kick }
}

impl BendData {
    pub fn new(angle: f64) -> Self {
        Self {
            angle,
            ..Default::default()
        }
    }
}

/// Fringe-field kick applied at one face of a dipole.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DipoleEdgeData {
    /// Curvature of the adjacent bend in 1/m.
    pub h: f64,
    /// Pole-face rotation in radians.
    pub e1: f64,
    pub side: EdgeSide,
}

impl DipoleEdgeData {
    pub fn new(h: f64, e1: f64, side: EdgeSide) -> Self {
        Self { h, e1, side }
    }

    /// Builds an edge from a side name, failing on anything but `entrance` or `exit`.
    pub fn from_side_name(h: f64, e1: f64, side: &str) -> Result<Self, PropertyError> {
        let side = side
            .parse::<EdgeSide>()
            .map_err(|e| PropertyError::invalid("side", e))?;
        Ok(Self::new(h, e1, side))
    }
}

impl Properties for DipoleEdgeData {
    const RECORD: &'static str = "DipoleEdgeData";

    fn init_properties(&self) -> &'static [&'static str] {
        &["h", "e1", "side"]
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "h" => Some(self.h.into()),
            "e1" => Some(self.e1.into()),
            "side" => Some(self.side.name().into()),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "h" => self.h = expect_f64(key, &value)?,
            "e1" => self.e1 = expect_f64(key, &value)?,
            "side" => {
                self.side = expect_text(key, &value)?
                    .parse()
                    .map_err(|e: String| PropertyError::invalid(key, e))?
            }
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }
}

/// Integrator hints for engines that track with per-element pass methods.
///
/// Exported under the engine's own spelling (`NumIntSteps`, `PassMethod`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassData {
    pub num_int_steps: Option<i64>,
    pub pass_method: Option<String>,
}

impl PassData {
    pub fn is_empty(&self) -> bool {
        self.num_int_steps.is_none() && self.pass_method.is_none()
    }
}

impl Properties for PassData {
    const RECORD: &'static str = "PassData";

    fn init_properties(&self) -> &'static [&'static str] {
        &["NumIntSteps", "PassMethod"]
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "NumIntSteps" => self.num_int_steps.map(PropertyValue::Int),
            "PassMethod" => self.pass_method.clone().map(PropertyValue::Text),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "NumIntSteps" => {
                let steps = expect_i64(key, &value)?;
                if steps < 0 {
                    return Err(PropertyError::invalid(key, "step count cannot be negative"));
                }
                self.num_int_steps = Some(steps);
            }
            "PassMethod" => self.pass_method = Some(expect_text(key, &value)?.to_string()),
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bend_data_exports_fields_in_order() {
        let bend = BendData {
            angle: 0.01,
            e1: 0.005,
            e2: 0.005,
            k0: 0.0,
        };
        let pairs: Vec<_> = bend.iter_properties().collect();
        assert_eq!(
            pairs,
            vec![
                ("angle", Some(PropertyValue::Float(0.01))),
                ("e1", Some(PropertyValue::Float(0.005))),
                ("e2", Some(PropertyValue::Float(0.005))),
                ("k0", Some(PropertyValue::Float(0.0))),
            ]
        );
    }

    #[test]
    fn float_records_accept_integer_values() {
        let mut cavity = RfCavityData::default();
        cavity
            .set_property("voltage", PropertyValue::Int(50))
            .unwrap();
        cavity
            .set_property("frequency", PropertyValue::Float(400.79))
            .unwrap();

        assert_eq!(cavity.voltage, 50.0);
        assert_eq!(cavity.frequency, 400.79);
        assert_eq!(cavity.lag, 0.0);
    }

    #[test]
    fn float_records_reject_unknown_keys() {
        let mut solenoid = SolenoidData::default();
        let err = solenoid
            .set_property("ksi", PropertyValue::Float(1.0))
            .unwrap_err();
        assert_eq!(
            err,
            PropertyError::UnknownProperty {
                record: "SolenoidData",
                key: "ksi".into()
            }
        );
    }

    #[test]
    fn kicker_records_export_single_field() {
        assert_eq!(HKickerData { hkick: 1e-4 }.init_properties(), &["hkick"]);
        assert_eq!(VKickerData::default().init_properties(), &["vkick"]);
        assert_eq!(
            KickerData { kick: 2e-4 }.property("kick"),
            Some(PropertyValue::Float(2e-4))
        );
    }

    #[test]
    fn dipole_edge_rejects_invalid_side() {
        let err = DipoleEdgeData::from_side_name(0.1, 0.0, "middle").unwrap_err();
        assert!(matches!(err, PropertyError::InvalidValue { ref key, .. } if key == "side"));

        let edge = DipoleEdgeData::from_side_name(0.1, 0.02, "exit").unwrap();
        assert_eq!(edge.side, EdgeSide::Exit);
    }

    #[test]
    fn dipole_edge_set_property_keeps_side_on_error() {
        let mut edge = DipoleEdgeData::new(0.1, 0.0, EdgeSide::Entrance);
        assert!(edge
            .set_property("side", PropertyValue::from("both"))
            .is_err());
        assert_eq!(edge.side, EdgeSide::Entrance);

        edge.set_property("side", PropertyValue::from("exit")).unwrap();
        assert_eq!(edge.property("side"), Some(PropertyValue::from("exit")));
    }

    #[test]
    fn pass_data_reports_unset_values_as_none() {
        let pass = PassData::default();
        assert!(pass.is_empty());
        assert_eq!(
            pass.iter_properties().collect::<Vec<_>>(),
            vec![("NumIntSteps", None), ("PassMethod", None)]
        );
    }

    #[test]
    fn pass_data_validates_step_count() {
        let mut pass = PassData::default();
        pass.set_property("NumIntSteps", PropertyValue::Int(10))
            .unwrap();
        pass.set_property("PassMethod", PropertyValue::from("StrMPoleSymplectic4Pass"))
            .unwrap();
        assert_eq!(pass.num_int_steps, Some(10));
        assert_eq!(pass.pass_method.as_deref(), Some("StrMPoleSymplectic4Pass"));

        assert!(pass
            .set_property("NumIntSteps", PropertyValue::Int(-1))
            .is_err());
    }
}
