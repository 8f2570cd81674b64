//! Slot and assembly identifiers attached to an element.

use super::properties::{PropertyError, PropertyValue, Properties, expect_i64, nonzero_i64};

/// Database identifiers of the physical slot and assembly an element belongs to.
///
/// Zero is not a valid identifier in the source databases and is stored as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementId {
    slot_id: Option<i64>,
    assembly_id: Option<i64>,
}

impl ElementId {
    pub fn new(slot_id: Option<i64>, assembly_id: Option<i64>) -> Self {
        Self {
            slot_id: nonzero_i64(slot_id),
            assembly_id: nonzero_i64(assembly_id),
        }
    }

    pub fn slot_id(&self) -> Option<i64> {
        self.slot_id
    }

    pub fn assembly_id(&self) -> Option<i64> {
        self.assembly_id
    }

    pub fn set_slot_id(&mut self, slot_id: Option<i64>) {
        self.slot_id = nonzero_i64(slot_id);
    }

    pub fn set_assembly_id(&mut self, assembly_id: Option<i64>) {
        self.assembly_id = nonzero_i64(assembly_id);
    }

    pub fn is_empty(&self) -> bool {
        self.slot_id.is_none() && self.assembly_id.is_none()
    }
}

impl Properties for ElementId {
    const RECORD: &'static str = "ElementID";

    fn init_properties(&self) -> &'static [&'static str] {
        &["slot_id", "assembly_id"]
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "slot_id" => self.slot_id.map(PropertyValue::Int),
            "assembly_id" => self.assembly_id.map(PropertyValue::Int),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "slot_id" => self.set_slot_id(Some(expect_i64(key, &value)?)),
            "assembly_id" => self.set_assembly_id(Some(expect_i64(key, &value)?)),
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }
}
