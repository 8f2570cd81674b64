use crate::model::properties::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk layout shared by the TOML and JSON lattice files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatticeFile {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

/// One element: identity plus every set exported property, flattened into the same table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRecord {
    pub name: String,
    pub class: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}
