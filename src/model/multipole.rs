//! Multipole strength records with order-normalised coefficient arrays.
//!
//! Normal and skew coefficients are always stored with the same length, the multipole
//! *order*. Every write goes through [`normalize`]: trailing zeros are trimmed, an all-zero
//! array collapses to `[0.0]`, and both arrays are zero-padded to
//! `max(len(normal), len(skew), min_order)`. Fixed-order magnets (quadrupoles, sextupoles,
//! octupoles) raise `min_order` so their main coefficient always has a slot.

use super::properties::{
    PropertyError, PropertyValue, Properties, expect_array, expect_f64, expect_i64, nonzero_f64,
};
use std::fmt;
use std::marker::PhantomData;

const COEFFICIENT_RTOL: f64 = 1e-8;
const COEFFICIENT_ATOL: f64 = 1e-8;

const DEFAULT_COEFFICIENTS: [f64; 4] = [0.0; 4];

/// Trims, pads and aligns a pair of coefficient arrays.
///
/// # Arguments
///
/// * `normal` - Normal coefficients, index `n` being the `2(n+1)`-pole term.
/// * `skew` - Skew coefficients with the same indexing.
/// * `min_order` - Lower bound on the resulting length.
///
/// # Returns
///
/// `(normal, skew)` of equal length `max(trimmed lengths, min_order)`.
pub fn normalize(normal: &[f64], skew: &[f64], min_order: usize) -> (Vec<f64>, Vec<f64>) {
    let mut normal = trim_trailing_zeros(normal);
    let mut skew = trim_trailing_zeros(skew);
    let order = normal.len().max(skew.len()).max(min_order);
    normal.resize(order, 0.0);
    skew.resize(order, 0.0);
    (normal, skew)
}

fn trim_trailing_zeros(values: &[f64]) -> Vec<f64> {
    match values.iter().rposition(|v| *v != 0.0) {
        Some(last) => values[..=last].to_vec(),
        None => vec![0.0],
    }
}

fn coefficients_close(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= COEFFICIENT_ATOL + COEFFICIENT_RTOL * y.abs())
}

/// Shared storage for the thick and thin multipole records.
#[derive(Debug, Clone)]
struct Coefficients {
    normal: Vec<f64>,
    skew: Vec<f64>,
    min_order: usize,
}

impl Coefficients {
    fn new(normal: &[f64], skew: &[f64], min_order: usize) -> Self {
        let (normal, skew) = normalize(normal, skew, min_order);
        Self {
            normal,
            skew,
            min_order,
        }
    }

    fn order(&self) -> usize {
        self.normal.len()
    }

    fn set_normal(&mut self, normal: &[f64]) {
        (self.normal, self.skew) = normalize(normal, &self.skew, self.min_order);
    }

    fn set_skew(&mut self, skew: &[f64]) {
        (self.normal, self.skew) = normalize(&self.normal, skew, self.min_order);
    }

    /// Writes one coefficient, growing the arrays when `index` lies beyond the order.
    fn set_at(&mut self, index: usize, value: f64, skew: bool) {
        let target = if skew { &mut self.skew } else { &mut self.normal };
        if target.len() <= index {
            target.resize(index + 1, 0.0);
        }
        target[index] = value;
        (self.normal, self.skew) = normalize(&self.normal, &self.skew, self.min_order);
    }

    fn approx_eq(&self, other: &Self) -> bool {
        coefficients_close(&self.normal, &other.normal)
            && coefficients_close(&self.skew, &other.skew)
    }
}

/// Thick multipole strengths `kn`/`ks` in 1/m^(n+1).
#[derive(Debug, Clone)]
pub struct MultipoleStrength {
    coefficients: Coefficients,
    pub polarity: Option<i64>,
}

impl Default for MultipoleStrength {
    fn default() -> Self {
        Self::new(&DEFAULT_COEFFICIENTS, &DEFAULT_COEFFICIENTS)
    }
}

impl MultipoleStrength {
    pub fn new(kn: &[f64], ks: &[f64]) -> Self {
        Self::with_min_order(kn, ks, 1)
    }

    /// Creates a record whose order never drops below `min_order`.
    pub fn with_min_order(kn: &[f64], ks: &[f64], min_order: usize) -> Self {
        Self {
            coefficients: Coefficients::new(kn, ks, min_order.max(1)),
            polarity: None,
        }
    }

    pub fn with_polarity(mut self, polarity: i64) -> Self {
        self.polarity = Some(polarity);
        self
    }

    pub fn kn(&self) -> &[f64] {
        &self.coefficients.normal
    }

    pub fn ks(&self) -> &[f64] {
        &self.coefficients.skew
    }

    pub fn order(&self) -> usize {
        self.coefficients.order()
    }

    pub fn min_order(&self) -> usize {
        self.coefficients.min_order
    }

    pub fn set_kn(&mut self, kn: &[f64]) {
        self.coefficients.set_normal(kn);
    }

    pub fn set_ks(&mut self, ks: &[f64]) {
        self.coefficients.set_skew(ks);
    }

    /// Writes `kn[index]`, extending the order when needed.
    pub fn set_kn_at(&mut self, index: usize, value: f64) {
        self.coefficients.set_at(index, value, false);
    }

    /// Writes `ks[index]`, extending the order when needed.
    pub fn set_ks_at(&mut self, index: usize, value: f64) {
        self.coefficients.set_at(index, value, true);
    }
}

impl PartialEq for MultipoleStrength {
    fn eq(&self, other: &Self) -> bool {
        self.polarity == other.polarity && self.coefficients.approx_eq(&other.coefficients)
    }
}

impl fmt::Display for MultipoleStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultipoleStrength {{ order: {}, kn: {:?}, ks: {:?} }}",
            self.order(),
            self.kn(),
            self.ks()
        )
    }
}

impl Properties for MultipoleStrength {
    const RECORD: &'static str = "MultipoleStrengthData";

    fn init_properties(&self) -> &'static [&'static str] {
        &["kn", "ks", "polarity"]
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "kn" => Some(self.kn().to_vec().into()),
            "ks" => Some(self.ks().to_vec().into()),
            "polarity" => self.polarity.map(PropertyValue::Int),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "kn" => self.set_kn(&expect_array(key, &value)?),
            "ks" => self.set_ks(&expect_array(key, &value)?),
            "polarity" => self.polarity = Some(expect_i64(key, &value)?),
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }
}

/// Integrated thin-lens multipole strengths `knl`/`ksl` in 1/m^n.
#[derive(Debug, Clone)]
pub struct ThinMultipoleStrength {
    coefficients: Coefficients,
    pub polarity: Option<i64>,
}

impl Default for ThinMultipoleStrength {
    fn default() -> Self {
        Self::new(&DEFAULT_COEFFICIENTS, &DEFAULT_COEFFICIENTS)
    }
}

impl ThinMultipoleStrength {
    pub fn new(knl: &[f64], ksl: &[f64]) -> Self {
        Self {
            coefficients: Coefficients::new(knl, ksl, 1),
            polarity: None,
        }
    }

    pub fn knl(&self) -> &[f64] {
        &self.coefficients.normal
    }

    pub fn ksl(&self) -> &[f64] {
        &self.coefficients.skew
    }

    pub fn order(&self) -> usize {
        self.coefficients.order()
    }

    pub fn set_knl(&mut self, knl: &[f64]) {
        self.coefficients.set_normal(knl);
    }

    pub fn set_ksl(&mut self, ksl: &[f64]) {
        self.coefficients.set_skew(ksl);
    }

    /// Converts a thick multipole of the given length into its integrated thin form.
    pub fn from_thick(thick: &MultipoleStrength, length: f64) -> Self {
        let knl: Vec<f64> = thick.kn().iter().map(|k| k * length).collect();
        let ksl: Vec<f64> = thick.ks().iter().map(|k| k * length).collect();
        Self {
            coefficients: Coefficients::new(&knl, &ksl, 1),
            polarity: thick.polarity,
        }
    }
}

impl PartialEq for ThinMultipoleStrength {
    fn eq(&self, other: &Self) -> bool {
        self.polarity == other.polarity && self.coefficients.approx_eq(&other.coefficients)
    }
}

impl Properties for ThinMultipoleStrength {
    const RECORD: &'static str = "ThinMultipoleStrengthData";

    fn init_properties(&self) -> &'static [&'static str] {
        &["knl", "ksl", "polarity"]
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            "knl" => Some(self.knl().to_vec().into()),
            "ksl" => Some(self.ksl().to_vec().into()),
            "polarity" => self.polarity.map(PropertyValue::Int),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "knl" => self.set_knl(&expect_array(key, &value)?),
            "ksl" => self.set_ksl(&expect_array(key, &value)?),
            "polarity" => self.polarity = Some(expect_i64(key, &value)?),
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }
}

/// Compile-time description of a fixed-order magnet family.
pub trait MagnetOrder {
    /// Index of the main coefficient in `kn`/`ks`.
    const INDEX: usize;
    const RECORD: &'static str;
    const MAIN: &'static str;
    const SKEW: &'static str;
    const PROPERTIES: &'static [&'static str];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadrupolar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sextupolar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Octupolar;

impl MagnetOrder for Quadrupolar {
    const INDEX: usize = 1;
    const RECORD: &'static str = "QuadrupoleData";
    const MAIN: &'static str = "k1";
    const SKEW: &'static str = "k1s";
    const PROPERTIES: &'static [&'static str] =
        &["k1", "k1s", "kmax", "kmin", "kn", "ks", "polarity"];
}

impl MagnetOrder for Sextupolar {
    const INDEX: usize = 2;
    const RECORD: &'static str = "SextupoleData";
    const MAIN: &'static str = "k2";
    const SKEW: &'static str = "k2s";
    const PROPERTIES: &'static [&'static str] =
        &["k2", "k2s", "kmax", "kmin", "kn", "ks", "polarity"];
}

impl MagnetOrder for Octupolar {
    const INDEX: usize = 3;
    const RECORD: &'static str = "OctupoleData";
    const MAIN: &'static str = "k3";
    const SKEW: &'static str = "k3s";
    const PROPERTIES: &'static [&'static str] =
        &["k3", "k3s", "kmax", "kmin", "kn", "ks", "polarity"];
}

/// Multipole whose main component is fixed by its family.
///
/// The main normal and skew strengths are views onto `kn[INDEX]` and `ks[INDEX]`; the
/// arrays never shrink below `INDEX + 1` entries. Power-supply limits of zero mean
/// "unset" and are stored as `None`.
#[derive(Debug, Clone)]
pub struct MagnetStrength<O: MagnetOrder> {
    multipole: MultipoleStrength,
    kmax: Option<f64>,
    kmin: Option<f64>,
    _order: PhantomData<O>,
}

pub type QuadrupoleData = MagnetStrength<Quadrupolar>;
pub type SextupoleData = MagnetStrength<Sextupolar>;
pub type OctupoleData = MagnetStrength<Octupolar>;

impl<O: MagnetOrder> Default for MagnetStrength<O> {
    fn default() -> Self {
        Self::from_multipole(&DEFAULT_COEFFICIENTS, &DEFAULT_COEFFICIENTS)
    }
}

impl<O: MagnetOrder> MagnetStrength<O> {
    /// Creates a magnet from its main normal and skew strengths.
    pub fn new(main: f64, skew: f64) -> Self {
        let mut magnet = Self::default();
        magnet.set_main(main);
        magnet.set_skew(skew);
        magnet
    }

    /// Creates a magnet from full coefficient arrays.
    pub fn from_multipole(kn: &[f64], ks: &[f64]) -> Self {
        Self {
            multipole: MultipoleStrength::with_min_order(kn, ks, O::INDEX + 1),
            kmax: None,
            kmin: None,
            _order: PhantomData,
        }
    }

    pub fn with_limits(mut self, kmin: Option<f64>, kmax: Option<f64>) -> Self {
        self.set_kmin(kmin);
        self.set_kmax(kmax);
        self
    }

    pub fn main(&self) -> f64 {
        self.multipole.kn().get(O::INDEX).copied().unwrap_or(0.0)
    }

    pub fn skew(&self) -> f64 {
        self.multipole.ks().get(O::INDEX).copied().unwrap_or(0.0)
    }

    pub fn set_main(&mut self, value: f64) {
        self.multipole.set_kn_at(O::INDEX, value);
    }

    pub fn set_skew(&mut self, value: f64) {
        self.multipole.set_ks_at(O::INDEX, value);
    }

    pub fn kmax(&self) -> Option<f64> {
        self.kmax
    }

    pub fn kmin(&self) -> Option<f64> {
        self.kmin
    }

    pub fn set_kmax(&mut self, kmax: Option<f64>) {
        self.kmax = nonzero_f64(kmax);
    }

    pub fn set_kmin(&mut self, kmin: Option<f64>) {
        self.kmin = nonzero_f64(kmin);
    }

    pub fn multipole(&self) -> &MultipoleStrength {
        &self.multipole
    }

    /// Replaces the normal coefficients; the main slot is kept even when zeroed.
    pub fn set_kn(&mut self, kn: &[f64]) {
        self.multipole.set_kn(kn);
    }

    pub fn set_ks(&mut self, ks: &[f64]) {
        self.multipole.set_ks(ks);
    }

    pub fn set_kn_at(&mut self, index: usize, value: f64) {
        self.multipole.set_kn_at(index, value);
    }

    pub fn set_ks_at(&mut self, index: usize, value: f64) {
        self.multipole.set_ks_at(index, value);
    }

    pub fn set_polarity(&mut self, polarity: Option<i64>) {
        self.multipole.polarity = polarity;
    }

    pub fn order(&self) -> usize {
        self.multipole.order()
    }
}

impl QuadrupoleData {
    pub fn k1(&self) -> f64 {
        self.main()
    }

    pub fn k1s(&self) -> f64 {
        self.skew()
    }

    pub fn set_k1(&mut self, k1: f64) {
        self.set_main(k1);
    }

    pub fn set_k1s(&mut self, k1s: f64) {
        self.set_skew(k1s);
    }
}

impl SextupoleData {
    pub fn k2(&self) -> f64 {
        self.main()
    }

    pub fn k2s(&self) -> f64 {
        self.skew()
    }

    pub fn set_k2(&mut self, k2: f64) {
        self.set_main(k2);
    }

    pub fn set_k2s(&mut self, k2s: f64) {
        self.set_skew(k2s);
    }
}

impl OctupoleData {
    pub fn k3(&self) -> f64 {
        self.main()
    }

    pub fn k3s(&self) -> f64 {
        self.skew()
    }

    pub fn set_k3(&mut self, k3: f64) {
        self.set_main(k3);
    }

    pub fn set_k3s(&mut self, k3s: f64) {
        self.set_skew(k3s);
    }
}

// Field only; power-supply limits do not take part in equality.
impl<O: MagnetOrder> PartialEq for MagnetStrength<O> {
    fn eq(&self, other: &Self) -> bool {
        self.multipole == other.multipole
    }
}

impl<O: MagnetOrder> Properties for MagnetStrength<O> {
    const RECORD: &'static str = O::RECORD;

    fn init_properties(&self) -> &'static [&'static str] {
        O::PROPERTIES
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        match key {
            k if k == O::MAIN => Some(self.main().into()),
            k if k == O::SKEW => Some(self.skew().into()),
            "kmax" => self.kmax.map(PropertyValue::Float),
            "kmin" => self.kmin.map(PropertyValue::Float),
            _ => self.multipole.property(key),
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            k if k == O::MAIN => self.set_main(expect_f64(key, &value)?),
            k if k == O::SKEW => self.set_skew(expect_f64(key, &value)?),
            "kmax" => self.set_kmax(Some(expect_f64(key, &value)?)),
            "kmin" => self.set_kmin(Some(expect_f64(key, &value)?)),
            "kn" | "ks" | "polarity" => self.multipole.set_property(key, value)?,
            _ => return Err(PropertyError::unknown(Self::RECORD, key)),
        }
        Ok(())
    }
}
