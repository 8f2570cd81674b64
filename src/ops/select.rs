//! Element selection by class, name pattern, name range or position range.

use crate::model::element::Element;
use crate::model::lattice::Lattice;
use crate::model::types::ElementClass;
use crate::ops::error::Error;
use log::debug;
use regex::{Regex, RegexBuilder};

/// Returns the elements whose class is one of `classes`, in lattice order.
pub fn select_classes<'a>(lattice: &'a Lattice, classes: &[ElementClass]) -> Vec<&'a Element> {
    lattice
        .iter()
        .filter(|e| classes.contains(&e.class()))
        .collect()
}

/// Returns the elements whose name matches a shell-style glob.
///
/// `*` matches any run of characters and `?` a single character; everything else is
/// literal. Matching is case-insensitive and covers the whole name.
///
/// # Arguments
///
/// * `lattice` - Lattice to search.
/// * `pattern` - Glob such as `"mqxa*"` or `"q?"`.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] when the translated expression cannot be compiled.
pub fn find_elements<'a>(lattice: &'a Lattice, pattern: &str) -> Result<Vec<&'a Element>, Error> {
    let regex = glob_to_regex(pattern)?;
    let matches: Vec<&Element> = lattice
        .iter()
        .filter(|e| regex.is_match(e.name.as_str()))
        .collect();
    debug!(
        "pattern '{}' matched {} of {} elements in '{}'",
        pattern,
        matches.len(),
        lattice.len(),
        lattice.name
    );
    Ok(matches)
}

fn glob_to_regex(pattern: &str) -> Result<Regex, Error> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    RegexBuilder::new(&expr)
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Copies the inclusive range of elements between two names into a new lattice.
///
/// # Errors
///
/// Returns [`Error::UnknownElement`] when either name is absent and
/// [`Error::InvalidRange`] when `from` lies downstream of `to`.
pub fn slice_by_names(lattice: &Lattice, from: &str, to: &str) -> Result<Lattice, Error> {
    let start = lattice
        .index_of(from)
        .ok_or_else(|| Error::unknown_element(&lattice.name, from))?;
    let end = lattice
        .index_of(to)
        .ok_or_else(|| Error::unknown_element(&lattice.name, to))?;
    if start > end {
        return Err(Error::invalid_range(
            &lattice.name,
            format!("'{from}' is located after '{to}'"),
        ));
    }
    Ok(Lattice::from_sequence(
        &lattice.name,
        lattice.elements()[start..=end].to_vec(),
    ))
}

/// Copies the elements whose centre lies in `[start, end)` into a new lattice.
pub fn slice_by_positions(lattice: &Lattice, start: f64, end: f64) -> Lattice {
    let elements = lattice
        .iter()
        .filter(|e| {
            let s = e.position.position();
            s >= start && s < end
        })
        .cloned()
        .collect();
    Lattice::from_sequence(&lattice.name, elements)
}
