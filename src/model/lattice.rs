use super::element::Element;
use super::types::{Anchor, ElementClass};
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

/// Ordered collection of elements, kept sorted by centre position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lattice {
    pub name: String,
    elements: Vec<Element>,
}

impl Lattice {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            elements: Vec::new(),
        }
    }

    /// Builds a lattice from elements placed by position; ties keep input order.
    pub fn from_sequence(name: &str, elements: Vec<Element>) -> Self {
        let mut lattice = Self {
            name: name.to_string(),
            elements,
        };
        lattice.sort_by_position();
        lattice
    }

    /// Builds a lattice from elements laid end to end, starting at s = 0.
    ///
    /// Every element's reference is cleared and its location set to the running end
    /// position plus half its length.
    pub fn from_line(name: &str, elements: Vec<Element>) -> Self {
        let mut s = 0.0;
        let mut placed = Vec::with_capacity(elements.len());
        for mut element in elements {
            let length = element.length();
            element.position.reference_element.clear();
            element.position.set_position(s + length / 2.0, 0.0);
            s += length;
            placed.push(element);
        }
        debug!(
            "placed {} line elements of lattice '{}' over {:.6} m",
            placed.len(),
            name,
            s
        );
        Self {
            name: name.to_string(),
            elements: placed,
        }
    }

    /// Inserts an element after every element whose centre is not downstream of it.
    pub fn add_element(&mut self, element: Element) {
        debug_assert!(
            self.element(&element.name).is_none() || element.is_drift(),
            "Attempted to add a duplicate element name '{}' to lattice '{}'",
            element.name,
            self.name
        );
        let s = element.position.position();
        let index = self
            .elements
            .partition_point(|e| e.position.position() <= s);
        self.elements.insert(index, element);
    }

    pub fn remove_element(&mut self, name: &str) -> Option<Element> {
        if let Some(index) = self.elements.iter().position(|e| e.name == name) {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Mutable access by name.
    ///
    /// Moving the element changes nothing in the lattice order until
    /// [`Lattice::sort_by_position`] is called.
    pub fn element_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name == name)
    }

    pub fn sort_by_position(&mut self) {
        self.elements
            .sort_by(|a, b| a.position.position().total_cmp(&b.position.position()));
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.elements.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name.as_str()).collect()
    }

    /// Positions of every element at the requested anchor.
    pub fn positions(&self, anchor: Anchor) -> Vec<f64> {
        self.elements
            .iter()
            .map(|e| e.position.get(anchor))
            .collect()
    }

    /// Furthest exit position, or zero for an empty lattice.
    pub fn total_length(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.position.end())
            .fold(0.0, f64::max)
    }

    pub fn count_by_class(&self) -> BTreeMap<ElementClass, usize> {
        let mut counts = BTreeMap::new();
        for element in &self.elements {
            *counts.entry(element.class()).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl<'a> IntoIterator for &'a Lattice {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lattice {{ name: \"{}\", elements: {}, length: {:.6} }}",
            self.name,
            self.len(),
            self.total_length()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fodo_sequence() -> Lattice {
        Lattice::from_sequence(
            "fodo",
            vec![
                Element::quadrupole("q3", 1.0, 0.2).at(5.0),
                Element::quadrupole("q1", 1.0, 0.2).at(1.0),
                Element::quadrupole("q2", 1.0, -0.2).at(3.0),
            ],
        )
    }

    #[test]
    fn from_sequence_sorts_by_centre() {
        let lattice = fodo_sequence();
        assert_eq!(lattice.names(), vec!["q1", "q2", "q3"]);
        assert_eq!(lattice.positions(Anchor::Centre), vec![1.0, 3.0, 5.0]);
        assert_eq!(lattice.positions(Anchor::Start), vec![0.5, 2.5, 4.5]);
    }

    #[test]
    fn from_sequence_keeps_input_order_for_ties() {
        let lattice = Lattice::from_sequence(
            "ties",
            vec![
                Element::marker("b").at(1.0),
                Element::marker("a").at(1.0),
            ],
        );
        assert_eq!(lattice.names(), vec!["b", "a"]);
    }

    #[test]
    fn from_line_places_elements_end_to_end() {
        let lattice = Lattice::from_line(
            "line",
            vec![
                Element::drift("d0", 1.0),
                Element::quadrupole("q1", 1.0, 0.2),
                Element::drift("d1", 1.0),
                Element::quadrupole("q2", 1.0, -0.2),
            ],
        );

        assert_eq!(lattice.positions(Anchor::Centre), vec![0.5, 1.5, 2.5, 3.5]);
        assert_eq!(lattice.total_length(), 4.0);
    }

    #[test]
    fn from_line_clears_previous_references() {
        let lattice = Lattice::from_line(
            "line",
            vec![Element::drift("d0", 2.0).from_reference("ip", 50.0)],
        );
        let drift = lattice.element("d0").unwrap();
        assert_eq!(drift.position.reference(), 0.0);
        assert!(drift.position.reference_element.is_empty());
        assert_eq!(drift.position.position(), 1.0);
    }

    #[test]
    fn add_element_inserts_in_position_order() {
        let mut lattice = fodo_sequence();
        lattice.add_element(Element::marker("m").at(2.0));
        lattice.add_element(Element::marker("end").at(10.0));

        assert_eq!(lattice.names(), vec!["q1", "m", "q2", "q3", "end"]);
    }

    #[test]
    fn remove_element_returns_removed() {
        let mut lattice = fodo_sequence();
        let removed = lattice.remove_element("q2").unwrap();

        assert_eq!(removed.name, "q2");
        assert_eq!(lattice.len(), 2);
        assert!(lattice.remove_element("q2").is_none());
    }

    #[test]
    fn element_mut_then_sort_reorders() {
        let mut lattice = fodo_sequence();
        lattice.element_mut("q1").unwrap().position.set_location(6.0);
        lattice.sort_by_position();

        assert_eq!(lattice.names(), vec!["q2", "q3", "q1"]);
        assert_eq!(lattice.index_of("q1"), Some(2));
    }

    #[test]
    fn total_length_is_furthest_end() {
        assert_eq!(Lattice::new("empty").total_length(), 0.0);
        assert_eq!(fodo_sequence().total_length(), 5.5);
    }

    #[test]
    fn count_by_class_groups_elements() {
        let mut lattice = fodo_sequence();
        lattice.add_element(Element::marker("m").at(0.0));
        let counts = lattice.count_by_class();

        assert_eq!(counts.get(&ElementClass::Quadrupole), Some(&3));
        assert_eq!(counts.get(&ElementClass::Marker), Some(&1));
        assert_eq!(counts.get(&ElementClass::Drift), None);
    }

    #[test]
    fn lattice_display_summarizes() {
        assert_eq!(
            fodo_sequence().to_string(),
            "Lattice { name: \"fodo\", elements: 3, length: 5.500000 }"
        );
    }
}
