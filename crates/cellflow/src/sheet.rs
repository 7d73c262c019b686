//! Sheet: named cells with incremental recalculation
//!
//! Every edit goes through [`Sheet::set_content`], which keeps the
//! dependency registry in step with the formulas, rejects edits that would
//! close a cycle, and refreshes the cached value of the edited cell and of
//! every cell that depends on it, producers before consumers.
//!
//! # Example
//!
//! ```rust
//! use cellflow::{Sheet, CellValue};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_content("A1", "5").unwrap();
//! sheet.set_content("B1", "=A1+2").unwrap();
//! sheet.set_content("C1", "=B1+2").unwrap();
//!
//! let order = sheet.set_content("A1", "10").unwrap();
//! assert_eq!(order, ["A1", "B1", "C1"]);
//! assert_eq!(sheet.value("C1").unwrap(), &CellValue::Number(14.0));
//! ```

use crate::cell::{Cell, CellContent, CellValue};
use crate::error::{Error, Result};
use ahash::AHashSet;
use cellflow_core::CellName;
use cellflow_formula::{DependencyRegistry, LookupError, NodeId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace, warn};

static EMPTY_CONTENT: CellContent = CellContent::Empty;
static UNSET_VALUE: CellValue = CellValue::Unset;

/// Marker for an edit that would make a cell depend on itself
#[derive(Debug)]
struct Cycle;

/// A store of named cells
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// Non-empty cells
    cells: BTreeMap<CellName, Cell>,
    /// Which cells read which
    dependencies: DependencyRegistry,
    /// Modified since the last save or load
    changed: bool,
}

impl Sheet {
    /// Create a new empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of a cell; [`CellContent::Empty`] if it has none
    pub fn content(&self, name: &str) -> Result<&CellContent> {
        let name = CellName::parse(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or(&EMPTY_CONTENT, |cell| &cell.content))
    }

    /// Cached value of a cell; [`CellValue::Unset`] if it has none
    pub fn value(&self, name: &str) -> Result<&CellValue> {
        let name = CellName::parse(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or(&UNSET_VALUE, |cell| &cell.value))
    }

    /// Content of a cell as text that [`Sheet::set_content`] accepts
    pub fn string_form(&self, name: &str) -> Result<String> {
        Ok(self.content(name)?.to_string())
    }

    /// Names of all cells with content
    pub fn non_empty_names(&self) -> BTreeSet<CellName> {
        self.cells.keys().cloned().collect()
    }

    /// Iterate over non-empty cells in name order
    pub fn iter(&self) -> impl Iterator<Item = (&CellName, &Cell)> + '_ {
        self.cells.iter()
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell has content
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells whose formulas read `name` directly
    pub fn dependents_of(&self, name: &str) -> Result<Vec<CellName>> {
        let name = CellName::parse(name)?;
        Ok(self
            .dependencies
            .node_id(name.as_str())
            .into_iter()
            .flat_map(|id| self.dependencies.consumer_ids(id))
            .filter_map(|id| self.stored_name(id))
            .collect())
    }

    /// Whether the sheet was modified since it was last saved or loaded
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Record that the sheet matches its saved form
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    /// Set a cell from user input and recalculate everything it affects
    ///
    /// `text` is classified by [`CellContent::classify`]. Returns the cells
    /// whose values were refreshed, the edited cell first and every cell after
    /// all of its producers. The edit is all-or-nothing: on any error neither
    /// the cells nor the dependency registry change. The changed flag is only
    /// raised when the cell's content actually differs from before.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidName`] if `name` is not a cell name
    /// - [`Error::Formula`] if `text` is a malformed formula
    /// - [`Error::CircularReference`] if the cell would depend on itself
    pub fn set_content(&mut self, name: &str, text: &str) -> Result<Vec<CellName>> {
        let name = CellName::parse(name)?;
        let content = CellContent::classify(text)?;

        // Cycle check and order against the current graph. Swapping the
        // node's producers only touches edges into it, so neither changes.
        let order = match self.plan(&name, &content) {
            Ok(order) => order,
            Err(Cycle) => {
                warn!(cell = %name, "rejected edit that would create a circular reference");
                return Err(Error::CircularReference(name));
            }
        };

        let node = self.dependencies.node_id(name.as_str());
        let has_variables = content.variables().next().is_some();
        if node.is_some() || has_variables {
            let node = self.dependencies.intern(name.as_str());
            let producers: Vec<NodeId> = content
                .variables()
                .map(|variable| self.dependencies.intern(variable.as_str()))
                .collect();
            self.dependencies.replace_producer_ids(node, producers);
        }

        let previous = self.cells.get(&name).map_or(&EMPTY_CONTENT, Cell::content);
        if *previous != content {
            self.changed = true;
        }
        if content.is_empty() {
            self.cells.remove(&name);
        } else {
            self.cells.insert(name.clone(), Cell::new(content));
        }

        debug!(cell = %name, count = order.len(), "recalculating");
        for cell in &order {
            self.refresh(cell);
        }

        Ok(order)
    }

    /// Read-only view of the dependency registry
    pub fn dependencies(&self) -> &DependencyRegistry {
        &self.dependencies
    }

    /// Recalculation order for setting `name` to `content`, or the cycle the
    /// edit would close
    fn plan(
        &self,
        name: &CellName,
        content: &CellContent,
    ) -> std::result::Result<Vec<CellName>, Cycle> {
        if content.variables().any(|variable| variable == name) {
            return Err(Cycle);
        }
        let Some(start) = self.dependencies.node_id(name.as_str()) else {
            // Never referenced and references nothing yet
            return Ok(vec![name.clone()]);
        };
        let producers: AHashSet<NodeId> = content
            .variables()
            .filter_map(|variable| self.dependencies.node_id(variable.as_str()))
            .collect();

        let order = self.recalculation_order(start, &producers)?;
        Ok(order
            .into_iter()
            .filter_map(|id| {
                if id == start {
                    Some(name.clone())
                } else {
                    self.stored_name(id)
                }
            })
            .collect())
    }

    /// The stored cell behind an interned node
    ///
    /// Every consumer in the registry is a stored formula cell, so this only
    /// yields `None` for nodes that are not consumers.
    fn stored_name(&self, id: NodeId) -> Option<CellName> {
        self.cells
            .get_key_value(self.dependencies.name(id))
            .map(|(name, _)| name.clone())
    }

    /// Recalculation order from `start`
    ///
    /// Depth-first over consumer edges with an explicit stack. A node is
    /// emitted once all of its consumers are, and the emission order is then
    /// reversed, so producers come before consumers. Reaching one of the
    /// node's prospective `producers` means the edit would close a cycle.
    fn recalculation_order(
        &self,
        start: NodeId,
        producers: &AHashSet<NodeId>,
    ) -> std::result::Result<Vec<NodeId>, Cycle> {
        let mut visited = AHashSet::new();
        let mut finished = Vec::new();

        visited.insert(start);
        let mut stack = vec![(start, self.dependencies.consumer_ids(start))];

        loop {
            let Some((node, consumers)) = stack.last_mut() else {
                break;
            };
            let node = *node;
            match consumers.next() {
                Some(next) if producers.contains(&next) => return Err(Cycle),
                Some(next) => {
                    if visited.insert(next) {
                        stack.push((next, self.dependencies.consumer_ids(next)));
                    }
                }
                None => {
                    finished.push(node);
                    stack.pop();
                }
            }
        }

        finished.reverse();
        Ok(finished)
    }

    /// Recompute one cell's cached value from its content
    fn refresh(&mut self, name: &CellName) {
        let Some(cell) = self.cells.get(name) else {
            // Just emptied
            return;
        };

        let value = match &cell.content {
            CellContent::Empty => CellValue::Unset,
            CellContent::Number(n) => CellValue::Number(*n),
            CellContent::Text(s) => CellValue::Text(s.clone()),
            CellContent::Formula(expr) => expr
                .evaluate(&|variable: &CellName| self.numeric_value(variable))
                .into(),
        };
        trace!(cell = %name, value = %value, "refreshed");

        if let Some(cell) = self.cells.get_mut(name) {
            cell.value = value;
        }
    }

    /// Lookup used by formulas: another cell's cached number
    fn numeric_value(&self, name: &CellName) -> std::result::Result<f64, LookupError> {
        match self.cells.get(name).map(Cell::value) {
            None | Some(CellValue::Unset) => Err(LookupError::Undefined(name.clone())),
            Some(CellValue::Number(n)) => Ok(*n),
            Some(_) => Err(LookupError::NotNumeric(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellflow_formula::{EvalError, FormulaError};
    use pretty_assertions::assert_eq;

    fn names(list: &[&str]) -> Vec<CellName> {
        list.iter().map(|n| CellName::parse(n).unwrap()).collect()
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = Sheet::new();
        assert!(sheet.is_empty());
        assert_eq!(sheet.content("A1").unwrap(), &CellContent::Empty);
        assert_eq!(sheet.value("A1").unwrap(), &CellValue::Unset);
        assert!(sheet.non_empty_names().is_empty());
        assert!(!sheet.is_changed());
    }

    #[test]
    fn test_invalid_names() {
        let mut sheet = Sheet::new();
        assert_eq!(sheet.content("1A"), Err(Error::InvalidName("1A".into())));
        assert_eq!(sheet.value("A"), Err(Error::InvalidName("A".into())));
        assert_eq!(
            sheet.set_content("A_1", "5"),
            Err(Error::InvalidName("A_1".into()))
        );
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_set_number_text_formula() {
        let mut sheet = Sheet::new();
        assert_eq!(sheet.set_content("a1", "5").unwrap(), names(&["A1"]));
        sheet.set_content("B1", "hello").unwrap();
        sheet.set_content("C1", "=a1*2").unwrap();

        assert_eq!(sheet.content("A1").unwrap(), &CellContent::Number(5.0));
        assert_eq!(sheet.value("b1").unwrap(), &CellValue::Text("hello".into()));
        assert_eq!(sheet.value("C1").unwrap(), &CellValue::Number(10.0));
        assert_eq!(sheet.string_form("C1").unwrap(), "=A1*2");
        assert_eq!(
            sheet.non_empty_names().into_iter().collect::<Vec<_>>(),
            names(&["A1", "B1", "C1"])
        );
        assert!(sheet.is_changed());
    }

    #[test]
    fn test_chain_recalculation() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "5").unwrap();
        sheet.set_content("B1", "=A1+2").unwrap();
        sheet.set_content("C1", "=B1+2").unwrap();

        let order = sheet.set_content("A1", "5").unwrap();
        assert_eq!(order, names(&["A1", "B1", "C1"]));
        assert_eq!(sheet.value("B1").unwrap(), &CellValue::Number(7.0));
        assert_eq!(sheet.value("C1").unwrap(), &CellValue::Number(9.0));

        sheet.set_content("A1", "1").unwrap();
        assert_eq!(sheet.value("C1").unwrap(), &CellValue::Number(5.0));
    }

    #[test]
    fn test_forward_reference_resolves_later() {
        let mut sheet = Sheet::new();
        sheet.set_content("B1", "=A1+1").unwrap();
        assert!(sheet.value("B1").unwrap().is_error());

        sheet.set_content("A1", "41").unwrap();
        assert_eq!(sheet.value("B1").unwrap(), &CellValue::Number(42.0));
    }

    #[test]
    fn test_circular_reference_is_rejected() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "=B1").unwrap();
        assert_eq!(
            sheet.set_content("B1", "=A1"),
            Err(Error::CircularReference(CellName::parse("B1").unwrap()))
        );
        assert_eq!(sheet.content("B1").unwrap(), &CellContent::Empty);
        assert_eq!(sheet.string_form("A1").unwrap(), "=B1");
        assert_eq!(sheet.dependents_of("B1").unwrap(), names(&["A1"]));
        assert!(sheet.dependents_of("A1").unwrap().is_empty());
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let mut sheet = Sheet::new();
        assert!(matches!(
            sheet.set_content("A1", "=A1+1"),
            Err(Error::CircularReference(_))
        ));
        assert!(sheet.is_empty());
        assert!(sheet.dependents_of("A1").unwrap().is_empty());
    }

    #[test]
    fn test_rejected_edit_keeps_previous_formula() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "3").unwrap();
        sheet.set_content("B1", "=A1*2").unwrap();
        sheet.set_content("C1", "=B1+1").unwrap();

        // B1 := C1 would close B1 -> C1 -> B1
        assert!(sheet.set_content("B1", "=C1").is_err());
        assert_eq!(sheet.string_form("B1").unwrap(), "=A1*2");
        assert_eq!(sheet.dependents_of("A1").unwrap(), names(&["B1"]));
        assert!(sheet.dependents_of("C1").unwrap().is_empty());

        // The original dependency still drives recalculation
        let order = sheet.set_content("A1", "4").unwrap();
        assert_eq!(order, names(&["A1", "B1", "C1"]));
        assert_eq!(sheet.value("C1").unwrap(), &CellValue::Number(9.0));
    }

    #[test]
    fn test_rejected_cycle_leaves_registry_untouched() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "1").unwrap();
        sheet.set_content("A2", "=A1").unwrap();
        sheet.set_content("A3", "=A2").unwrap();
        sheet.mark_saved();

        let before = sheet.dependencies().clone();
        // Z9 and Q7 have never been seen; the cell itself is new as well
        assert!(sheet.set_content("A1", "=A3 + Z9").is_err());
        assert!(sheet.set_content("Q7", "=Q7").is_err());

        let after = sheet.dependencies();
        assert_eq!(after.len(), before.len());
        assert_eq!(after.node_count(), before.node_count());
        assert_eq!(after.interned_count(), before.interned_count());
        assert_eq!(after.node_id("Z9"), None);
        assert_eq!(after.node_id("Q7"), None);
        assert_eq!(sheet.len(), 3);
        assert!(!sheet.is_changed());
    }

    #[test]
    fn test_changed_only_when_content_differs() {
        let mut sheet = Sheet::new();

        // Emptying a cell that never had content
        assert_eq!(sheet.set_content("A1", "").unwrap(), names(&["A1"]));
        assert!(!sheet.is_changed());
        assert_eq!(sheet.dependencies().interned_count(), 0);

        sheet.set_content("A1", "5").unwrap();
        assert!(sheet.is_changed());
        sheet.mark_saved();

        // Same content in another spelling
        sheet.set_content("a1", "5.000").unwrap();
        assert!(!sheet.is_changed());

        sheet.set_content("A1", "6").unwrap();
        assert!(sheet.is_changed());
        sheet.mark_saved();

        sheet.set_content("A1", "").unwrap();
        assert!(sheet.is_changed());
        sheet.mark_saved();
        sheet.set_content("A1", "").unwrap();
        assert!(!sheet.is_changed());
    }

    #[test]
    fn test_emptying_unset_producer_refreshes_readers() {
        let mut sheet = Sheet::new();
        sheet.set_content("B1", "=A1+1").unwrap();
        assert_eq!(sheet.set_content("A1", "").unwrap(), names(&["A1", "B1"]));
        assert!(sheet.value("B1").unwrap().is_error());
    }

    #[test]
    fn test_formula_error_leaves_sheet_untouched() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "1").unwrap();
        sheet.mark_saved();

        assert_eq!(
            sheet.set_content("A1", "=1+"),
            Err(Error::Formula(FormulaError::InvalidEnd("+".into())))
        );
        assert_eq!(sheet.content("A1").unwrap(), &CellContent::Number(1.0));
        assert!(!sheet.is_changed());
    }

    #[test]
    fn test_division_by_zero_propagates() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "=5/0").unwrap();
        sheet.set_content("B1", "=A1+1").unwrap();

        assert_eq!(
            sheet.value("A1").unwrap(),
            &CellValue::Error(EvalError::DivisionByZero)
        );
        assert!(sheet.value("B1").unwrap().is_error());
    }

    #[test]
    fn test_text_operand_is_an_error() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "hello").unwrap();
        sheet.set_content("B1", "=A1+1").unwrap();
        assert_eq!(
            sheet.value("B1").unwrap(),
            &CellValue::Error(EvalError::Lookup(LookupError::NotNumeric(
                CellName::parse("A1").unwrap()
            )))
        );
    }

    #[test]
    fn test_emptying_a_cell() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "2").unwrap();
        sheet.set_content("B1", "=A1*3").unwrap();

        let order = sheet.set_content("A1", "").unwrap();
        assert_eq!(order, names(&["A1", "B1"]));
        assert_eq!(sheet.content("A1").unwrap(), &CellContent::Empty);
        assert_eq!(sheet.value("A1").unwrap(), &CellValue::Unset);
        assert!(sheet.value("B1").unwrap().is_error());
        assert_eq!(sheet.len(), 1);

        // Emptying a formula drops its edges
        sheet.set_content("B1", "").unwrap();
        assert!(sheet.dependents_of("A1").unwrap().is_empty());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_replacing_formula_with_number_breaks_dependency() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "1").unwrap();
        sheet.set_content("B1", "=A1").unwrap();
        sheet.set_content("B1", "7").unwrap();

        assert_eq!(sheet.set_content("A1", "2").unwrap(), names(&["A1"]));
        assert_eq!(sheet.value("B1").unwrap(), &CellValue::Number(7.0));
    }

    #[test]
    fn test_diamond_order() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "1").unwrap();
        sheet.set_content("B1", "=A1+1").unwrap();
        sheet.set_content("C1", "=A1*10").unwrap();
        sheet.set_content("D1", "=B1+C1").unwrap();

        let order = sheet.set_content("A1", "2").unwrap();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], "A1");
        assert_eq!(order.iter().filter(|n| **n == "D1").count(), 1);
        let pos = |n: &str| order.iter().position(|o| o == n).unwrap();
        assert!(pos("B1") < pos("D1"));
        assert!(pos("C1") < pos("D1"));
        assert_eq!(sheet.value("D1").unwrap(), &CellValue::Number(23.0));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut sheet = Sheet::new();
        sheet.set_content("A1", "0").unwrap();
        for i in 2..=5000 {
            sheet
                .set_content(&format!("A{i}"), &format!("=A{}+1", i - 1))
                .unwrap();
        }
        let order = sheet.set_content("A1", "1").unwrap();
        assert_eq!(order.len(), 5000);
        assert_eq!(sheet.value("A5000").unwrap(), &CellValue::Number(5000.0));
    }
}
