//! Label collection and resolution.
//!
//! Labels are recorded against the declared order of their LABEL instruction
//! while nodes are checked, then resolved to dense positions once the whole
//! program has been sorted.

use std::collections::HashMap;

use crate::error::LoadError;
use triad_common::LabelTable;

/// Label definitions keyed by name, valued by declared order.
#[derive(Debug, Default)]
pub(crate) struct LabelCollector {
    by_order: HashMap<String, u64>,
}

impl LabelCollector {
    /// Record a LABEL instruction. Duplicate names are a semantic error.
    pub(crate) fn define(&mut self, name: &str, order: u64) -> Result<(), LoadError> {
        if self.by_order.contains_key(name) {
            return Err(LoadError::DuplicateLabel {
                order,
                name: name.to_string(),
            });
        }
        self.by_order.insert(name.to_string(), order);
        Ok(())
    }

    /// Build the label table, mapping each declared order to its dense
    /// position via `position_of`.
    pub(crate) fn resolve(self, position_of: &HashMap<u64, usize>) -> LabelTable {
        let mut table = LabelTable::new();
        for (name, order) in &self.by_order {
            if let Some(&position) = position_of.get(order) {
                // Names are unique; `define` already rejected duplicates.
                let _ = table.insert(name, position);
            }
        }
        table
    }
}
