//! Frames: ordered namespaces of declared variables.

use std::collections::HashMap;

use triad_common::Value;

/// A declared variable. `value` is `None` until the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    pub value: Option<Value>,
}

/// A set of uniquely named slots, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an unset slot. Returns `false` if the name already exists,
    /// leaving the frame unchanged.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.slots.len());
        self.slots.push(Slot {
            name: name.to_string(),
            value: None,
        });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.index.get(name).map(|&i| &self.slots[i])
    }

    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        match self.index.get(name) {
            Some(&i) => self.slots.get_mut(i),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }
}
