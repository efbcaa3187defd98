//! Per-render slot assignment.
//!
//! A [`ParamRegistry`] hands out 1-based slots in first-occurrence order and
//! remembers them, so every reference to one name within a render maps to
//! the same slot(s). Slots are contiguous from 1 with no gaps; a list value
//! takes one slot per element.
//!
//! A registry borrows the value map for one render and is consumed by
//! [`ParamRegistry::finalize`]. It is never shared between renders.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::{RenderError, RenderResult};
use crate::params::{ParamValue, Params};

/// A 1-based position of one bound value.
pub type Slot = usize;

/// The contiguous slots assigned to one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    start: Slot,
    len: usize,
}

impl SlotRange {
    /// First slot of the range. For an empty range, the slot the next
    /// allocation would receive.
    pub fn start(&self) -> Slot {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> Range<Slot> {
        self.start..self.start + self.len
    }
}

impl IntoIterator for SlotRange {
    type Item = Slot;
    type IntoIter = Range<Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Name → slot assignments and the values bound so far.
#[derive(Debug)]
pub struct ParamRegistry<'a, V> {
    params: &'a Params<V>,
    assigned: HashMap<&'a str, SlotRange>,
    values: Vec<&'a V>,
}

impl<'a, V> ParamRegistry<'a, V> {
    /// Start an empty registry over `params`.
    pub fn new(params: &'a Params<V>) -> Self {
        Self {
            params,
            assigned: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Look up the declared value for `name`.
    pub fn lookup(&self, name: &str) -> RenderResult<&'a ParamValue<V>> {
        let params = self.params;
        params
            .get(name)
            .ok_or_else(|| RenderError::unknown_parameter(name))
    }

    /// Slot for a scalar parameter, allocated on first sight.
    ///
    /// A list-valued name is expanded as by [`resolve_list`](Self::resolve_list)
    /// and its first slot is returned; an empty list fails with
    /// [`RenderError::EmptyList`].
    pub fn resolve(&mut self, name: &str) -> RenderResult<Slot> {
        let range = self.resolve_list(name)?;
        if range.is_empty() {
            return Err(RenderError::EmptyList(name.to_string()));
        }
        Ok(range.start())
    }

    /// Slots for a list parameter: one per element, allocated on first sight
    /// and returned unchanged on every later reference.
    ///
    /// A scalar name yields a one-slot range.
    pub fn resolve_list(&mut self, name: &str) -> RenderResult<SlotRange> {
        if let Some(range) = self.assigned.get(name) {
            return Ok(*range);
        }

        let params = self.params;
        let (key, value) = params
            .get_key_value(name)
            .ok_or_else(|| RenderError::unknown_parameter(name))?;

        let range = SlotRange {
            start: self.next_slot(),
            len: value.len(),
        };
        self.values.extend(value.values());
        self.assigned.insert(key, range);
        Ok(range)
    }

    /// The value bound to `slot`.
    pub fn value(&self, slot: Slot) -> Option<&'a V> {
        slot.checked_sub(1).and_then(|i| self.values.get(i)).copied()
    }

    /// Slot the next new value would receive.
    pub fn next_slot(&self) -> Slot {
        self.values.len() + 1
    }

    /// Number of slots allocated so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct names resolved so far.
    pub fn distinct_names(&self) -> usize {
        self.assigned.len()
    }

    /// Values in ascending slot order.
    pub fn finalize(self) -> Vec<&'a V> {
        self.values
    }
}
