//! Fixed-capacity watchpoint arena
//!
//! All slots are created up front. Each slot carries an intrusive `next`
//! index, and two index-linked lists thread through the arena:
//!
//! - the **free queue**: `allocate` pops its head, `release` appends to its tail
//! - the **active list**: `allocate` appends, `release` unlinks from anywhere
//!
//! Both moves are symmetric unlink-then-link operations, so every slot is on
//! exactly one list at all times. [`WatchpointPool::is_partitioned`] walks both
//! lists and checks that.
//!
//! A slot's `id` is its arena index. It never changes, and it is the key the
//! `d` command and the watchpoint listing use.

use super::errors::WatchpointError;
use super::WP_EXPR_MAX;
use crate::expr::evaluate_expression;
use crate::machine::{MemoryReader, RegisterResolver};

/// Stable watchpoint number
pub type WatchpointId = usize;

/// One arena slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchpoint {
    id: WatchpointId,
    expression: String,
    old_value: i32,
    new_value: i32,
    active: bool,
    next: Option<usize>,
}

impl Watchpoint {
    fn empty(id: WatchpointId) -> Self {
        Watchpoint {
            id,
            expression: String::new(),
            old_value: 0,
            new_value: 0,
            active: false,
            next: None,
        }
    }

    pub fn id(&self) -> WatchpointId {
        self.id
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Value computed when the watchpoint was created
    pub fn old_value(&self) -> i32 {
        self.old_value
    }

    /// Value from the most recent re-check
    pub fn new_value(&self) -> i32 {
        self.new_value
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Handle to a slot that `allocate` moved onto the active list.
///
/// Only the pool constructs handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchpointHandle(usize);

impl WatchpointHandle {
    pub fn id(self) -> WatchpointId {
        self.0
    }
}

/// Singly linked list of slot indices
#[derive(Debug, Clone, Copy, Default)]
struct SlotList {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl SlotList {
    fn push_back(&mut self, slots: &mut [Watchpoint], index: usize) {
        slots[index].next = None;
        match self.tail {
            Some(tail) => slots[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    fn pop_front(&mut self, slots: &mut [Watchpoint]) -> Option<usize> {
        let index = self.head?;
        self.head = slots[index].next.take();
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(index)
    }

    /// Unlink the first slot matching `pred` and return its index
    fn remove_where(
        &mut self,
        slots: &mut [Watchpoint],
        pred: impl Fn(&Watchpoint) -> bool,
    ) -> Option<usize> {
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(index) = cursor {
            if pred(&slots[index]) {
                let next = slots[index].next.take();
                match prev {
                    Some(p) => slots[p].next = next,
                    None => self.head = next,
                }
                if self.tail == Some(index) {
                    self.tail = prev;
                }
                self.len -= 1;
                return Some(index);
            }
            prev = Some(index);
            cursor = slots[index].next;
        }

        None
    }

    fn indices<'a>(&self, slots: &'a [Watchpoint]) -> impl Iterator<Item = usize> + 'a {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            cursor = slots[index].next;
            Some(index)
        })
    }
}

/// The watchpoint pool
#[derive(Debug, Clone)]
pub struct WatchpointPool {
    slots: Vec<Watchpoint>,
    free: SlotList,
    active: SlotList,
}

impl WatchpointPool {
    /// Create a pool with `capacity` slots, all free
    pub fn new(capacity: usize) -> Self {
        let mut slots: Vec<Watchpoint> = (0..capacity).map(Watchpoint::empty).collect();
        let mut free = SlotList::default();
        for index in 0..capacity {
            free.push_back(&mut slots, index);
        }

        WatchpointPool {
            slots,
            free,
            active: SlotList::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len
    }

    pub fn free_len(&self) -> usize {
        self.free.len
    }

    /// Move the slot at the head of the free queue onto the active list
    pub fn allocate(&mut self) -> Result<WatchpointHandle, WatchpointError> {
        let index = self
            .free
            .pop_front(&mut self.slots)
            .ok_or(WatchpointError::PoolExhausted {
                capacity: self.capacity(),
            })?;

        self.active.push_back(&mut self.slots, index);
        self.slots[index].active = true;
        Ok(WatchpointHandle(index))
    }

    /// Evaluate `expression` and keep it in a new watchpoint.
    ///
    /// Text longer than `WP_EXPR_MAX` bytes is rejected, and nothing is
    /// allocated when evaluation fails.
    pub fn create<T>(
        &mut self,
        expression: &str,
        target: &T,
    ) -> Result<WatchpointId, WatchpointError>
    where
        T: RegisterResolver + MemoryReader + ?Sized,
    {
        if expression.len() > WP_EXPR_MAX {
            return Err(WatchpointError::ExpressionTooLong {
                len: expression.len(),
                max: WP_EXPR_MAX,
            });
        }
        let value = evaluate_expression(expression, target)?;
        let handle = self.allocate()?;

        let slot = &mut self.slots[handle.0];
        slot.expression = expression.to_string();
        slot.old_value = value;
        slot.new_value = value;

        tracing::info!(id = slot.id, expr = %slot.expression, value, "watchpoint created");
        Ok(slot.id)
    }

    /// Return the active watchpoint `id` to the free queue
    pub fn release(&mut self, id: WatchpointId) -> Result<(), WatchpointError> {
        let index = self
            .active
            .remove_where(&mut self.slots, |wp| wp.id == id)
            .ok_or(WatchpointError::NotFound { id })?;

        self.free.push_back(&mut self.slots, index);
        let slot = &mut self.slots[index];
        slot.active = false;
        slot.expression.clear();
        slot.old_value = 0;
        slot.new_value = 0;

        tracing::info!(id, "watchpoint deleted");
        Ok(())
    }

    /// Active watchpoint with number `id`
    pub fn get(&self, id: WatchpointId) -> Option<&Watchpoint> {
        self.slots.get(id).filter(|wp| wp.active)
    }

    /// Record the latest value of watchpoint `id`
    pub fn set_new_value(&mut self, id: WatchpointId, value: i32) -> Result<(), WatchpointError> {
        match self.slots.get_mut(id) {
            Some(wp) if wp.active => {
                wp.new_value = value;
                Ok(())
            }
            _ => Err(WatchpointError::NotFound { id }),
        }
    }

    /// Re-evaluate every active watchpoint against `target` and record the
    /// result as its new value. Returns the ids whose value now differs from
    /// the creation value, in ascending order.
    ///
    /// A watchpoint whose expression fails keeps its previous new value.
    pub fn refresh<T>(&mut self, target: &T) -> Vec<WatchpointId>
    where
        T: RegisterResolver + MemoryReader + ?Sized,
    {
        let mut changed = Vec::new();
        for wp in self.slots.iter_mut().filter(|wp| wp.active) {
            match evaluate_expression(&wp.expression, target) {
                Ok(value) => {
                    wp.new_value = value;
                    if value != wp.old_value {
                        changed.push(wp.id);
                    }
                }
                Err(e) => tracing::warn!(id = wp.id, error = %e, "watchpoint re-check failed"),
            }
        }
        changed
    }

    /// Active watchpoints in ascending id order
    pub fn list(&self) -> Vec<&Watchpoint> {
        let mut active: Vec<&Watchpoint> = self
            .active
            .indices(&self.slots)
            .take(self.capacity())
            .map(|index| &self.slots[index])
            .collect();
        active.sort_by_key(|wp| wp.id);
        active
    }

    /// Check that every slot is on exactly one list and that list
    /// membership agrees with the `active` flag
    pub fn is_partitioned(&self) -> bool {
        let capacity = self.capacity();
        let mut seen = vec![false; capacity];

        for (list, expect_active) in [(&self.free, false), (&self.active, true)] {
            let mut count = 0;
            for index in list.indices(&self.slots).take(capacity + 1) {
                if seen[index] || self.slots[index].active != expect_active {
                    return false;
                }
                seen[index] = true;
                count += 1;
            }
            if count != list.len {
                return false;
            }
        }

        seen.iter().all(|&s| s) && self.free.len + self.active.len == capacity
    }
}
