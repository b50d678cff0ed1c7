//! The order pipeline: a cyclic, priority-aware ring of in-flight orders.
//!
//! The ring is an index-addressed arena: each slot holds an order plus
//! `next`/`prev` slot indices, and freed slots are recycled through a free
//! list. There are no pointers to dangle; removing a node during traversal
//! is safe by construction.
//!
//! # Topology invariants
//!
//! Enforced on every mutation (checked in debug builds, and directly by
//! tests via [`OrderPipeline::check_invariants`]):
//! - the ring is empty, a single self-referencing node, or one closed cycle
//!   of N ≥ 2 nodes none of which references itself;
//! - `len` equals the true node count;
//! - the cursor designates a live node whenever the ring is non-empty.
//!
//! # Cursor semantics
//!
//! The cursor rests on the position whose service just completed. Each
//! service step calls [`OrderPipeline::advance`] first, so an express order
//! spliced immediately after the cursor is always the next order serviced.

use crate::models::order::{Order, OrderId};
use thiserror::Error;

/// Errors raised while admitting an order into the ring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmitError {
    /// The arena could not grow. Fatal for the run, but reported rather
    /// than aborting the process.
    #[error("out of memory while admitting an order into the pipeline")]
    OutOfMemory,
}

type SlotId = usize;

#[derive(Debug, Clone)]
struct Node {
    order: Order,
    next: SlotId,
    prev: SlotId,
}

#[derive(Debug, Clone)]
enum Slot {
    Occupied(Node),
    Free { next_free: Option<SlotId> },
}

/// Cyclic collection of active orders with a traversal cursor.
#[derive(Debug, Clone, Default)]
pub struct OrderPipeline {
    slots: Vec<Slot>,
    free_head: Option<SlotId>,
    head: Option<SlotId>,
    cursor: Option<SlotId>,
    len: usize,
}

impl OrderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active orders in the ring.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Splice an order immediately after the cursor position; O(1).
    ///
    /// Used for express arrivals: the spliced order is the next one the
    /// traversal services.
    pub fn insert_priority(&mut self, order: Order) -> Result<(), AdmitError> {
        let slot = self.alloc(order)?;
        match self.cursor {
            None => self.link_single(slot),
            Some(cur) => self.splice_after(cur, slot),
        }
        self.debug_check();
        Ok(())
    }

    /// Splice an order at the logical end of the cycle, immediately before
    /// the head; O(1) via the head's `prev` link.
    ///
    /// Preserves arrival order among normal orders.
    pub fn insert_normal(&mut self, order: Order) -> Result<(), AdmitError> {
        let slot = self.alloc(order)?;
        match self.head {
            None => self.link_single(slot),
            Some(head) => {
                let tail = self.node(head).prev;
                self.splice_after(tail, slot);
            }
        }
        self.debug_check();
        Ok(())
    }

    /// Move the cursor to the next live node and return its order id.
    ///
    /// Returns `None` when the ring is empty.
    pub fn advance(&mut self) -> Option<OrderId> {
        let cur = self.cursor?;
        let next = self.node(cur).next;
        self.cursor = Some(next);
        Some(self.node(next).order.id)
    }

    /// The order at the cursor.
    pub fn current(&self) -> Option<&Order> {
        self.cursor.map(|c| &self.node(c).order)
    }

    /// Mutable access to the order at the cursor.
    pub fn current_mut(&mut self) -> Option<&mut Order> {
        let cur = self.cursor?;
        Some(&mut self.node_mut(cur).order)
    }

    /// Detach the node the cursor designates.
    ///
    /// Relinks the neighbors, reassigns the head to its successor when the
    /// head was removed, and returns the owned order together with the id
    /// of its successor (`None` when the ring emptied). The cursor retreats
    /// to the predecessor so the next [`advance`](Self::advance) resumes at
    /// that successor; on sole-node removal head and cursor reset to the
    /// empty sentinel rather than pointing at the freed slot.
    pub fn remove_current(&mut self) -> Option<(Order, Option<OrderId>)> {
        let cur = self.cursor?;

        if self.len == 1 {
            let order = self.release(cur);
            self.head = None;
            self.cursor = None;
            self.len = 0;
            self.debug_check();
            return Some((order, None));
        }

        let (prev, next) = {
            let node = self.node(cur);
            (node.prev, node.next)
        };
        self.node_mut(prev).next = next;
        self.node_mut(next).prev = prev;
        if self.head == Some(cur) {
            self.head = Some(next);
        }
        self.cursor = Some(prev);
        self.len -= 1;

        let order = self.release(cur);
        let successor = self.node(next).order.id;
        self.debug_check();
        Some((order, Some(successor)))
    }

    /// Order ids in ring order starting at the head.
    pub fn order_ids(&self) -> Vec<OrderId> {
        let mut ids = Vec::with_capacity(self.len);
        if let Some(head) = self.head {
            let mut at = head;
            loop {
                ids.push(self.node(at).order.id);
                at = self.node(at).next;
                if at == head {
                    break;
                }
            }
        }
        ids
    }

    /// Verify the topology invariants, panicking on violation.
    ///
    /// Called automatically after every mutation in debug builds.
    pub fn check_invariants(&self) {
        let Some(head) = self.head else {
            assert!(self.cursor.is_none(), "empty ring must have no cursor");
            assert_eq!(self.len, 0, "empty ring must have len 0");
            return;
        };

        let cursor = self.cursor.expect("non-empty ring must have a cursor");
        let mut count = 0usize;
        let mut saw_cursor = false;
        let mut at = head;
        loop {
            let node = self.node(at);
            assert_eq!(
                self.node(node.next).prev,
                at,
                "prev link of successor must point back"
            );
            if at == cursor {
                saw_cursor = true;
            }
            count += 1;
            assert!(count <= self.len, "cycle longer than len (broken ring)");
            at = node.next;
            if at == head {
                break;
            }
        }
        assert_eq!(count, self.len, "len must equal true node count");
        assert!(saw_cursor, "cursor must designate a live node on the cycle");
        if self.len > 1 {
            let mut at = head;
            loop {
                assert_ne!(self.node(at).next, at, "no self-reference when len > 1");
                at = self.node(at).next;
                if at == head {
                    break;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Arena internals
    // ------------------------------------------------------------------

    fn alloc(&mut self, order: Order) -> Result<SlotId, AdmitError> {
        let node = Node {
            order,
            next: 0,
            prev: 0,
        };
        match self.free_head {
            Some(slot) => {
                let next_free = match &self.slots[slot] {
                    Slot::Free { next_free } => *next_free,
                    Slot::Occupied(_) => unreachable!("free list points at occupied slot"),
                };
                self.free_head = next_free;
                self.slots[slot] = Slot::Occupied(node);
                Ok(slot)
            }
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|_| AdmitError::OutOfMemory)?;
                self.slots.push(Slot::Occupied(node));
                Ok(self.slots.len() - 1)
            }
        }
    }

    /// Take the order out of a slot and put the slot on the free list.
    fn release(&mut self, slot: SlotId) -> Order {
        let taken = std::mem::replace(
            &mut self.slots[slot],
            Slot::Free {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(slot);
        match taken {
            Slot::Occupied(node) => node.order,
            Slot::Free { .. } => unreachable!("released slot was already free"),
        }
    }

    /// First node of an empty ring: a self-referencing cycle of one, and
    /// the cursor's initial position.
    fn link_single(&mut self, slot: SlotId) {
        let node = self.node_mut(slot);
        node.next = slot;
        node.prev = slot;
        self.head = Some(slot);
        self.cursor = Some(slot);
        self.len = 1;
    }

    fn splice_after(&mut self, after: SlotId, slot: SlotId) {
        let next = self.node(after).next;
        {
            let node = self.node_mut(slot);
            node.prev = after;
            node.next = next;
        }
        self.node_mut(after).next = slot;
        self.node_mut(next).prev = slot;
        self.len += 1;
    }

    fn node(&self, slot: SlotId) -> &Node {
        match &self.slots[slot] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => unreachable!("live link points at free slot"),
        }
    }

    fn node_mut(&mut self, slot: SlotId) -> &mut Node {
        match &mut self.slots[slot] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => unreachable!("live link points at free slot"),
        }
    }

    #[inline]
    fn debug_check(&self) {
        #[cfg(debug_assertions)]
        self.check_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::Priority;

    fn order(id: OrderId) -> Order {
        Order::new(id, Priority::Normal, 0.0)
    }

    #[test]
    fn test_empty_pipeline() {
        let mut ring = OrderPipeline::new();
        assert!(ring.is_empty());
        assert!(ring.advance().is_none());
        assert!(ring.current().is_none());
        assert!(ring.remove_current().is_none());
        ring.check_invariants();
    }

    #[test]
    fn test_single_node_self_cycle() {
        let mut ring = OrderPipeline::new();
        ring.insert_normal(order(1)).unwrap();

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.current().map(|o| o.id), Some(1));
        // Advancing a one-node ring stays on the same order
        assert_eq!(ring.advance(), Some(1));
        assert_eq!(ring.advance(), Some(1));
    }

    #[test]
    fn test_normal_insertion_preserves_arrival_order() {
        let mut ring = OrderPipeline::new();
        for id in 1..=4 {
            ring.insert_normal(order(id)).unwrap();
        }
        assert_eq!(ring.order_ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_priority_insertion_lands_after_cursor() {
        let mut ring = OrderPipeline::new();
        for id in 1..=3 {
            ring.insert_normal(order(id)).unwrap();
        }
        // Cursor sits on 1 (head); express 9 goes immediately after it
        ring.insert_priority(order(9)).unwrap();
        assert_eq!(ring.order_ids(), vec![1, 9, 2, 3]);
        // ... and is therefore the next order serviced
        assert_eq!(ring.advance(), Some(9));
    }

    #[test]
    fn test_priority_insertion_mid_traversal() {
        let mut ring = OrderPipeline::new();
        for id in 1..=3 {
            ring.insert_normal(order(id)).unwrap();
        }
        ring.advance(); // now servicing 2
        ring.insert_priority(order(9)).unwrap();
        assert_eq!(ring.order_ids(), vec![1, 2, 9, 3]);
        assert_eq!(ring.advance(), Some(9));
    }

    #[test]
    fn test_remove_current_relinks_and_returns_successor() {
        let mut ring = OrderPipeline::new();
        for id in 1..=3 {
            ring.insert_normal(order(id)).unwrap();
        }
        ring.advance(); // cursor on 2

        let (removed, successor) = ring.remove_current().unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(successor, Some(3));
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.order_ids(), vec![1, 3]);
        // Traversal resumes at the successor
        assert_eq!(ring.advance(), Some(3));
    }

    #[test]
    fn test_remove_head_reassigns_head() {
        let mut ring = OrderPipeline::new();
        for id in 1..=3 {
            ring.insert_normal(order(id)).unwrap();
        }
        // Cursor starts on the head (1)
        let (removed, successor) = ring.remove_current().unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(successor, Some(2));
        assert_eq!(ring.order_ids(), vec![2, 3]);
    }

    #[test]
    fn test_remove_sole_node_resets_to_empty_sentinel() {
        let mut ring = OrderPipeline::new();
        ring.insert_normal(order(1)).unwrap();

        let (removed, successor) = ring.remove_current().unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(successor, None);
        assert!(ring.is_empty());
        assert!(ring.current().is_none());
        assert!(ring.advance().is_none());
    }

    #[test]
    fn test_insert_then_remove_round_trip() {
        let mut ring = OrderPipeline::new();
        for id in 1..=5 {
            ring.insert_normal(order(id)).unwrap();
        }
        let before = ring.len();

        ring.advance(); // cursor on 2
        ring.insert_priority(order(42)).unwrap();
        assert_eq!(ring.len(), before + 1);

        ring.advance(); // cursor on 42
        let (removed, _) = ring.remove_current().unwrap();
        assert_eq!(removed.id, 42);
        assert_eq!(ring.len(), before);
        assert_eq!(ring.order_ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_slot_reuse_after_removal() {
        let mut ring = OrderPipeline::new();
        ring.insert_normal(order(1)).unwrap();
        ring.remove_current().unwrap();
        ring.insert_normal(order(2)).unwrap();

        // The freed slot is recycled; the arena does not grow
        assert_eq!(ring.slots.len(), 1);
        assert_eq!(ring.order_ids(), vec![2]);
    }

    #[test]
    fn test_drain_ring_by_repeated_removal() {
        let mut ring = OrderPipeline::new();
        for id in 1..=4 {
            ring.insert_normal(order(id)).unwrap();
        }

        let mut removed = Vec::new();
        while let Some((order, _)) = ring.remove_current() {
            removed.push(order.id);
            ring.advance();
        }
        assert_eq!(removed.len(), 4);
        assert!(ring.is_empty());
        ring.check_invariants();
    }
}
