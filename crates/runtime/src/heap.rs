//! The garbage-collected pool that Lute values live in
//!
//! Values are reference counted, which reclaims everything except cycles. Cycles are
//! legal constructions (a list can be pushed into itself through an index-set), so the
//! heap keeps a registry of weak handles to the mutable container cells it has
//! allocated, and [Heap::collect] runs a mark-and-sweep over that registry: marking
//! walks [trace_children] from the roots, and sweeping clears the internals of
//! unreachable cells. Clearing is the shallow-destructor contract: it releases a cell's
//! own buffer without touching children, which drops the references that kept a cycle
//! alive and lets reference counting reclaim the cells themselves.
//!
//! Every allocation is a potential collection point: the dispatcher is expected to check
//! [Heap::should_collect] at its allocation sites and call [Heap::collect] with every
//! live value reachable from its stack, call frames, and module constant pools.

use crate::{LList, LMap, LTuple, LValue, PtrMut, ValueMap, ValueVec};
use lute_memory::{Address, Ptr, WeakPtrMut};
use rustc_hash::FxHashSet;

/// The number of allocations after which a collection is suggested
const DEFAULT_COLLECTION_INTERVAL: usize = 1024;

// Weak handles to the cell types that can participate in cycles
enum TrackedCell {
    List(WeakPtrMut<ValueVec>),
    Map(WeakPtrMut<ValueMap>),
    Tuple(WeakPtrMut<Box<[LValue]>>),
}

// Strong handles to unreachable cells, held while their internals are cleared
enum DoomedCell {
    List(PtrMut<ValueVec>),
    Map(PtrMut<ValueMap>),
    Tuple(PtrMut<Box<[LValue]>>),
}

/// The pool of values managed by a VM
///
/// See the [module docs](self) for the collection strategy.
pub struct Heap {
    cells: Vec<TrackedCell>,
    allocations: usize,
    collection_interval: usize,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Creates a heap with the default collection interval
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            allocations: 0,
            collection_interval: DEFAULT_COLLECTION_INTERVAL,
        }
    }

    /// Creates a heap that suggests a collection after the given number of allocations
    pub fn with_collection_interval(collection_interval: usize) -> Self {
        Self {
            collection_interval,
            ..Self::new()
        }
    }

    /// Registers a freshly created value with the heap and returns it
    ///
    /// Only the value's own cell is registered; containers built from other containers
    /// should have had each cell allocated through the heap as it was created.
    pub fn alloc(&mut self, value: LValue) -> LValue {
        self.track(&value);
        self.allocations += 1;
        value
    }

    /// Returns true if enough allocations have been made that a collection is due
    ///
    /// The dispatcher checks this at its allocation sites, making every allocation a
    /// potential collection point.
    pub fn should_collect(&self) -> bool {
        self.allocations >= self.collection_interval
    }

    /// Returns the number of cells currently registered with the heap
    pub fn tracked_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns a shallow copy of the value
    ///
    /// Singletons return themselves, primitives copy their payload, strings share their
    /// data through a new handle, and containers copy their outer shell while sharing
    /// their children. Freshly created cells are registered with the heap.
    pub fn dupe(&mut self, value: &LValue) -> LValue {
        use LValue::*;
        match value {
            Null | Bool(_) | Int(_) | Float(_) | Range(_) => value.clone(),
            // String data is shared, a clone of the handle is the shallow copy
            Str(s) => Str(s.clone()),
            Tuple(t) => self.alloc(Tuple(LTuple::from(t.data().to_vec()))),
            List(l) => self.alloc(List(LList::with_data(l.data().clone()))),
            Map(m) => self.alloc(Map(LMap::with_data(m.data().clone()))),
            Error(payload) => LValue::error(payload.as_ref().clone()),
            Tagged(t) => LValue::Tagged(Ptr::from(t.as_ref().clone())),
            // Function descriptors are copied, the captures list is shared
            Function(f) => Function(f.clone()),
            NativeFunction(f) => NativeFunction(f.clone()),
            Iterator(i) => Iterator(i.make_copy()),
        }
    }

    /// Reclaims cells that aren't reachable from the given roots
    ///
    /// Returns the number of registered cells that were reclaimed, whether by reference
    /// counting since the last collection or by having their cycle broken here.
    pub fn collect(&mut self, roots: &[LValue]) -> usize {
        let mut marked = FxHashSet::default();
        let mut queue: Vec<LValue> = roots.to_vec();

        while let Some(value) = queue.pop() {
            if let Some(address) = cell_address(&value) {
                if !marked.insert(address) {
                    continue;
                }
            }
            trace_children(&value, |child| queue.push(child));
        }

        let mut reclaimed = 0;
        let mut survivors = Vec::with_capacity(self.cells.len());
        let mut doomed = Vec::new();

        for cell in self.cells.drain(..) {
            match upgrade(&cell) {
                Some((address, strong)) => {
                    if marked.contains(&address) {
                        survivors.push(cell);
                    } else {
                        doomed.push(strong);
                        reclaimed += 1;
                    }
                }
                // Already reclaimed by reference counting
                None => reclaimed += 1,
            }
        }

        self.cells = survivors;

        // Break cycles by clearing the unreachable cells' internals. The strong handles
        // keep the cells alive until every clear has run, after which dropping the
        // handles cascades through the now-acyclic graph.
        for cell in &doomed {
            match cell {
                DoomedCell::List(list) => list.borrow_mut().clear(),
                DoomedCell::Map(map) => map.borrow_mut().clear(),
                DoomedCell::Tuple(tuple) => {
                    for slot in tuple.borrow_mut().iter_mut() {
                        *slot = LValue::Null;
                    }
                }
            }
        }
        drop(doomed);

        self.allocations = 0;
        reclaimed
    }

    fn track(&mut self, value: &LValue) {
        match value {
            LValue::List(l) => self.cells.push(TrackedCell::List(l.downgrade())),
            LValue::Map(m) => self.cells.push(TrackedCell::Map(m.downgrade())),
            LValue::Tuple(t) => self.cells.push(TrackedCell::Tuple(t.downgrade())),
            _ => {}
        }
    }
}

fn upgrade(cell: &TrackedCell) -> Option<(Address, DoomedCell)> {
    match cell {
        TrackedCell::List(w) => w
            .upgrade()
            .map(|strong| (Ptr::address(&strong), DoomedCell::List(strong))),
        TrackedCell::Map(w) => w
            .upgrade()
            .map(|strong| (Ptr::address(&strong), DoomedCell::Map(strong))),
        TrackedCell::Tuple(w) => w
            .upgrade()
            .map(|strong| (Ptr::address(&strong), DoomedCell::Tuple(strong))),
    }
}

// Returns the identity of the value's cell if the value has one that can form a cycle
fn cell_address(value: &LValue) -> Option<Address> {
    match value {
        LValue::List(l) => Some(l.data_address()),
        LValue::Map(m) => Some(m.data_address()),
        LValue::Tuple(t) => Some(t.data_address()),
        _ => None,
    }
}

/// Calls `visit` with each value directly referenced by the given value
///
/// This is the traversal the collector marks with: tuples visit their slots, lists their
/// items, maps their keys and values, functions their captures, tagged values and error
/// values their payload, native functions their bound receiver, and iterators their
/// source.
pub fn trace_children(value: &LValue, mut visit: impl FnMut(LValue)) {
    match value {
        LValue::Tuple(t) => {
            for child in t.data().iter() {
                visit(child.clone());
            }
        }
        LValue::List(l) => {
            for child in l.data().iter() {
                visit(child.clone());
            }
        }
        LValue::Map(m) => {
            for (key, child) in m.data().iter() {
                visit(key.value().clone());
                visit(child.clone());
            }
        }
        LValue::Function(f) => visit(LValue::List(f.captures.clone())),
        LValue::NativeFunction(f) => {
            if let Some(instance) = &f.instance {
                visit(instance.as_ref().clone());
            }
        }
        LValue::Error(payload) => visit(payload.as_ref().clone()),
        LValue::Tagged(t) => visit(t.contents.clone()),
        LValue::Iterator(i) => visit(i.source()),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LList, LMap, LTuple};

    #[test]
    fn dupe_shares_string_data() {
        let mut heap = Heap::new();
        let source = LValue::from("shared");
        let duped = heap.dupe(&source);

        let (LValue::Str(a), LValue::Str(b)) = (&source, &duped) else {
            panic!("expected strings");
        };
        assert!(a.shares_data_with(b));
    }

    #[test]
    fn dupe_copies_the_shell_and_shares_children() {
        let mut heap = Heap::new();
        let inner = LList::from_slice(&[LValue::from(1)]);
        let outer = heap.alloc(LValue::List(LList::from_slice(&[LValue::List(
            inner.clone(),
        )])));

        let duped = heap.dupe(&outer);
        let (LValue::List(original), LValue::List(copy)) = (&outer, &duped) else {
            panic!("expected lists");
        };

        assert!(!original.is_same_instance(copy));

        // The copied shell still refers to the same child cell
        copy.data_mut().push(LValue::from(2));
        assert_eq!(original.len(), 1);
        let LValue::List(child) = copy.data()[0].clone() else {
            panic!("expected a list");
        };
        assert!(child.is_same_instance(&inner));
    }

    #[test]
    fn collect_reclaims_unrooted_cycles() {
        let mut heap = Heap::new();

        let list = LList::default();
        let value = heap.alloc(LValue::List(list.clone()));
        list.data_mut().push(value.clone());
        assert_eq!(heap.tracked_cells(), 1);

        // Rooted, the cycle survives
        assert_eq!(heap.collect(&[value.clone()]), 0);
        assert_eq!(heap.tracked_cells(), 1);

        // Unrooted, the cycle is broken and the cell reclaimed
        drop(value);
        drop(list);
        assert_eq!(heap.collect(&[]), 1);
        assert_eq!(heap.tracked_cells(), 0);
    }

    #[test]
    fn collect_reclaims_mutual_cycles() {
        let mut heap = Heap::new();

        let a = LList::default();
        let b = LMap::default();
        let a_value = heap.alloc(LValue::List(a.clone()));
        let b_value = heap.alloc(LValue::Map(b.clone()));
        a.data_mut().push(b_value.clone());
        b.insert("back", a_value.clone());

        let root = heap.alloc(LValue::Tuple(LTuple::from(vec![a_value.clone()])));

        drop(a_value);
        drop(b_value);
        drop(a);
        drop(b);

        // Everything is reachable through the rooted tuple
        assert_eq!(heap.collect(&[root.clone()]), 0);

        drop(root);
        assert_eq!(heap.collect(&[]), 3);
        assert_eq!(heap.tracked_cells(), 0);
    }

    #[test]
    fn should_collect_after_interval() {
        let mut heap = Heap::with_collection_interval(2);
        assert!(!heap.should_collect());
        heap.alloc(LValue::List(LList::default()));
        heap.alloc(LValue::List(LList::default()));
        assert!(heap.should_collect());
        heap.collect(&[]);
        assert!(!heap.should_collect());
    }
}
