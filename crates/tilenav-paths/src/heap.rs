//! Fixed-capacity binary max-heap with slot tracking.
//!
//! Unlike `std::collections::BinaryHeap`, every queued item is addressable
//! through its [`HeapItem::id`], which makes membership tests O(1) and lets
//! an already queued item be re-prioritized in O(log n) without pushing a
//! duplicate entry.

/// An item that can be stored in a [`Heap`].
///
/// The `Ord` implementation defines priority: the greatest item is popped
/// first. Identifiers must be unique among queued items and lower than the
/// heap capacity.
pub trait HeapItem: Ord {
    fn id(&self) -> usize;
}

const NOT_QUEUED: usize = usize::MAX;

/// Array-backed binary max-heap.
///
/// `slots[id]` always holds the position of the item with that id inside
/// `items`, or `NOT_QUEUED`. Every swap keeps both entries in sync.
#[derive(Debug, Clone)]
pub struct Heap<T> {
    items: Vec<T>,
    slots: Vec<usize>,
}

impl<T: HeapItem> Heap<T> {
    /// Create an empty heap able to hold ids in `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            slots: vec![NOT_QUEUED; capacity],
        }
    }

    /// Maximum number of items (and exclusive upper bound on ids).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of queued items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an item and restore the heap order.
    ///
    /// # Panics
    ///
    /// Panics if the heap is full, if the id is out of capacity, or if an
    /// item with the same id is already queued.
    pub fn push(&mut self, item: T) {
        let id = item.id();
        assert!(
            self.items.len() < self.capacity(),
            "heap is full (capacity {})",
            self.capacity()
        );
        assert!(
            id < self.capacity(),
            "heap item id {id} out of capacity {}",
            self.capacity()
        );
        assert!(self.slots[id] == NOT_QUEUED, "heap item {id} is already queued");

        let i = self.items.len();
        self.items.push(item);
        self.slots[id] = i;
        self.sift_up(i);
    }

    /// Remove and return the greatest item, or `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.swap(0, last);
        let root = self.items.pop()?;
        self.slots[root.id()] = NOT_QUEUED;
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(root)
    }

    /// The greatest item, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Whether an item with this id is currently queued.
    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.slots
            .get(id)
            .and_then(|&i| self.items.get(i))
            .is_some_and(|item| item.id() == id)
    }

    /// Replace a queued item by a copy with equal or higher priority and
    /// move it up to its new position.
    ///
    /// Only upward movement is performed: callers must never lower an
    /// item's priority through this method.
    ///
    /// # Panics
    ///
    /// Panics if no item with the same id is queued.
    pub fn update(&mut self, item: T) {
        let id = item.id();
        assert!(self.contains(id), "heap item {id} is not queued");
        let i = self.slots[id];
        debug_assert!(item >= self.items[i], "heap update lowered the priority of item {id}");
        self.items[i] = item;
        self.sift_up(i);
    }

    /// Remove every item, keeping the capacity.
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            self.slots[item.id()] = NOT_QUEUED;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[i] > self.items[parent] {
                self.swap(i, parent);
                i = parent;
            } else {
                return;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            if left >= len {
                return;
            }
            let mut child = left;
            if right < len && self.items[right] > self.items[left] {
                child = right;
            }
            if self.items[child] > self.items[i] {
                self.swap(i, child);
                i = child;
            } else {
                return;
            }
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.slots[self.items[a].id()] = a;
        self.slots[self.items[b].id()] = b;
    }
}
