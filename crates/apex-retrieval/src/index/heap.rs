use std::cmp::Ordering;

/// An item eligible for top-K ranking. Scoring happens upstream; the heap
/// only ever compares the cached `(score, id)` pair.
pub trait Scored {
    fn score(&self) -> f64;
    fn id(&self) -> &str;
}

/// A min-heap of capacity K keyed by score, used to maintain the top-K
/// highest-scoring items seen so far in O(log K) per insert. Ties are
/// broken by pattern id, ascending, for deterministic output.
pub struct BoundedHeap<T> {
    capacity: usize,
    items: Vec<T>,
}

/// Returns `Greater` when `a` is more deserving of a heap slot than `b`:
/// higher score wins; on a tie, the lexicographically smaller id wins.
fn priority_cmp<T: Scored>(a: &T, b: &T) -> Ordering {
    match a.score().partial_cmp(&b.score()) {
        Some(Ordering::Equal) | None => b.id().cmp(a.id()),
        Some(ord) => ord,
    }
}

impl<T: Scored> BoundedHeap<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "heap capacity must be positive");
        Self { capacity, items: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts `item` if the heap has room, or if it outranks the current
    /// minimum. Returns whether the heap was changed.
    pub fn push_if_top_k(&mut self, item: T) -> bool {
        if self.items.len() < self.capacity {
            self.items.push(item);
            self.sift_up(self.items.len() - 1);
            return true;
        }

        if priority_cmp(&item, &self.items[0]) == Ordering::Greater {
            self.items[0] = item;
            self.sift_down(0);
            true
        } else {
            false
        }
    }

    /// Non-destructive extraction in descending score order (ties by id
    /// ascending).
    pub fn to_sorted_desc(&self) -> Vec<&T> {
        let mut refs: Vec<&T> = self.items.iter().collect();
        refs.sort_by(|a, b| priority_cmp(*a, *b).reverse());
        refs
    }

    pub fn into_sorted_desc(mut self) -> Vec<T> {
        self.items.sort_by(|a, b| priority_cmp(a, b).reverse());
        self.items
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            // Min-heap on priority: root holds the lowest-priority entry.
            if priority_cmp(&self.items[idx], &self.items[parent]) == Ordering::Less {
                self.items.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;

            if left < len && priority_cmp(&self.items[left], &self.items[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && priority_cmp(&self.items[right], &self.items[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.items.swap(idx, smallest);
            idx = smallest;
        }
    }
}
