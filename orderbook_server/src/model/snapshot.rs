//! Bounded priority queue of quotes.
//!
//! A `Snapshot` keeps at most `capacity` quotes ordered by a side-specific ranking function.
//! The ranking returns `Ordering::Less` when the first quote is *better*, so the max-heap
//! root is always the worst retained quote and eviction is a single `pop`.
//!
//! Quotes are shared through `Arc`, so cloning a snapshot copies pointers, never quotes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::model::quote::Quote;

/// Ranks two quotes; `Less` means the left quote is better.
pub type RankFn = fn(&Quote, &Quote) -> Ordering;

/// Heap entry. `position` is the quote's index in its `QuoteIndex` and breaks exact ties,
/// earlier rows first.
#[derive(Debug, Clone)]
struct Ranked {
    quote: Arc<Quote>,
    position: usize,
    rank: RankFn,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rank)(&self.quote, &other.quote).then(self.position.cmp(&other.position))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// The best `capacity` quotes admitted so far.
#[derive(Debug, Clone)]
pub struct Snapshot {
    heap: BinaryHeap<Ranked>,
    capacity: usize,
    rank: RankFn,
}

impl Snapshot {
    /// Creates an empty snapshot. A zero capacity is raised to one.
    pub fn new(capacity: usize, rank: RankFn) -> Self {
        let capacity = capacity.max(1);
        Self {
            heap: BinaryHeap::with_capacity(capacity + 1),
            capacity,
            rank,
        }
    }

    /// Admits a quote and, if that overflows the capacity, evicts the worst one, which may
    /// be the quote just admitted.
    pub fn admit(&mut self, position: usize, quote: Arc<Quote>) {
        self.heap.push(Ranked {
            quote,
            position,
            rank: self.rank,
        });
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Drops every quote that has ended by `timestamp`. Returns how many were dropped.
    pub fn expire(&mut self, timestamp: &str) -> usize {
        let before = self.heap.len();
        self.heap.retain(|entry| entry.quote.has_not_ended(timestamp));
        before - self.heap.len()
    }

    /// Quotes in priority order, best first. The snapshot itself is left untouched.
    pub fn ranked(&self) -> Vec<Arc<Quote>> {
        self.heap
            .clone()
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.quote)
            .collect()
    }

    /// Number of quotes held.
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Maximum number of quotes held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
