//! Result cache and stale-response guard for search queries.

use std::cell::Cell;
use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;

use super::types::SearchHit;

/// Distinct queries kept by [`QueryCache::default`].
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Search results keyed by trimmed query text.
///
/// Holds a bounded number of queries. Inserting past the bound evicts the
/// least recently used entry.
#[derive(Debug)]
pub struct QueryCache {
	entries: LruCache<String, Vec<SearchHit>>,
}

impl Default for QueryCache {
	fn default() -> Self {
		Self::with_capacity(DEFAULT_CACHE_CAPACITY)
	}
}

impl QueryCache {
	/// Cache holding at most `capacity` queries. Zero is treated as one.
	pub fn with_capacity(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
		Self {
			entries: LruCache::new(capacity),
		}
	}

	fn key(query: &str) -> &str {
		query.trim()
	}

	/// Cached hits for `query`. A hit marks the entry as recently used.
	pub fn get(&mut self, query: &str) -> Option<&[SearchHit]> {
		self.entries.get(Self::key(query)).map(Vec::as_slice)
	}

	/// Stores hits for `query`, replacing any earlier entry.
	pub fn insert(&mut self, query: &str, hits: Vec<SearchHit>) {
		self.entries.put(Self::key(query).to_string(), hits);
	}

	/// Number of cached queries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Maximum number of cached queries.
	pub fn capacity(&self) -> usize {
		self.entries.cap().get()
	}
}

/// Ticket handed out by [`LatestOnly::issue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter that lets only the newest request land.
///
/// Clones share one counter, so a ticket can be checked from inside a
/// spawned future.
#[derive(Clone, Debug, Default)]
pub struct LatestOnly {
	latest: Rc<Cell<u64>>,
}

impl LatestOnly {
	/// A fresh counter.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a new generation. Every earlier ticket becomes stale.
	pub fn issue(&self) -> Ticket {
		let next = self.latest.get().wrapping_add(1);
		self.latest.set(next);
		Ticket(next)
	}

	/// Whether `ticket` belongs to the newest generation.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.latest.get() == ticket.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hit(score: f64) -> SearchHit {
		SearchHit {
			score,
			..Default::default()
		}
	}

	#[test]
	fn cache_ignores_surrounding_whitespace() {
		let mut cache = QueryCache::default();
		cache.insert("  bone loss ", vec![hit(0.4)]);
		assert_eq!(cache.get("bone loss").map(<[SearchHit]>::len), Some(1));
		assert!(cache.get("bone").is_none());
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn newer_entry_replaces_older() {
		let mut cache = QueryCache::default();
		cache.insert("q", vec![hit(0.1)]);
		cache.insert("q", vec![hit(0.2), hit(0.3)]);
		assert_eq!(cache.get("q").map(<[SearchHit]>::len), Some(2));
	}

	#[test]
	fn full_cache_evicts_least_recently_used() {
		let mut cache = QueryCache::with_capacity(2);
		cache.insert("bone", vec![hit(0.1)]);
		cache.insert("muscle", vec![hit(0.2)]);
		assert!(cache.get("bone").is_some());
		cache.insert("radiation", vec![hit(0.3)]);

		assert_eq!(cache.len(), 2);
		assert!(cache.get("muscle").is_none());
		assert!(cache.get("bone").is_some());
		assert!(cache.get("radiation").is_some());
	}

	#[test]
	fn default_cache_is_bounded() {
		let mut cache = QueryCache::default();
		for i in 0..(DEFAULT_CACHE_CAPACITY + 10) {
			cache.insert(&format!("query {i}"), vec![hit(0.5)]);
		}
		assert_eq!(cache.len(), DEFAULT_CACHE_CAPACITY);
		assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
		assert!(cache.get("query 0").is_none());
	}

	#[test]
	fn zero_capacity_still_holds_one_query() {
		let mut cache = QueryCache::with_capacity(0);
		cache.insert("a", vec![]);
		cache.insert("b", vec![]);
		assert_eq!(cache.len(), 1);
		assert!(cache.get("b").is_some());
	}

	#[test]
	fn only_the_latest_ticket_is_current() {
		let latest = LatestOnly::new();
		let first = latest.issue();
		let shared = latest.clone();
		let second = shared.issue();
		assert!(!latest.is_current(first));
		assert!(latest.is_current(second));
		assert!(shared.is_current(second));
	}
}
