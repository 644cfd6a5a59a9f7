//! Registry state and mutation entry points.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use trellis_spec::{SpecId, SpecModel};

use crate::query;
use crate::trie::{Leaf, SpecTrie};

/// Adapter leaf payload: per provided spec, one value per name.
pub(crate) struct AdapterLeaf<V> {
	pub(crate) by_provided: FxHashMap<SpecId, FxHashMap<Arc<str>, V>>,
}

impl<V> Default for AdapterLeaf<V> {
	fn default() -> Self {
		Self {
			by_provided: FxHashMap::default(),
		}
	}
}

impl<V> Leaf for AdapterLeaf<V> {
	fn is_empty(&self) -> bool {
		self.by_provided.is_empty()
	}
}

/// Subscription leaf payload: per provided spec, values in insertion order.
pub(crate) struct SubscriptionLeaf<V> {
	pub(crate) by_provided: FxHashMap<SpecId, Vec<V>>,
}

impl<V> Default for SubscriptionLeaf<V> {
	fn default() -> Self {
		Self {
			by_provided: FxHashMap::default(),
		}
	}
}

impl<V> Leaf for SubscriptionLeaf<V> {
	fn is_empty(&self) -> bool {
		self.by_provided.is_empty()
	}
}

/// Lookup engine mapping `(required specs, provided spec, name)` keys to
/// registered values over an interface lattice.
///
/// Single-writer, many-reader: mutations take `&mut self`, queries `&self`,
/// and no operation blocks or locks. Values are opaque. The registry
/// compares them for equality on [`unsubscribe`](Self::unsubscribe) and
/// otherwise only stores and returns them. Hosts that want cross-thread
/// mutation wrap the registry in their own lock; a quiescent registry is
/// safe to read from any number of threads.
pub struct AdapterRegistry<V, M: SpecModel> {
	model: M,
	pub(crate) adapters: SpecTrie<AdapterLeaf<V>>,
	pub(crate) subscriptions: SpecTrie<SubscriptionLeaf<V>>,
	generation: u64,
}

impl<V, M> AdapterRegistry<V, M>
where
	V: PartialEq,
	M: SpecModel,
{
	/// Creates an empty registry consulting `model` for ancestry.
	pub fn new(model: M) -> Self {
		Self {
			model,
			adapters: SpecTrie::new(),
			subscriptions: SpecTrie::new(),
			generation: 0,
		}
	}

	/// The consulted specification model.
	pub fn model(&self) -> &M {
		&self.model
	}

	/// Monotonic mutation counter. Bumped by every call that changes
	/// registry state, so consumers can invalidate derived caches.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	fn bump(&mut self) {
		self.generation += 1;
	}

	/// Registers `value` under the exact key, replacing any previous value
	/// there. Re-registering an equal value changes nothing.
	///
	/// `SpecId::ANY` in a required position is a wildcard matching every
	/// query spec at that position; an empty `required` registers a null
	/// adapter at the trie root.
	pub fn register(&mut self, required: &[SpecId], provided: SpecId, name: &str, value: V) {
		let leaf = self.adapters.leaf_mut(required);
		let names = leaf.by_provided.entry(provided).or_default();
		match names.get_mut(name) {
			Some(slot) if *slot == value => return,
			Some(slot) => *slot = value,
			None => {
				names.insert(Arc::from(name), value);
			}
		}
		self.bump();
		tracing::trace!(
			arity = required.len(),
			%provided,
			name,
			generation = self.generation,
			"adapter registered"
		);
	}

	/// Removes the value at the exact key, pruning emptied trie branches.
	/// Unregistering an absent key is a silent no-op.
	pub fn unregister(&mut self, required: &[SpecId], provided: SpecId, name: &str) {
		let removed = self
			.adapters
			.edit(required, |leaf| {
				let Some(names) = leaf.by_provided.get_mut(&provided) else {
					return false;
				};
				let removed = names.remove(name).is_some();
				if names.is_empty() {
					leaf.by_provided.remove(&provided);
				}
				removed
			})
			.unwrap_or(false);
		if removed {
			self.bump();
			tracing::trace!(
				arity = required.len(),
				%provided,
				name,
				generation = self.generation,
				"adapter unregistered"
			);
		}
	}

	/// Value stored under the exact key, without any lattice walking.
	/// A query whose arity matches no registration simply misses.
	pub fn registered(&self, required: &[SpecId], provided: SpecId, name: &str) -> Option<&V> {
		self.adapters
			.leaf(required)?
			.by_provided
			.get(&provided)?
			.get(name)
	}

	/// Most specific registered value covering the query, or `None`.
	///
	/// Candidates are every registration whose required specs are ancestors
	/// of (or wildcards for) the query's, position by position, and whose
	/// provided spec is-or-extends `provided`; the winner minimises the
	/// specificity tuple across required positions, then provided.
	pub fn lookup(&self, required: &[SpecId], provided: SpecId, name: &str) -> Option<&V> {
		query::lookup(&self.model, &self.adapters, required, provided, name)
	}

	/// [`lookup`](Self::lookup) for the common single-required case.
	pub fn lookup1(&self, required: SpecId, provided: SpecId, name: &str) -> Option<&V> {
		self.lookup(&[required], provided, name)
	}

	/// Every `(name, value)` pair covering the query, one winner per
	/// distinct name. Result order is unspecified; callers sort.
	pub fn lookup_all(&self, required: &[SpecId], provided: SpecId) -> Vec<(Arc<str>, &V)> {
		query::lookup_all(&self.model, &self.adapters, required, provided)
	}

	/// The distinct names with a registration covering the query.
	pub fn names(&self, required: &[SpecId], provided: SpecId) -> Vec<Arc<str>> {
		self.lookup_all(required, provided)
			.into_iter()
			.map(|(name, _)| name)
			.collect()
	}

	/// Appends `value` to the subscription bucket at the exact key.
	/// Duplicates are kept; insertion order is preserved. `provided =
	/// SpecId::ANY` designates a handler bucket.
	pub fn subscribe(&mut self, required: &[SpecId], provided: SpecId, value: V) {
		self.subscriptions
			.leaf_mut(required)
			.by_provided
			.entry(provided)
			.or_default()
			.push(value);
		self.bump();
		tracing::trace!(
			arity = required.len(),
			%provided,
			generation = self.generation,
			"subscription added"
		);
	}

	/// Removes subscriptions at the exact key: the first entry equal to
	/// `value` when one is given, otherwise the whole bucket. Removing
	/// nothing is a silent no-op.
	pub fn unsubscribe(&mut self, required: &[SpecId], provided: SpecId, value: Option<&V>) {
		let removed = self
			.subscriptions
			.edit(required, |leaf| {
				let Some(bucket) = leaf.by_provided.get_mut(&provided) else {
					return 0;
				};
				let removed = match value {
					Some(value) => match bucket.iter().position(|v| v == value) {
						Some(at) => {
							bucket.remove(at);
							1
						}
						None => 0,
					},
					None => {
						let count = bucket.len();
						bucket.clear();
						count
					}
				};
				if bucket.is_empty() {
					leaf.by_provided.remove(&provided);
				}
				removed
			})
			.unwrap_or(0);
		if removed > 0 {
			self.bump();
			tracing::debug!(
				arity = required.len(),
				%provided,
				count = removed,
				generation = self.generation,
				"subscriptions removed"
			);
		}
	}

	/// Every subscription covering the query, broad registrations before
	/// narrow ones, insertion order within a bucket. Only registrations at
	/// the query's arity participate.
	pub fn subscriptions(&self, required: &[SpecId], provided: SpecId) -> Vec<&V> {
		query::subscriptions(&self.model, &self.subscriptions, required, provided)
	}
}
