//! Read-only shape reports.

use rustc_hash::FxHashSet;
use trellis_spec::SpecModel;

use crate::registry::AdapterRegistry;

/// Point-in-time shape report for a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegistryStats {
	/// Registered `(required, provided, name)` adapter entries.
	pub adapter_count: usize,
	/// Subscription values across all buckets.
	pub subscription_count: usize,
	/// Nodes in the adapter trie, root included.
	pub adapter_nodes: usize,
	/// Nodes in the subscription trie, root included.
	pub subscription_nodes: usize,
	/// Distinct required arities with live registrations, ascending.
	pub arities: Vec<usize>,
	/// Current mutation counter.
	pub generation: u64,
}

impl<V, M> AdapterRegistry<V, M>
where
	V: PartialEq,
	M: SpecModel,
{
	/// Counts live registrations and trie shape.
	pub fn stats(&self) -> RegistryStats {
		let mut adapter_count = 0;
		let mut subscription_count = 0;
		let mut arities = FxHashSet::default();

		self.adapters.for_each_leaf(&mut |depth, leaf| {
			let entries: usize = leaf.by_provided.values().map(|names| names.len()).sum();
			if entries > 0 {
				adapter_count += entries;
				arities.insert(depth);
			}
		});
		self.subscriptions.for_each_leaf(&mut |depth, leaf| {
			let entries: usize = leaf.by_provided.values().map(|bucket| bucket.len()).sum();
			if entries > 0 {
				subscription_count += entries;
				arities.insert(depth);
			}
		});

		let mut arities: Vec<usize> = arities.into_iter().collect();
		arities.sort_unstable();

		RegistryStats {
			adapter_count,
			subscription_count,
			adapter_nodes: self.adapters.node_count(),
			subscription_nodes: self.subscriptions.node_count(),
			arities,
			generation: self.generation(),
		}
	}
}
