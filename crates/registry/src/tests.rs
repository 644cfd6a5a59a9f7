use std::sync::Arc;

use trellis_spec::{InterfaceCatalog, SpecId};

use crate::AdapterRegistry;

struct Lattice {
	catalog: Arc<InterfaceCatalog>,
	r1: SpecId,
	r2: SpecId,
	p1: SpecId,
	p2: SpecId,
}

/// IR2 extends IR1, IP2 extends IP1.
fn lattice() -> Lattice {
	let catalog = Arc::new(InterfaceCatalog::new());
	let r1 = catalog.define("IR1", &[]).expect("define IR1");
	let r2 = catalog.define("IR2", &[r1]).expect("define IR2");
	let p1 = catalog.define("IP1", &[]).expect("define IP1");
	let p2 = catalog.define("IP2", &[p1]).expect("define IP2");
	Lattice { catalog, r1, r2, p1, p2 }
}

fn registry(l: &Lattice) -> AdapterRegistry<i32, Arc<InterfaceCatalog>> {
	AdapterRegistry::new(Arc::clone(&l.catalog))
}

/// `registered` sees exactly what was stored under the exact key, and an
/// unregister removes it again.
#[test]
fn test_register_then_registered() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[l.r1], l.p1, "", 11);
	assert_eq!(reg.registered(&[l.r1], l.p1, ""), Some(&11));
	// Exact key only: no lattice walk, no name fallback.
	assert_eq!(reg.registered(&[l.r2], l.p1, ""), None);
	assert_eq!(reg.registered(&[l.r1], l.p2, ""), None);
	assert_eq!(reg.registered(&[l.r1], l.p1, "bob"), None);

	reg.unregister(&[l.r1], l.p1, "");
	assert_eq!(reg.registered(&[l.r1], l.p1, ""), None);
}

/// Registering under the same key replaces the previous value.
#[test]
fn test_register_replaces() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[l.r1], l.p1, "", 1);
	reg.register(&[l.r1], l.p1, "", 2);
	assert_eq!(reg.registered(&[l.r1], l.p1, ""), Some(&2));
	assert_eq!(reg.lookup(&[l.r1], l.p1, ""), Some(&2));
}

/// A query whose arity matches no registration misses instead of erroring,
/// for both the walking and the exact probes.
#[test]
fn test_arity_mismatch_misses() {
	let l = lattice();
	let mut reg = registry(&l);
	reg.register(&[l.r1], l.p1, "", 11);

	assert_eq!(reg.lookup(&[l.r1, l.r1], l.p1, ""), None);
	assert_eq!(reg.lookup(&[], l.p1, ""), None);
	assert_eq!(reg.registered(&[l.r1, l.r1], l.p1, ""), None);
	assert_eq!(reg.registered(&[], l.p1, ""), None);
}

/// An empty required sequence is a null adapter living at the trie root.
#[test]
fn test_null_adapter() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[], l.p1, "", 7);
	assert_eq!(reg.lookup(&[], l.p1, ""), Some(&7));
	assert_eq!(reg.lookup(&[], l.p2, ""), None);
	assert_eq!(reg.registered(&[], l.p1, ""), Some(&7));
}

/// A wildcard required position matches any query spec but loses to every
/// real ancestor.
#[test]
fn test_wildcard_required_ranks_last() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[SpecId::ANY], l.p1, "", 1);
	assert_eq!(reg.lookup(&[l.r2], l.p1, ""), Some(&1));

	reg.register(&[l.r1], l.p1, "", 2);
	assert_eq!(reg.lookup(&[l.r2], l.p1, ""), Some(&2));
	// The wildcard itself is still queryable.
	assert_eq!(reg.lookup(&[SpecId::ANY], l.p1, ""), Some(&1));
}

/// Name qualifiers partition the provided namespace: a named query never
/// falls back to the unnamed entry.
#[test]
fn test_name_isolation() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[l.r1], l.p1, "", 1);
	reg.register(&[l.r1], l.p1, "bob", 2);

	assert_eq!(reg.lookup(&[l.r1], l.p1, ""), Some(&1));
	assert_eq!(reg.lookup(&[l.r1], l.p1, "bob"), Some(&2));
	assert_eq!(reg.lookup(&[l.r1], l.p1, "alice"), None);
}

/// A named entry on a broader key still wins its name while the unnamed
/// winner comes from the narrower key.
#[test]
fn test_lookup_all_one_winner_per_name() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[l.r1], l.p1, "", 1);
	reg.register(&[l.r2], l.p1, "", 2);
	reg.register(&[l.r1], l.p1, "bob", 3);

	let mut all: Vec<(String, i32)> = reg
		.lookup_all(&[l.r2], l.p1)
		.into_iter()
		.map(|(name, value)| (name.to_string(), *value))
		.collect();
	all.sort();
	assert_eq!(all, vec![(String::new(), 2), ("bob".to_string(), 3)]);

	let mut names: Vec<String> = reg
		.names(&[l.r2], l.p1)
		.into_iter()
		.map(|name| name.to_string())
		.collect();
	names.sort();
	assert_eq!(names, vec![String::new(), "bob".to_string()]);
}

/// Subscriptions accumulate broad-to-narrow across both the required and
/// provided dimensions, keeping insertion order inside a bucket.
#[test]
fn test_subscription_order_provided_dimension() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.subscribe(&[l.r1], l.p1, 10);
	reg.subscribe(&[l.r1], l.p2, 20);
	reg.subscribe(&[l.r1], l.p1, 11);

	// For a p1 query the exact p1 bucket is the more specific match, so it
	// comes last; the p2 bucket keeps its own insertion order before it.
	assert_eq!(reg.subscriptions(&[l.r2], l.p1), vec![&20, &10, &11]);
	// A p2 query only reaches p2 buckets.
	assert_eq!(reg.subscriptions(&[l.r2], l.p2), vec![&20]);
}

/// Handler buckets (wildcard provided) are invisible to typed queries and
/// typed buckets are invisible to wildcard queries.
#[test]
fn test_handler_bucket_isolation() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.subscribe(&[l.r1], SpecId::ANY, 1);
	reg.subscribe(&[l.r1], l.p1, 2);

	assert_eq!(reg.subscriptions(&[l.r1], SpecId::ANY), vec![&1]);
	assert_eq!(reg.subscriptions(&[l.r1], l.p1), vec![&2]);
}

/// Targeted unsubscribe removes the first equal value only; duplicates
/// survive one at a time; removing an absent value is a no-op.
#[test]
fn test_unsubscribe_targeted() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.subscribe(&[l.r1], l.p1, 5);
	reg.subscribe(&[l.r1], l.p1, 5);
	reg.subscribe(&[l.r1], l.p1, 6);

	reg.unsubscribe(&[l.r1], l.p1, Some(&5));
	assert_eq!(reg.subscriptions(&[l.r1], l.p1), vec![&5, &6]);

	let before = reg.generation();
	reg.unsubscribe(&[l.r1], l.p1, Some(&99));
	assert_eq!(reg.generation(), before);
	assert_eq!(reg.subscriptions(&[l.r1], l.p1), vec![&5, &6]);
}

/// Bulk unsubscribe clears the whole bucket at the exact provided key and
/// leaves other buckets alone.
#[test]
fn test_unsubscribe_bulk() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.subscribe(&[l.r1], l.p1, 1);
	reg.subscribe(&[l.r1], l.p1, 2);
	reg.subscribe(&[l.r1], l.p2, 3);

	reg.unsubscribe(&[l.r1], l.p1, None);
	assert_eq!(reg.subscriptions(&[l.r1], l.p1), vec![&3]);
	assert_eq!(reg.subscriptions(&[l.r1], l.p2), vec![&3]);
}

/// Mutation sequences that net to empty leave only the two trie roots.
#[test]
fn test_pruning_restores_empty_shape() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[l.r1, l.r2], l.p2, "x", 1);
	reg.register(&[l.r1], l.p1, "", 2);
	reg.subscribe(&[l.r2, l.r2], l.p1, 3);

	reg.unregister(&[l.r1, l.r2], l.p2, "x");
	reg.unregister(&[l.r1], l.p1, "");
	reg.unsubscribe(&[l.r2, l.r2], l.p1, None);

	let stats = reg.stats();
	assert_eq!(stats.adapter_count, 0);
	assert_eq!(stats.subscription_count, 0);
	assert_eq!(stats.adapter_nodes, 1);
	assert_eq!(stats.subscription_nodes, 1);
	assert!(stats.arities.is_empty());
}

/// The generation counter bumps exactly when state changes: no-op
/// unregisters, equal re-registrations, and missed unsubscribes leave it
/// untouched.
#[test]
fn test_generation_tracks_state_changes() {
	let l = lattice();
	let mut reg = registry(&l);
	assert_eq!(reg.generation(), 0);

	reg.register(&[l.r1], l.p1, "", 1);
	assert_eq!(reg.generation(), 1);

	// Same key, same value: nothing changed.
	reg.register(&[l.r1], l.p1, "", 1);
	assert_eq!(reg.generation(), 1);

	reg.register(&[l.r1], l.p1, "", 2);
	assert_eq!(reg.generation(), 2);

	reg.unregister(&[l.r2], l.p1, "");
	assert_eq!(reg.generation(), 2);

	reg.unregister(&[l.r1], l.p1, "");
	assert_eq!(reg.generation(), 3);

	reg.subscribe(&[l.r1], l.p1, 1);
	assert_eq!(reg.generation(), 4);

	reg.unsubscribe(&[l.r1], l.p1, Some(&2));
	assert_eq!(reg.generation(), 4);

	reg.unsubscribe(&[l.r1], l.p1, None);
	assert_eq!(reg.generation(), 5);

	reg.unsubscribe(&[l.r1], l.p1, None);
	assert_eq!(reg.generation(), 5);
}

/// Interfaces defined after the registry was built participate in lookups
/// through the shared catalog.
#[test]
fn test_late_interface_definitions() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[SpecId::ANY], l.p1, "", 1);

	let iq = l.catalog.define("IQ", &[]).expect("define IQ");
	assert_eq!(reg.lookup(&[iq], l.p1, ""), Some(&1));

	let iq2 = l.catalog.define("IQ2", &[iq]).expect("define IQ2");
	reg.register(&[iq], l.p1, "", 2);
	assert_eq!(reg.lookup(&[iq2], l.p1, ""), Some(&2));
}

/// Stats reflect live entries, arities, and the mutation counter.
#[test]
fn test_stats_shape() {
	let l = lattice();
	let mut reg = registry(&l);

	reg.register(&[l.r1], l.p1, "", 1);
	reg.register(&[l.r1, l.r2], l.p1, "", 2);
	reg.subscribe(&[], l.p1, 3);

	let stats = reg.stats();
	assert_eq!(stats.adapter_count, 2);
	assert_eq!(stats.subscription_count, 1);
	assert_eq!(stats.arities, vec![0, 1, 2]);
	assert_eq!(stats.generation, 3);
	// Root, the shared r1 node, and the r2 node under it.
	assert_eq!(stats.adapter_nodes, 3);
	assert_eq!(stats.subscription_nodes, 1);
}
