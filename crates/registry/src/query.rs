//! Candidate walks over the tries.
//!
//! At depth `i` the acceptable children are exactly the ancestors of
//! `required[i]`, so the walk visits the trie along every permissible
//! specialisation of the query key. Visiting ancestors in chain order
//! enumerates leaves in ascending specificity-tuple order; visiting them
//! reversed enumerates the same leaves descending. The provided dimension
//! is ranked per leaf, keeping the nested iteration in tuple order overall,
//! so the first adapter hit is the most specific and subscriptions
//! accumulate broad-to-narrow without a sort.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use trellis_spec::{SpecId, SpecModel};

use crate::precedence::ranked_providers;
use crate::registry::{AdapterLeaf, SubscriptionLeaf};
use crate::trie::{Leaf, Node, SpecTrie};

/// Depth-first walk over every node reachable at the query's arity.
/// `visit` short-circuits the walk by returning `Some`.
fn walk<'t, P, M, R>(
	model: &M,
	node: &'t Node<P>,
	query: &[SpecId],
	descending: bool,
	visit: &mut impl FnMut(&'t P) -> Option<R>,
) -> Option<R>
where
	P: Leaf,
	M: SpecModel,
{
	let Some((&head, rest)) = query.split_first() else {
		return visit(&node.leaf);
	};
	if node.children.is_empty() {
		return None;
	}
	let ancestors = model.ancestors(head);
	if descending {
		for &spec in ancestors.iter().rev() {
			if let Some(found) = walk_child(model, node, spec, rest, descending, visit) {
				return Some(found);
			}
		}
	} else {
		for &spec in ancestors.iter() {
			if let Some(found) = walk_child(model, node, spec, rest, descending, visit) {
				return Some(found);
			}
		}
	}
	None
}

fn walk_child<'t, P, M, R>(
	model: &M,
	node: &'t Node<P>,
	spec: SpecId,
	rest: &[SpecId],
	descending: bool,
	visit: &mut impl FnMut(&'t P) -> Option<R>,
) -> Option<R>
where
	P: Leaf,
	M: SpecModel,
{
	let child = node.children.get(&spec)?;
	walk(model, child, rest, descending, visit)
}

/// First (most specific) value covering the query and name.
pub(crate) fn lookup<'t, V, M>(
	model: &M,
	trie: &'t SpecTrie<AdapterLeaf<V>>,
	required: &[SpecId],
	provided: SpecId,
	name: &str,
) -> Option<&'t V>
where
	M: SpecModel,
{
	walk(model, trie.root(), required, false, &mut |leaf| {
		for (_, p) in ranked_providers(model, leaf.by_provided.keys().copied(), provided) {
			if let Some(value) = leaf.by_provided.get(&p).and_then(|names| names.get(name)) {
				return Some(value);
			}
		}
		None
	})
}

/// One winner per distinct name across the whole candidate set.
pub(crate) fn lookup_all<'t, V, M>(
	model: &M,
	trie: &'t SpecTrie<AdapterLeaf<V>>,
	required: &[SpecId],
	provided: SpecId,
) -> Vec<(Arc<str>, &'t V)>
where
	M: SpecModel,
{
	let mut winners: FxHashMap<Arc<str>, &'t V> = FxHashMap::default();
	let _: Option<()> = walk(model, trie.root(), required, false, &mut |leaf| {
		// Ascending walk order: the first value seen per name is its winner.
		for (_, p) in ranked_providers(model, leaf.by_provided.keys().copied(), provided) {
			if let Some(names) = leaf.by_provided.get(&p) {
				for (name, value) in names {
					winners.entry(Arc::clone(name)).or_insert(value);
				}
			}
		}
		None
	});
	winners.into_iter().collect()
}

/// Concatenation of every matching subscription bucket, descending
/// specificity tuples first, insertion order within a bucket.
pub(crate) fn subscriptions<'t, V, M>(
	model: &M,
	trie: &'t SpecTrie<SubscriptionLeaf<V>>,
	required: &[SpecId],
	provided: SpecId,
) -> Vec<&'t V>
where
	M: SpecModel,
{
	let mut out = Vec::new();
	let _: Option<()> = walk(model, trie.root(), required, true, &mut |leaf| {
		let ranked = ranked_providers(model, leaf.by_provided.keys().copied(), provided);
		for &(_, p) in ranked.iter().rev() {
			if let Some(bucket) = leaf.by_provided.get(&p) {
				out.extend(bucket.iter());
			}
		}
		None
	});
	out
}
