//! Specificity ranking for candidate registrations.
//!
//! # Ranking rules
//!
//! A candidate's specificity tuple is the rank of each required position
//! followed by the rank of its provided spec, compared lexicographically;
//! smaller is more specific.
//!
//! * Required position: a registered spec `r` is acceptable for query spec
//!   `q` iff `r` is in `ancestors(q)`; its rank is the index there. The
//!   wildcard `ANY` terminates every chain, so it is acceptable everywhere
//!   and ranks last.
//! * Provided: a registered spec `p` satisfies query `q` iff `p`
//!   is-or-extends `q`, since an adapter producing a derived interface
//!   serves a request for any of its ancestors. Its rank is the index of
//!   `q` in `ancestors(p)`; rank 0 is the exact interface.
//! * Equal provided ranks are broken by id, making the order total and
//!   independent of registration order.
//!
//! Querying with `provided = ANY` addresses the wildcard bucket itself
//! (handlers); typed buckets never match it and it never matches them.

use smallvec::SmallVec;
use trellis_spec::{SpecId, SpecModel};

/// Provided buckets satisfying `provided`, in ascending specificity order.
pub(crate) fn ranked_providers<M: SpecModel>(
	model: &M,
	buckets: impl Iterator<Item = SpecId>,
	provided: SpecId,
) -> SmallVec<[(usize, SpecId); 4]> {
	let mut ranked: SmallVec<[(usize, SpecId); 4]> = if provided.is_any() {
		buckets.filter(|p| p.is_any()).map(|p| (0, p)).collect()
	} else {
		buckets
			.filter_map(|p| model.ancestor_index(provided, p).map(|rank| (rank, p)))
			.collect()
	};
	ranked.sort_unstable();
	ranked
}
