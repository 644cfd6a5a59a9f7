//! Interning catalog of named interfaces.
//!
//! # Role
//!
//! The reference [`SpecModel`]: interfaces are defined once, interned into
//! dense [`SpecId`]s, and their resolution order is computed at definition
//! time and never again. Readers are lock-free; `define` publishes a new
//! snapshot through a compare-and-swap loop, so the catalog can be shared
//! behind an `Arc` between the registry and its host.
//!
//! # Invariants
//!
//! * `SpecId::ANY` is interned first and is its own entire ancestor chain.
//! * Every other chain starts with the spec itself and ends with `ANY`.
//! * Chains are immutable once published; `define` only appends.

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{CatalogError, SpecId, SpecModel};

/// Display name of the interned universal spec.
const ANY_NAME: &str = "any";

#[derive(Clone)]
struct SpecEntry {
	name: Arc<str>,
	bases: Arc<[SpecId]>,
	ancestors: Arc<[SpecId]>,
}

#[derive(Clone, Default)]
struct CatalogInner {
	specs: Vec<SpecEntry>,
	by_name: FxHashMap<Arc<str>, SpecId>,
}

impl CatalogInner {
	fn entry(&self, spec: SpecId) -> &SpecEntry {
		let Some(entry) = self.specs.get(spec.as_u32() as usize) else {
			panic!("{spec} does not belong to this catalog");
		};
		entry
	}
}

/// Interning catalog of named interfaces with lock-free readers.
pub struct InterfaceCatalog {
	inner: ArcSwap<CatalogInner>,
}

impl Default for InterfaceCatalog {
	fn default() -> Self {
		Self::new()
	}
}

impl InterfaceCatalog {
	/// Creates a catalog holding only the universal spec.
	pub fn new() -> Self {
		let name: Arc<str> = Arc::from(ANY_NAME);
		let mut inner = CatalogInner::default();
		inner.specs.push(SpecEntry {
			name: Arc::clone(&name),
			bases: Arc::from([]),
			ancestors: Arc::from([SpecId::ANY]),
		});
		inner.by_name.insert(name, SpecId::ANY);
		Self {
			inner: ArcSwap::from_pointee(inner),
		}
	}

	/// Defines a new interface extending `bases` (in declaration order).
	///
	/// An empty `bases` list means the interface extends only the universal
	/// spec. Base ids must have been minted by this catalog.
	pub fn define(&self, name: &str, bases: &[SpecId]) -> Result<SpecId, CatalogError> {
		loop {
			let cur = self.inner.load_full();

			if cur.by_name.contains_key(name) {
				return Err(CatalogError::DuplicateName { name: name.into() });
			}
			for &base in bases {
				if (base.as_u32() as usize) >= cur.specs.len() {
					return Err(CatalogError::UnknownBase { base });
				}
			}
			if cur.specs.len() > u32::MAX as usize {
				return Err(CatalogError::CapacityExhausted { max: u32::MAX });
			}

			let id = SpecId::from_u32(cur.specs.len() as u32);
			let bases: Arc<[SpecId]> = if bases.is_empty() {
				Arc::from([SpecId::ANY])
			} else {
				Arc::from(bases)
			};
			let ancestors = linearize(&cur, id, &bases);

			let name_arc: Arc<str> = Arc::from(name);
			let mut next = (*cur).clone();
			next.specs.push(SpecEntry {
				name: Arc::clone(&name_arc),
				bases,
				ancestors,
			});
			next.by_name.insert(name_arc, id);

			let prev = self.inner.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				return Ok(id);
			}
			// CAS failed, retry
		}
	}

	/// Looks up an interface by name.
	#[inline]
	pub fn get(&self, name: &str) -> Option<SpecId> {
		self.inner.load().by_name.get(name).copied()
	}

	/// Returns the display name of a spec.
	pub fn name(&self, spec: SpecId) -> Arc<str> {
		Arc::clone(&self.inner.load().entry(spec).name)
	}

	/// Returns the declared bases of a spec.
	pub fn bases(&self, spec: SpecId) -> Arc<[SpecId]> {
		Arc::clone(&self.inner.load().entry(spec).bases)
	}

	/// Returns the number of defined specs, the universal spec included.
	pub fn len(&self) -> usize {
		self.inner.load().specs.len()
	}

	pub fn is_empty(&self) -> bool {
		// The universal spec is always present.
		false
	}
}

impl SpecModel for InterfaceCatalog {
	fn ancestors(&self, spec: SpecId) -> Arc<[SpecId]> {
		Arc::clone(&self.inner.load().entry(spec).ancestors)
	}
}

/// Computes the resolution order of a new spec: itself, then the chains of
/// its bases in declaration order, de-duplicated keeping the last occurrence
/// so shared bases sink toward the general end and `ANY` stays terminal.
fn linearize(inner: &CatalogInner, id: SpecId, bases: &[SpecId]) -> Arc<[SpecId]> {
	let mut chain = vec![id];
	for &base in bases {
		chain.extend_from_slice(&inner.entry(base).ancestors);
	}

	let mut seen = FxHashSet::default();
	let mut out = Vec::with_capacity(chain.len());
	for &spec in chain.iter().rev() {
		if seen.insert(spec) {
			out.push(spec);
		}
	}
	out.reverse();
	Arc::from(out)
}
