use std::fmt;
use std::sync::Arc;

/// Dense identity of an interface specification.
///
/// Ids are handed out by a model (see [`InterfaceCatalog`](crate::InterfaceCatalog))
/// and are only meaningful against the model that minted them.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecId(u32);

impl SpecId {
	/// The universal spec. Every ancestor chain ends here, and it doubles as
	/// the wildcard slot in registration keys: a required position holding
	/// `ANY` accepts every query spec, and a subscription whose provided
	/// slot is `ANY` is a handler bucket.
	pub const ANY: SpecId = SpecId(0);

	#[inline]
	pub fn from_u32(v: u32) -> Self {
		SpecId(v)
	}

	#[inline]
	pub fn as_u32(self) -> u32 {
		self.0
	}

	/// Returns true for the universal/wildcard spec.
	#[inline]
	pub fn is_any(self) -> bool {
		self == Self::ANY
	}
}

impl fmt::Display for SpecId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_any() {
			f.write_str("any")
		} else {
			write!(f, "spec#{}", self.0)
		}
	}
}

/// Abstract interface model consumed by the registry.
///
/// The model owns ancestry: `ancestors` returns the full linearised chain of
/// a spec, most specific first, terminating in [`SpecId::ANY`]. The chain is
/// authoritative; callers rank and match against it without re-deriving
/// anything. Passing an id minted by a different model is outside the
/// contract; the reference catalog panics on such ids.
pub trait SpecModel {
	/// Ancestor chain of `spec`: the spec itself through its bases to
	/// [`SpecId::ANY`], most specific first.
	fn ancestors(&self, spec: SpecId) -> Arc<[SpecId]>;

	/// Position of `spec` within `ancestors(of)`, or `None` when `of` does
	/// not extend it. Lower positions are more specific matches.
	fn ancestor_index(&self, spec: SpecId, of: SpecId) -> Option<usize> {
		self.ancestors(of).iter().position(|&a| a == spec)
	}

	/// True iff `a` equals `b` or transitively extends it.
	fn is_or_extends(&self, a: SpecId, b: SpecId) -> bool {
		a == b || self.ancestor_index(b, a).is_some()
	}
}

impl<M: SpecModel + ?Sized> SpecModel for &M {
	fn ancestors(&self, spec: SpecId) -> Arc<[SpecId]> {
		(**self).ancestors(spec)
	}

	fn ancestor_index(&self, spec: SpecId, of: SpecId) -> Option<usize> {
		(**self).ancestor_index(spec, of)
	}

	fn is_or_extends(&self, a: SpecId, b: SpecId) -> bool {
		(**self).is_or_extends(a, b)
	}
}

impl<M: SpecModel + ?Sized> SpecModel for Arc<M> {
	fn ancestors(&self, spec: SpecId) -> Arc<[SpecId]> {
		(**self).ancestors(spec)
	}

	fn ancestor_index(&self, spec: SpecId, of: SpecId) -> Option<usize> {
		(**self).ancestor_index(spec, of)
	}

	fn is_or_extends(&self, a: SpecId, b: SpecId) -> bool {
		(**self).is_or_extends(a, b)
	}
}
