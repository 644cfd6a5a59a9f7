use crate::SpecId;

/// Fatal interface definition errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
	/// An interface with this name is already defined.
	#[error("duplicate interface name: {name:?}")]
	DuplicateName { name: Box<str> },

	/// A base id does not belong to this catalog.
	#[error("unknown base spec: {base}")]
	UnknownBase { base: SpecId },

	/// The dense id space is exhausted.
	#[error("catalog capacity exhausted ({max} specs)")]
	CapacityExhausted { max: u32 },
}
