//! Specificity-ranked adapter and subscription registry.
//!
//! [`AdapterRegistry`] maps keys of `(required interface sequence, provided
//! interface, name)` to opaque values (typically adapter factories) and
//! answers queries under an arbitrary interface inheritance lattice:
//!
//! - [`lookup`](AdapterRegistry::lookup) - the single most specific
//!   registration covering a query, with name qualifier and caller-side
//!   default via `Option`.
//! - [`registered`](AdapterRegistry::registered) - exact-key probe, no
//!   lattice walking.
//! - [`lookup_all`](AdapterRegistry::lookup_all) - one winner per name.
//! - [`subscriptions`](AdapterRegistry::subscriptions) - every matching
//!   value, broad registrations before narrow ones.
//!
//! Interface ancestry comes from a [`SpecModel`] the registry consumes but
//! does not own; [`InterfaceCatalog`] is the bundled reference model.
//! Wildcards, handler buckets, and the universal top all share one slot,
//! [`SpecId::ANY`]. Values implementing [`AdapterFactory`] can be driven
//! through the adaptation helpers ([`query_adapter`](AdapterRegistry::query_adapter),
//! [`subscribers`](AdapterRegistry::subscribers) and friends).

mod adapt;
mod diagnostics;
mod precedence;
mod query;
mod registry;
mod trie;

pub use adapt::{Adaptable, AdapterFactory};
pub use diagnostics::RegistryStats;
pub use registry::AdapterRegistry;
// Re-export the specification model so depending on this crate suffices.
pub use trellis_spec::{CatalogError, InterfaceCatalog, SpecId, SpecModel};

#[cfg(test)]
mod tests;
