//! Interface specification model.
//!
//! This crate defines the vocabulary the adapter registry indexes on:
//! dense interface identities ([`SpecId`]), the abstract model the registry
//! consults for ancestry and specificity ([`SpecModel`]), and a reference
//! model ([`InterfaceCatalog`]) that interns named interfaces and computes
//! their resolution order.
//!
//! The registry consumes this model; it never derives ancestry itself. Any
//! type implementing [`SpecModel`] can stand in for the catalog, as long as
//! it interns the universal spec as [`SpecId::ANY`] and keeps ancestor
//! chains stable once published.

mod catalog;
mod error;
mod model;

pub use catalog::InterfaceCatalog;
pub use error::CatalogError;
pub use model::{SpecId, SpecModel};
