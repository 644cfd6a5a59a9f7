//! Adaptation helpers: calling registered values as factories.

use smallvec::SmallVec;
use trellis_spec::{SpecId, SpecModel};

use crate::registry::AdapterRegistry;

/// Factory contract for registered values.
///
/// `adapt` receives the objects being adapted and returns the adapter, or
/// `None` to decline. A declining factory is treated as if no registration
/// had matched. Errors and panics inside a factory propagate unchanged.
pub trait AdapterFactory<O: ?Sized> {
	type Output;

	fn adapt(&self, objs: &[&O]) -> Option<Self::Output>;
}

/// Objects that know their interface specification.
pub trait Adaptable {
	fn spec(&self) -> SpecId;
}

impl<V, M> AdapterRegistry<V, M>
where
	V: PartialEq,
	M: SpecModel,
{
	/// Adapts `obj` to `provided`: looks up the factory registered for the
	/// object's spec and calls it. `None` when no factory matches or the
	/// matching factory declines.
	pub fn query_adapter<O>(&self, obj: &O, provided: SpecId, name: &str) -> Option<V::Output>
	where
		O: Adaptable,
		V: AdapterFactory<O>,
	{
		let factory = self.lookup1(obj.spec(), provided, name)?;
		factory.adapt(&[obj])
	}

	/// [`query_adapter`](Self::query_adapter) with its first two arguments
	/// swapped, shaped for installation as an interface call hook.
	pub fn adapter_hook<O>(&self, provided: SpecId, obj: &O, name: &str) -> Option<V::Output>
	where
		O: Adaptable,
		V: AdapterFactory<O>,
	{
		self.query_adapter(obj, provided, name)
	}

	/// Multi-adaptation: the factory registered for the objects' spec
	/// sequence, called with all of them.
	pub fn query_multi_adapter<O>(
		&self,
		objs: &[&O],
		provided: SpecId,
		name: &str,
	) -> Option<V::Output>
	where
		O: Adaptable,
		V: AdapterFactory<O>,
	{
		let specs: SmallVec<[SpecId; 4]> = objs.iter().map(|obj| obj.spec()).collect();
		let factory = self.lookup(&specs, provided, name)?;
		factory.adapt(objs)
	}

	/// Materialises every subscription covering the objects, in
	/// subscription order, skipping declined factories.
	///
	/// With `provided = SpecId::ANY` the matching bucket holds handlers:
	/// every factory runs for its side effect and the result list is empty.
	pub fn subscribers<O>(&self, objs: &[&O], provided: SpecId) -> Vec<V::Output>
	where
		O: Adaptable,
		V: AdapterFactory<O>,
	{
		let specs: SmallVec<[SpecId; 4]> = objs.iter().map(|obj| obj.spec()).collect();
		let factories = self.subscriptions(&specs, provided);
		if provided.is_any() {
			for factory in factories {
				let _ = factory.adapt(objs);
			}
			return Vec::new();
		}
		factories
			.into_iter()
			.filter_map(|factory| factory.adapt(objs))
			.collect()
	}
}
