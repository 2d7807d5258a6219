//! Interaction invoker.
//!
//! Runs a caller-supplied scoped block against a resolved instance. The block
//! receives the instance explicitly; its return value becomes the result of
//! the call.

use crate::instance::Instance;
use crate::result::InstanceResult;
use std::any::Any;

/// Result of invoking an accessor with an optional block
#[derive(Debug)]
pub enum Invoked<R> {
    /// No block was given: the instance itself, for chaining
    Instance(Instance),
    /// A block was given: its return value
    Block(R),
}

impl<R> Invoked<R> {
    /// The instance, if no block ran
    #[must_use]
    pub fn into_instance(self) -> Option<Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Block(_) => None,
        }
    }

    /// The block's value, if a block ran
    #[must_use]
    pub fn into_value(self) -> Option<R> {
        match self {
            Self::Block(value) => Some(value),
            Self::Instance(_) => None,
        }
    }
}

/// Run `block` against `instance` if one was given.
pub fn invoke<R, F>(instance: Instance, block: Option<F>) -> Invoked<R>
where
    F: FnOnce(&Instance) -> R,
{
    match block {
        Some(block) => Invoked::Block(block(&instance)),
        None => Invoked::Instance(instance),
    }
}

/// Run a typed block: `instance` is downcast to `T` first.
pub fn scoped<T, R, F>(instance: &Instance, block: F) -> InstanceResult<R>
where
    T: Any,
    F: FnOnce(&T) -> R,
{
    let receiver = instance.cast::<T>()?;
    Ok(block(&receiver))
}
