//! Resolved object handles.

use crate::page_object::PageObject;
use crate::result::{InstanceError, InstanceResult};
use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

/// Shared handle to a constructed group, step or page object.
///
/// Cloning the handle never clones the object: every clone points at the
/// same allocation, so identity survives cache hits.
#[derive(Clone)]
pub struct Instance {
    class: Arc<str>,
    object: Rc<dyn Any>,
    page: Option<Rc<dyn PageObject>>,
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class)
            .field("page", &self.page.is_some())
            .finish_non_exhaustive()
    }
}

impl Instance {
    /// Wrap a plain (group or step) object
    pub fn new<T: Any>(class: impl Into<Arc<str>>, object: T) -> Self {
        Self {
            class: class.into(),
            object: Rc::new(object),
            page: None,
        }
    }

    /// Wrap a page object; the handle exposes it to the readiness capability
    pub fn page<T: PageObject>(class: impl Into<Arc<str>>, object: T) -> Self {
        let shared = Rc::new(object);
        let page: Rc<dyn PageObject> = shared.clone();
        Self {
            class: class.into(),
            object: shared,
            page: Some(page),
        }
    }

    /// Class identifier this instance was built from
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Check the concrete type
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.object.is::<T>()
    }

    /// Borrow the object as `T`
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    /// Get a shared handle typed as `T`
    pub fn cast<T: Any>(&self) -> InstanceResult<Rc<T>> {
        Rc::clone(&self.object)
            .downcast::<T>()
            .map_err(|_| InstanceError::TypeMismatch {
                class: self.class.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Page view of this instance, if it was built as a page
    #[must_use]
    pub fn as_page(&self) -> Option<&dyn PageObject> {
        self.page.as_deref()
    }

    /// Object identity: both handles point at the same allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.object).cast::<()>() == Rc::as_ptr(&other.object).cast::<()>()
    }
}
