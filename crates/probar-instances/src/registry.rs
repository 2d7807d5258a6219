//! Class registry.
//!
//! Groups, steps and pages live in one namespace per category, keyed by
//! their class identifier (`LoginGroup`, `CalculatorStep`, `HomePage`).
//! Registration happens once during test-suite setup; after that the
//! registry is read-only and can be shared between contexts with an `Arc`.

use crate::args::Args;
use crate::category::Category;
use crate::instance::Instance;
use crate::page_object::PageObject;
use crate::result::{ConstructionError, InstanceError, InstanceResult};
use heck::ToUpperCamelCase;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Type-erased constructor
pub type Constructor = Box<dyn Fn(&Args) -> Result<Instance, ConstructionError> + Send + Sync>;

/// Shared reference to a registered class
pub type ClassRef = Arc<ObjectClass>;

/// A constructible class registered under a category namespace
pub struct ObjectClass {
    identifier: Arc<str>,
    category: Category,
    type_name: &'static str,
    constructor: Constructor,
}

impl std::fmt::Debug for ObjectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectClass")
            .field("identifier", &self.identifier)
            .field("category", &self.category)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl ObjectClass {
    /// Class identifier
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Namespace the class was registered in
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Rust type the constructor produces
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Run the constructor
    pub fn construct(&self, args: &Args) -> InstanceResult<Instance> {
        (self.constructor)(args).map_err(|source| InstanceError::Construction {
            class: self.identifier.to_string(),
            source,
        })
    }
}

/// Registry of group, step and page classes
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    namespaces: HashMap<Category, HashMap<String, ClassRef>>,
}

impl ObjectRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group under its Rust type name
    pub fn register_group<T, F>(&mut self, constructor: F) -> ClassRef
    where
        T: Any,
        F: Fn(&Args) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        self.register_group_as(short_type_name::<T>(), constructor)
    }

    /// Register a group under an explicit class identifier
    pub fn register_group_as<T, F>(&mut self, identifier: &str, constructor: F) -> ClassRef
    where
        T: Any,
        F: Fn(&Args) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        self.insert_plain(Category::Group, identifier, constructor)
    }

    /// Register a step under its Rust type name
    pub fn register_step<T, F>(&mut self, constructor: F) -> ClassRef
    where
        T: Any,
        F: Fn(&Args) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        self.register_step_as(short_type_name::<T>(), constructor)
    }

    /// Register a step under an explicit class identifier
    pub fn register_step_as<T, F>(&mut self, identifier: &str, constructor: F) -> ClassRef
    where
        T: Any,
        F: Fn(&Args) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        self.insert_plain(Category::Step, identifier, constructor)
    }

    /// Register a page under its Rust type name
    pub fn register_page<T, F>(&mut self, constructor: F) -> ClassRef
    where
        T: PageObject,
        F: Fn(&Args) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        self.register_page_as(short_type_name::<T>(), constructor)
    }

    /// Register a page under an explicit class identifier
    pub fn register_page_as<T, F>(&mut self, identifier: &str, constructor: F) -> ClassRef
    where
        T: PageObject,
        F: Fn(&Args) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        let class: Arc<str> = Arc::from(identifier);
        let name = Arc::clone(&class);
        self.insert(
            Category::Page,
            class,
            std::any::type_name::<T>(),
            Box::new(move |args: &Args| {
                constructor(args).map(|page| Instance::page(Arc::clone(&name), page))
            }),
        )
    }

    fn insert_plain<T, F>(
        &mut self,
        category: Category,
        identifier: &str,
        constructor: F,
    ) -> ClassRef
    where
        T: Any,
        F: Fn(&Args) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        let class: Arc<str> = Arc::from(identifier);
        let name = Arc::clone(&class);
        self.insert(
            category,
            class,
            std::any::type_name::<T>(),
            Box::new(move |args: &Args| {
                constructor(args).map(|object| Instance::new(Arc::clone(&name), object))
            }),
        )
    }

    fn insert(
        &mut self,
        category: Category,
        identifier: Arc<str>,
        type_name: &'static str,
        constructor: Constructor,
    ) -> ClassRef {
        let expected_suffix = category.suffix().to_upper_camel_case();
        if !identifier.ends_with(&expected_suffix) {
            tracing::warn!(
                class = %identifier,
                %category,
                "class identifier does not end with {expected_suffix}; symbolic names will not resolve to it"
            );
        }

        let class = Arc::new(ObjectClass {
            identifier: Arc::clone(&identifier),
            category,
            type_name,
            constructor,
        });
        let previous = self
            .namespaces
            .entry(category)
            .or_default()
            .insert(identifier.to_string(), Arc::clone(&class));
        if previous.is_some() {
            tracing::debug!(class = %identifier, %category, "replaced registered class");
        }
        class
    }

    /// Look up a class in a category namespace
    #[must_use]
    pub fn lookup(&self, category: Category, identifier: &str) -> Option<ClassRef> {
        self.namespaces
            .get(&category)
            .and_then(|namespace| namespace.get(identifier))
            .cloned()
    }

    /// Check whether a class is registered
    #[must_use]
    pub fn contains(&self, category: Category, identifier: &str) -> bool {
        self.namespaces
            .get(&category)
            .is_some_and(|namespace| namespace.contains_key(identifier))
    }

    /// Registered class identifiers of a category, sorted
    #[must_use]
    pub fn classes(&self, category: Category) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .namespaces
            .get(&category)
            .map(|namespace| namespace.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Total number of registered classes
    #[must_use]
    pub fn count(&self) -> usize {
        self.namespaces.values().map(HashMap::len).sum()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Last path segment of a type name, without generic parameters
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct LoginGroup {
        retries: u32,
    }

    #[derive(Debug)]
    struct HomePage;

    impl PageObject for HomePage {}

    #[derive(Debug)]
    struct Wrapper<T>(T);

    mod registration_tests {
        use super::*;

        #[test]
        fn test_register_by_type_name() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_group(|_| Ok(LoginGroup { retries: 0 }));
            assert_eq!(class.identifier(), "LoginGroup");
            assert_eq!(class.category(), Category::Group);
            assert!(class.type_name().ends_with("LoginGroup"));
            assert!(registry.contains(Category::Group, "LoginGroup"));
            assert!(!registry.contains(Category::Step, "LoginGroup"));
        }

        #[test]
        fn test_namespaces_are_separate() {
            let mut registry = ObjectRegistry::new();
            registry.register_page(|_| Ok(HomePage));
            registry.register_step_as("HomeStep", |_| Ok(()));
            assert_eq!(registry.count(), 2);
            assert_eq!(registry.classes(Category::Page), vec!["HomePage"]);
            assert_eq!(registry.classes(Category::Step), vec!["HomeStep"]);
            assert!(registry.classes(Category::Group).is_empty());
        }

        #[test]
        fn test_reregister_replaces() {
            let mut registry = ObjectRegistry::new();
            let first = registry.register_group(|_| Ok(LoginGroup { retries: 1 }));
            let second = registry.register_group(|_| Ok(LoginGroup { retries: 2 }));
            assert_eq!(registry.count(), 1);
            let found = registry.lookup(Category::Group, "LoginGroup").unwrap();
            assert!(Arc::ptr_eq(&found, &second));
            assert!(!Arc::ptr_eq(&found, &first));
        }

        #[test]
        fn test_empty_registry() {
            let registry = ObjectRegistry::default();
            assert!(registry.is_empty());
            assert!(registry.lookup(Category::Page, "HomePage").is_none());
        }
    }

    mod construct_tests {
        use super::*;

        #[test]
        fn test_construct_group() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_group(|args| {
                Ok(LoginGroup {
                    retries: args.parse(0)?,
                })
            });
            let instance = class.construct(&Args::new().with(3)).unwrap();
            assert_eq!(instance.class_name(), "LoginGroup");
            assert_eq!(instance.cast::<LoginGroup>().unwrap().retries, 3);
            assert!(instance.as_page().is_none());
        }

        #[test]
        fn test_construct_page_exposes_page_view() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_page(|_| Ok(HomePage));
            let instance = class.construct(&Args::new()).unwrap();
            assert!(instance.as_page().is_some());
        }

        #[test]
        fn test_constructor_error_wrapped() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_group(|args| {
                Ok(LoginGroup {
                    retries: args.parse(0)?,
                })
            });
            let err = class.construct(&Args::new()).unwrap_err();
            match err {
                InstanceError::Construction { class, source } => {
                    assert_eq!(class, "LoginGroup");
                    assert_eq!(source, ConstructionError::missing_argument(0));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<LoginGroup>(), "LoginGroup");
        assert_eq!(short_type_name::<Wrapper<HomePage>>(), "Wrapper");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
