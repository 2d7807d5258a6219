//! Test Context
//!
//! The calling test scope. A context owns the instance cache for one test:
//! groups, steps and pages referenced by name are resolved against a shared
//! [`ObjectRegistry`], built on first use, and reused on every later
//! reference until the context is dropped.
//!
//! ## Toyota Way Application
//!
//! - **Muda**: Objects are resolved once per test, not once per reference
//! - **Jidoka**: Resolution, construction and readiness failures stop the
//!   call immediately
//! - **Heijunka**: One context per test keeps state isolated between tests

use crate::args::Args;
use crate::cache::{CacheStats, InstanceCache, ReuseExisting, ValidationRule};
use crate::category::Category;
use crate::config::InstancesConfig;
use crate::instance::Instance;
use crate::interaction::{self, Invoked};
use crate::registry::ObjectRegistry;
use crate::resolver::{self, AccessorName};
use crate::result::InstanceResult;
use crate::wait::{PollingReadiness, Readiness, WaitOptions};
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// Per-test resolution scope
pub struct Context {
    id: Uuid,
    registry: Arc<ObjectRegistry>,
    config: InstancesConfig,
    readiness: Box<dyn Readiness>,
    rule: Box<dyn ValidationRule>,
    cache: InstanceCache,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Context`]
pub struct ContextBuilder {
    registry: Arc<ObjectRegistry>,
    config: InstancesConfig,
    readiness: Box<dyn Readiness>,
    rule: Box<dyn ValidationRule>,
}

impl std::fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("classes", &self.registry.count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContextBuilder {
    /// Set the configuration
    #[must_use]
    pub fn config(mut self, config: InstancesConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the page wait options
    #[must_use]
    pub fn wait_options(mut self, wait: WaitOptions) -> Self {
        self.config.wait = wait;
        self
    }

    /// Set the readiness capability pages are awaited with
    #[must_use]
    pub fn readiness(mut self, readiness: impl Readiness + 'static) -> Self {
        self.readiness = Box::new(readiness);
        self
    }

    /// Replace the cache validation rule
    #[must_use]
    pub fn validation_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rule = Box::new(rule);
        self
    }

    /// Build the context
    #[must_use]
    pub fn build(self) -> Context {
        let id = Uuid::new_v4();
        tracing::debug!(context = %id, classes = self.registry.count(), "context created");
        Context {
            id,
            registry: self.registry,
            config: self.config,
            readiness: self.readiness,
            rule: self.rule,
            cache: InstanceCache::new(id),
        }
    }
}

impl Context {
    /// Context with default configuration, polling readiness and the
    /// reuse-existing validation rule
    #[must_use]
    pub fn new(registry: Arc<ObjectRegistry>) -> Self {
        Self::builder(registry).build()
    }

    /// Start building a context
    #[must_use]
    pub fn builder(registry: Arc<ObjectRegistry>) -> ContextBuilder {
        ContextBuilder {
            registry,
            config: InstancesConfig::default(),
            readiness: Box::new(PollingReadiness),
            rule: Box::new(ReuseExisting),
        }
    }

    /// Unique id, recorded on every tracing event of this context
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &InstancesConfig {
        &self.config
    }

    /// Registry names are resolved against
    #[must_use]
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    // =========================================================================
    // CATEGORY ENTRY POINTS
    // =========================================================================

    /// Resolve a group
    pub fn groups(&mut self, name: &str, args: impl Into<Args>) -> InstanceResult<Instance> {
        self.resolve(name, Category::Group, args.into())
    }

    /// Resolve a step. A `page` reference in `args` resolves that page
    /// first and passes it as the step's first argument.
    pub fn steps(&mut self, name: &str, args: impl Into<Args>) -> InstanceResult<Instance> {
        self.resolve(name, Category::Step, args.into())
    }

    /// Resolve a page, awaiting readiness when it is built
    pub fn pages(&mut self, name: &str, args: impl Into<Args>) -> InstanceResult<Instance> {
        self.resolve(name, Category::Page, args.into())
    }

    /// Resolve a group and run `block` against it
    pub fn groups_with<T, R, F>(
        &mut self,
        name: &str,
        args: impl Into<Args>,
        block: F,
    ) -> InstanceResult<R>
    where
        T: Any,
        F: FnOnce(&T) -> R,
    {
        let instance = self.groups(name, args)?;
        interaction::scoped(&instance, block)
    }

    /// Resolve a step and run `block` against it
    pub fn steps_with<T, R, F>(
        &mut self,
        name: &str,
        args: impl Into<Args>,
        block: F,
    ) -> InstanceResult<R>
    where
        T: Any,
        F: FnOnce(&T) -> R,
    {
        let instance = self.steps(name, args)?;
        interaction::scoped(&instance, block)
    }

    /// Resolve a page and run `block` against it
    pub fn pages_with<T, R, F>(
        &mut self,
        name: &str,
        args: impl Into<Args>,
        block: F,
    ) -> InstanceResult<R>
    where
        T: Any,
        F: FnOnce(&T) -> R,
    {
        let instance = self.pages(name, args)?;
        interaction::scoped(&instance, block)
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Resolve `name` in `category`, building or reusing the cached instance.
    ///
    /// Unknown names fail before anything is installed on the context.
    pub fn resolve(
        &mut self,
        name: &str,
        category: Category,
        args: Args,
    ) -> InstanceResult<Instance> {
        let span = tracing::debug_span!("resolve", context = %self.id, %category, name);
        let _entered = span.enter();

        let resolution = resolver::resolve(&self.registry, name, category)?;
        let policy = category.policy();
        let page = match args.page_ref() {
            Some(page) if policy.injects_page => Some(self.pages(page, Args::new())?),
            _ => None,
        };

        let _ = self
            .cache
            .install(&resolution.accessor, category, resolution.class);
        let args = policy.format_args(args, page);
        self.call_accessor(resolution.accessor.as_str(), &args)
    }

    /// Resolve and optionally run a block against the instance
    pub fn invoke<R, F>(
        &mut self,
        name: &str,
        category: Category,
        args: Args,
        block: Option<F>,
    ) -> InstanceResult<Invoked<R>>
    where
        F: FnOnce(&Instance) -> R,
    {
        let instance = self.resolve(name, category, args)?;
        Ok(interaction::invoke(instance, block))
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Call an installed accessor directly by name (e.g. `login_page`).
    ///
    /// Arguments are used as-is: no page injection happens here.
    pub fn call_accessor(&mut self, accessor: &str, args: &Args) -> InstanceResult<Instance> {
        let readiness = self.readiness.as_ref();
        let wait = &self.config.wait;
        self.cache
            .get_or_create(accessor, args, self.rule.as_ref(), |binding, args| {
                binding
                    .category()
                    .policy()
                    .construct(binding.class(), args, readiness, wait)
            })
    }

    /// Whether an accessor has been installed on this context
    #[must_use]
    pub fn responds_to(&self, accessor: &str) -> bool {
        self.cache.responds_to(accessor)
    }

    /// Accessor name `name` would use in `category`
    pub fn accessor_for(&self, name: &str, category: Category) -> InstanceResult<AccessorName> {
        AccessorName::derive(name, category)
    }

    /// Installed accessors, sorted
    #[must_use]
    pub fn accessors(&self) -> Vec<&str> {
        self.cache.accessors()
    }

    /// Cached value of an accessor, without calling it
    #[must_use]
    pub fn cached(&self, accessor: &str) -> Option<&Instance> {
        self.cache.cached(accessor)
    }

    /// Drop the cached value of an accessor; the next call rebuilds it
    pub fn invalidate(&mut self, accessor: &str) -> bool {
        let dropped = self.cache.invalidate(accessor);
        if dropped {
            tracing::debug!(context = %self.id, accessor, "invalidated");
        }
        dropped
    }

    /// Drop every cached value
    pub fn invalidate_all(&mut self) {
        tracing::debug!(context = %self.id, "invalidated all accessors");
        self.cache.invalidate_all();
    }

    /// Cache counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
