//! Per-context instance cache.
//!
//! Each accessor installed on a context owns one slot. A slot remembers the
//! class it was installed with and at most one live instance. Installing is
//! idempotent and slots are never removed; only their value is replaced or
//! emptied.
//!
//! ## Toyota Way Application
//!
//! - **Muda**: Objects are built once per test and reused afterwards
//! - **Poka-Yoke**: Exactly one live instance per accessor

use crate::args::Args;
use crate::category::Category;
use crate::instance::Instance;
use crate::registry::ClassRef;
use crate::resolver::AccessorName;
use crate::result::{InstanceError, InstanceResult};
use std::collections::HashMap;
use uuid::Uuid;

// =============================================================================
// VALIDATION RULE
// =============================================================================

/// Decides on every accessor call whether the cached value can be reused.
pub trait ValidationRule {
    /// `cached` is `None` until the accessor has built its first instance
    fn is_valid(&self, cached: Option<&Instance>, args: &Args) -> bool;
}

/// Default rule: any cached instance is reused; arguments are ignored.
///
/// Once built, an accessor's instance acts as a per-context singleton until
/// it is explicitly invalidated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReuseExisting;

impl ValidationRule for ReuseExisting {
    fn is_valid(&self, cached: Option<&Instance>, _args: &Args) -> bool {
        cached.is_some()
    }
}

impl<F> ValidationRule for F
where
    F: Fn(Option<&Instance>, &Args) -> bool,
{
    fn is_valid(&self, cached: Option<&Instance>, args: &Args) -> bool {
        self(cached, args)
    }
}

// =============================================================================
// SLOTS
// =============================================================================

/// What an accessor was installed with
#[derive(Debug, Clone)]
pub struct Binding {
    category: Category,
    class: ClassRef,
}

impl Binding {
    /// Category of the accessor
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Class the accessor builds
    #[must_use]
    pub fn class(&self) -> &ClassRef {
        &self.class
    }
}

#[derive(Debug)]
struct Slot {
    binding: Binding,
    value: Option<Instance>,
    builds: u64,
    hits: u64,
}

/// Counters for a context's cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Installed accessors
    pub accessors: usize,
    /// Accessors currently holding an instance
    pub live: usize,
    /// Instances constructed
    pub builds: u64,
    /// Calls answered from the cache
    pub hits: u64,
}

// =============================================================================
// CACHE
// =============================================================================

/// Accessor-keyed instance cache owned by one context
#[derive(Debug)]
pub struct InstanceCache {
    owner: Uuid,
    slots: HashMap<AccessorName, Slot>,
}

impl InstanceCache {
    /// Create an empty cache for the context `owner`
    #[must_use]
    pub fn new(owner: Uuid) -> Self {
        Self {
            owner,
            slots: HashMap::new(),
        }
    }

    /// Install an accessor. Returns `false` if it was already installed, in
    /// which case the original binding is kept.
    pub fn install(
        &mut self,
        accessor: &AccessorName,
        category: Category,
        class: ClassRef,
    ) -> bool {
        if self.slots.contains_key(accessor) {
            return false;
        }
        tracing::debug!(
            context = %self.owner,
            accessor = %accessor,
            class = class.identifier(),
            "installed accessor"
        );
        let _ = self.slots.insert(
            accessor.clone(),
            Slot {
                binding: Binding { category, class },
                value: None,
                builds: 0,
                hits: 0,
            },
        );
        true
    }

    /// Whether an accessor is installed
    #[must_use]
    pub fn responds_to(&self, accessor: &str) -> bool {
        self.slots.contains_key(accessor)
    }

    /// Binding of an installed accessor
    #[must_use]
    pub fn binding(&self, accessor: &str) -> Option<&Binding> {
        self.slots.get(accessor).map(|slot| &slot.binding)
    }

    /// Current value of an accessor without calling it
    #[must_use]
    pub fn cached(&self, accessor: &str) -> Option<&Instance> {
        self.slots.get(accessor).and_then(|slot| slot.value.as_ref())
    }

    /// Call an installed accessor.
    ///
    /// Reuses the cached value when `rule` accepts it, otherwise runs
    /// `build` and stores the result over any previous instance. A failed
    /// build leaves the slot as it was.
    pub fn get_or_create<F>(
        &mut self,
        accessor: &str,
        args: &Args,
        rule: &dyn ValidationRule,
        build: F,
    ) -> InstanceResult<Instance>
    where
        F: FnOnce(&Binding, &Args) -> InstanceResult<Instance>,
    {
        let owner = self.owner;
        let slot = self
            .slots
            .get_mut(accessor)
            .ok_or_else(|| InstanceError::UnknownAccessor {
                accessor: accessor.to_string(),
            })?;

        if rule.is_valid(slot.value.as_ref(), args) {
            if let Some(instance) = &slot.value {
                slot.hits += 1;
                tracing::debug!(context = %owner, accessor, "reusing cached instance");
                return Ok(instance.clone());
            }
        }

        let instance = build(&slot.binding, args)?;
        if slot.value.replace(instance.clone()).is_some() {
            tracing::debug!(context = %owner, accessor, "replaced cached instance");
        } else {
            tracing::debug!(context = %owner, accessor, "built instance");
        }
        slot.builds += 1;
        Ok(instance)
    }

    /// Empty an accessor's slot; the accessor stays installed.
    /// Returns whether an instance was dropped.
    pub fn invalidate(&mut self, accessor: &str) -> bool {
        self.slots
            .get_mut(accessor)
            .and_then(|slot| slot.value.take())
            .is_some()
    }

    /// Empty every slot
    pub fn invalidate_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.value = None;
        }
    }

    /// Installed accessor names, sorted
    #[must_use]
    pub fn accessors(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.slots.keys().map(AccessorName::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of installed accessors
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no accessor is installed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Aggregate counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.slots.values().fold(
            CacheStats {
                accessors: self.slots.len(),
                ..CacheStats::default()
            },
            |mut stats, slot| {
                stats.live += usize::from(slot.value.is_some());
                stats.builds += slot.builds;
                stats.hits += slot.hits;
                stats
            },
        )
    }
}
