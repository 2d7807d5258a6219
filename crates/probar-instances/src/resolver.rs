//! Name resolution.
//!
//! A symbolic name plus a category yields the accessor name (the cache key,
//! `login` + page -> `login_page`) and the class identifier looked up in the
//! category's namespace (`LoginPage`).

use crate::category::Category;
use crate::registry::{ClassRef, ObjectRegistry};
use crate::result::{InstanceError, InstanceResult};
use heck::{ToSnakeCase, ToUpperCamelCase};
use std::borrow::Borrow;

/// Accessor name: unique per (category, symbolic name) on a context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessorName(String);

impl AccessorName {
    /// Derive the accessor name for `name` in `category`
    pub fn derive(name: &str, category: Category) -> InstanceResult<Self> {
        let trimmed = name.trim();
        let valid = trimmed.chars().any(char::is_alphanumeric)
            && trimmed
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(InstanceError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(Self(format!(
            "{}_{}",
            trimmed.to_snake_case(),
            category.suffix()
        )))
    }

    /// Accessor name as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Class identifier this accessor resolves to
    #[must_use]
    pub fn class_identifier(&self) -> String {
        self.0.to_upper_camel_case()
    }
}

impl std::fmt::Display for AccessorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AccessorName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AccessorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of resolving a symbolic name
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Registered class
    pub class: ClassRef,
    /// Accessor name on the context
    pub accessor: AccessorName,
}

/// Resolve `name` in `category` against `registry`.
///
/// Pure lookup: fails with [`InstanceError::Resolution`] when no class is
/// registered under the canonical identifier.
pub fn resolve(
    registry: &ObjectRegistry,
    name: &str,
    category: Category,
) -> InstanceResult<Resolution> {
    let accessor = AccessorName::derive(name, category)?;
    let identifier = accessor.class_identifier();
    let class = registry
        .lookup(category, &identifier)
        .ok_or_else(|| InstanceError::Resolution {
            name: name.to_string(),
            category,
            class: identifier,
        })?;
    Ok(Resolution { class, accessor })
}
