//! Invocation arguments.
//!
//! Positional arguments are JSON values or previously resolved instances.
//! The `page` keyword is only meaningful for steps, whose policy turns it
//! into a leading page instance.

use crate::instance::Instance;
use crate::result::ConstructionError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// A single positional argument
#[derive(Debug, Clone)]
pub enum Arg {
    /// Plain data
    Value(Value),
    /// A resolved object, e.g. an injected page
    Object(Instance),
}

/// Arguments supplied to a group, step or page accessor
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Arg>,
    page: Option<String>,
}

impl Args {
    /// Empty argument list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value argument
    #[must_use]
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(Arg::Value(value.into()));
        self
    }

    /// Append an object argument
    #[must_use]
    pub fn with_object(mut self, instance: Instance) -> Self {
        self.positional.push(Arg::Object(instance));
        self
    }

    /// Set the `page` keyword: the page a step operates on
    #[must_use]
    pub fn on_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// The `page` keyword, if supplied
    #[must_use]
    pub fn page_ref(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// Number of positional arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Whether there are no positional arguments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Positional argument at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.positional.get(index)
    }

    /// Iterate positional arguments
    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.positional.iter()
    }

    /// Value argument at `index`
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        match self.positional.get(index)? {
            Arg::Value(value) => Some(value),
            Arg::Object(_) => None,
        }
    }

    /// Object argument at `index`
    #[must_use]
    pub fn object(&self, index: usize) -> Option<&Instance> {
        match self.positional.get(index)? {
            Arg::Object(instance) => Some(instance),
            Arg::Value(_) => None,
        }
    }

    /// Deserialize the value argument at `index`
    pub fn parse<T: DeserializeOwned>(&self, index: usize) -> Result<T, ConstructionError> {
        let value = match self.positional.get(index) {
            Some(Arg::Value(value)) => value.clone(),
            Some(Arg::Object(instance)) => {
                return Err(ConstructionError::new(format!(
                    "argument {index} is a {} instance, not a value",
                    instance.class_name()
                )))
            }
            None => return Err(ConstructionError::missing_argument(index)),
        };
        serde_json::from_value(value)
            .map_err(|e| ConstructionError::new(format!("argument {index}: {e}")))
    }

    /// Typed handle to the object argument at `index`
    pub fn cast<T: Any>(&self, index: usize) -> Result<Rc<T>, ConstructionError> {
        match self.positional.get(index) {
            Some(Arg::Object(instance)) => instance
                .cast::<T>()
                .map_err(|e| ConstructionError::new(format!("argument {index}: {e}"))),
            Some(Arg::Value(_)) => Err(ConstructionError::new(format!(
                "argument {index} is a value, not an object"
            ))),
            None => Err(ConstructionError::missing_argument(index)),
        }
    }

    /// Insert an argument ahead of the caller's own
    pub(crate) fn prepend(&mut self, arg: Arg) {
        self.positional.insert(0, arg);
    }
}

impl From<()> for Args {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        values.into_iter().collect()
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Arg::Value).collect(),
            page: None,
        }
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Arg;
    type IntoIter = std::slice::Iter<'a, Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
