//! Object categories and their construction policies.
//!
//! The three categories are a closed set. Each one is described by a row of
//! a static policy table: the naming suffix, whether construction waits for
//! readiness, and whether a `page` reference is injected ahead of the
//! caller's arguments.

use crate::args::{Arg, Args};
use crate::instance::Instance;
use crate::registry::ObjectClass;
use crate::result::{ConstructionError, InstanceError, InstanceResult};
use crate::wait::{Readiness, WaitOptions};
use serde::{Deserialize, Serialize};

/// Object category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Reusable group of steps
    Group,
    /// Interaction step collection
    Step,
    /// Page (screen) object
    Page,
}

/// How instances of a category are built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// Constructed directly
    Common,
    /// Constructed, then awaited until ready
    Awaited,
}

/// Per-category construction policy
#[derive(Debug)]
pub struct CategoryPolicy {
    /// Category this policy describes
    pub category: Category,
    /// Suffix joined to symbolic names (`login` -> `login_page`)
    pub suffix: &'static str,
    /// Construction strategy
    pub object_type: ObjectType,
    /// Whether a `page` reference becomes the first argument
    pub injects_page: bool,
}

static POLICIES: [CategoryPolicy; 3] = [
    CategoryPolicy {
        category: Category::Group,
        suffix: "group",
        object_type: ObjectType::Common,
        injects_page: false,
    },
    CategoryPolicy {
        category: Category::Step,
        suffix: "step",
        object_type: ObjectType::Common,
        injects_page: true,
    },
    CategoryPolicy {
        category: Category::Page,
        suffix: "page",
        object_type: ObjectType::Awaited,
        injects_page: false,
    },
];

impl Category {
    /// All categories
    pub const ALL: [Self; 3] = [Self::Group, Self::Step, Self::Page];

    /// Policy row for this category
    #[must_use]
    pub fn policy(self) -> &'static CategoryPolicy {
        &POLICIES[self as usize]
    }

    /// Naming suffix
    #[must_use]
    pub fn suffix(self) -> &'static str {
        self.policy().suffix
    }

    /// Construction strategy
    #[must_use]
    pub fn object_type(self) -> ObjectType {
        self.policy().object_type
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

impl CategoryPolicy {
    /// Shape the caller's arguments before construction.
    ///
    /// Only policies that inject a page use `page`; everyone else gets the
    /// arguments back untouched.
    #[must_use]
    pub fn format_args(&self, mut args: Args, page: Option<Instance>) -> Args {
        if self.injects_page {
            if let Some(page) = page {
                args.prepend(Arg::Object(page));
            }
        }
        args
    }

    /// Build an instance of `class` according to this policy.
    pub fn construct(
        &self,
        class: &ObjectClass,
        args: &Args,
        readiness: &dyn Readiness,
        options: &WaitOptions,
    ) -> InstanceResult<Instance> {
        let instance = class.construct(args)?;
        if self.object_type == ObjectType::Common {
            return Ok(instance);
        }

        let page = instance
            .as_page()
            .ok_or_else(|| InstanceError::Construction {
                class: class.identifier().to_string(),
                source: ConstructionError::new("awaited objects must implement PageObject"),
            })?;
        let options = page.wait_options(options);
        let waited = readiness
            .await_ready(page, &options)
            .map_err(|timeout| InstanceError::ReadinessTimeout {
                class: class.identifier().to_string(),
                timeout_ms: timeout.timeout_ms,
                message: timeout.message,
            })?;
        tracing::debug!(
            class = class.identifier(),
            waited_ms = waited.elapsed.as_millis() as u64,
            "page ready"
        );
        Ok(instance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::page_object::PageObject;
    use crate::registry::ObjectRegistry;
    use crate::wait::{WaitResult, WaitTimeout};
    use std::cell::Cell;
    use std::time::Duration;

    #[derive(Debug)]
    struct HomePage;

    impl PageObject for HomePage {}

    #[derive(Debug)]
    struct LoginGroup;

    fn counting(calls: &Cell<u32>) -> impl Readiness + '_ {
        move |_: &dyn PageObject, _: &WaitOptions| -> Result<WaitResult, WaitTimeout> {
            calls.set(calls.get() + 1);
            Ok(WaitResult::new(Duration::ZERO, "stub"))
        }
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_policy_rows_match_category() {
            for category in Category::ALL {
                assert_eq!(category.policy().category, category);
            }
        }

        #[test]
        fn test_object_types() {
            assert_eq!(Category::Group.object_type(), ObjectType::Common);
            assert_eq!(Category::Step.object_type(), ObjectType::Common);
            assert_eq!(Category::Page.object_type(), ObjectType::Awaited);
        }

        #[test]
        fn test_display_and_serde() {
            assert_eq!(Category::Page.to_string(), "page");
            assert_eq!(Category::Group.to_string(), "group");
            let parsed: Category = serde_json::from_str("\"step\"").unwrap();
            assert_eq!(parsed, Category::Step);
        }
    }

    mod format_args_tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn test_step_injects_page_first() {
            let page = Instance::page("HomePage", HomePage);
            let args = Args::new().with(1).with(2);
            let formatted = Category::Step
                .policy()
                .format_args(args, Some(page.clone()));
            assert_eq!(formatted.len(), 3);
            assert!(formatted.object(0).unwrap().ptr_eq(&page));
            assert_eq!(formatted.value(1), Some(&json!(1)));
        }

        #[test]
        fn test_step_without_page_unchanged() {
            let formatted = Category::Step
                .policy()
                .format_args(Args::new().with(1), None);
            assert_eq!(formatted.len(), 1);
        }

        #[test]
        fn test_group_and_page_pass_through() {
            for category in [Category::Group, Category::Page] {
                let page = Instance::page("HomePage", HomePage);
                let formatted = category
                    .policy()
                    .format_args(Args::new().with("x"), Some(page));
                assert_eq!(formatted.len(), 1);
                assert_eq!(formatted.value(0), Some(&json!("x")));
            }
        }
    }

    mod construct_tests {
        use super::*;

        #[test]
        fn test_common_never_awaits() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_group(|_| Ok(LoginGroup));
            let calls = Cell::new(0);
            let readiness = counting(&calls);
            let instance = Category::Group
                .policy()
                .construct(&class, &Args::new(), &readiness, &WaitOptions::new())
                .unwrap();
            assert!(instance.is::<LoginGroup>());
            assert_eq!(calls.get(), 0);
        }

        #[test]
        fn test_awaited_always_awaits() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_page(|_| Ok(HomePage));
            let calls = Cell::new(0);
            let readiness = counting(&calls);
            let instance = Category::Page
                .policy()
                .construct(&class, &Args::new(), &readiness, &WaitOptions::new())
                .unwrap();
            assert!(instance.is::<HomePage>());
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_timeout_is_surfaced() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_page(|_| Ok(HomePage));
            let readiness = |_: &dyn PageObject, opts: &WaitOptions| -> Result<WaitResult, WaitTimeout> {
                Err(WaitTimeout::for_options(opts, "HomePage"))
            };
            let err = Category::Page
                .policy()
                .construct(
                    &class,
                    &Args::new(),
                    &readiness,
                    &WaitOptions::new().with_timeout(75),
                )
                .unwrap_err();
            match err {
                InstanceError::ReadinessTimeout {
                    class, timeout_ms, ..
                } => {
                    assert_eq!(class, "HomePage");
                    assert_eq!(timeout_ms, 75);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_awaited_requires_page_object() {
            let mut registry = ObjectRegistry::new();
            let class = registry.register_group_as("OddPage", |_| Ok(LoginGroup));
            let calls = Cell::new(0);
            let readiness = counting(&calls);
            let err = Category::Page
                .policy()
                .construct(&class, &Args::new(), &readiness, &WaitOptions::new())
                .unwrap_err();
            assert!(err.is_construction());
            assert_eq!(calls.get(), 0);
        }
    }
}
