//! Probar Instances: Page-Object Resolution for Probar Tests
//!
//! Tests reference their collaborators by short symbolic names. A name is
//! resolved in one of three categories, turned into a class, built once per
//! test context and reused afterwards.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 PROBAR Instance Resolution                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ "calc"     │    │ Resolver   │    │ Registry   │            │
//! │   │ + category │───►│ calc_step  │───►│ CalcStep   │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             │                   │
//! │   ┌────────────┐    ┌────────────┐    ┌─────▼──────┐            │
//! │   │ Block /    │◄───│ Instance   │◄───│ Category   │            │
//! │   │ Chaining   │    │ Cache      │    │ Policy     │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Category | Accessor suffix | Construction | Page injection |
//! |----------|-----------------|--------------|----------------|
//! | Group    | `_group`        | common       | no             |
//! | Step     | `_step`         | common       | yes            |
//! | Page     | `_page`         | awaited      | no             |
//!
//! # Example
//!
//! ```
//! use probar_instances::prelude::*;
//! use std::sync::Arc;
//!
//! struct LoginGroup;
//!
//! let mut registry = ObjectRegistry::new();
//! registry.register_group(|_| Ok(LoginGroup));
//!
//! let mut ctx = Context::new(Arc::new(registry));
//! let first = ctx.groups("login", ()).unwrap();
//! let second = ctx.groups("login", ()).unwrap();
//! assert!(first.ptr_eq(&second));
//! assert!(ctx.responds_to("login_group"));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod args;
#[allow(clippy::missing_errors_doc)]
mod cache;
mod category;
#[allow(clippy::missing_errors_doc)]
mod config;
#[allow(clippy::missing_errors_doc)]
mod context;
mod instance;
mod interaction;
mod page_object;
#[allow(clippy::missing_errors_doc)]
mod registry;
#[allow(clippy::missing_errors_doc)]
mod resolver;
mod result;
mod wait;

/// Tracing subscriber setup for test binaries
pub mod tracing_support;

pub use args::{Arg, Args};
pub use cache::{Binding, CacheStats, InstanceCache, ReuseExisting, ValidationRule};
pub use category::{Category, CategoryPolicy, ObjectType};
pub use config::{InstancesConfig, ENV_WAIT_POLL_MS, ENV_WAIT_TIMEOUT_MS};
pub use context::{Context, ContextBuilder};
pub use instance::Instance;
pub use interaction::{invoke, scoped, Invoked};
pub use page_object::PageObject;
pub use registry::{ClassRef, Constructor, ObjectClass, ObjectRegistry};
pub use resolver::{resolve, AccessorName, Resolution};
pub use result::{ConstructionError, InstanceError, InstanceResult};
#[cfg(not(target_arch = "wasm32"))]
pub use tracing_support::init_tracing;
pub use tracing_support::TracingFormat;
pub use wait::{
    PollingReadiness, Readiness, WaitOptions, WaitResult, WaitTimeout, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::args::*;
    pub use super::cache::{ReuseExisting, ValidationRule};
    pub use super::category::Category;
    pub use super::config::InstancesConfig;
    pub use super::context::*;
    pub use super::instance::Instance;
    pub use super::interaction::Invoked;
    pub use super::page_object::PageObject;
    pub use super::registry::ObjectRegistry;
    pub use super::result::*;
    pub use super::wait::{PollingReadiness, Readiness, WaitOptions, WaitResult, WaitTimeout};
}
