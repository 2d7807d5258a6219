//! End-to-end resolution scenarios against a small calculator app model.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use probar_instances::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct LoginGroup {
    attempts: Cell<u32>,
}

impl LoginGroup {
    fn sign_in(&self) -> u32 {
        self.attempts.set(self.attempts.get() + 1);
        self.attempts.get()
    }
}

#[derive(Debug)]
struct HomePage {
    checks: Cell<u32>,
    clicked: Cell<bool>,
}

impl HomePage {
    fn click_element(&self) -> bool {
        self.clicked.set(true);
        true
    }
}

impl PageObject for HomePage {
    fn is_loaded(&self) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.checks.get() >= 2
    }
}

#[derive(Debug)]
struct CalculatorStep {
    page: Option<Rc<HomePage>>,
}

impl CalculatorStep {
    fn compute(&self, a: i64, b: i64) -> i64 {
        a + b
    }
}

#[derive(Debug)]
struct NeverReadyPage;

impl PageObject for NeverReadyPage {
    fn is_loaded(&self) -> bool {
        false
    }
}

fn registry() -> Arc<ObjectRegistry> {
    let mut registry = ObjectRegistry::new();
    let _ = registry.register_group(|_| {
        Ok(LoginGroup {
            attempts: Cell::new(0),
        })
    });
    let _ = registry.register_page(|_| {
        Ok(HomePage {
            checks: Cell::new(0),
            clicked: Cell::new(false),
        })
    });
    let _ = registry.register_page(|_| Ok(NeverReadyPage));
    let _ = registry.register_step(|args| {
        Ok(CalculatorStep {
            page: args.cast::<HomePage>(0).ok(),
        })
    });
    Arc::new(registry)
}

fn fast_context() -> Context {
    Context::builder(registry())
        .wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(1))
        .build()
}

#[test]
fn groups_login_twice_is_the_same_object() {
    let mut ctx = fast_context();
    let first = ctx.groups("login", ()).unwrap();
    let second = ctx.groups("login", ()).unwrap();
    assert!(first.ptr_eq(&second));

    let group = second.cast::<LoginGroup>().unwrap();
    assert_eq!(group.sign_in(), 1);
    assert_eq!(first.cast::<LoginGroup>().unwrap().sign_in(), 2);
}

#[test]
fn steps_with_page_builds_step_around_home_page() {
    let mut ctx = fast_context();
    let step = ctx
        .steps("calculator", Args::new().on_page("home"))
        .unwrap();
    let home = ctx.pages("home", ()).unwrap();

    let page = step.cast::<CalculatorStep>().unwrap().page.clone().unwrap();
    assert!(Rc::ptr_eq(&page, &home.cast::<HomePage>().unwrap()));
    assert_eq!(ctx.accessors(), vec!["calculator_step", "home_page"]);
}

#[test]
fn pages_home_then_click_element() {
    let mut ctx = fast_context();
    let clicked = ctx
        .pages_with("home", (), |page: &HomePage| page.click_element())
        .unwrap();
    assert!(clicked);

    let home = ctx.pages("home", ()).unwrap();
    let page = home.cast::<HomePage>().unwrap();
    assert!(page.clicked.get());
    assert!(page.checks.get() >= 2);
}

#[test]
fn steps_calculator_block_returns_block_value() {
    let mut ctx = fast_context();
    let sum = ctx
        .steps_with("calculator", (), |step: &CalculatorStep| step.compute(1, 2))
        .unwrap();
    assert_eq!(sum, 3);

    let invoked = ctx
        .invoke(
            "calculator",
            Category::Step,
            Args::new(),
            Some(|instance: &Instance| instance.class_name().to_string()),
        )
        .unwrap();
    assert_eq!(invoked.into_value().as_deref(), Some("CalculatorStep"));
}

#[test]
fn unknown_names_install_nothing() {
    let mut ctx = fast_context();
    for category in Category::ALL {
        let err = ctx.resolve("unknown", category, Args::new()).unwrap_err();
        assert!(err.is_resolution());
        assert!(err.to_string().contains("Unknown"));
    }
    assert!(ctx.accessors().is_empty());
}

#[test]
fn page_that_never_loads_times_out_with_configured_message() {
    let mut ctx = Context::builder(registry())
        .wait_options(
            WaitOptions::new()
                .with_timeout(20)
                .with_poll_interval(1)
                .with_timeout_message("app never became ready"),
        )
        .build();

    let err = ctx.pages("never_ready", ()).unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("app never became ready"));
    assert!(ctx.responds_to("never_ready_page"));
    assert!(ctx.cached("never_ready_page").is_none());
}

#[test]
fn only_pages_consult_readiness() {
    let calls = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&calls);
    let mut ctx = Context::builder(registry())
        .readiness(
            move |_: &dyn PageObject, _: &WaitOptions| -> Result<WaitResult, WaitTimeout> {
                counter.set(counter.get() + 1);
                Ok(WaitResult::new(Duration::ZERO, "stub"))
            },
        )
        .build();

    let _ = ctx.groups("login", ()).unwrap();
    let _ = ctx.steps("calculator", ()).unwrap();
    assert_eq!(calls.get(), 0);

    let _ = ctx.pages("home", ()).unwrap();
    let _ = ctx.pages("home", ()).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn config_file_drives_readiness() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instances.yaml");
    std::fs::write(&path, "wait:\n  timeout_ms: 15\n  poll_interval_ms: 1\n").unwrap();

    let config = InstancesConfig::from_file(&path).unwrap();
    let mut ctx = Context::builder(registry()).config(config).build();
    let started = std::time::Instant::now();
    let err = ctx.pages("never_ready", ()).unwrap_err();
    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(5));
}
