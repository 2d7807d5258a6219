//! Example: Resolving Groups, Steps and Pages
//!
//! Demonstrates: symbolic lookup, page injection and per-context caching
//!
//! Run with: `cargo run --example calculator_steps`
//!
//! Toyota Way: Muda (Waste Elimination) - Each object is built once per test

use probar_instances::prelude::*;
use probar_instances::{init_tracing, TracingFormat};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

struct LoginGroup {
    user: String,
}

struct HomePage {
    polls: Cell<u32>,
}

impl HomePage {
    fn click_element(&self, id: &str) {
        println!("   clicked #{id}");
    }
}

impl PageObject for HomePage {
    fn is_loaded(&self) -> bool {
        self.polls.set(self.polls.get() + 1);
        self.polls.get() > 3
    }
}

struct CalculatorStep {
    home: Option<Rc<HomePage>>,
}

impl CalculatorStep {
    fn compute(&self, a: i64, b: i64) -> i64 {
        if let Some(home) = &self.home {
            home.click_element("equals");
        }
        a + b
    }
}

fn main() -> InstanceResult<()> {
    let _ = init_tracing("probar_instances=debug", TracingFormat::Pretty);
    println!("=== Instance Resolution Example ===\n");

    // 1. Register classes once per suite
    println!("1. Registering classes...");
    let mut registry = ObjectRegistry::new();
    let _ = registry.register_group(|args| {
        Ok(LoginGroup {
            user: args.parse(0).unwrap_or_else(|_| "guest".to_string()),
        })
    });
    let _ = registry.register_page(|_| {
        Ok(HomePage {
            polls: Cell::new(0),
        })
    });
    let _ = registry.register_step(|args| {
        Ok(CalculatorStep {
            home: args.cast::<HomePage>(0).ok(),
        })
    });
    for category in Category::ALL {
        println!("   {category}: {:?}", registry.classes(category));
    }

    // 2. One context per test
    let config = InstancesConfig::new()
        .with_wait(WaitOptions::new().with_timeout(1_000).with_poll_interval(5))
        .with_env_overrides();
    let mut ctx = Context::builder(Arc::new(registry)).config(config).build();
    println!("\n2. Context {}", ctx.id());

    // 3. Groups are plain and cached
    println!("\n3. Resolving groups...");
    let user = ctx.groups_with("login", Args::new().with("ana"), |group: &LoginGroup| {
        group.user.clone()
    })?;
    let again = ctx.groups("login", Args::new().with("bob"))?;
    println!("   login_group user: {user}");
    println!(
        "   second call reuses it: {}",
        again.cast::<LoginGroup>()?.user == user
    );

    // 4. Steps receive their page
    println!("\n4. Resolving a step on the home page...");
    let sum = ctx.steps_with(
        "calculator",
        Args::new().on_page("home"),
        |step: &CalculatorStep| step.compute(1, 2),
    )?;
    println!("   compute(1, 2) = {sum}");

    // 5. Pages are awaited once
    println!("\n5. Resolving the home page...");
    ctx.pages_with("home", (), |page: &HomePage| page.click_element("menu"))?;
    println!("   accessors: {:?}", ctx.accessors());

    // 6. Unknown names fail without side effects
    println!("\n6. Resolving an unknown page...");
    match ctx.pages("settings", ()) {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   {e}"),
    }

    let stats = ctx.stats();
    println!(
        "\nBuilt {} objects, {} cache hits across {} accessors",
        stats.builds, stats.hits, stats.accessors
    );
    Ok(())
}
