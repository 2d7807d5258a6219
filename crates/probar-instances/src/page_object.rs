//! Page Object Model Support
//!
//! Pages are the only category whose construction is wrapped in a readiness
//! wait. A registered page type implements [`PageObject`] so the readiness
//! capability can ask whether the screen behind it is interactive.
//!
//! ## Toyota Way Application:
//! - **Poka-Yoke**: Only [`PageObject`] types can be registered as pages
//! - **Jidoka**: Pages that never become ready stop the test immediately

use crate::wait::WaitOptions;
use std::any::Any;

/// Trait for page objects representing a screen in the UI.
///
/// # Example
///
/// ```
/// use probar_instances::PageObject;
///
/// #[derive(Debug)]
/// struct LoginPage {
///     rendered: bool,
/// }
///
/// impl PageObject for LoginPage {
///     fn is_loaded(&self) -> bool {
///         self.rendered
///     }
/// }
///
/// let page = LoginPage { rendered: true };
/// assert!(page.is_loaded());
/// assert!(page.page_name().ends_with("LoginPage"));
/// ```
pub trait PageObject: Any {
    /// Check if the page is fully loaded and ready for interaction
    fn is_loaded(&self) -> bool {
        true
    }

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Wait options used when awaiting this page.
    ///
    /// Defaults to the context-wide options; override for screens that are
    /// known to load slower or faster than the rest of the application.
    fn wait_options(&self, defaults: &WaitOptions) -> WaitOptions {
        defaults.clone()
    }
}
