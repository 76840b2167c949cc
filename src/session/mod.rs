//! Controllable browser session
//!
//! Variant prices are only revealed by client-side interaction: selecting an
//! option in the detail page's option control swaps the displayed price
//! without a page reload. The [`ControlSession`] trait is the seam between
//! the variant resolver and the browser driving that interaction; the
//! production implementation is a headless Chromium instance.
//!
//! Exactly one session exists per crawl run. It is owned by the orchestrator
//! and passed by reference into variant resolution, never held in global
//! state, and every resolution uses it serially.

mod chromium;

pub use chromium::ChromiumSession;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the interactive browser session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Option control not found: {selector}")]
    MissingControl { selector: String },

    #[error("No node matched {selector} in the live page")]
    MissingNode { selector: String },

    #[error("Node {selector} has no {name} attribute")]
    MissingAttribute { selector: String, name: String },

    #[error("Browser protocol error: {0}")]
    Protocol(#[from] chromiumoxide::error::CdpError),
}

/// One entry of an option control, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    /// The option's `value` identifier
    pub value: String,

    /// Whether the option is marked disabled (not selectable)
    pub disabled: bool,
}

/// An interactive, stateful handle on a rendered page
///
/// All operations act on the session's current page; `navigate` replaces it.
/// Implementations are driven strictly serially, so methods take `&mut self`.
#[async_trait]
pub trait ControlSession: Send {
    /// Navigates the session to the given absolute URL
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// Enumerates the entries of the option control matching `control`,
    /// in document order
    ///
    /// Fails with [`SessionError::MissingControl`] when no control matches.
    async fn find_options(&mut self, control: &str) -> Result<Vec<OptionEntry>, SessionError>;

    /// Activates the option with the given value inside `control`
    async fn select_option(&mut self, control: &str, value: &str) -> Result<(), SessionError>;

    /// Reads the text content of the first node matching `selector`
    async fn text_of(&mut self, selector: &str) -> Result<String, SessionError>;

    /// Releases the session and its underlying browser resources
    ///
    /// Called on every crawl exit path, including failure.
    async fn close(&mut self) -> Result<(), SessionError>;
}
