//! Error types for deck composition.
//!
//! Every fallible operation in the crate returns [`Result`]. Two recoverable
//! families carry their own structured enums: [`DiagramSpecError`] (content that
//! does not fit a diagram archetype) and [`HandshakeError`] (the native host could
//! not be reached). Both are downgraded at their boundaries: the synthesizer falls
//! back to a list diagram, the factory falls back to the portable backend.
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::diagram::Archetype;

/// Main error type for deck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A theme tag that maps to no known palette
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Diagram content violates an archetype's structural constraint
    #[error("Invalid diagram: {0}")]
    DiagramSpec(#[from] DiagramSpecError),

    /// Native automation host unavailable
    #[error("Backend handshake failed: {0}")]
    BackendHandshake(#[from] HandshakeError),

    /// Neither backend could be initialised
    #[error("No render backend available (native: {native}; portable: {portable})")]
    NoRenderBackend { native: String, portable: String },

    /// Palette or theme construction error
    #[error("Design error: {0}")]
    Design(String),

    /// Operation not valid in the current session phase
    #[error("Session error: {0}")]
    Session(String),

    /// Backend failed while drawing
    #[error("Render error: {0}")]
    Render(String),

    /// Render session aborted between slides
    #[error("Render session cancelled")]
    Cancelled,

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML generation error
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::Xml(e.to_string())
    }
}

/// Structural violations of a diagram archetype.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagramSpecError {
    #[error("{archetype} diagram requires at least one item")]
    Empty { archetype: Archetype },

    #[error("{archetype} diagram requires {expected} items, got {got}")]
    ItemCount {
        archetype: Archetype,
        expected: usize,
        got: usize,
    },

    #[error("{archetype} diagram supports at most {max} levels, got {got}")]
    TooManyLevels {
        archetype: Archetype,
        max: usize,
        got: usize,
    },

    #[error("unknown archetype tag: {0}")]
    UnknownArchetype(String),

    #[error("edge references unknown item {0:?}")]
    UnknownLabel(String),

    #[error("edge {from}->{to} is out of range for {len} items")]
    EdgeOutOfRange { from: usize, to: usize, len: usize },

    #[error("hierarchy node {0} has more than one parent")]
    MultipleParents(usize),

    #[error("{archetype} edges contain a cycle")]
    UnexpectedCycle { archetype: Archetype },

    #[error("{archetype} edges must form {expected}")]
    Shape {
        archetype: Archetype,
        expected: &'static str,
    },

    #[error("levels must have one entry per item and never decrease")]
    InvalidLevels,
}

/// Reasons the native automation host could not be brought up.
#[derive(Error, Debug)]
pub enum HandshakeError {
    #[error("native automation is not supported on {0}")]
    UnsupportedPlatform(&'static str),

    #[error("failed to start automation host: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("automation host did not answer within {0:?}")]
    Timeout(Duration),

    #[error("automation host refused the session: {0}")]
    Denied(String),

    #[error("another native render session is active")]
    SessionBusy,

    #[error("automation host exited unexpectedly")]
    Disconnected,
}

/// Result type for deck operations.
pub type Result<T> = std::result::Result<T, Error>;
