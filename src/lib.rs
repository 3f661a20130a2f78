//! Deckwright - slide deck composition with native and portable rendering
//!
//! Turns structured slide content into a finished `.pptx` deck. A theme is
//! picked once per run, each slide is laid out on a 12-column grid and any
//! diagram is synthesized into a backend-neutral geometry plan. Rendering goes
//! through an installed presentation application when one answers the
//! handshake, and through a self-contained OOXML writer otherwise.
//!
//! # Modules
//!
//! - [`design`]: colors, palettes, themes and theme selection
//! - [`layout`]: grid, regions and typography
//! - [`diagram`]: archetype classification and geometry synthesis
//! - [`render`]: the backend trait, both backends and the selecting factory
//! - [`compose`]: slide composition, outline parsing and the deck session
//! - [`config`]: YAML configuration
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use deckwright::compose::{CancelFlag, DeckBuilder, SlideKind, SlideSpec};
//! use deckwright::config::DeckConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let slides = vec![
//!     SlideSpec::new(SlideKind::Title, "Quarterly Review").with_subtitle("Platform team"),
//!     SlideSpec::new(SlideKind::Roadmap, "Next Steps").with_bullets(["Design", "Build", "Ship"]),
//! ];
//!
//! let session = DeckBuilder::from_config(DeckConfig::default(), "platform roadmap", &[".rs"])?
//!     .with_title("Quarterly Review")
//!     .select_backend()?;
//! let path = session.render_deck(&slides, Path::new("review.pptx"), &CancelFlag::new())?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod compose;
pub mod config;
pub mod design;
pub mod diagram;
pub mod error;
pub mod layout;
pub mod logging;
pub mod render;

pub use error::{Error, Result};
