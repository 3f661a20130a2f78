//! Slide composition and the deck session built on top of it.

pub mod composer;
pub mod outline;
pub mod session;

pub use composer::{MAX_BULLET_LEN, MAX_BULLETS, PreparedSlide, SlideComposer, SlideKind, SlideSpec, default_intent};
pub use outline::{OutlineSlide, parse_outline};
pub use session::{CancelFlag, DeckBuilder, DeckSession, SessionPhase};
