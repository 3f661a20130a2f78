//! XML and script text helpers shared by both render backends.

mod escape;

pub use escape::{escape_ps_single_quoted, escape_xml};
