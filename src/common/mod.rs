//! Shared units, number formatting and text escaping used by layout and both
//! render backends.

pub mod num;
pub mod unit;
pub mod xml;

pub use num::{write_int, write_num};
pub use unit::{emu_to_pt, pt_to_emu};
