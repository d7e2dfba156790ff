//! Text measurement and line wrapping for field content.
//!
//! Nothing in this crate knows about fonts or drawing surfaces. Width is
//! always supplied through a [`Measure`] implementation owned by whoever
//! paints; the terminal host measures in display columns via
//! [`DisplayWidth`], a pixel canvas would measure with its font metrics.

pub mod width;
pub mod wrap;

pub use width::{CharCount, DisplayWidth, Measure, display_width, egc_width};
pub use wrap::{WrapLines, wrap, wrap_lines};
