//! Procedural frame painting and animation pacing.
//!
//! Rendering here is deliberately dumb: a deterministic checkerboard,
//! painted pixel-by-pixel into a caller-provided byte slice. What matters
//! is the contract, not the picture: painting is a pure function of its
//! inputs, performs no allocation, and is driven by an [`AnimationState`]
//! whose scroll offset advances with compositor-reported frame times.

mod animation;
mod painter;

pub use animation::{AnimationState, DEFAULT_SCROLL_RATE};
pub use painter::{paint_checkerboard, CHECKER_DARK, CHECKER_LIGHT};
