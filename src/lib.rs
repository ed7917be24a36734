// Public library interface for pressure
// A geometry-only layout pass: hosts register sized elements, call
// `optimize()`, and read back one box per element.

pub mod error;
pub mod layout;
pub mod pack;

pub use error::{Axis, LayoutError, Result};
pub use layout::config::{LayoutConfig, PHI};
pub use layout::element::{Block, Element};
pub use layout::rect::LayoutRect;
pub use layout::{Layout, LayoutChild};
pub use pack::{optimize, optimize_all, optimize_with_stats, PackStats};
