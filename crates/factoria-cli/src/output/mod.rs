//! Factory file rendering and writing.

mod render;
mod write;

pub use render::{factory_path, render_factory};
pub use write::{WriteOutcome, write_factory, write_json_atomic};
