//! Output generation.
//!
//! The figure itself and an optional JSON summary of the same data.

pub mod plot;
pub mod summary;

pub use plot::{render_plot, RenderStyle};
pub use summary::{write_json_summary, RunSummary};
