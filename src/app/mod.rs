pub mod render;

pub use render::{render_details, render_report, OutputFormat};
