//! Report output
//!
//! Completed analyses are rendered through the [`ReportRenderer`] trait. A
//! Markdown renderer is bundled; other formats plug in from outside.

mod markdown;
mod traits;

pub use markdown::{format_markdown_report, write_report, MarkdownRenderer};
pub use traits::{RenderError, RenderResult, ReportRenderer};
