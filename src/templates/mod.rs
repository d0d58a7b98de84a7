//! HTML templates and styling for the STUDYSync page.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants and theme definitions
//! - `components` - Escaping helpers and the base document
//! - `page` - The single page and its script

mod components;
mod page;
mod styles;

pub use components::{base_html, html_escape, script_json};
pub use page::render_page;
pub use styles::STYLE;
