pub mod error;
pub mod format;
pub mod html;

pub use error::ReportError;
pub use html::{render_html, write_report, ReportOptions};
