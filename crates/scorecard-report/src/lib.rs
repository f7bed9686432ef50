//! Score card code generation.
//!
//! Every combined card is rendered into four text sections:
//!
//! - **Runtime logic**: fetch each variable, fall back to its spreadsheet method
//! - **Audit logging**: record each input on the application
//! - **Integration glue**: pass the inputs into the card and read its outputs
//! - **Report fields**: paths of the card's values in the application document

mod error;
mod options;
mod render;
mod report_fields;
mod templates;

pub use error::{RenderError, Result};
pub use options::{RenderOptions, ReportFieldsLayout, Section};
pub use render::{RenderedCard, render_all, render_card};
pub use report_fields::{ReportField, report_fields};
