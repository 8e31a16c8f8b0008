//! Path and naming helpers shared by the pipeline

pub mod formatting;
pub mod paths;

pub use formatting::{create_export_name, format_vue_binding_name};
pub use paths::{format_import_string, relative_path, relativeify, to_relative_unix_style};
