//! Embedded package data.

/// Default cover-page template, used when the config does not point at a
/// template file of its own.
pub const DEFAULT_TEMPLATE: &str = include_str!("assets/template.typ");
