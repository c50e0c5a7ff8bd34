//! CLI handlers, one per top-level action.

pub mod cases;
pub mod languages;
pub mod run;
