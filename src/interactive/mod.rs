//! Interactive visualization module for real-time field-of-view testing

mod viewer;

pub use viewer::{InteractiveViewer, ViewerConfig};
