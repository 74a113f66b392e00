//! egui rendering of the layout and the current view.

pub mod panels;
pub mod plot;
