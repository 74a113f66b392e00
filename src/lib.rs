//! Student performance dashboard.
//!
//! The dataset is loaded once at startup ([`data::loader::load_file`]), the
//! static page is described by [`layout::Layout`], and every selection change
//! goes through the pure [`view::render`] before being drawn by [`ui`].

pub mod app;
pub mod color;
pub mod data;
pub mod error;
pub mod layout;
pub mod state;
pub mod stats;
pub mod ui;
pub mod view;
