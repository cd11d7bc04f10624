//! UI rendering module for citywx
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod city_list;
pub mod forecast;
pub mod help_overlay;

pub use city_list::render_city_list;
pub use forecast::render as render_forecast;
pub use help_overlay::render as render_help_overlay;
