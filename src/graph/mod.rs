//! Knowledge graph layout and auto-linking
//!
//! This module provides:
//! - Force-directed layout over topic and card nodes
//! - Camera transforms, hit-testing and drag/zoom interaction
//! - Frame descriptions a host canvas replays
//! - Text-similarity auto-linking between cards

pub mod autolink;
pub mod config;
pub mod engine;
pub mod models;
pub mod render;

pub use config::LayoutConfig;
pub use engine::GraphLayoutEngine;
pub use models::*;
pub use render::{render_frame, Frame};
