//! UI widgets
//!
//! The interactive booth canvas lives here. Everything else in the UI is
//! stock iced widgets assembled in main.rs.

pub mod canvas;
