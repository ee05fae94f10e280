//! Pointer gesture handling
//!
//! Translates raw pointer input into placement updates for one entity at
//! a time. The controller is pure math over `Placement`; it never touches
//! the store or any UI type, which keeps every gesture property testable
//! headless.

pub mod controller;

pub use controller::GestureController;
