//! LED remote control library
//!
//! Turns loosely-typed HTTP parameters into ambient light colors,
//! notification colors and preferences, persisted as flat status files for
//! the LED driver to pick up.

pub mod action;
pub mod color;
pub mod controller;
pub mod error;
pub mod notifications;
pub mod server;
pub mod status;

pub use action::interpret;
pub use action::Action;
pub use action::Params;
pub use color::apply_brightness;
pub use color::morph;
pub use color::Brightness;
pub use color::ColorCycle;
pub use color::Rgb;
pub use controller::Controller;
pub use controller::Outcome;
