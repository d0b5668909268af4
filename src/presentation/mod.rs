// Presentation layer - Terminal session driving the controller
pub mod commands;
pub mod session;
