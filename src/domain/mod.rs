// Domain layer - Views, slots and session state
pub mod error;
pub mod params;
pub mod payload;
pub mod ui_state;
pub mod view;
