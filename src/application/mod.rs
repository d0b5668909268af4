// Application layer - Chart orchestration use cases
pub mod debounce;
pub mod dispatcher;
pub mod notifier;
pub mod param_resolver;
pub mod ports;
pub mod preferences;
pub mod renderer;
pub mod table_export;
pub mod ui_controller;
pub mod view_registry;

#[cfg(test)]
pub mod testing;
