pub mod api;
pub mod console;
pub mod core;
