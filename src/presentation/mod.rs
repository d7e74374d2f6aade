// Presentation layer - Terminal panel and console input
pub mod commands;
pub mod console;
pub mod keyboard;
pub mod terminal_surface;
