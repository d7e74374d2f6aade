// Application layer - Orchestration of polling, persistence and panel transitions
pub mod drag_controller;
pub mod metrics_source;
pub mod panel_controller;
pub mod poll_scheduler;
pub mod state_store;
