// Domain layer - Pure panel and metrics models
pub mod geometry;
pub mod metrics;
pub mod panel;
pub mod view;
