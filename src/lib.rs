pub mod alert;
pub mod api;
pub mod app;
pub mod config;
pub mod display;
pub mod events;
pub mod report;
pub mod scale;
pub mod scheduler;
pub mod state;
pub mod translate;
pub mod ui;
