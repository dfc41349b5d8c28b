//! Terminal front end: reads input lines, runs effects, renders the view model.
mod app;
mod config;
mod effects;
mod input;
mod ui;

pub use app::run_app;
