pub mod check;
pub mod config;
pub mod holidays;
pub mod run;
pub mod settings;
pub mod skip;
mod wiring;
