// Store simulation viewer
pub mod app;
pub mod config;
pub mod control;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod snapshot;
pub mod state;
pub mod transport;
