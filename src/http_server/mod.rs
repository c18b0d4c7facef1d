pub mod app;
pub mod error;
pub mod flash;
mod routes;
pub mod state;
mod views;
