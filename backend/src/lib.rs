// Crate root for the HandDrive controller service.

pub mod app;
pub mod config;
pub mod constants;
pub mod http;
pub mod model;
pub mod sensor;
pub mod store;
pub mod tasks;
pub mod transport;
pub mod utils;
pub mod ws;
