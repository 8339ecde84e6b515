// Shared control mapping logic: configuration, range mapping, translation, and sensor frame decoding.

pub mod config;
pub mod mapping;
pub mod model;
pub mod parser;
pub mod translator;
