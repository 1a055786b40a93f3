// Library exports for the registration harness
// The binary and the integration tests both drive scenarios through these modules

pub mod api;
pub mod assertions;
pub mod commands;
pub mod config;
pub mod models;
pub mod stub;
