// Library entry shared by the CLI in src/main.rs and the integration tests

#![allow(clippy::result_large_err)]

pub mod backends;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod player;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_utils;
