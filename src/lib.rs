// src/lib.rs
pub mod code_tables;
pub mod composite_keys;
pub mod config;
pub mod errors;
pub mod locale;
pub mod mapping;
pub mod models;
pub mod pipeline;
pub mod reference;
pub mod utils;
pub mod xml;
