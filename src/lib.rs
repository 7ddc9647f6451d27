// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod core;
pub mod specs;

pub mod csv;
pub mod error;
pub mod lookup;
pub mod params;
pub mod runner;
pub mod stats;
pub mod store;
