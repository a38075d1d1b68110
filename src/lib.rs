// src/lib.rs

pub mod chart;
pub mod config;
pub mod sheets;
