pub mod categorize;
pub mod cli;
pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod storage;
