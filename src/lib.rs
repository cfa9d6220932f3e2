pub mod archive;
pub mod build;
pub mod cli;
pub mod config;
pub mod pack;
pub mod pattern;
pub mod platform;
pub mod walk;
