pub mod agent;
pub mod config;
pub mod generate;
pub mod project;
pub mod template;
