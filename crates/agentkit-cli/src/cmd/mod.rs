pub mod agent;
pub mod catalog;
pub mod config;
pub mod init;
