pub mod chat;
pub mod config;
pub mod draw;
pub mod serve;
