pub mod commands;
pub mod config;
pub mod markov;
pub mod session;
pub mod store;
