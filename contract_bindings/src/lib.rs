pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod ethers_client;
pub mod read;
pub mod registry;
pub mod resolver;
pub mod tracker;
