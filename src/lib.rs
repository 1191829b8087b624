pub mod cache;
pub mod client;
pub mod config;
pub mod flows;
pub mod gateway;
pub mod notice;
pub mod schema;
pub mod setup;
pub mod shared;
