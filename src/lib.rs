pub mod bias;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod figure;
pub mod filter;
pub mod logging;
pub mod page;
pub mod server;
pub mod states;
