pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod entity;
pub mod logging;
pub mod mvi;
pub mod notify;
pub mod store;
pub mod teardown;
