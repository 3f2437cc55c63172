pub mod cli;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod device;
pub mod logging;
pub mod provisioning;
pub mod registry;
