pub mod backup;
pub mod config;
pub mod install;
pub mod menu;
pub mod preflight;
pub mod status;
pub mod uninstall;
