pub mod browser;
pub mod command;
pub mod console;
pub mod error;
pub mod file_info;
pub mod menu;
pub mod messenger;
pub mod server;
pub mod transfer;
