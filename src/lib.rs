pub mod banner;
pub mod cases;
pub mod classify;
pub mod client;
pub mod commands;
pub mod consts;
pub mod events;
pub mod files;
pub mod input;
pub mod keymap;
pub mod languages;
pub mod layout;
pub mod report;
pub mod session;
pub mod settings;
pub mod spinner;
pub mod store;
