pub mod app_settings;
pub mod network;
pub mod sources;
