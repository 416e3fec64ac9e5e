pub mod app_error;
pub mod health;
pub mod query;
pub mod resources;
pub mod server;
pub mod state;
