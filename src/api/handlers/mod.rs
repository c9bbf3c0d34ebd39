pub mod display;
pub mod health;
pub mod types;
pub mod upload;
