pub mod auth;
pub mod cheater;
pub mod health;
