pub mod admin;
pub mod cheater;
pub mod hash;
