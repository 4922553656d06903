pub mod admin;
pub mod json;
pub mod path;
pub mod query;
