pub mod account;
pub mod fallback;
pub mod project;
