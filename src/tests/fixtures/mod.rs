pub mod catalog;
pub mod gateway;
pub mod identity;
pub mod signatures;
pub mod state;
pub mod tokens;
