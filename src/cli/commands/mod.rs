pub mod mirror;
pub mod upload;
