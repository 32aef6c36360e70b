pub mod principal;

pub use principal::{principal_middleware, Principal};
