// handlers/mod.rs - HTTP handlers
//
// Every course route runs behind the principal middleware, which turns the
// gateway-injected identity header into an `Extension<Principal>`.
pub mod courses;
