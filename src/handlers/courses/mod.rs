pub mod create;
pub mod get;
pub mod list;
pub mod recent;
pub mod update;
pub mod upload_url;
pub mod utils;

// Re-export handler functions for use in routing
pub use create::create;
pub use get::get;
pub use list::list;
pub use recent::recent;
pub use update::update;
pub use upload_url::upload_url;
