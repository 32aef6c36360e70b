pub mod fetcher;
pub mod mirror;
pub mod normalize;

pub use fetcher::{ContentSource, FetchError, GithubClient};
pub use mirror::{MirrorBuilder, MirrorNode, MirrorTree};
pub use normalize::{normalize_name, normalize_path};
