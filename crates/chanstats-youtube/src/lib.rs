pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use normalize::normalize_video;
pub use types::{VideoItem, VideoSnippet, VideoStatistics};
