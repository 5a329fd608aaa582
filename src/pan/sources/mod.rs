// Stream sources

pub mod direct;
pub mod hls;

pub use direct::SourceLink;
pub use hls::{parse_master_playlist, AdaptiveManifest};
