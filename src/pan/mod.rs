// 115 cloud drive as a path-addressed filesystem

pub mod collector;
pub mod credentials;
pub mod errors;
pub mod lister;
pub mod locator;
pub mod models;
pub mod natsort;
pub mod quality;
pub mod resolver;
pub mod session;
pub mod sources;
pub mod traits;
pub mod utils;

#[cfg(test)]
pub(crate) mod mock;

pub use collector::StreamCollector;
pub use credentials::Credential;
pub use errors::{PanError, SessionError};
pub use lister::{SortedLister, SortedPage};
pub use locator::FileLocator;
pub use models::{
    DirectoryId, Endpoints, Entry, EntryKind, ListOptions, ListOrder, ListPage, PickCode, Quality,
    SessionConfig, StreamCandidate,
};
pub use quality::QualityRanker;
pub use resolver::PathResolver;
pub use session::Pan115Session;
pub use traits::{StorageSession, StreamSource};
