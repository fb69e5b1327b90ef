//! Entity model for the media catalog: plain serializable structs, the
//! shared [`CatalogItem`] contract, and the query conventions (sorting,
//! paging, filters) every backend honors.

pub mod album;
pub mod artist;
pub mod bookmark;
pub mod dummy;
pub mod error;
pub mod extensions;
pub mod flags;
pub mod folder;
pub mod genre;
pub mod history;
pub mod item;
pub mod media;
pub mod paging;
pub mod playlist;
pub mod search;
pub mod sort;
pub mod storage;
pub mod subscription;
pub mod video_group;

pub use album::Album;
pub use artist::Artist;
pub use bookmark::Bookmark;
pub use dummy::DummyItem;
pub use error::{ModelError, Result};
pub use flags::StateFlags;
pub use folder::Folder;
pub use genre::Genre;
pub use history::{HistoryEntry, HistoryKind};
pub use item::{CatalogItem, ItemType};
pub use media::{Media, MediaKind, Slave, SlaveKind};
pub use paging::{MediaFilter, Paging};
pub use playlist::Playlist;
pub use search::SearchAggregate;
pub use sort::{Sort, SortKey};
pub use storage::Storage;
pub use subscription::{Service, ServiceKind, Subscription};
pub use video_group::VideoGroup;
