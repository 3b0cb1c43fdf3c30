pub mod listing;
pub mod media;

pub use listing::{Room, RoomAttrs, RoomDraft, RoomKind, RoomView};
pub use media::{MediaAsset, MediaCollection, MediaView, NewMediaAsset};
