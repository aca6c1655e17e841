pub mod snapshot;

// 匯出快照存放功能
pub use snapshot::{SnapshotKind, SnapshotStore};
