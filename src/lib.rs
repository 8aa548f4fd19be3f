pub mod dashboard;
pub mod feeds;
pub mod logging;
pub mod settings;
pub mod storage;

pub use dashboard::{DashboardStore, StoreState};
pub use settings::Settings;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
