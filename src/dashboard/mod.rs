pub mod layout;
pub mod model;
pub mod persist;
pub mod state;
pub mod store;

pub use layout::{add_widget, check_layout_sync, remove_widget};
pub use model::{Dashboard, LayoutEntry, Theme, Widget, WidgetInfo, WidgetKind};
pub use persist::{hydrate, StoragePersister};
pub use state::StoreState;
pub use store::{reduce, Action, DashboardStore, StoreField, StoreListener};
