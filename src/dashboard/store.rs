use crate::dashboard::model::{Dashboard, LayoutEntry, Theme, Widget, WidgetInfo};
use crate::dashboard::persist::{hydrate, StoragePersister};
use crate::dashboard::state::StoreState;
use crate::storage::KeyValueStorage;

/// Identifies one field of [`StoreState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreField {
    ModalOpen,
    Widgets,
    Layouts,
    Board,
    LayoutChanged,
    Theme,
    ActiveDashboard,
    Dashboards,
}

impl StoreField {
    pub const ALL: [StoreField; 8] = [
        StoreField::ModalOpen,
        StoreField::Widgets,
        StoreField::Layouts,
        StoreField::Board,
        StoreField::LayoutChanged,
        StoreField::Theme,
        StoreField::ActiveDashboard,
        StoreField::Dashboards,
    ];
}

/// A single store mutation. Every action overwrites exactly one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetModalOpen(bool),
    SetWidgets(Vec<Widget>),
    SetLayouts(Vec<LayoutEntry>),
    SetBoard(Vec<WidgetInfo>),
    MarkLayoutChanged,
    SetTheme(Theme),
    SetActiveDashboard(String),
    SetDashboards(Vec<Dashboard>),
}

impl Action {
    pub fn field(&self) -> StoreField {
        match self {
            Action::SetModalOpen(_) => StoreField::ModalOpen,
            Action::SetWidgets(_) => StoreField::Widgets,
            Action::SetLayouts(_) => StoreField::Layouts,
            Action::SetBoard(_) => StoreField::Board,
            Action::MarkLayoutChanged => StoreField::LayoutChanged,
            Action::SetTheme(_) => StoreField::Theme,
            Action::SetActiveDashboard(_) => StoreField::ActiveDashboard,
            Action::SetDashboards(_) => StoreField::Dashboards,
        }
    }

    fn apply(self, state: &mut StoreState) {
        match self {
            Action::SetModalOpen(open) => state.modal_open = open,
            Action::SetWidgets(widgets) => state.widgets = widgets,
            Action::SetLayouts(layouts) => state.layouts = layouts,
            Action::SetBoard(board) => state.board = board,
            Action::MarkLayoutChanged => state.layout_changed = true,
            Action::SetTheme(theme) => state.theme = theme,
            Action::SetActiveDashboard(name) => state.active_dashboard = name,
            Action::SetDashboards(dashboards) => state.dashboards = dashboards,
        }
    }
}

/// Apply `action` to `state`, returning the new state.
pub fn reduce(mut state: StoreState, action: Action) -> StoreState {
    action.apply(&mut state);
    state
}

/// Notified after every dispatch with the field that was replaced.
pub trait StoreListener {
    fn on_change(&mut self, field: StoreField, state: &StoreState);
}

impl<F> StoreListener for F
where
    F: FnMut(StoreField, &StoreState),
{
    fn on_change(&mut self, field: StoreField, state: &StoreState) {
        self(field, state)
    }
}

/// Session state of the dashboard. Owned by the UI thread and passed by
/// reference to whatever needs it.
pub struct DashboardStore {
    state: StoreState,
    listeners: Vec<Box<dyn StoreListener>>,
}

impl DashboardStore {
    pub fn new(initial: StoreState) -> Self {
        Self {
            state: initial,
            listeners: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(StoreState::default())
    }

    /// Hydrate from `storage` and mirror every later change back into it.
    pub fn load<S>(storage: S) -> Self
    where
        S: KeyValueStorage + 'static,
    {
        let state = hydrate(&storage);
        let mut store = Self::new(state);
        store.subscribe(StoragePersister::new(storage));
        store
    }

    pub fn subscribe(&mut self, listener: impl StoreListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let field = action.field();
        action.apply(&mut self.state);
        tracing::debug!(?field, "dashboard state updated");
        for listener in &mut self.listeners {
            listener.on_change(field, &self.state);
        }
    }

    pub fn set_modal_open(&mut self, open: bool) {
        self.dispatch(Action::SetModalOpen(open));
    }

    pub fn set_widgets(&mut self, widgets: Vec<Widget>) {
        self.dispatch(Action::SetWidgets(widgets));
    }

    pub fn set_layouts(&mut self, layouts: Vec<LayoutEntry>) {
        self.dispatch(Action::SetLayouts(layouts));
    }

    pub fn set_board(&mut self, board: Vec<WidgetInfo>) {
        self.dispatch(Action::SetBoard(board));
    }

    /// Latch `layout_changed`. Nothing clears it again.
    pub fn mark_layout_changed(&mut self) {
        self.dispatch(Action::MarkLayoutChanged);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.dispatch(Action::SetTheme(theme));
    }

    pub fn set_active_dashboard(&mut self, name: impl Into<String>) {
        self.dispatch(Action::SetActiveDashboard(name.into()));
    }

    pub fn set_dashboards(&mut self, dashboards: Vec<Dashboard>) {
        self.dispatch(Action::SetDashboards(dashboards));
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::WidgetKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn set_widgets_overwrites() {
        let mut store = DashboardStore::with_defaults();
        let first = vec![Widget::new("a", WidgetKind::Sniper, "BTCUSDT")];
        let second = vec![
            Widget::new("b", WidgetKind::Performance, "ETHUSDT"),
            Widget::new("c", WidgetKind::HourlyAlpha, ""),
        ];
        store.set_widgets(first);
        store.set_widgets(second.clone());
        assert_eq!(store.state().widgets, second);
    }

    #[test]
    fn layout_changed_latches() {
        let mut store = DashboardStore::with_defaults();
        assert!(!store.state().layout_changed);
        store.mark_layout_changed();
        store.mark_layout_changed();
        store.set_layouts(Vec::new());
        store.set_theme(Theme::Dark);
        store.set_active_dashboard("alt");
        store.set_modal_open(true);
        store.set_board(WidgetKind::catalog());
        store.set_dashboards(Vec::new());
        store.set_widgets(Vec::new());
        assert!(store.state().layout_changed);
    }

    #[test]
    fn layout_update_only_touches_target_entry() {
        let mut store = DashboardStore::with_defaults();
        let before = store.state().layouts.clone();
        let mut next = before.clone();
        next[0] = LayoutEntry {
            id: "trader_pi".into(),
            x: 0,
            y: 0,
            w: 24,
            h: 5,
            moved: true,
            is_static: false,
        };
        store.set_layouts(next);

        let after = &store.state().layouts;
        assert_eq!(after[0].h, 5);
        assert!(after[0].moved);
        assert_eq!(&after[1..], &before[1..]);
    }

    #[test]
    fn active_dashboard_last_write_wins() {
        let mut store = DashboardStore::with_defaults();
        store.set_active_dashboard("alt");
        store.set_active_dashboard("home");
        assert_eq!(store.state().active_dashboard, "home");
    }

    #[test]
    fn reduce_is_pure() {
        let state = StoreState::default();
        let next = reduce(state.clone(), Action::SetTheme(Theme::Dark));
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(next.theme, Theme::Dark);
        assert_eq!(next.widgets, state.widgets);
    }

    #[test]
    fn listeners_see_each_field_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut store = DashboardStore::with_defaults();
        store.subscribe(move |field: StoreField, state: &StoreState| {
            sink.borrow_mut().push((field, state.modal_open));
        });
        store.set_modal_open(true);
        store.mark_layout_changed();
        assert_eq!(
            *seen.borrow(),
            vec![
                (StoreField::ModalOpen, true),
                (StoreField::LayoutChanged, true)
            ]
        );
    }
}
