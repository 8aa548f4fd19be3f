use crate::dashboard::model::{Dashboard, LayoutEntry, Theme, Widget, WidgetInfo, WidgetKind};
use once_cell::sync::Lazy;

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";
pub const DEFAULT_DASHBOARD: &str = "home";

static SEED: Lazy<StoreState> = Lazy::new(|| {
    let placements = [
        ("trader_pi", WidgetKind::TraderPi, 0, 0, 24, 4),
        ("market_pulse", WidgetKind::MarketPulse, 0, 4, 8, 8),
        ("sentiment", WidgetKind::SentimentHeatmap, 8, 4, 8, 8),
        ("sniper", WidgetKind::Sniper, 16, 4, 8, 8),
        ("performance", WidgetKind::Performance, 0, 12, 12, 8),
        ("hourly_alpha", WidgetKind::HourlyAlpha, 12, 12, 12, 8),
    ];
    StoreState {
        modal_open: false,
        widgets: placements
            .iter()
            .map(|(id, kind, ..)| Widget::new(id, *kind, DEFAULT_SYMBOL))
            .collect(),
        layouts: placements
            .iter()
            .map(|(id, _, x, y, w, h)| LayoutEntry::new(id, *x, *y, *w, *h))
            .collect(),
        board: Vec::new(),
        layout_changed: false,
        theme: Theme::Light,
        active_dashboard: DEFAULT_DASHBOARD.to_string(),
        dashboards: Vec::new(),
    }
});

/// Everything the dashboard keeps for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub modal_open: bool,
    pub widgets: Vec<Widget>,
    pub layouts: Vec<LayoutEntry>,
    pub board: Vec<WidgetInfo>,
    /// One-way latch: set by `MarkLayoutChanged`, never cleared.
    pub layout_changed: bool,
    pub theme: Theme,
    pub active_dashboard: String,
    pub dashboards: Vec<Dashboard>,
}

impl Default for StoreState {
    /// The six widget starter board on a 24 column grid.
    fn default() -> Self {
        SEED.clone()
    }
}

impl StoreState {
    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn layout(&self, id: &str) -> Option<&LayoutEntry> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Saved dashboard named by `active_dashboard`, if one was saved.
    pub fn current_dashboard(&self) -> Option<&Dashboard> {
        self.dashboards.iter().find(|d| d.id == self.active_dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_has_six_widgets_matched_by_layouts() {
        let state = StoreState::default();
        assert_eq!(state.widgets.len(), 6);
        assert_eq!(state.layouts.len(), 6);
        for layout in &state.layouts {
            let matches = state.widgets.iter().filter(|w| w.id == layout.id).count();
            assert_eq!(matches, 1, "layout {} must match one widget", layout.id);
        }
        let ids: HashSet<_> = state.widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn seed_scalars() {
        let state = StoreState::default();
        assert!(!state.modal_open);
        assert!(!state.layout_changed);
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(state.active_dashboard, "home");
        assert!(state.board.is_empty());
        assert!(state.dashboards.is_empty());
        assert_eq!(state.layout("trader_pi").map(|l| l.w), Some(24));
    }

    #[test]
    fn current_dashboard_follows_selection() {
        let mut state = StoreState::default();
        assert!(state.current_dashboard().is_none());
        state.dashboards.push(Dashboard {
            id: "alt".into(),
            name: "Alt".into(),
            widgets: None,
            layouts: None,
        });
        state.active_dashboard = "alt".into();
        assert_eq!(state.current_dashboard().map(|d| d.name.as_str()), Some("Alt"));
    }
}
