use crate::dashboard::model::{LayoutEntry, Widget, WidgetKind, GRID_COLUMNS};
use std::collections::{HashMap, HashSet};

/// Report mismatches between widgets and their layout entries.
///
/// Keeping the two lists in step is the caller's job; this only describes
/// what is wrong so it can be logged.
pub fn check_layout_sync(widgets: &[Widget], layouts: &[LayoutEntry]) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut widget_ids = HashSet::new();
    for widget in widgets {
        if !widget_ids.insert(widget.id.as_str()) {
            warnings.push(format!("duplicate widget id '{}'", widget.id));
        }
    }

    let mut layout_counts: HashMap<&str, usize> = HashMap::new();
    for entry in layouts {
        *layout_counts.entry(entry.id.as_str()).or_default() += 1;
        if !widget_ids.contains(entry.id.as_str()) {
            warnings.push(format!("layout entry '{}' has no widget", entry.id));
        }
        if entry.w < 1 || entry.w > GRID_COLUMNS {
            warnings.push(format!(
                "layout entry '{}' width {} is outside 1..={GRID_COLUMNS}",
                entry.id, entry.w
            ));
        }
    }

    for widget in widgets {
        match layout_counts.get(widget.id.as_str()) {
            None => warnings.push(format!("widget '{}' has no layout entry", widget.id)),
            Some(n) if *n > 1 => {
                warnings.push(format!("widget '{}' has {n} layout entries", widget.id))
            }
            _ => {}
        }
    }

    warnings
}

/// Pick an id for a new widget of `kind` that is not used by `widgets`.
pub fn next_widget_id(widgets: &[Widget], kind: WidgetKind) -> String {
    let base = slug::slugify(kind.title()).replace('-', "_");
    let taken: HashSet<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
    if !taken.contains(base.as_str()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

/// Append a widget of `kind` and a matching layout entry placed below the
/// current board. Returns the new id.
pub fn add_widget(
    widgets: &mut Vec<Widget>,
    layouts: &mut Vec<LayoutEntry>,
    kind: WidgetKind,
    symbol: &str,
) -> String {
    let id = next_widget_id(widgets, kind);
    let (w, h) = kind.default_span();
    let y = layouts.iter().map(LayoutEntry::bottom).max().unwrap_or(0);
    widgets.push(Widget::new(&id, kind, symbol));
    layouts.push(LayoutEntry::new(&id, 0, y, w, h));
    id
}

/// Remove the widget `id` together with its layout entry. Returns whether a
/// widget was removed.
pub fn remove_widget(widgets: &mut Vec<Widget>, layouts: &mut Vec<LayoutEntry>, id: &str) -> bool {
    let before = widgets.len();
    widgets.retain(|w| w.id != id);
    layouts.retain(|l| l.id != id);
    widgets.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::state::StoreState;

    #[test]
    fn seed_board_is_in_sync() {
        let state = StoreState::default();
        assert!(check_layout_sync(&state.widgets, &state.layouts).is_empty());
    }

    #[test]
    fn reports_orphans_and_missing() {
        let widgets = vec![Widget::new("a", WidgetKind::Sniper, "")];
        let layouts = vec![LayoutEntry::new("b", 0, 0, 8, 8)];
        let warnings = check_layout_sync(&widgets, &layouts);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("'b' has no widget")));
        assert!(warnings.iter().any(|w| w.contains("'a' has no layout")));
    }

    #[test]
    fn reports_bad_width_and_duplicates() {
        let widgets = vec![
            Widget::new("a", WidgetKind::Sniper, ""),
            Widget::new("a", WidgetKind::Sniper, ""),
        ];
        let layouts = vec![LayoutEntry::new("a", 0, 0, 30, 8)];
        let warnings = check_layout_sync(&widgets, &layouts);
        assert!(warnings.iter().any(|w| w.contains("duplicate widget id")));
        assert!(warnings.iter().any(|w| w.contains("width 30")));
    }

    #[test]
    fn add_allocates_fresh_id_below_board() {
        let mut state = StoreState::default();
        let id = add_widget(
            &mut state.widgets,
            &mut state.layouts,
            WidgetKind::TraderPi,
            "ETHUSDT",
        );
        assert_eq!(id, "trader_pi_2");
        let entry = state.layout(&id).unwrap();
        assert_eq!((entry.x, entry.y, entry.w, entry.h), (0, 20, 24, 4));
        assert!(check_layout_sync(&state.widgets, &state.layouts).is_empty());

        let id = add_widget(
            &mut state.widgets,
            &mut state.layouts,
            WidgetKind::SentimentHeatmap,
            "",
        );
        assert_eq!(id, "sentiment_heatmap");
    }

    #[test]
    fn remove_drops_both_sides() {
        let mut state = StoreState::default();
        assert!(remove_widget(&mut state.widgets, &mut state.layouts, "sniper"));
        assert!(!remove_widget(&mut state.widgets, &mut state.layouts, "sniper"));
        assert_eq!(state.widgets.len(), 5);
        assert_eq!(state.layouts.len(), 5);
        assert!(check_layout_sync(&state.widgets, &state.layouts).is_empty());
    }
}
