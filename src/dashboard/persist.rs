use crate::dashboard::model::{LayoutEntry, Widget};
use crate::dashboard::state::StoreState;
use crate::dashboard::store::{StoreField, StoreListener};
use crate::storage::KeyValueStorage;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

impl StoreField {
    /// Key the field is persisted under.
    pub fn storage_key(&self) -> &'static str {
        match self {
            StoreField::ModalOpen => "modalOpen",
            StoreField::Widgets => "widgets",
            StoreField::Layouts => "layouts",
            StoreField::Board => "board",
            StoreField::LayoutChanged => "layout_changed",
            StoreField::Theme => "theme",
            StoreField::ActiveDashboard => "activeDashboard",
            StoreField::Dashboards => "dashboards",
        }
    }
}

/// Serialize one field of `state` the way it is stored. Theme and the active
/// dashboard are raw strings; everything else is JSON.
pub fn encode_field(field: StoreField, state: &StoreState) -> Result<String> {
    let encoded = match field {
        StoreField::ModalOpen => serde_json::to_string(&state.modal_open)?,
        StoreField::Widgets => serde_json::to_string(&state.widgets)?,
        StoreField::Layouts => serde_json::to_string(&state.layouts)?,
        StoreField::Board => serde_json::to_string(&state.board)?,
        StoreField::LayoutChanged => serde_json::to_string(&state.layout_changed)?,
        StoreField::Theme => state.theme.as_str().to_string(),
        StoreField::ActiveDashboard => state.active_dashboard.clone(),
        StoreField::Dashboards => serde_json::to_string(&state.dashboards)?,
    };
    Ok(encoded)
}

fn decode_json<T: DeserializeOwned>(field: StoreField, raw: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("decode stored '{}'", field.storage_key()))
}

/// Overwrite one field of `state` from its stored representation.
pub fn decode_field(field: StoreField, raw: &str, state: &mut StoreState) -> Result<()> {
    match field {
        StoreField::ModalOpen => state.modal_open = decode_json(field, raw)?,
        StoreField::Widgets => state.widgets = decode_json(field, raw)?,
        StoreField::Layouts => state.layouts = decode_json(field, raw)?,
        StoreField::Board => state.board = decode_json(field, raw)?,
        StoreField::LayoutChanged => state.layout_changed = decode_json(field, raw)?,
        StoreField::Theme => state.theme = raw.parse()?,
        StoreField::ActiveDashboard => state.active_dashboard = raw.to_string(),
        StoreField::Dashboards => state.dashboards = decode_json(field, raw)?,
    }
    Ok(())
}

fn same_ids(widgets: &[Widget], layouts: &[LayoutEntry]) -> bool {
    let mut widget_ids: Vec<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
    let mut layout_ids: Vec<&str> = layouts.iter().map(|l| l.id.as_str()).collect();
    widget_ids.sort_unstable();
    layout_ids.sort_unstable();
    widget_ids == layout_ids
}

/// Build the starting state from `storage`. Missing keys keep their default;
/// unreadable or malformed keys keep their default and log a warning.
///
/// Widgets and layouts are restored as a pair: if either fails to load or
/// their ids do not line up, both go back to the seed board.
pub fn hydrate(storage: &dyn KeyValueStorage) -> StoreState {
    let mut state = StoreState::default();
    let mut board_failed = false;
    for field in StoreField::ALL {
        let key = field.storage_key();
        let raw = match storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(key, "failed to read stored dashboard field: {e:#}");
                board_failed |= matches!(field, StoreField::Widgets | StoreField::Layouts);
                continue;
            }
        };
        if let Err(e) = decode_field(field, &raw, &mut state) {
            tracing::warn!(key, "ignoring stored dashboard field: {e:#}");
            board_failed |= matches!(field, StoreField::Widgets | StoreField::Layouts);
        }
    }
    if board_failed || !same_ids(&state.widgets, &state.layouts) {
        tracing::warn!("stored widgets and layouts do not match; restoring the default board");
        let seed = StoreState::default();
        state.widgets = seed.widgets;
        state.layouts = seed.layouts;
    }
    state
}

/// Store listener writing each changed field under its own key.
///
/// Write failures are logged and otherwise ignored; the in-memory change
/// stands.
pub struct StoragePersister<S> {
    storage: S,
}

impl<S: KeyValueStorage> StoragePersister<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn persist(&mut self, field: StoreField, state: &StoreState) -> Result<()> {
        let value = encode_field(field, state)?;
        self.storage.set(field.storage_key(), &value)
    }
}

impl<S: KeyValueStorage> StoreListener for StoragePersister<S> {
    fn on_change(&mut self, field: StoreField, state: &StoreState) {
        if let Err(e) = self.persist(field, state) {
            tracing::warn!(
                key = field.storage_key(),
                "failed to persist dashboard field: {e:#}"
            );
        }
    }
}
