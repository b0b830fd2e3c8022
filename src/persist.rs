//! Portable encoding of navigation state for process-restart recovery.
//!
//! Every screen is stored as an `(identifier, payload)` pair: the screen's
//! kind plus whatever payload it chose to expose. Rebuilding concrete screens
//! is the screen factory's job; pairs it does not recognise are skipped.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::coordinator::ScreenFactory;
use crate::coordinator::modal::{ModalStyle, Transition};
use crate::handle::ScreenHandle;
use crate::state::NavigationState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedScreen {
    /// Screen kind, e.g. `"profile"`
    pub identifier: String,
    pub payload: Value,
}

impl PersistedScreen {
    pub fn capture<V>(handle: &ScreenHandle<V>) -> Self {
        Self {
            identifier: handle.kind().to_string(),
            payload: handle.payload().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedModal {
    pub screen: PersistedScreen,
    pub style: ModalStyle,
    #[serde(default)]
    pub transition: Transition,
    #[serde(default = "default_dismissible")]
    pub dismissible: bool,
}

fn default_dismissible() -> bool {
    true
}

/// One coordinator's persisted record. Tab containers nest their children's
/// records under `children`, keyed by tab.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub stack: Vec<PersistedScreen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<PersistedScreen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_screen: Option<PersistedScreen>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modals: Vec<PersistedModal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_tab: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, PersistedState>,
}

impl PersistedState {
    pub fn capture<V>(state: &NavigationState<V>) -> Self {
        Self {
            stack: state.stack.iter().map(PersistedScreen::capture).collect(),
            sheet: state.sheet.as_ref().map(PersistedScreen::capture),
            full_screen: state.full_screen.as_ref().map(PersistedScreen::capture),
            ..Self::default()
        }
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode navigation state")
    }

    pub fn encode_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to encode navigation state")
    }

    pub fn decode(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to decode navigation state")
    }

    /// Screens recorded here and in every nested child record
    pub fn screen_count(&self) -> usize {
        self.stack.len()
            + usize::from(self.sheet.is_some())
            + usize::from(self.full_screen.is_some())
            + self.modals.len()
            + self.children.values().map(PersistedState::screen_count).sum::<usize>()
    }
}

/// Payload for screens that persist their whole value
pub fn encode_payload<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!("Failed to encode screen payload: {}", e);
        Value::Null
    })
}

/// Ask the factory for one screen, logging when it cannot be rebuilt
pub fn restore_screen<F: ScreenFactory>(factory: &F, screen: &PersistedScreen) -> Option<ScreenHandle<F::View>> {
    let restored = factory.restore_screen(&screen.identifier, &screen.payload);
    if restored.is_none() {
        warn!("Skipping unrecognised screen '{}' during restoration", screen.identifier);
    }
    restored
}

/// Rebuild a navigation state, leaving out whatever the factory rejects
pub fn restore_state<F: ScreenFactory>(factory: &F, record: &PersistedState) -> NavigationState<F::View> {
    NavigationState {
        stack: record
            .stack
            .iter()
            .filter_map(|screen| restore_screen(factory, screen))
            .collect(),
        sheet: record.sheet.as_ref().and_then(|screen| restore_screen(factory, screen)),
        full_screen: record.full_screen.as_ref().and_then(|screen| restore_screen(factory, screen)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::tests::{TextFactory, screen};
    use crate::screen::PresentationStyle;

    #[test]
    fn test_encoding_shape() -> Result<()> {
        let mut state = NavigationState::new();
        state.stack.push(screen("profile", "7", PresentationStyle::Push));
        state.sheet = Some(screen("share", "1", PresentationStyle::Sheet));

        let encoded = PersistedState::capture(&state).encode()?;
        let value: Value = serde_json::from_str(&encoded)?;
        assert_eq!(value["stack"][0]["identifier"], "profile");
        assert_eq!(value["stack"][0]["payload"], "7");
        assert_eq!(value["sheet"]["identifier"], "share");
        assert!(value.get("full_screen").is_none());
        assert!(value.get("children").is_none());
        Ok(())
    }

    #[test]
    fn test_unknown_screens_are_skipped() -> Result<()> {
        let record = PersistedState::decode(
            r#"{
                "stack": [
                    {"identifier": "profile", "payload": "1"},
                    {"identifier": "retired", "payload": "2"},
                    {"identifier": "list", "payload": "3"}
                ],
                "sheet": {"identifier": "retired", "payload": null},
                "full_screen": {"identifier": "player", "payload": "9"}
            }"#,
        )?;

        let state = restore_state(&TextFactory, &record);
        let ids: Vec<&str> = state.stack.iter().map(|h| h.identity()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(state.sheet.is_none());
        assert_eq!(state.full_screen.as_ref().map(|h| h.kind()), Some("player"));
        Ok(())
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(PersistedState::decode("not json").is_err());
        assert!(PersistedState::decode("{}").is_ok());
    }

    #[test]
    fn test_screen_count_includes_children() -> Result<()> {
        let record = PersistedState::decode(
            r#"{
                "selected_tab": "home",
                "children": {
                    "home": {"stack": [{"identifier": "list", "payload": "1"}]},
                    "profile": {"sheet": {"identifier": "edit", "payload": "2"},
                                "modals": [{"screen": {"identifier": "share", "payload": "3"}, "style": "popup"}]}
                }
            }"#,
        )?;
        assert_eq!(record.screen_count(), 3);
        assert!(record.children["profile"].modals[0].dismissible);
        Ok(())
    }
}
