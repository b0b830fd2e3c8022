use serde::{Deserialize, Serialize};
use std::fmt;

use crate::handle::ScreenHandle;
use crate::screen::ScreenKey;

/// Which part of a navigation state a screen occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Stack,
    Sheet,
    FullScreen,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Stack => f.write_str("stack"),
            Slot::Sheet => f.write_str("sheet"),
            Slot::FullScreen => f.write_str("full_screen"),
        }
    }
}

/// Snapshot of "where are we" for one coordinator.
///
/// The stack runs root-to-leaf; its tail is the visible leaf. Both overlay
/// slots may be set at once, `dismiss` resolves that by clearing the sheet
/// first.
pub struct NavigationState<V> {
    pub stack: Vec<ScreenHandle<V>>,
    pub sheet: Option<ScreenHandle<V>>,
    pub full_screen: Option<ScreenHandle<V>>,
}

impl<V> NavigationState<V> {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            sheet: None,
            full_screen: None,
        }
    }

    /// True when nothing is pushed or presented
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty() && self.sheet.is_none() && self.full_screen.is_none()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.sheet = None;
        self.full_screen = None;
    }

    /// The visible stack leaf, if any
    pub fn top(&self) -> Option<&ScreenHandle<V>> {
        self.stack.last()
    }

    /// Identity tokens of the stack, root first
    pub fn path(&self) -> Vec<&ScreenKey> {
        self.stack.iter().map(ScreenHandle::key).collect()
    }

    /// Position of the first stack entry with this identity
    pub fn position(&self, key: &ScreenKey) -> Option<usize> {
        self.stack.iter().position(|handle| handle.key() == key)
    }

    /// The screen currently in front: sheet, then full-screen, then the stack leaf
    pub fn frontmost(&self) -> Option<(Slot, &ScreenHandle<V>)> {
        if let Some(sheet) = &self.sheet {
            return Some((Slot::Sheet, sheet));
        }
        if let Some(full_screen) = &self.full_screen {
            return Some((Slot::FullScreen, full_screen));
        }
        self.stack.last().map(|handle| (Slot::Stack, handle))
    }
}

impl<V> Default for NavigationState<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls: handles compare by identity and clone without `V: Clone`
impl<V> Clone for NavigationState<V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            sheet: self.sheet.clone(),
            full_screen: self.full_screen.clone(),
        }
    }
}

impl<V> PartialEq for NavigationState<V> {
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack && self.sheet == other.sheet && self.full_screen == other.full_screen
    }
}

impl<V> Eq for NavigationState<V> {}

impl<V> fmt::Debug for NavigationState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationState")
            .field("stack", &self.path())
            .field("sheet", &self.sheet.as_ref().map(ScreenHandle::key))
            .field("full_screen", &self.full_screen.as_ref().map(ScreenHandle::key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::PresentationStyle;
    use serde_json::Value;

    fn handle(kind: &str, id: &str) -> ScreenHandle<()> {
        ScreenHandle::from_parts(ScreenKey::new(kind, id), PresentationStyle::Push, Value::Null, || ())
    }

    #[test]
    fn test_frontmost_prefers_sheet_then_full_screen() {
        let mut state = NavigationState::new();
        state.stack.push(handle("list", "1"));
        assert_eq!(state.frontmost().map(|(slot, _)| slot), Some(Slot::Stack));

        state.full_screen = Some(handle("player", "1"));
        assert_eq!(state.frontmost().map(|(slot, _)| slot), Some(Slot::FullScreen));

        state.sheet = Some(handle("share", "1"));
        assert_eq!(state.frontmost().map(|(slot, _)| slot), Some(Slot::Sheet));
    }

    #[test]
    fn test_position_finds_first_match() {
        let mut state = NavigationState::new();
        state.stack.push(handle("list", "1"));
        state.stack.push(handle("detail", "2"));
        state.stack.push(handle("list", "1"));
        assert_eq!(state.position(&ScreenKey::new("list", "1")), Some(0));
        assert_eq!(state.position(&ScreenKey::new("detail", "2")), Some(1));
        assert_eq!(state.position(&ScreenKey::new("detail", "3")), None);
    }

    #[test]
    fn test_clear_empties_every_slot() {
        let mut state = NavigationState::new();
        state.stack.push(handle("list", "1"));
        state.sheet = Some(handle("share", "1"));
        state.full_screen = Some(handle("player", "1"));
        assert!(!state.is_empty());
        state.clear();
        assert!(state.is_empty());
    }
}
