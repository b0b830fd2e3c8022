//! Independent LIFO stack of styled overlays above a base coordinator.
//!
//! Entries are grouped by style into presentation layers. The sheet and
//! full-screen layers only show their topmost entry; popups compose, so all
//! of them are visible at once.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Coordinator, CoordinatorOptions, Navigator, ScreenFactory};
use crate::deeplink::DeepLink;
use crate::handle::ScreenHandle;
use crate::persist::{self, PersistedModal, PersistedState};
use crate::screen::ScreenKey;
use crate::state::NavigationState;
use crate::subscription::{CoordinatorId, NavigationEvent, Subscription, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalStyle {
    #[default]
    Sheet,
    FullScreen,
    Popup,
}

impl fmt::Display for ModalStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalStyle::Sheet => f.write_str("sheet"),
            ModalStyle::FullScreen => f.write_str("full_screen"),
            ModalStyle::Popup => f.write_str("popup"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Leading,
    Trailing,
}

/// Transition tag carried to the renderer; the coordinator never animates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    #[default]
    Default,
    Fade,
    Slide(Edge),
    Scale,
    /// Named transition the rendering collaborator knows how to build
    Custom(String),
}

pub struct ModalEntry<V> {
    pub handle: ScreenHandle<V>,
    pub style: ModalStyle,
    pub transition: Transition,
    pub dismissible: bool,
}

impl<V> ModalEntry<V> {
    pub fn key(&self) -> &ScreenKey {
        self.handle.key()
    }
}

impl<V> Clone for ModalEntry<V> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            style: self.style,
            transition: self.transition.clone(),
            dismissible: self.dismissible,
        }
    }
}

impl<V> fmt::Debug for ModalEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalEntry")
            .field("screen", self.handle.key())
            .field("style", &self.style)
            .field("transition", &self.transition)
            .field("dismissible", &self.dismissible)
            .finish()
    }
}

/// Modal stack grouped into independent presentation layers
#[derive(Debug)]
pub struct ModalLayers<'a, V> {
    /// Topmost sheet-style entry
    pub sheet: Option<&'a ModalEntry<V>>,
    /// Topmost full-screen-style entry
    pub full_screen: Option<&'a ModalEntry<V>>,
    /// Every popup, bottom first
    pub popups: Vec<&'a ModalEntry<V>>,
}

impl<V> ModalLayers<'_, V> {
    /// Whether an entry is currently visible in its layer
    pub fn is_visible(&self, key: &ScreenKey) -> bool {
        self.sheet.is_some_and(|entry| entry.key() == key)
            || self.full_screen.is_some_and(|entry| entry.key() == key)
            || self.popups.iter().any(|entry| entry.key() == key)
    }
}

/// A base coordinator plus a modal stack. `dismiss` pops the modal stack,
/// never the base slots; use [`ModalCoordinator::base_mut`] for those.
pub struct ModalCoordinator<F: ScreenFactory> {
    base: Coordinator<F>,
    modals: Vec<ModalEntry<F::View>>,
}

impl<F: ScreenFactory> ModalCoordinator<F> {
    pub fn new(factory: F) -> Self {
        Self::from_base(Coordinator::new(factory))
    }

    pub fn with_options(factory: F, options: CoordinatorOptions) -> Self {
        Self::from_base(Coordinator::with_options(factory, options))
    }

    pub fn from_base(base: Coordinator<F>) -> Self {
        Self {
            base,
            modals: Vec::new(),
        }
    }

    pub fn base(&self) -> &Coordinator<F> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut Coordinator<F> {
        &mut self.base
    }

    /// Modal entries, bottom first
    pub fn modal_stack(&self) -> &[ModalEntry<F::View>] {
        &self.modals
    }

    pub fn top(&self) -> Option<&ModalEntry<F::View>> {
        self.modals.last()
    }

    pub fn present_modal(
        &mut self,
        screen: ScreenHandle<F::View>,
        style: ModalStyle,
        transition: Transition,
        dismissible: bool,
    ) {
        let key = screen.key().clone();
        debug!("{} presenting modal {} as {} ({:?})", self.base.id, key, style, transition);
        self.modals.push(ModalEntry {
            handle: screen,
            style,
            transition,
            dismissible,
        });
        self.base.publish(NavigationEvent::ModalPresented { style, screen: key });
    }

    /// Dismissible sheet with the default transition
    pub fn present_sheet(&mut self, screen: ScreenHandle<F::View>) {
        self.present_modal(screen, ModalStyle::Sheet, Transition::Default, true);
    }

    /// Pop the topmost modal entry; no-op when the modal stack is empty
    pub fn dismiss(&mut self) -> Option<ModalEntry<F::View>> {
        let entry = self.modals.pop()?;
        debug!("{} dismissed modal {}", self.base.id, entry.key());
        self.base.publish(NavigationEvent::ModalDismissed {
            screen: entry.key().clone(),
        });
        Some(entry)
    }

    pub fn dismiss_all(&mut self) {
        if self.modals.is_empty() {
            return;
        }
        let count = self.modals.len();
        self.modals.clear();
        debug!("{} dismissed all {} modals", self.base.id, count);
        self.base.publish(NavigationEvent::ModalsCleared { count });
    }

    /// Drop every entry above the first one with this identity.
    ///
    /// Returns false, leaving the stack alone, when no entry matches.
    pub fn dismiss_to(&mut self, key: &ScreenKey) -> bool {
        let Some(index) = self.modals.iter().position(|entry| entry.key() == key) else {
            return false;
        };

        while self.modals.len() > index + 1 {
            self.dismiss();
        }
        true
    }

    /// Dismiss a specific entry in response to a user gesture.
    ///
    /// Only visible entries that are marked dismissible go away. When the same
    /// identity is visible in more than one layer, the topmost one is taken.
    pub fn dismiss_interactively(&mut self, key: &ScreenKey) -> bool {
        let target = self
            .visible_indices()
            .into_iter()
            .rev()
            .find(|&index| self.modals[index].key() == key);

        let Some(index) = target.filter(|&index| self.modals[index].dismissible) else {
            debug!("{} ignored dismiss gesture on {}", self.base.id, key);
            return false;
        };

        let entry = self.modals.remove(index);
        debug!("{} dismissed {} {} by gesture", self.base.id, entry.style, entry.key());
        self.base.publish(NavigationEvent::ModalDismissed {
            screen: entry.key().clone(),
        });
        true
    }

    // Positions in the modal stack of every visible entry, ascending
    fn visible_indices(&self) -> Vec<usize> {
        let topmost = |style: ModalStyle| self.modals.iter().rposition(|entry| entry.style == style);
        let mut indices: Vec<usize> = self
            .modals
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.style == ModalStyle::Popup)
            .map(|(index, _)| index)
            .chain(topmost(ModalStyle::Sheet))
            .chain(topmost(ModalStyle::FullScreen))
            .collect();
        indices.sort_unstable();
        indices
    }

    pub fn layers(&self) -> ModalLayers<'_, F::View> {
        let topmost = |style: ModalStyle| self.modals.iter().rev().find(|entry| entry.style == style);
        ModalLayers {
            sheet: topmost(ModalStyle::Sheet),
            full_screen: topmost(ModalStyle::FullScreen),
            popups: self
                .modals
                .iter()
                .filter(|entry| entry.style == ModalStyle::Popup)
                .collect(),
        }
    }
}

impl<F: ScreenFactory> Navigator for ModalCoordinator<F> {
    type View = F::View;

    fn id(&self) -> CoordinatorId {
        self.base.id
    }

    fn parent(&self) -> Option<CoordinatorId> {
        self.base.parent
    }

    fn set_parent(&mut self, parent: Option<CoordinatorId>) {
        self.base.parent = parent;
    }

    fn navigation_state(&self) -> &NavigationState<F::View> {
        self.base.state()
    }

    fn present(&mut self, screen: ScreenHandle<F::View>) {
        self.base.present(screen);
    }

    fn dismiss(&mut self) {
        ModalCoordinator::dismiss(self);
    }

    fn make_root_view(&self) -> F::View {
        self.base.make_root_view()
    }

    /// Open modals are dismissed first so nothing covers the linked screens
    fn handle_deep_link(&mut self, link: &DeepLink) -> bool {
        self.dismiss_all();
        self.base.handle_deep_link(link)
    }

    fn persist(&self) -> PersistedState {
        let mut record = self.base.persist();
        record.modals = self
            .modals
            .iter()
            .map(|entry| PersistedModal {
                screen: persist::PersistedScreen::capture(&entry.handle),
                style: entry.style,
                transition: entry.transition.clone(),
                dismissible: entry.dismissible,
            })
            .collect();
        record
    }

    fn restore(&mut self, record: &PersistedState) {
        self.base.restore(record);
        self.modals = record
            .modals
            .iter()
            .filter_map(|modal| {
                let handle = persist::restore_screen(self.base.factory(), &modal.screen)?;
                Some(ModalEntry {
                    handle,
                    style: modal.style,
                    transition: modal.transition.clone(),
                    dismissible: modal.dismissible,
                })
            })
            .collect();
    }

    fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        self.base.subscribe(subscription)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.base.unsubscribe(id)
    }
}
