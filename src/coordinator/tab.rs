//! Sibling coordinators keyed by tab, with one of them selected.

use log::debug;
use std::fmt::{self, Display};

use super::Navigator;
use crate::deeplink::DeepLink;
use crate::handle::ScreenHandle;
use crate::persist::PersistedState;
use crate::state::NavigationState;
use crate::subscription::{CoordinatorId, EventBus, NavigationChange, NavigationEvent, Subscription, SubscriptionId};

/// Wraps the selected tab's root view in the tab bar: receives every tab in
/// insertion order, the selected one and its rendered root (if any)
pub type ChromeFn<K, V> = dyn Fn(&[K], Option<&K>, Option<V>) -> V + Send + Sync;

struct Tab<K, V> {
    key: K,
    child: Box<dyn Navigator<View = V>>,
}

pub struct TabCoordinator<K, V> {
    id: CoordinatorId,
    parent: Option<CoordinatorId>,
    tabs: Vec<Tab<K, V>>,
    selected: Option<K>,
    chrome: Box<ChromeFn<K, V>>,
    // Reported while no tab is selected
    empty: NavigationState<V>,
    events: EventBus,
}

impl<K, V> TabCoordinator<K, V>
where
    K: PartialEq + Clone + Display + Send + 'static,
    V: 'static,
{
    pub fn new<C>(chrome: C) -> Self
    where
        C: Fn(&[K], Option<&K>, Option<V>) -> V + Send + Sync + 'static,
    {
        let coordinator = Self {
            id: CoordinatorId::next(),
            parent: None,
            tabs: Vec::new(),
            selected: None,
            chrome: Box::new(chrome),
            empty: NavigationState::new(),
            events: EventBus::new(),
        };
        debug!("Created tab container {}", coordinator.id);
        coordinator
    }

    /// Register `child` under `key`, replacing (and returning) any previous
    /// child there. The first tab added becomes the selected one.
    pub fn add_child<N>(&mut self, mut child: N, key: K) -> Option<Box<dyn Navigator<View = V>>>
    where
        N: Navigator<View = V> + 'static,
    {
        child.set_parent(Some(self.id));
        let child: Box<dyn Navigator<View = V>> = Box::new(child);

        let previous = match self.tabs.iter_mut().find(|tab| tab.key == key) {
            Some(tab) => {
                let mut previous = std::mem::replace(&mut tab.child, child);
                previous.set_parent(None);
                Some(previous)
            }
            None => {
                self.tabs.push(Tab {
                    key: key.clone(),
                    child,
                });
                None
            }
        };

        debug!("{} added tab '{}'", self.id, key);
        self.publish(NavigationEvent::TabAdded { tab: key.to_string() });
        if self.selected.is_none() {
            self.switch_to(&key);
        }
        previous
    }

    /// Detach the child under `key`. Removing the selected tab selects the
    /// first remaining one.
    pub fn remove_child(&mut self, key: &K) -> Option<Box<dyn Navigator<View = V>>> {
        let index = self.tabs.iter().position(|tab| &tab.key == key)?;
        let mut removed = self.tabs.remove(index).child;
        removed.set_parent(None);

        debug!("{} removed tab '{}'", self.id, key);
        self.publish(NavigationEvent::TabRemoved { tab: key.to_string() });

        if self.selected.as_ref() == Some(key) {
            self.selected = None;
            if let Some(first) = self.tabs.first().map(|tab| tab.key.clone()) {
                self.switch_to(&first);
            }
        }
        Some(removed)
    }

    /// Select a tab. The target child's own navigation state is untouched.
    pub fn switch_to(&mut self, key: &K) -> bool {
        if !self.tabs.iter().any(|tab| &tab.key == key) {
            debug!("{} has no tab '{}'", self.id, key);
            return false;
        }
        if self.selected.as_ref() != Some(key) {
            self.selected = Some(key.clone());
            debug!("{} selected tab '{}'", self.id, key);
            self.publish(NavigationEvent::TabSelected { tab: key.to_string() });
        }
        true
    }

    pub fn selected(&self) -> Option<&K> {
        self.selected.as_ref()
    }

    /// Tab keys in insertion order
    pub fn tabs(&self) -> Vec<K> {
        self.tabs.iter().map(|tab| tab.key.clone()).collect()
    }

    pub fn child(&self, key: &K) -> Option<&(dyn Navigator<View = V> + 'static)> {
        self.tabs.iter().find(|tab| &tab.key == key).map(|tab| tab.child.as_ref())
    }

    pub fn child_mut(&mut self, key: &K) -> Option<&mut (dyn Navigator<View = V> + 'static)> {
        self.tabs
            .iter_mut()
            .find(|tab| &tab.key == key)
            .map(|tab| tab.child.as_mut())
    }

    pub fn selected_child(&self) -> Option<&(dyn Navigator<View = V> + 'static)> {
        let key = self.selected.as_ref()?;
        self.child(key)
    }

    pub fn selected_child_mut(&mut self) -> Option<&mut (dyn Navigator<View = V> + 'static)> {
        let key = self.selected.clone()?;
        self.child_mut(&key)
    }

    fn publish(&self, event: NavigationEvent) {
        self.events.publish(&NavigationChange {
            coordinator: self.id,
            event,
        });
    }
}

impl<K, V> Navigator for TabCoordinator<K, V>
where
    K: PartialEq + Clone + Display + Send + 'static,
    V: 'static,
{
    type View = V;

    fn id(&self) -> CoordinatorId {
        self.id
    }

    fn parent(&self) -> Option<CoordinatorId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<CoordinatorId>) {
        self.parent = parent;
    }

    fn navigation_state(&self) -> &NavigationState<V> {
        match self.selected_child() {
            Some(child) => child.navigation_state(),
            None => &self.empty,
        }
    }

    fn present(&mut self, screen: ScreenHandle<V>) {
        match self.selected_child_mut() {
            Some(child) => child.present(screen),
            None => debug!("{} has no selected tab to present {}", self.id, screen.key()),
        }
    }

    fn dismiss(&mut self) {
        if let Some(child) = self.selected_child_mut() {
            child.dismiss();
        }
    }

    fn make_root_view(&self) -> V {
        let keys = self.tabs();
        let content = self.selected_child().map(|child| child.make_root_view());
        (self.chrome)(keys.as_slice(), self.selected.as_ref(), content)
    }

    /// A first component naming a tab hands the rest of the link to that tab
    /// and selects it once the rest resolves; anything else goes to the
    /// selected tab. A failed link leaves the selection where it was.
    fn handle_deep_link(&mut self, link: &DeepLink) -> bool {
        let target = link
            .component(0)
            .and_then(|first| self.tabs.iter().find(|tab| tab.key.to_string() == first))
            .map(|tab| tab.key.clone());

        if let Some(key) = target {
            let rest = link.skip(1);
            let resolved = rest.is_empty()
                || self
                    .child_mut(&key)
                    .is_some_and(|child| child.handle_deep_link(&rest));
            if resolved {
                self.switch_to(&key);
            } else {
                debug!("{} kept tab selection after unresolved link {}", self.id, link);
            }
            return resolved;
        }

        self.selected_child_mut()
            .is_some_and(|child| child.handle_deep_link(link))
    }

    fn persist(&self) -> PersistedState {
        PersistedState {
            selected_tab: self.selected.as_ref().map(ToString::to_string),
            children: self
                .tabs
                .iter()
                .map(|tab| (tab.key.to_string(), tab.child.persist()))
                .collect(),
            ..PersistedState::default()
        }
    }

    fn restore(&mut self, record: &PersistedState) {
        for tab in &mut self.tabs {
            if let Some(child_record) = record.children.get(&tab.key.to_string()) {
                tab.child.restore(child_record);
            }
        }

        let selected = record.selected_tab.as_deref().and_then(|name| {
            self.tabs
                .iter()
                .find(|tab| tab.key.to_string() == name)
                .map(|tab| tab.key.clone())
        });
        if let Some(key) = selected {
            self.switch_to(&key);
        }

        debug!("{} restored {} tabs", self.id, record.children.len());
        self.publish(NavigationEvent::Restored);
    }

    fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        self.events.subscribe(subscription)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

impl<K: Display, V> fmt::Debug for TabCoordinator<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tabs: Vec<String> = self.tabs.iter().map(|tab| tab.key.to_string()).collect();
        f.debug_struct("TabCoordinator")
            .field("id", &self.id)
            .field("tabs", &tabs)
            .field("selected", &self.selected.as_ref().map(ToString::to_string))
            .finish()
    }
}
