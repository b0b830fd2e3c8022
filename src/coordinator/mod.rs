//! Coordinators own navigation state and its history.
//!
//! [`Coordinator`] is the base state machine (plus the stack operations in
//! [`stack`]). [`ModalCoordinator`] layers an independent modal stack on top
//! of one, and [`TabCoordinator`] holds sibling coordinators keyed by tab.
//! All of them implement [`Navigator`], so they nest freely.

pub mod modal;
pub mod stack;
pub mod tab;

use log::debug;
use serde_json::Value;

use crate::command::{CommandQueue, NavCommand};
use crate::deeplink::DeepLink;
use crate::handle::ScreenHandle;
use crate::history::HistoryLedger;
use crate::persist::{self, PersistedState};
use crate::screen::PresentationStyle;
use crate::state::{NavigationState, Slot};
use crate::subscription::{
    CoordinatorId, EventBus, HistoryDirection, NavigationChange, NavigationEvent, Subscription, SubscriptionId,
};

pub use modal::{Edge, ModalCoordinator, ModalEntry, ModalLayers, ModalStyle, Transition};
pub use tab::TabCoordinator;

/// The capability set every coordinator variant shares
pub trait Navigator: Send {
    /// What the rendering collaborator draws
    type View;

    fn id(&self) -> CoordinatorId;

    /// Identity of the owning coordinator, if any.
    ///
    /// This is a tag for events and logs only: there is no id-to-coordinator
    /// lookup, so it cannot be used to reach the parent.
    fn parent(&self) -> Option<CoordinatorId>;

    fn set_parent(&mut self, parent: Option<CoordinatorId>);

    fn navigation_state(&self) -> &NavigationState<Self::View>;

    fn present(&mut self, screen: ScreenHandle<Self::View>);

    fn dismiss(&mut self);

    fn make_root_view(&self) -> Self::View;

    /// Resolve a validated deep link into navigation; true iff something was presented
    fn handle_deep_link(&mut self, link: &DeepLink) -> bool;

    fn persist(&self) -> PersistedState;

    /// Best-effort: entries the factory cannot rebuild are skipped
    fn restore(&mut self, record: &PersistedState);

    fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Screen-producing collaborator supplied by the application.
///
/// A coordinator cannot exist without one, so a coordinator that cannot
/// render its root is unrepresentable.
pub trait ScreenFactory: Send + 'static {
    type View;

    /// The view beneath the stack
    fn make_root_view(&self) -> Self::View;

    /// Recognise a (partial) deep link as a screen
    fn create_screen(&self, _link: &DeepLink) -> Option<ScreenHandle<Self::View>> {
        None
    }

    /// Rebuild a screen from its persisted `(identifier, payload)` pair
    fn restore_screen(&self, _identifier: &str, _payload: &Value) -> Option<ScreenHandle<Self::View>> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoordinatorOptions {
    /// Maximum number of history snapshots kept; unbounded when `None`
    pub history_limit: Option<usize>,
}

/// Everything the rendering collaborator needs to draw one coordinator
pub struct Frame<V> {
    pub root: V,
    /// Rendered stack, root first
    pub stack: Vec<V>,
    pub sheet: Option<V>,
    pub full_screen: Option<V>,
}

/// Base coordinator: one navigation state, its history and a screen factory
pub struct Coordinator<F: ScreenFactory> {
    id: CoordinatorId,
    parent: Option<CoordinatorId>,
    factory: F,
    state: NavigationState<F::View>,
    history: HistoryLedger<NavigationState<F::View>>,
    events: EventBus,
}

impl<F: ScreenFactory> Coordinator<F> {
    pub fn new(factory: F) -> Self {
        Self::with_options(factory, CoordinatorOptions::default())
    }

    pub fn with_options(factory: F, options: CoordinatorOptions) -> Self {
        let mut history = match options.history_limit {
            Some(limit) => HistoryLedger::with_limit(limit),
            None => HistoryLedger::new(),
        };
        // Seed with the empty state so the first presentation can be undone
        history.add_state(NavigationState::new());

        let coordinator = Self {
            id: CoordinatorId::next(),
            parent: None,
            factory,
            state: NavigationState::new(),
            history,
            events: EventBus::new(),
        };
        debug!("Created {}", coordinator.id);
        coordinator
    }

    pub fn id(&self) -> CoordinatorId {
        self.id
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn state(&self) -> &NavigationState<F::View> {
        &self.state
    }

    pub fn history(&self) -> &HistoryLedger<NavigationState<F::View>> {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    /// Route a screen into the slot its presentation style asks for
    pub fn present(&mut self, screen: ScreenHandle<F::View>) {
        let style = screen.presentation_style();
        self.place(screen, style);
    }

    pub(crate) fn place(&mut self, screen: ScreenHandle<F::View>, style: PresentationStyle) {
        let slot = match style {
            PresentationStyle::Push => Slot::Stack,
            PresentationStyle::Automatic if !self.state.stack.is_empty() => Slot::Stack,
            PresentationStyle::Automatic | PresentationStyle::Modal | PresentationStyle::Sheet => Slot::Sheet,
            PresentationStyle::FullScreen => Slot::FullScreen,
        };

        let key = screen.key().clone();
        match slot {
            Slot::Stack => self.state.stack.push(screen),
            Slot::Sheet => self.state.sheet = Some(screen),
            Slot::FullScreen => self.state.full_screen = Some(screen),
        }

        debug!("{} presented {} ({}) in {}", self.id, key, style, slot);
        self.record();
        self.publish(NavigationEvent::Presented { slot, screen: key });
    }

    /// Clear the sheet, else the full-screen cover, else pop the stack leaf.
    /// Exactly one of these happens; an empty state is left alone.
    pub fn dismiss(&mut self) {
        let dismissed = if let Some(sheet) = self.state.sheet.take() {
            Some((Slot::Sheet, sheet))
        } else if let Some(full_screen) = self.state.full_screen.take() {
            Some((Slot::FullScreen, full_screen))
        } else {
            self.state.stack.pop().map(|handle| (Slot::Stack, handle))
        };

        match dismissed {
            Some((slot, handle)) => {
                debug!("{} dismissed {} from {}", self.id, handle.key(), slot);
                self.record();
                self.publish(NavigationEvent::Dismissed {
                    slot,
                    screen: handle.key().clone(),
                });
            }
            None => debug!("{} dismiss with nothing presented", self.id),
        }
    }

    /// Empty the stack, leaving sheet and full-screen slots untouched
    pub fn pop_to_root(&mut self) {
        if self.state.stack.is_empty() {
            return;
        }
        self.state.stack.clear();
        debug!("{} popped to root", self.id);
        self.record();
        self.publish(NavigationEvent::PoppedTo { depth: 0 });
    }

    /// Restore the previous history snapshot; false when already at the oldest
    pub fn go_back(&mut self) -> bool {
        self.travel(HistoryDirection::Back)
    }

    /// Restore the next history snapshot; false when already at the newest
    pub fn go_forward(&mut self) -> bool {
        self.travel(HistoryDirection::Forward)
    }

    fn travel(&mut self, direction: HistoryDirection) -> bool {
        let snapshot = match direction {
            HistoryDirection::Back => self.history.go_back(),
            HistoryDirection::Forward => self.history.go_forward(),
        };
        let Some(snapshot) = snapshot.cloned() else {
            return false;
        };

        // Replaying history never records new entries
        self.state = snapshot;
        let cursor = self.history.cursor().unwrap_or(0);
        debug!("{} moved {:?} to history entry {}", self.id, direction, cursor);
        self.publish(NavigationEvent::HistoryMoved { direction, cursor });
        true
    }

    /// Clear stack, sheet and full-screen slots
    pub fn reset(&mut self) {
        if self.state.is_empty() {
            return;
        }
        self.state.clear();
        debug!("{} reset", self.id);
        self.record();
        self.publish(NavigationEvent::Reset);
    }

    /// Incremental resolution: reset, then offer every growing prefix of the
    /// link to the factory and present each screen it recognises.
    ///
    /// `profile/42/edit` may present a profile screen for `profile/42` and
    /// then an edit screen for the full path.
    pub fn handle_deep_link(&mut self, link: &DeepLink) -> bool {
        self.reset();

        let mut handled = false;
        for len in 1..=link.len() {
            let partial = link.prefix(len);
            if let Some(screen) = self.factory.create_screen(&partial) {
                debug!("{} resolved '{}' to {}", self.id, partial.path(), screen.key());
                self.present(screen);
                handled = true;
            }
        }

        if !handled {
            debug!("{} could not resolve deep link {}", self.id, link);
        }
        handled
    }

    pub fn make_root_view(&self) -> F::View {
        self.factory.make_root_view()
    }

    /// Render the root view and every occupied slot
    pub fn frame(&self) -> Frame<F::View> {
        Frame {
            root: self.factory.make_root_view(),
            stack: self.state.stack.iter().map(ScreenHandle::render).collect(),
            sheet: self.state.sheet.as_ref().map(ScreenHandle::render),
            full_screen: self.state.full_screen.as_ref().map(ScreenHandle::render),
        }
    }

    pub fn persist(&self) -> PersistedState {
        PersistedState::capture(&self.state)
    }

    /// Replace the state with whatever the factory can rebuild from `record`.
    /// History restarts from the restored state.
    pub fn restore(&mut self, record: &PersistedState) {
        self.state = persist::restore_state(&self.factory, record);
        self.history.reset(self.state.clone());
        debug!("{} restored {} stack entries", self.id, self.state.stack.len());
        self.publish(NavigationEvent::Restored);
    }

    pub fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        self.events.subscribe(subscription)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Execute one queued navigation command
    pub fn apply(&mut self, command: NavCommand<F::View>) {
        match command {
            NavCommand::None => {}
            NavCommand::Batch(commands) => {
                for command in commands {
                    self.apply(command);
                }
            }
            NavCommand::Present(screen) => self.present(screen),
            NavCommand::Push(screen) => self.push(screen),
            NavCommand::Pop => {
                self.pop();
            }
            NavCommand::PopTo(key) => {
                self.pop_to(&key);
            }
            NavCommand::PopToRoot => self.pop_to_root(),
            NavCommand::SetRoot(screen) => self.set_root(screen),
            NavCommand::Dismiss => self.dismiss(),
            NavCommand::GoBack => {
                self.go_back();
            }
            NavCommand::GoForward => {
                self.go_forward();
            }
            NavCommand::OpenDeepLink(link) => {
                self.handle_deep_link(&link);
            }
        }
    }

    /// Apply every pending command in arrival order, returning how many ran
    pub fn drain(&mut self, queue: &CommandQueue<F::View>) -> usize {
        let mut applied = 0;
        while let Some(command) = queue.try_next() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    pub(crate) fn record(&mut self) {
        self.history.add_state(self.state.clone());
    }

    pub(crate) fn publish(&self, event: NavigationEvent) {
        self.events.publish(&NavigationChange {
            coordinator: self.id,
            event,
        });
    }
}

impl<F: ScreenFactory> Navigator for Coordinator<F> {
    type View = F::View;

    fn id(&self) -> CoordinatorId {
        self.id
    }

    fn parent(&self) -> Option<CoordinatorId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<CoordinatorId>) {
        self.parent = parent;
    }

    fn navigation_state(&self) -> &NavigationState<F::View> {
        &self.state
    }

    fn present(&mut self, screen: ScreenHandle<F::View>) {
        Coordinator::present(self, screen);
    }

    fn dismiss(&mut self) {
        Coordinator::dismiss(self);
    }

    fn make_root_view(&self) -> F::View {
        Coordinator::make_root_view(self)
    }

    fn handle_deep_link(&mut self, link: &DeepLink) -> bool {
        Coordinator::handle_deep_link(self, link)
    }

    fn persist(&self) -> PersistedState {
        Coordinator::persist(self)
    }

    fn restore(&mut self, record: &PersistedState) {
        Coordinator::restore(self, record);
    }

    fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        Coordinator::subscribe(self, subscription)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        Coordinator::unsubscribe(self, id)
    }
}
