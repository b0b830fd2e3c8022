//! Linear push/pop navigation on top of the base coordinator.

use log::debug;

use super::{Coordinator, ScreenFactory};
use crate::handle::ScreenHandle;
use crate::screen::{PresentationStyle, ScreenKey, ScreenMeta};
use crate::subscription::NavigationEvent;
use crate::state::Slot;

impl<F: ScreenFactory> Coordinator<F> {
    /// Push onto the stack, whatever style the screen declares.
    ///
    /// Any forward history branch is discarded first.
    pub fn push(&mut self, screen: ScreenHandle<F::View>) {
        self.history.clear_forward();
        self.place(screen, PresentationStyle::Push);
    }

    /// Remove the stack leaf; `None` when the stack is empty
    pub fn pop(&mut self) -> Option<ScreenHandle<F::View>> {
        let popped = self.state.stack.pop()?;
        debug!("{} popped {}", self.id, popped.key());
        self.record();
        self.publish(NavigationEvent::Dismissed {
            slot: Slot::Stack,
            screen: popped.key().clone(),
        });
        Some(popped)
    }

    /// Drop every stack entry after the first one with this identity.
    ///
    /// Returns false, leaving the stack alone, when no entry matches.
    pub fn pop_to(&mut self, key: &ScreenKey) -> bool {
        let Some(index) = self.state.position(key) else {
            debug!("{} pop_to {}: not on the stack", self.id, key);
            return false;
        };

        let depth = index + 1;
        if depth < self.state.stack.len() {
            self.state.stack.truncate(depth);
            debug!("{} popped to {} (depth {})", self.id, key, depth);
            self.record();
            self.publish(NavigationEvent::PoppedTo { depth });
        }
        true
    }

    /// `pop_to` for a concrete screen value
    pub fn pop_to_screen<S: ScreenMeta>(&mut self, screen: &S) -> bool {
        self.pop_to(&ScreenKey::of(screen))
    }

    /// Replace the whole stack with `screen`. Sheet and full-screen slots are
    /// kept.
    pub fn set_root(&mut self, screen: ScreenHandle<F::View>) {
        let root = screen.key().clone();
        self.state.stack.clear();
        self.state.stack.push(screen);
        debug!("{} set root {}", self.id, root);
        self.record();
        self.publish(NavigationEvent::StackReplaced { root });
    }

    /// Number of screens on the stack
    pub fn depth(&self) -> usize {
        self.state.stack.len()
    }
}
