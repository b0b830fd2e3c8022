use std::sync::mpsc::{self, Receiver, Sender};

use crate::deeplink::DeepLink;
use crate::handle::ScreenHandle;
use crate::screen::ScreenKey;

/// Commands represent navigation a coordinator should perform.
///
/// They let code that does not own the coordinator (deep-link handlers,
/// background work) request navigation; the owning thread applies them with
/// [`Coordinator::apply`](crate::Coordinator::apply).
pub enum NavCommand<V> {
    /// Do nothing
    None,

    /// Execute multiple commands in sequence
    Batch(Vec<NavCommand<V>>),

    /// Present in the slot the screen's style asks for
    Present(ScreenHandle<V>),

    Push(ScreenHandle<V>),

    Pop,

    /// Truncate the stack after the first screen with this identity
    PopTo(ScreenKey),

    PopToRoot,

    SetRoot(ScreenHandle<V>),

    Dismiss,

    GoBack,

    GoForward,

    /// Resolve a deep link incrementally against the coordinator
    OpenDeepLink(DeepLink),
}

impl<V> NavCommand<V> {
    /// Helper to present a screen
    pub fn present(screen: ScreenHandle<V>) -> Self {
        NavCommand::Present(screen)
    }

    /// Helper to push a screen
    pub fn push(screen: ScreenHandle<V>) -> Self {
        NavCommand::Push(screen)
    }

    /// Helper to open a deep link
    pub fn open(link: DeepLink) -> Self {
        NavCommand::OpenDeepLink(link)
    }

    /// Helper to batch multiple commands
    pub fn batch(commands: Vec<NavCommand<V>>) -> Self {
        NavCommand::Batch(commands)
    }
}

impl<V> Default for NavCommand<V> {
    fn default() -> Self {
        NavCommand::None
    }
}

/// Cloneable sending side of a [`CommandQueue`]
pub struct CommandSender<V> {
    sender: Sender<NavCommand<V>>,
}

impl<V> CommandSender<V> {
    /// Queue a command; false once the queue has been dropped
    pub fn send(&self, command: NavCommand<V>) -> bool {
        self.sender.send(command).is_ok()
    }
}

impl<V> Clone for CommandSender<V> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Single-consumer queue funnelling navigation requests to the one thread
/// that owns the coordinators
pub struct CommandQueue<V> {
    sender: Sender<NavCommand<V>>,
    receiver: Receiver<NavCommand<V>>,
}

impl<V> CommandQueue<V> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> CommandSender<V> {
        CommandSender {
            sender: self.sender.clone(),
        }
    }

    /// Next pending command without blocking
    pub fn try_next(&self) -> Option<NavCommand<V>> {
        self.receiver.try_recv().ok()
    }
}

impl<V> Default for CommandQueue<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::Coordinator;
    use crate::coordinator::tests::{TextFactory, screen};
    use crate::screen::PresentationStyle;
    use std::thread;

    #[test]
    fn test_commands_from_another_thread_apply_in_order() {
        let queue = CommandQueue::new();
        let sender = queue.sender();

        thread::spawn(move || {
            sender.send(NavCommand::push(screen("list", "1", PresentationStyle::Push)));
            sender.send(NavCommand::batch(vec![
                NavCommand::push(screen("list", "2", PresentationStyle::Push)),
                NavCommand::present(screen("share", "3", PresentationStyle::Sheet)),
            ]));
            sender.send(NavCommand::Dismiss);
        })
        .join()
        .unwrap();

        let mut coordinator = Coordinator::new(TextFactory);
        assert_eq!(coordinator.drain(&queue), 3);
        assert_eq!(coordinator.depth(), 2);
        assert!(coordinator.state().sheet.is_none());
        assert_eq!(coordinator.drain(&queue), 0);
    }

    #[test]
    fn test_open_deep_link_command() {
        let queue = CommandQueue::new();
        queue.sender().send(NavCommand::open(DeepLink::from_path("profile/5")));
        queue.sender().send(NavCommand::GoBack);

        let mut coordinator = Coordinator::new(TextFactory);
        coordinator.drain(&queue);
        // The seeded empty state is reached again after one step back
        assert!(coordinator.state().is_empty());
        assert!(coordinator.can_go_forward());
    }
}
