//! Navigation coordinators for declarative UIs.
//!
//! Screens are identified, ordered and dismissed here; how they are drawn is
//! left to the application. A [`Coordinator`] owns one [`NavigationState`]
//! and its [`HistoryLedger`], [`ModalCoordinator`] and [`TabCoordinator`]
//! build on it, and the [`deeplink`] module turns URLs into navigation.

extern crate self as waypoint;

pub mod command;
pub mod config;
pub mod coordinator;
pub mod deeplink;
pub mod handle;
pub mod history;
pub mod persist;
pub mod screen;
pub mod state;
pub mod subscription;

// Referenced by `#[derive(ScreenMeta)]` output
pub use serde_json;

pub use command::{CommandQueue, CommandSender, NavCommand};
pub use config::WaypointConfig;
pub use coordinator::{
    Coordinator, CoordinatorOptions, Frame, ModalCoordinator, ModalEntry, ModalStyle, Navigator, ScreenFactory,
    TabCoordinator, Transition,
};
pub use deeplink::{DeepLink, DeepLinkHandler, DeepLinkRegistry, Locator, RoutePattern};
pub use handle::ScreenHandle;
pub use history::HistoryLedger;
pub use persist::{PersistedScreen, PersistedState};
pub use screen::{PresentationStyle, Screen, ScreenKey, ScreenMeta};
pub use state::{NavigationState, Slot};
pub use subscription::{CoordinatorId, NavigationChange, NavigationEvent, Subscription, SubscriptionId};
pub use waypoint_macros::ScreenMeta;
