//! Deep-link registry: accepted schemes, universal-link domains and
//! pattern handlers.
//!
//! Dispatch order is deterministic: higher explicit priority first, then the
//! pattern with more literal segments, then registration order. A path that
//! matches both `profile/*` and `profile/settings` therefore goes to
//! `profile/settings`.

use arc_swap::ArcSwap;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::{DeepLink, Locator, RoutePattern};
use crate::coordinator::Navigator;

/// Receives a deep link whose path matched a registered pattern.
///
/// Handlers may run away from the thread owning the coordinators, so they
/// are `Send + Sync`; to mutate navigation state they send a
/// [`NavCommand`](crate::command::NavCommand) through a
/// [`CommandSender`](crate::command::CommandSender).
pub trait DeepLinkHandler: Send + Sync {
    fn handle(&self, link: &DeepLink);
}

impl<F> DeepLinkHandler for F
where
    F: Fn(&DeepLink) + Send + Sync,
{
    fn handle(&self, link: &DeepLink) {
        self(link)
    }
}

#[derive(Clone)]
struct Route {
    pattern: RoutePattern,
    priority: i32,
    order: usize,
    handler: Arc<dyn DeepLinkHandler>,
}

#[derive(Clone, Default)]
pub struct DeepLinkRegistry {
    schemes: BTreeSet<String>,
    universal_domains: BTreeSet<String>,
    /// Kept sorted in dispatch order
    routes: Vec<Route>,
    next_order: usize,
}

impl DeepLinkRegistry {
    /// An isolated, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_scheme(&mut self, scheme: impl AsRef<str>) {
        let scheme = scheme.as_ref().trim_end_matches("://").to_ascii_lowercase();
        debug!("Registered deep-link scheme '{}'", scheme);
        self.schemes.insert(scheme);
    }

    pub fn register_universal_link_domain(&mut self, domain: impl AsRef<str>) {
        let domain = domain.as_ref().to_ascii_lowercase();
        debug!("Registered universal-link domain '{}'", domain);
        self.universal_domains.insert(domain);
    }

    /// Register a handler with default priority 0
    pub fn register<H>(&mut self, pattern: &str, handler: H)
    where
        H: DeepLinkHandler + 'static,
    {
        self.register_with_priority(pattern, 0, handler);
    }

    /// Register a handler; re-registering an equivalent pattern replaces its
    /// handler and priority but keeps its original registration order
    pub fn register_with_priority<H>(&mut self, pattern: &str, priority: i32, handler: H)
    where
        H: DeepLinkHandler + 'static,
    {
        self.register_arc(pattern, priority, Arc::new(handler));
    }

    /// Register an already shared handler
    pub fn register_arc(&mut self, pattern: &str, priority: i32, handler: Arc<dyn DeepLinkHandler>) {
        let pattern = RoutePattern::parse(pattern);

        if let Some(existing) = self.routes.iter_mut().find(|route| route.pattern.is_equivalent(&pattern)) {
            debug!("Replacing handler for pattern '{}'", pattern);
            existing.pattern = pattern;
            existing.priority = priority;
            existing.handler = handler;
        } else {
            debug!("Registered pattern '{}' with priority {}", pattern, priority);
            self.routes.push(Route {
                pattern,
                priority,
                order: self.next_order,
                handler,
            });
            self.next_order += 1;
        }

        self.routes
            .sort_by_key(|route| (Reverse(route.priority), Reverse(route.pattern.literal_count()), route.order));
    }

    /// Returns false if no equivalent pattern was registered
    pub fn unregister(&mut self, pattern: &str) -> bool {
        let pattern = RoutePattern::parse(pattern);
        let before = self.routes.len();
        self.routes.retain(|route| !route.pattern.is_equivalent(&pattern));
        self.routes.len() != before
    }

    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(String::as_str)
    }

    pub fn universal_domains(&self) -> impl Iterator<Item = &str> {
        self.universal_domains.iter().map(String::as_str)
    }

    /// Registered patterns in dispatch order
    pub fn patterns(&self) -> impl Iterator<Item = &RoutePattern> {
        self.routes.iter().map(|route| &route.pattern)
    }

    /// Accepted iff the scheme is registered or the host is a universal-link domain
    pub fn is_valid(&self, locator: &Locator) -> bool {
        self.schemes.contains(&locator.scheme)
            || locator
                .host
                .as_ref()
                .is_some_and(|host| self.universal_domains.contains(host))
    }

    pub fn is_valid_url(&self, url: &str) -> bool {
        Locator::parse(url).is_ok_and(|locator| self.is_valid(&locator))
    }

    /// The pattern that would receive this link
    pub fn matching_route(&self, link: &DeepLink) -> Option<&RoutePattern> {
        self.routes
            .iter()
            .find(|route| route.pattern.matches(link.components()))
            .map(|route| &route.pattern)
    }

    /// Hand an already accepted link to the first matching handler
    pub fn dispatch(&self, link: &DeepLink) -> bool {
        match self.routes.iter().find(|route| route.pattern.matches(link.components())) {
            Some(route) => {
                info!("Deep link {} matched pattern '{}'", link, route.pattern);
                route.handler.handle(link);
                true
            }
            None => {
                debug!("No pattern matches deep link {}", link);
                false
            }
        }
    }

    /// Validate and parse `url`; `None` when it is malformed or not accepted
    pub fn accept(&self, url: &str) -> Option<DeepLink> {
        let locator = match Locator::parse(url) {
            Ok(locator) => locator,
            Err(e) => {
                warn!("Rejecting malformed deep link: {:#}", e);
                return None;
            }
        };

        if !self.is_valid(&locator) {
            warn!("Rejecting deep link with unregistered scheme/domain: {}", url);
            return None;
        }

        Some(DeepLink::from_locator(&locator))
    }

    /// Full registry dispatch: validate, parse, then run the first matching handler
    pub fn handle(&self, url: &str) -> bool {
        self.accept(url).is_some_and(|link| self.dispatch(&link))
    }

    /// Validate, then resolve the link incrementally against a coordinator.
    ///
    /// Validation happens before any state change, so a rejected URL leaves
    /// the coordinator untouched.
    pub fn route<N>(&self, url: &str, navigator: &mut N) -> bool
    where
        N: Navigator + ?Sized,
    {
        match self.accept(url) {
            Some(link) => navigator.handle_deep_link(&link),
            None => false,
        }
    }
}

impl fmt::Debug for DeepLinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepLinkRegistry")
            .field("schemes", &self.schemes)
            .field("universal_domains", &self.universal_domains)
            .field("patterns", &self.routes.iter().map(|route| route.pattern.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

// Process-wide registry. Readers take a lock-free snapshot; registrations
// swap in an updated copy.
static SHARED: Lazy<ArcSwap<DeepLinkRegistry>> = Lazy::new(|| ArcSwap::from_pointee(DeepLinkRegistry::new()));

/// Snapshot of the shared registry
pub fn shared() -> Arc<DeepLinkRegistry> {
    SHARED.load_full()
}

/// Apply a registration to the shared registry.
///
/// `update` may run more than once if another registration races with it.
pub fn update_shared<F>(update: F)
where
    F: Fn(&mut DeepLinkRegistry),
{
    SHARED.rcu(|current| {
        let mut next = DeepLinkRegistry::clone(current);
        update(&mut next);
        next
    });
}
