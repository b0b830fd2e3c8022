use anyhow::Result;
use std::sync::{Arc, Mutex};
use waypoint::deeplink::registry;
use waypoint::{
    Coordinator, DeepLink, DeepLinkRegistry, Locator, Navigator, PresentationStyle, RoutePattern, ScreenFactory,
    ScreenHandle, ScreenKey,
};

struct ProfileFactory;

impl ScreenFactory for ProfileFactory {
    type View = String;

    fn make_root_view(&self) -> String {
        "root".to_string()
    }

    fn create_screen(&self, link: &DeepLink) -> Option<ScreenHandle<String>> {
        match link.components() {
            [profile, id] if profile == "profile" => {
                let tab = link.parameter("tab").unwrap_or("overview").to_string();
                Some(ScreenHandle::from_parts(
                    ScreenKey::new("profile", id.as_str()),
                    PresentationStyle::Push,
                    serde_json::Value::String(id.clone()),
                    move || format!("profile ({})", tab),
                ))
            }
            _ => None,
        }
    }
}

#[test]
fn test_profile_url_reaches_handler() -> Result<()> {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    let mut registry = DeepLinkRegistry::new();
    registry.register_scheme("app");
    registry.register("profile/*", move |link: &DeepLink| {
        sink.lock().unwrap().push(link.clone());
    });

    let url = "app://host/profile/7?tab=posts";
    assert!(registry.is_valid_url(url));
    assert!(registry.handle(url));

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].components(), ["profile", "7"]);
    assert_eq!(received[0].parameter("tab"), Some("posts"));
    Ok(())
}

#[test]
fn test_locator_parsing_details() -> Result<()> {
    let locator = Locator::parse("HTTPS://user@Example.com:8443/a%20b//c/?q=1+2&q=last#frag")?;
    assert_eq!(locator.scheme, "https");
    assert_eq!(locator.host.as_deref(), Some("example.com"));
    assert_eq!(locator.segments, vec!["a b", "c"]);
    assert_eq!(locator.query.get("q").map(String::as_str), Some("last"));

    let link = DeepLink::parse("app://host/search?term=rust+lang")?;
    assert_eq!(link.parameter("term"), Some("rust lang"));
    assert_eq!(link.to_string(), "/search?term=rust lang");

    assert!(Locator::parse("no scheme here").is_err());
    Ok(())
}

#[test]
fn test_pattern_segment_rules() {
    let user = RoutePattern::parse("user/*");
    assert!(user.matches(&["user", "123"]));
    assert!(!user.matches(&["user"]));
    assert!(!user.matches(&["user", "1", "2"]));

    let any = RoutePattern::parse("*");
    assert!(any.matches(&["anything"]));
    assert!(!any.matches(&["a", "b"]));
    assert_eq!(user.captures(&["user", "42"]), Some(vec!["42"]));
}

#[test]
fn test_route_into_coordinator() {
    let mut registry = DeepLinkRegistry::new();
    registry.register_scheme("app");
    registry.register_universal_link_domain("example.com");

    let mut coordinator = Coordinator::new(ProfileFactory);
    assert!(registry.route("https://example.com/profile/3?tab=likes", &mut coordinator));
    assert_eq!(coordinator.state().top().map(|h| h.render()), Some("profile (likes)".to_string()));

    // Rejected before any state change
    let history_len = coordinator.history().len();
    assert!(!registry.route("https://elsewhere.org/profile/4", &mut coordinator));
    assert_eq!(coordinator.navigation_state().path(), vec![&ScreenKey::new("profile", "3")]);
    assert_eq!(coordinator.history().len(), history_len);
}

#[test]
fn test_route_through_trait_object() {
    let mut registry = DeepLinkRegistry::new();
    registry.register_scheme("app");

    let mut navigator: Box<dyn Navigator<View = String>> = Box::new(Coordinator::new(ProfileFactory));
    assert!(registry.route("app://x/profile/9", navigator.as_mut()));
    assert!(!registry.route("app://x/unknown", navigator.as_mut()));
    // An unresolvable link still resets the coordinator
    assert!(navigator.navigation_state().is_empty());
}

#[test]
fn test_shared_registry_snapshot() {
    registry::update_shared(|shared| {
        shared.register_scheme("deeplink-test");
        shared.register("ping", |_: &DeepLink| {});
    });

    let snapshot = registry::shared();
    assert!(snapshot.handle("deeplink-test://h/ping"));
    assert!(!snapshot.handle("deeplink-test://h/pong"));
}
