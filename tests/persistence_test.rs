use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use waypoint::{
    Coordinator, ModalCoordinator, ModalStyle, Navigator, PersistedState, Screen, ScreenFactory, ScreenHandle,
    ScreenMeta, TabCoordinator, Transition,
    coordinator::Edge,
};

#[derive(ScreenMeta, Serialize, Deserialize)]
#[screen(kind = "thread", style = "push", persist)]
struct Thread {
    #[screen(id)]
    id: u32,
    title: String,
}

#[derive(ScreenMeta)]
#[screen(kind = "player", style = "full_screen")]
struct Player {
    #[screen(id)]
    track: String,
}

impl Screen for Thread {
    type View = String;

    fn render(&self) -> String {
        format!("{}: {}", self.id, self.title)
    }
}

impl Screen for Player {
    type View = String;

    fn render(&self) -> String {
        format!("playing {}", self.track)
    }
}

struct MailFactory;

impl ScreenFactory for MailFactory {
    type View = String;

    fn make_root_view(&self) -> String {
        "mailboxes".to_string()
    }

    fn restore_screen(&self, identifier: &str, payload: &Value) -> Option<ScreenHandle<String>> {
        match identifier {
            "thread" => {
                let thread: Thread = serde_json::from_value(payload.clone()).ok()?;
                Some(ScreenHandle::new(thread))
            }
            "player" => Some(ScreenHandle::new(Player {
                track: payload.as_str()?.to_string(),
            })),
            _ => None,
        }
    }
}

fn thread(id: u32, title: &str) -> ScreenHandle<String> {
    ScreenHandle::new(Thread {
        id,
        title: title.to_string(),
    })
}

fn chrome(_: &[String], _: Option<&String>, content: Option<String>) -> String {
    content.unwrap_or_default()
}

#[test]
fn test_coordinator_restores_stack_and_slots() -> Result<()> {
    let mut original = Coordinator::new(MailFactory);
    original.push(thread(1, "Welcome"));
    original.push(thread(2, "Re: lunch"));
    original.present(ScreenHandle::new(Player {
        track: "intro.mp3".to_string(),
    }));

    let encoded = original.persist().encode()?;
    let mut restored = Coordinator::new(MailFactory);
    restored.restore(&PersistedState::decode(&encoded)?);

    assert_eq!(restored.state(), original.state());
    assert_eq!(restored.frame().stack, vec!["1: Welcome".to_string(), "2: Re: lunch".to_string()]);
    assert_eq!(restored.frame().full_screen.as_deref(), Some("playing intro.mp3"));
    // History restarts at the restored state
    assert!(!restored.can_go_back());
    Ok(())
}

#[test]
fn test_payload_carries_whole_screen() -> Result<()> {
    let mut coordinator = Coordinator::new(MailFactory);
    coordinator.push(thread(5, "Invoice"));
    let value: Value = serde_json::from_str(&coordinator.persist().encode()?)?;
    assert_eq!(value["stack"][0], json!({"identifier": "thread", "payload": {"id": 5, "title": "Invoice"}}));
    Ok(())
}

#[test]
fn test_unknown_entries_are_skipped() -> Result<()> {
    let record = PersistedState::decode(
        r#"{
            "stack": [
                {"identifier": "thread", "payload": {"id": 1, "title": "kept"}},
                {"identifier": "calendar", "payload": "2024-01-01"},
                {"identifier": "thread", "payload": "not an object"}
            ],
            "sheet": {"identifier": "compose", "payload": null}
        }"#,
    )?;

    let mut coordinator = Coordinator::new(MailFactory);
    coordinator.restore(&record);
    assert_eq!(coordinator.depth(), 1);
    assert!(coordinator.state().sheet.is_none());
    Ok(())
}

#[test]
fn test_modal_stack_is_persisted() -> Result<()> {
    let mut original = ModalCoordinator::new(MailFactory);
    original.base_mut().push(thread(1, "Inbox zero"));
    original.present_modal(thread(2, "Draft"), ModalStyle::Sheet, Transition::Slide(Edge::Bottom), true);
    original.present_modal(
        ScreenHandle::new(Player {
            track: "a.mp3".to_string(),
        }),
        ModalStyle::Popup,
        Transition::Custom("bounce".to_string()),
        false,
    );

    let record = PersistedState::decode(&original.persist().encode_pretty()?)?;
    let mut restored = ModalCoordinator::new(MailFactory);
    restored.restore(&record);

    assert_eq!(restored.base().depth(), 1);
    let modals: Vec<(String, ModalStyle, Transition, bool)> = restored
        .modal_stack()
        .iter()
        .map(|entry| (entry.key().to_string(), entry.style, entry.transition.clone(), entry.dismissible))
        .collect();
    assert_eq!(
        modals,
        vec![
            ("thread#2".to_string(), ModalStyle::Sheet, Transition::Slide(Edge::Bottom), true),
            ("player#a.mp3".to_string(), ModalStyle::Popup, Transition::Custom("bounce".to_string()), false),
        ]
    );
    Ok(())
}

#[test]
fn test_tab_records_are_keyed_by_tab() -> Result<()> {
    let mut original = TabCoordinator::new(chrome);
    original.add_child(Coordinator::new(MailFactory), "inbox".to_string());
    original.add_child(ModalCoordinator::new(MailFactory), "archive".to_string());
    original.present(thread(1, "Unread"));
    original.switch_to(&"archive".to_string());
    original.present(thread(7, "Old news"));
    original.present(thread(8, "Older news"));

    let record = original.persist();
    assert_eq!(record.selected_tab.as_deref(), Some("archive"));
    assert_eq!(record.children["inbox"].stack.len(), 1);
    assert_eq!(record.children["archive"].stack.len(), 2);

    let mut restored = TabCoordinator::new(chrome);
    restored.add_child(Coordinator::new(MailFactory), "inbox".to_string());
    restored.add_child(ModalCoordinator::new(MailFactory), "archive".to_string());
    restored.add_child(Coordinator::new(MailFactory), "spam".to_string());
    restored.restore(&PersistedState::decode(&record.encode()?)?);

    assert_eq!(restored.selected().map(String::as_str), Some("archive"));
    assert_eq!(restored.navigation_state().stack.len(), 2);
    assert_eq!(restored.make_root_view(), "mailboxes");

    restored.switch_to(&"inbox".to_string());
    assert_eq!(restored.navigation_state().top().map(|h| h.render()), Some("1: Unread".to_string()));
    restored.switch_to(&"spam".to_string());
    assert!(restored.navigation_state().is_empty());
    Ok(())
}
