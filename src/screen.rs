use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Where a presented screen lands in a coordinator's navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStyle {
    /// Push when something is already on the stack, otherwise show as a sheet
    #[default]
    Automatic,
    Push,
    /// Shown in the sheet slot
    Modal,
    FullScreen,
    Sheet,
}

impl fmt::Display for PresentationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PresentationStyle::Automatic => "automatic",
            PresentationStyle::Push => "push",
            PresentationStyle::Modal => "modal",
            PresentationStyle::FullScreen => "full_screen",
            PresentationStyle::Sheet => "sheet",
        };
        f.write_str(name)
    }
}

/// Identity token of a screen: its kind discriminator plus its identity.
///
/// Two screens are the same screen iff both parts are equal, so a `Profile`
/// with id `"7"` never collides with a `Settings` screen that happens to use
/// the same identity string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScreenKey {
    pub kind: String,
    pub identity: String,
}

impl ScreenKey {
    pub fn new(kind: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            identity: identity.into(),
        }
    }

    /// Key for a concrete screen value
    pub fn of<S: ScreenMeta + ?Sized>(screen: &S) -> Self {
        Self::new(S::KIND, screen.identity())
    }
}

impl fmt::Display for ScreenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.identity)
    }
}

/// Identity and presentation metadata of a screen.
///
/// Usually implemented via `#[derive(ScreenMeta)]`.
pub trait ScreenMeta {
    /// Stable discriminator for the concrete screen type, also used as the
    /// restoration identifier when state is persisted
    const KIND: &'static str;

    /// Stable identity, unique among screens of the same kind
    fn identity(&self) -> String;

    fn presentation_style(&self) -> PresentationStyle {
        PresentationStyle::Automatic
    }

    /// Opaque payload handed back to the screen factory on restoration.
    /// Defaults to the identity string.
    fn payload(&self) -> Value {
        Value::String(self.identity())
    }
}

/// A renderable screen. Rendering must be side-effect free and repeatable.
pub trait Screen: ScreenMeta {
    /// Whatever the UI toolkit renders; opaque to the coordinators
    type View;

    fn render(&self) -> Self::View;
}
