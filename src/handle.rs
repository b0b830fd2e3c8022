use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::screen::{PresentationStyle, Screen, ScreenKey};

type RenderFn<V> = dyn Fn() -> V + Send + Sync;

/// Type-erased screen: identity token, presentation style, restoration payload
/// and a captured render thunk.
///
/// Handles are cheap to clone. Every state structure holds its own copy; the
/// captured screen is an immutable snapshot taken at presentation time.
pub struct ScreenHandle<V> {
    key: ScreenKey,
    style: PresentationStyle,
    payload: Value,
    render: Arc<RenderFn<V>>,
}

impl<V> ScreenHandle<V> {
    /// Erase a concrete screen
    pub fn new<S>(screen: S) -> Self
    where
        S: Screen<View = V> + Send + Sync + 'static,
        V: 'static,
    {
        let key = ScreenKey::of(&screen);
        let style = screen.presentation_style();
        let payload = screen.payload();
        let screen = Arc::new(screen);
        Self {
            key,
            style,
            payload,
            render: Arc::new(move || screen.render()),
        }
    }

    /// Build a handle from loose parts, for factories that do not model
    /// their screens as dedicated types
    pub fn from_parts<F>(key: ScreenKey, style: PresentationStyle, payload: Value, render: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self {
            key,
            style,
            payload,
            render: Arc::new(render),
        }
    }

    pub fn key(&self) -> &ScreenKey {
        &self.key
    }

    pub fn kind(&self) -> &str {
        &self.key.kind
    }

    pub fn identity(&self) -> &str {
        &self.key.identity
    }

    pub fn presentation_style(&self) -> PresentationStyle {
        self.style
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn render(&self) -> V {
        (self.render)()
    }

    /// Same handle with a different presentation style
    pub fn with_style(mut self, style: PresentationStyle) -> Self {
        self.style = style;
        self
    }
}

// Manual impl: deriving would require `V: Clone`
impl<V> Clone for ScreenHandle<V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            style: self.style,
            payload: self.payload.clone(),
            render: Arc::clone(&self.render),
        }
    }
}

impl<V> PartialEq for ScreenHandle<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<V> Eq for ScreenHandle<V> {}

impl<V> fmt::Debug for ScreenHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenHandle")
            .field("key", &self.key)
            .field("style", &self.style)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenMeta;

    struct Detail {
        id: u32,
    }

    impl ScreenMeta for Detail {
        const KIND: &'static str = "detail";

        fn identity(&self) -> String {
            self.id.to_string()
        }

        fn presentation_style(&self) -> PresentationStyle {
            PresentationStyle::Push
        }
    }

    impl Screen for Detail {
        type View = String;

        fn render(&self) -> String {
            format!("detail {}", self.id)
        }
    }

    #[test]
    fn test_handle_captures_screen() {
        let handle = ScreenHandle::new(Detail { id: 3 });
        assert_eq!(handle.key(), &ScreenKey::new("detail", "3"));
        assert_eq!(handle.presentation_style(), PresentationStyle::Push);
        assert_eq!(handle.payload(), &Value::String("3".to_string()));
        assert_eq!(handle.render(), "detail 3");
        // Rendering is repeatable
        assert_eq!(handle.render(), "detail 3");
    }

    #[test]
    fn test_equality_uses_kind_and_identity() {
        let a = ScreenHandle::new(Detail { id: 1 });
        let b = ScreenHandle::new(Detail { id: 1 });
        let other_kind = ScreenHandle::from_parts(
            ScreenKey::new("summary", "1"),
            PresentationStyle::Push,
            Value::Null,
            || "summary".to_string(),
        );
        assert_eq!(a, b);
        assert_ne!(a, other_kind);
    }

    #[test]
    fn test_clone_shares_render_thunk() {
        let handle = ScreenHandle::new(Detail { id: 9 });
        let copy = handle.clone().with_style(PresentationStyle::Sheet);
        assert_eq!(copy.render(), handle.render());
        assert_eq!(copy.presentation_style(), PresentationStyle::Sheet);
        assert_eq!(handle.presentation_style(), PresentationStyle::Push);
    }
}
