use proc_macro::TokenStream;

mod screen_meta;
mod utils;

/// Derive `waypoint::ScreenMeta` for a screen type.
///
/// Container attributes (all optional):
/// - `#[screen(kind = "profile")]` stable discriminator, defaults to the type name
/// - `#[screen(style = "push")]` one of `automatic`, `push`, `modal`, `full_screen`, `sheet`
/// - `#[screen(persist)]` encode the whole value as the restoration payload (requires `Serialize`)
///
/// Field attribute:
/// - `#[screen(id)]` the field whose `to_string()` is the screen identity
#[proc_macro_derive(ScreenMeta, attributes(screen))]
pub fn screen_meta_derive(input: TokenStream) -> TokenStream {
    screen_meta::derive(input)
}
