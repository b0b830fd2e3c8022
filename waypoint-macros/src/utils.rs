use syn::{Attribute, LitStr};

/// Options collected from every `#[screen(...)]` attribute on one item
#[derive(Default)]
pub struct ScreenAttrs {
    pub kind: Option<LitStr>,
    pub style: Option<LitStr>,
    pub persist: bool,
    pub id: bool,
}

/// Parse all `#[screen(...)]` attributes, consuming `key = "value"` pairs and bare flags.
///
/// Unknown keys are rejected so typos surface as compile errors.
pub fn parse_screen_attrs(attrs: &[Attribute]) -> syn::Result<ScreenAttrs> {
    let mut parsed = ScreenAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("screen")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                parsed.kind = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("style") {
                parsed.style = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("persist") {
                parsed.persist = true;
            } else if meta.path.is_ident("id") {
                parsed.id = true;
            } else {
                return Err(meta.error("expected one of `kind`, `style`, `persist`, `id`"));
            }
            Ok(())
        })?;
    }

    Ok(parsed)
}

/// Check whether an attribute list carries `#[screen(id)]`
pub fn has_id_flag(attrs: &[Attribute]) -> syn::Result<bool> {
    Ok(parse_screen_attrs(attrs)?.id)
}
