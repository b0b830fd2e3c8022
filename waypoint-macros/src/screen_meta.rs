use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Index};

use crate::utils::{has_id_flag, parse_screen_attrs};

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(name, "ScreenMeta can only be derived for structs"));
    };

    let attrs = parse_screen_attrs(&input.attrs)?;
    if attrs.id {
        return Err(syn::Error::new_spanned(name, "`id` belongs on a field, not on the struct"));
    }

    let kind = match &attrs.kind {
        Some(lit) => lit.value(),
        None => name.to_string(),
    };

    let style = match attrs.style.as_ref().map(|lit| (lit.value(), lit)) {
        None => quote! { ::waypoint::PresentationStyle::Automatic },
        Some((value, lit)) => match value.as_str() {
            "automatic" => quote! { ::waypoint::PresentationStyle::Automatic },
            "push" => quote! { ::waypoint::PresentationStyle::Push },
            "modal" => quote! { ::waypoint::PresentationStyle::Modal },
            "full_screen" => quote! { ::waypoint::PresentationStyle::FullScreen },
            "sheet" => quote! { ::waypoint::PresentationStyle::Sheet },
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("Unsupported presentation style: {}", other),
                ));
            }
        },
    };

    // Find the #[screen(id)] field, if any
    let mut id_accessor = None;
    match &data_struct.fields {
        Fields::Named(fields) => {
            for field in fields.named.iter() {
                if has_id_flag(&field.attrs)? {
                    if id_accessor.is_some() {
                        return Err(syn::Error::new_spanned(field, "Only one field may be marked #[screen(id)]"));
                    }
                    let ident = &field.ident;
                    id_accessor = Some(quote! { self.#ident });
                }
            }
        }
        Fields::Unnamed(fields) => {
            for (index, field) in fields.unnamed.iter().enumerate() {
                if has_id_flag(&field.attrs)? {
                    if id_accessor.is_some() {
                        return Err(syn::Error::new_spanned(field, "Only one field may be marked #[screen(id)]"));
                    }
                    let index = Index::from(index);
                    id_accessor = Some(quote! { self.#index });
                }
            }
        }
        Fields::Unit => {}
    }

    let identity = match id_accessor {
        Some(accessor) => quote! { ::std::string::ToString::to_string(&#accessor) },
        None => quote! { ::std::string::String::from(#kind) },
    };

    let payload = if attrs.persist {
        quote! {
            fn payload(&self) -> ::waypoint::serde_json::Value {
                ::waypoint::persist::encode_payload(self)
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::waypoint::ScreenMeta for #name #ty_generics #where_clause {
            const KIND: &'static str = #kind;

            fn identity(&self) -> ::std::string::String {
                #identity
            }

            fn presentation_style(&self) -> ::waypoint::PresentationStyle {
                #style
            }

            #payload
        }
    })
}
