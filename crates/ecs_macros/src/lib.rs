//! # sparsecs_macros
//!
//! Procedural macros that register component and tag types with
//! `sparsecs_core`'s process-wide type registry.
//!
//! ## `#[component]`
//! Derives `Debug`, `Clone`, `PartialEq` and implements the `Component`
//! marker trait, so the struct can be stored in a world column.
//!
//! ## `#[tag]`
//! Derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Default` and
//! implements the `Tag` marker trait for a zero-payload marker struct.

use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Marks a struct as a component.
///
/// # Example
/// ```ignore
/// #[component]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// // Expands to:
/// #[derive(Debug, Clone, PartialEq)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
/// impl ::sparsecs::Component for Position {}
/// ```
#[proc_macro_attribute]
pub fn component(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as syn::ItemStruct);
    let name = &input.ident;

    let output = quote! {
        #[derive(Debug, Clone, PartialEq)]
        #input

        impl ::sparsecs::Component for #name {}
    };

    output.into()
}

/// Marks a zero-payload struct as a tag.
///
/// # Example
/// ```ignore
/// #[tag]
/// struct Alive;
///
/// // Expands to:
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// struct Alive;
/// impl ::sparsecs::Tag for Alive {}
/// ```
#[proc_macro_attribute]
pub fn tag(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as syn::ItemStruct);
    let name = &input.ident;

    let output = quote! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        #input

        impl ::sparsecs::Tag for #name {}
    };

    output.into()
}
