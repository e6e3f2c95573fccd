extern crate proc_macro;

use proc_macro::TokenStream;

mod lerp;

/// Implements `Lerp` for a struct by interpolating each of its fields.
///
/// Every field must itself implement `Lerp`, unless it is marked `#[lerp(skip)]`; skipped fields
/// only need `Clone`, and are copied from the destination value.
#[proc_macro_derive(Lerp, attributes(lerp))]
pub fn derive_lerp(input: TokenStream) -> TokenStream {
    lerp::lerp_impl(input)
}
