use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Error, Field, Fields, Index, Meta,
    Path, Result,
};

pub fn lerp_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_lerp(input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand_lerp(input: DeriveInput) -> Result<TokenStream2> {
    let DeriveInput {
        ident: name,
        data,
        generics,
        ..
    } = input;
    let Data::Struct(struct_data) = data else {
        return Err(Error::new(
            Span::call_site(),
            "derive(Lerp) requires a struct type.",
        ));
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &struct_data.fields {
        Fields::Named(fields) => {
            let assignments = fields
                .named
                .iter()
                .map(|field| {
                    let ident = &field.ident;
                    let value = field_value(field, quote!(#ident))?;
                    Ok(quote!(#ident: #value))
                })
                .collect::<Result<Vec<_>>>()?;
            quote!(Self { #(#assignments),* })
        }
        Fields::Unnamed(fields) => {
            let values = fields
                .unnamed
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    let index = Index::from(i);
                    field_value(field, quote!(#index))
                })
                .collect::<Result<Vec<_>>>()?;
            quote!(Self(#(#values),*))
        }
        Fields::Unit => quote!(Self),
    };

    Ok(quote! {
        impl #impl_generics ::relayout::Lerp for #name #ty_generics #where_clause {
            fn lerp(&self, y1: &Self, x: f32) -> Self {
                #body
            }
        }
    })
}

/// Expression for one field of the interpolated value. Skipped fields are taken from `y1`, like
/// every non-interpolated attribute of a snapshot.
fn field_value(field: &Field, member: TokenStream2) -> Result<TokenStream2> {
    if is_skipped(field)? {
        Ok(quote!(::std::clone::Clone::clone(&y1.#member)))
    } else {
        Ok(quote!(::relayout::Lerp::lerp(&self.#member, &y1.#member, x)))
    }
}

fn is_skipped(field: &Field) -> Result<bool> {
    let mut skipped = false;
    for attr in &field.attrs {
        let Meta::List(ref list) = attr.meta else {
            continue;
        };
        if !is_simple_path(&list.path, "lerp") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skipped = true;
                Ok(())
            } else {
                Err(meta.error("Unrecognized lerp attribute; expected `skip`."))
            }
        })?;
    }
    Ok(skipped)
}

fn is_simple_path(path: &Path, name: &str) -> bool {
    path.segments.len() == 1
        && path.segments[0].arguments.is_none()
        && path.segments[0].ident == name
}
