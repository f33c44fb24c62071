/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemEnum};

/// Turns a plain enum into the service error type.
///
/// Derives `Debug`, `serde::Serialize` and `thiserror::Error`, and gives every variant a
/// display string equal to its name in SCREAMING_SNAKE_CASE (`MalformedEvent` displays as
/// `MALFORMED_EVENT`). The display string doubles as the error code used by the middleware
/// when deciding which failed request bodies to log.
///
/// The annotated enum keeps its visibility, generics and variant attributes. The crate
/// using it must depend on `serde` and `thiserror`.
#[proc_macro_attribute]
pub fn add_error(_: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ItemEnum);
    let attrs = &input.attrs;
    let vis = &input.vis;
    let enum_name = &input.ident;
    let generics = &input.generics;

    let variants = input.variants.iter().map(|variant| {
        let code = to_screaming_snake_case(&variant.ident.to_string());
        quote! {
            #[error(#code)]
            #variant,
        }
    });

    let expanded = quote! {
        #(#attrs)*
        #[derive(Debug, serde::Serialize, thiserror::Error)]
        #vis enum #enum_name #generics {
            #(#variants)*
        }
    };

    TokenStream::from(expanded)
}

fn to_screaming_snake_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len() + 4);
    let mut last_char_was_upper = false;

    for c in input.chars() {
        if c.is_uppercase() {
            if !last_char_was_upper && !result.is_empty() {
                result.push('_');
            }
            last_char_was_upper = true;
        } else {
            last_char_was_upper = false;
        }
        result.push(c.to_ascii_uppercase());
    }

    result
}
