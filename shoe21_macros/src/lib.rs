use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::{parse_macro_input, parse_quote, punctuated::Punctuated, Ident, Token};

/// This macro is added before a method of `RoundEngine` in the impl block.
/// Use this macro to first check if the current round phase is one of the
/// phases in the attribute.
///
/// For example, `#[allowed_phase(PlayerTurn)]` will make a method first check
/// if the current round phase is `PlayerTurn`. If not, the method returns
/// `GameError::WrongPhase` without touching the round. Several phases may be
/// given, separated by commas.
///
/// The method must return `Result<_, GameError>`, and both `RoundPhase` and
/// `GameError` must be in scope where the method is defined.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let phases = parse_macro_input!(attr with Punctuated::<Ident, Token![,]>::parse_terminated);
    let mut ast = parse_macro_input!(item as syn::ImplItemFn);

    if phases.is_empty() {
        let error: TokenStream2 =
            syn::Error::new_spanned(&ast.sig.ident, "allowed_phase needs at least one phase")
                .to_compile_error();
        return error.into();
    }

    let operation = ast.sig.ident.to_string();
    let allowed = phases
        .iter()
        .map(|phase| phase.to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    let phases = phases.iter();

    let guard: syn::Stmt = parse_quote! {
        if !matches!(self.current_phase, #(RoundPhase::#phases)|*) {
            return Err(GameError::WrongPhase {
                operation: #operation,
                allowed: #allowed,
                actual: self.current_phase,
            });
        }
    };
    ast.block.stmts.insert(0, guard);
    ast.into_token_stream().into()
}
