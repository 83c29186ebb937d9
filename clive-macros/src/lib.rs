mod ast;
mod parse;
mod emit;

#[cfg(not(test))]
#[proc_macro_derive(Command, attributes(cli))]
pub fn derive_command(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(ts, ast::Derive::Command)
}

#[cfg(not(test))]
#[proc_macro_derive(Inline, attributes(cli))]
pub fn derive_inline(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(ts, ast::Derive::Inline)
}

#[cfg(not(test))]
#[proc_macro_derive(Subcommands, attributes(cli))]
pub fn derive_subcommands(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(ts, ast::Derive::Subcommands)
}

#[cfg(not(test))]
#[proc_macro_derive(Text, attributes(cli))]
pub fn derive_text(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(ts, ast::Derive::Text)
}

#[cfg(not(test))]
fn expand(ts: proc_macro::TokenStream, derive: ast::Derive) -> proc_macro::TokenStream {
    let text = match parse::parse(ts.into(), derive) {
        Ok(item) => emit::emit(&item),
        Err(err) => format!("compile_error!({:?});", format!("invalid descriptor, {}", err)),
    };
    text.parse().unwrap()
}

#[cfg(test)]
pub(crate) fn compile(src: &str, derive: ast::Derive) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    let item = parse::parse(ts, derive).unwrap();
    emit::emit(&item)
}
