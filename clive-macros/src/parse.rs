use std::fmt;

use heck::ToKebabCase;
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{
    ext::IdentExt, Attribute, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments,
    Type,
};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Error {
        Error { msg: err.to_string() }
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

pub(crate) fn parse(ts: TokenStream, derive: ast::Derive) -> Result<ast::Item> {
    let input: DeriveInput = syn::parse2(ts)?;
    let name = input.ident.to_string();
    if !input.generics.params.is_empty() {
        bail!("`{}`: generic types can't derive `{:?}`", name, derive)
    }

    let res = match derive {
        ast::Derive::Command => ast::Item::Command(strukt(&input, true)?),
        ast::Derive::Inline => ast::Item::Inline(strukt(&input, false)?),
        ast::Derive::Subcommands => ast::Item::Subcommands(group(&input)?),
        ast::Derive::Text => ast::Item::Text(enumeration(&input)?),
    };
    Ok(res)
}

fn strukt(input: &DeriveInput, command: bool) -> Result<ast::Struct> {
    let name = input.ident.to_string();
    let fields = match &input.data {
        Data::Struct(it) => &it.fields,
        Data::Enum(_) | Data::Union(_) => bail!("`{}`: only structs can be descriptors", name),
    };
    if let Fields::Unnamed(_) = fields {
        bail!("`{}`: tuple structs can't be descriptors, name the fields", name)
    }

    let mut res = ast::Struct {
        name,
        tag: cli_tag(&input.attrs)?,
        fields: Vec::new(),
        has_subcommands: false,
        has_run: false,
    };
    for (idx, field) in fields.iter().enumerate() {
        let ident = match &field.ident {
            Some(it) => it,
            None => continue,
        };
        let name = ident.unraw().to_string();
        if command && name == "subcommands" {
            res.has_subcommands = true;
            continue;
        }
        if command && name == "run" && last_segment(&field.ty).as_deref() == Some("RunFn") {
            res.has_run = true;
            continue;
        }

        let tag = cli_tag(&field.attrs)?;
        let sections = sections(&tag);
        if tag.trim() == "-" || sections.contains(&"-") {
            continue;
        }
        res.fields.push(ast::Field {
            idx,
            ident: ident.to_string(),
            name,
            inline: sections.contains(&"inline"),
            tag,
            ty: ty(&field.ty),
        });
    }
    Ok(res)
}

fn group(input: &DeriveInput) -> Result<ast::Group> {
    let name = input.ident.to_string();
    let fields = match &input.data {
        Data::Struct(it) => &it.fields,
        Data::Enum(_) | Data::Union(_) => bail!("`{}`: only structs can be subcommand groups", name),
    };
    if let Fields::Unnamed(_) = fields {
        bail!("`{}`: tuple structs can't be subcommand groups, name the fields", name)
    }

    let mut members = Vec::new();
    for field in fields {
        let ident = match &field.ident {
            Some(it) => it.to_string(),
            None => continue,
        };
        let tag = cli_tag(&field.attrs)?;
        let sections = sections(&tag);
        if tag.trim() == "-" || sections.contains(&"-") {
            continue;
        }

        let member = match generic_arg(&field.ty, "Option") {
            Some(inner) => match generic_arg(inner, "Box") {
                Some(boxed) if is_pointer(boxed) => bail!(
                    "subcommand `{}` of `{}` is a double pointer, use `Option<Box<T>>`",
                    ident,
                    name
                ),
                Some(_) => ast::Member::Child { ident },
                None if is_pointer(inner) => bail!(
                    "subcommand `{}` of `{}` is a double pointer, use `Option<Box<T>>`",
                    ident,
                    name
                ),
                None => bail!(
                    "subcommand `{}` of `{}` is held by value, use `Option<Box<T>>`",
                    ident,
                    name
                ),
            },
            None if sections.contains(&"inline") => ast::Member::Flatten { ident },
            None => match generic_arg(&field.ty, "Box") {
                Some(boxed) if is_pointer(boxed) => bail!(
                    "subcommand `{}` of `{}` is a double pointer, use `Option<Box<T>>`",
                    ident,
                    name
                ),
                _ => bail!(
                    "subcommand `{}` of `{}` is held by value, use `Option<Box<T>>` \
                     or tag an embedded group `inline`",
                    ident,
                    name
                ),
            },
        };
        members.push(member);
    }
    Ok(ast::Group { name, members })
}

fn enumeration(input: &DeriveInput) -> Result<ast::Enum> {
    let name = input.ident.to_string();
    let data = match &input.data {
        Data::Enum(it) => it,
        Data::Struct(_) | Data::Union(_) => bail!("`{}`: `Text` can only be derived for enums", name),
    };

    let mut variants = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            bail!("`{}::{}`: `Text` enums can't have fields", name, variant.ident)
        }
        let ident = variant.ident.to_string();
        let tag = cli_tag(&variant.attrs)?;
        let text = sections(&tag)
            .into_iter()
            .find_map(|it| it.strip_prefix("name:"))
            .map(|it| unquote(it).to_string())
            .unwrap_or_else(|| variant.ident.unraw().to_string().to_kebab_case());
        variants.push(ast::Variant { ident, text });
    }
    if variants.is_empty() {
        bail!("`{}`: `Text` enums need at least one variant", name)
    }
    Ok(ast::Enum { name, variants })
}

/// All `#[cli("...")]` attributes, joined as one tag.
fn cli_tag(attrs: &[Attribute]) -> Result<String> {
    let mut res = Vec::new();
    for attr in attrs.iter().filter(|it| it.path().is_ident("cli")) {
        let lit: LitStr =
            attr.parse_args().map_err(|err| format_err!("malformed `#[cli]` attribute: {}", err))?;
        res.push(lit.value());
    }
    Ok(res.join(","))
}

// Only `-`, `inline` and `name` are looked at here; the full tag is parsed
// by the runtime when the command tree is built.
fn sections(tag: &str) -> Vec<&str> {
    let mut res = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (idx, c) in tag.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            ',' if !quoted => {
                res.push(&tag[start..idx]);
                start = idx + 1;
            }
            _ => (),
        }
    }
    res.push(&tag[start..]);
    res.into_iter().map(str::trim).filter(|it| !it.is_empty()).collect()
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('\'').unwrap_or(value);
    value.strip_suffix('\'').unwrap_or(value)
}

fn ty(ty: &Type) -> ast::Ty {
    let code = ty.to_token_stream().to_string();
    let display = code.chars().filter(|it| !it.is_whitespace()).collect();
    ast::Ty { code, display }
}

fn last_segment(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(it) => it.path.segments.last().map(|it| it.ident.to_string()),
        _ => None,
    }
}

/// `T` of `Wrapper<T>`.
fn generic_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let path = match ty {
        Type::Path(it) if it.qself.is_none() => &it.path,
        _ => return None,
    };
    let segment = path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let args = match &segment.arguments {
        PathArguments::AngleBracketed(it) => it,
        _ => return None,
    };
    match args.args.first()? {
        GenericArgument::Type(it) => Some(it),
        _ => None,
    }
}

fn is_pointer(ty: &Type) -> bool {
    generic_arg(ty, "Box").is_some()
        || generic_arg(ty, "Option").is_some()
        || matches!(ty, Type::Reference(_) | Type::Ptr(_))
}
