#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Derive {
    Command,
    Inline,
    Subcommands,
    Text,
}

#[derive(Debug)]
pub(crate) enum Item {
    Command(Struct),
    Inline(Struct),
    Subcommands(Group),
    Text(Enum),
}

#[derive(Debug)]
pub(crate) struct Struct {
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) has_subcommands: bool,
    pub(crate) has_run: bool,
}

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) idx: usize,
    /// As written, `r#type` included.
    pub(crate) ident: String,
    /// `ident` without the raw prefix.
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) ty: Ty,
    pub(crate) inline: bool,
}

#[derive(Debug)]
pub(crate) struct Ty {
    pub(crate) code: String,
    pub(crate) display: String,
}

#[derive(Debug)]
pub(crate) struct Group {
    pub(crate) name: String,
    pub(crate) members: Vec<Member>,
}

#[derive(Debug)]
pub(crate) enum Member {
    Child { ident: String },
    Flatten { ident: String },
}

#[derive(Debug)]
pub(crate) struct Enum {
    pub(crate) name: String,
    pub(crate) variants: Vec<Variant>,
}

#[derive(Debug)]
pub(crate) struct Variant {
    pub(crate) ident: String,
    pub(crate) text: String,
}
