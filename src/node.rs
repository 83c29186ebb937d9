use std::fmt;

use crate::{
    descriptor::Command,
    registry::{Entry, Shape},
    rt::UnsetHook,
};

/// Everything known about one bindable field after walking its descriptor.
pub struct FieldMeta {
    pub(crate) name: String,
    pub(crate) ident: &'static str,
    pub(crate) owner: &'static str,
    pub(crate) ty: &'static str,
    pub(crate) aliases: Vec<String>,
    pub(crate) envs: Vec<String>,
    pub(crate) usage: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) positional: bool,
    pub(crate) required: bool,
    pub(crate) short_opt: bool,
    pub(crate) default: Option<String>,
    /// Field indices from the command struct down through inline hops.
    pub(crate) path: Vec<usize>,
    pub(crate) entry: Entry,
    pub(crate) unset: Option<UnsetHook>,
}

impl FieldMeta {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }
    pub fn envs(&self) -> &[String] {
        &self.envs
    }
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }
    pub fn is_positional(&self) -> bool {
        self.positional
    }
    pub fn is_required(&self) -> bool {
        self.required
    }
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
    pub fn is_variadic(&self) -> bool {
        self.entry.is_variadic()
    }
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub(crate) fn shape(&self) -> Shape {
        self.entry.shape(self.short_opt)
    }

    /// Usage text as shown in help, including the accepted values of
    /// enumerated types.
    pub fn help(&self) -> String {
        let variants = self.entry.variants().map(|it| format!("possible values: [{}]", it.join(", ")));
        match (&self.usage, variants) {
            (Some(usage), Some(variants)) => format!("{}; {}", usage, variants),
            (Some(usage), None) => usage.clone(),
            (None, Some(variants)) => variants,
            (None, None) => String::new(),
        }
    }

    pub(crate) fn unset_method(&self) -> String {
        format!("{}::on_{}_unset", self.owner, self.ident)
    }
}

impl fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMeta")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("aliases", &self.aliases)
            .field("envs", &self.envs)
            .field("positional", &self.positional)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// One command of the tree, as produced by the walker.
pub struct CommandNode {
    pub(crate) name: String,
    pub(crate) type_name: &'static str,
    pub(crate) usage: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) aliases: Vec<String>,
    pub(crate) hidden: bool,
    pub(crate) short_opt: bool,
    pub(crate) path: String,
    pub(crate) parent: String,
    /// Flags and positionals in declaration order.
    pub(crate) fields: Vec<FieldMeta>,
    pub(crate) children: Vec<CommandNode>,
    /// Moved into the router when the app is assembled.
    pub(crate) instance: Option<Box<dyn Command>>,
}

impl CommandNode {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn path(&self) -> &str {
        &self.path
    }
    pub fn parent_path(&self) -> &str {
        &self.parent
    }
    pub fn is_short_opt(&self) -> bool {
        self.short_opt
    }
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }
    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|it| it.name == name)
    }

    pub fn flags(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|it| !it.positional)
    }
    pub fn positionals(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|it| it.positional)
    }
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|it| it.name == name)
    }

    /// `NAME [OPT] REST [REST]`, rendered from the positionals.
    pub fn args_usage(&self) -> String {
        use heck::ToShoutySnakeCase;

        let mut res = Vec::new();
        for field in self.positionals() {
            let name = field.name.to_shouty_snake_case();
            let text = match (field.required, field.is_variadic()) {
                (true, false) => name,
                (false, false) => format!("[{}]", name),
                (true, true) => format!("{0} [{0}]", name),
                (false, true) => format!("[{0} [{0}]]", name),
            };
            res.push(text);
        }
        res.join(" ")
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("parent", &self.parent)
            .field("fields", &self.fields)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
