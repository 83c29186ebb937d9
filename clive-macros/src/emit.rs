use std::fmt::Write;

use crate::ast;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(item: &ast::Item) -> String {
    let mut buf = String::new();
    match item {
        ast::Item::Command(cmd) => {
            w!(buf, "const _: () = {{\n");
            emit_unset_defaults(&mut buf, cmd);
            emit_fields(&mut buf, cmd);
            emit_command(&mut buf, cmd);
            w!(buf, "}};\n");
        }
        ast::Item::Inline(cmd) => {
            w!(buf, "const _: () = {{\n");
            emit_unset_defaults(&mut buf, cmd);
            emit_fields(&mut buf, cmd);
            w!(buf, "}};\n");
        }
        ast::Item::Subcommands(group) => emit_group(&mut buf, group),
        ast::Item::Text(it) => emit_text(&mut buf, it),
    }
    buf
}

/// A placeholder `on_<field>_unset` for every field. An inherent method of
/// the same name takes precedence over it.
fn emit_unset_defaults(buf: &mut String, cmd: &ast::Struct) {
    w!(buf, "#[allow(dead_code, non_snake_case)]\n");
    w!(buf, "trait __CliveUnset {{\n");
    for field in cmd.fields.iter().filter(|it| !it.inline) {
        w!(buf, "    fn on_{}_unset(_: ::clive::rt::NoUnset) {{}}\n", field.name);
    }
    w!(buf, "}}\n");
    w!(buf, "impl<T: ?Sized> __CliveUnset for T {{}}\n");
    blank_line(buf);
}

fn emit_fields(buf: &mut String, cmd: &ast::Struct) {
    w!(buf, "impl ::clive::rt::Fields for {} {{\n", cmd.name);

    w!(buf, "    fn fields() -> ::std::vec::Vec<::clive::rt::RawField> {{\n");
    w!(buf, "        ::std::vec![\n");
    for field in &cmd.fields {
        if field.inline {
            w!(
                buf,
                "            ::clive::rt::RawField::inline::<{}>({}, {:?}, {:?}, {:?}),\n",
                field.ty.code,
                field.idx,
                field.name,
                field.tag,
                field.ty.display,
            );
        } else {
            w!(
                buf,
                "            ::clive::rt::RawField::value::<{}>({}, {:?}, {:?}, {:?}, \
                 ::clive::rt::unset_hook::<Self, _, _>(<Self>::on_{}_unset)),\n",
                field.ty.code,
                field.idx,
                field.name,
                field.tag,
                field.ty.display,
                field.name,
            );
        }
    }
    w!(buf, "        ]\n");
    w!(buf, "    }}\n");
    blank_line(buf);

    w!(buf, "    fn type_name() -> &'static str {{\n");
    w!(buf, "        {:?}\n", cmd.name);
    w!(buf, "    }}\n");
    blank_line(buf);

    w!(buf, "    fn slot(&mut self, index: usize) -> ::clive::rt::Slot<'_> {{\n");
    w!(buf, "        match index {{\n");
    for field in &cmd.fields {
        if field.inline {
            w!(
                buf,
                "            {} => ::clive::rt::Slot::Inline(::clive::rt::InlineSlot::materialize(&mut self.{})),\n",
                field.idx,
                field.ident,
            );
        } else {
            w!(buf, "            {} => ::clive::rt::Slot::Value(&mut self.{}),\n", field.idx, field.ident);
        }
    }
    w!(buf, "            _ => ::clive::rt::Slot::Missing,\n");
    w!(buf, "        }}\n");
    w!(buf, "    }}\n");
    blank_line(buf);

    w!(buf, "    fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {{\n");
    w!(buf, "        self\n");
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
    blank_line(buf);
}

fn emit_command(buf: &mut String, cmd: &ast::Struct) {
    w!(buf, "impl ::clive::rt::Command for {} {{\n", cmd.name);

    w!(buf, "    fn tag() -> &'static str {{\n");
    w!(buf, "        {:?}\n", cmd.tag);
    w!(buf, "    }}\n");

    if cmd.has_subcommands {
        blank_line(buf);
        w!(
            buf,
            "    fn subcommands(&mut self, walker: &mut ::clive::rt::Walker, parent: &str) \
             -> ::std::result::Result<::std::vec::Vec<::clive::rt::CommandNode>, ::clive::rt::ConfigError> {{\n"
        );
        w!(buf, "        ::clive::rt::Subcommands::walk(&mut self.subcommands, walker, parent)\n");
        w!(buf, "    }}\n");
        blank_line(buf);
        w!(
            buf,
            "    fn restore(&mut self, children: &mut dyn ::std::iter::Iterator<Item = \
             ::std::boxed::Box<dyn ::std::any::Any>>) {{\n"
        );
        w!(buf, "        ::clive::rt::Subcommands::restore(&mut self.subcommands, children)\n");
        w!(buf, "    }}\n");
    }

    if cmd.has_run {
        blank_line(buf);
        w!(
            buf,
            "    fn run(&self, ctx: &::clive::Context<'_>) \
             -> ::std::option::Option<::clive::rt::anyhow::Result<()>> {{\n"
        );
        w!(buf, "        self.run.call(self, ctx)\n");
        w!(buf, "    }}\n");
    }

    blank_line(buf);
    w!(buf, "    fn as_any(&self) -> &dyn ::std::any::Any {{\n");
    w!(buf, "        self\n");
    w!(buf, "    }}\n");
    blank_line(buf);
    w!(buf, "    fn fields_mut(&mut self) -> &mut dyn ::clive::rt::Fields {{\n");
    w!(buf, "        self\n");
    w!(buf, "    }}\n");
    blank_line(buf);
    w!(
        buf,
        "    fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {{\n"
    );
    w!(buf, "        self\n");
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
}

fn emit_group(buf: &mut String, group: &ast::Group) {
    w!(buf, "impl ::clive::rt::Subcommands for {} {{\n", group.name);

    w!(buf, "    #[allow(unused_mut, unused_variables)]\n");
    w!(
        buf,
        "    fn walk(&mut self, walker: &mut ::clive::rt::Walker, parent: &str) \
         -> ::std::result::Result<::std::vec::Vec<::clive::rt::CommandNode>, ::clive::rt::ConfigError> {{\n"
    );
    w!(buf, "        let mut res = ::std::vec::Vec::new();\n");
    for member in &group.members {
        match member {
            ast::Member::Child { ident } => w!(
                buf,
                "        res.push(walker.command(self.{}.take().unwrap_or_default(), parent)?);\n",
                ident
            ),
            ast::Member::Flatten { ident } => w!(
                buf,
                "        res.extend(::clive::rt::Subcommands::walk(&mut self.{}, walker, parent)?);\n",
                ident
            ),
        }
    }
    w!(buf, "        ::std::result::Result::Ok(res)\n");
    w!(buf, "    }}\n");
    blank_line(buf);

    w!(buf, "    #[allow(unused_variables)]\n");
    w!(
        buf,
        "    fn restore(&mut self, children: &mut dyn ::std::iter::Iterator<Item = \
         ::std::boxed::Box<dyn ::std::any::Any>>) {{\n"
    );
    for member in &group.members {
        match member {
            ast::Member::Child { ident } => {
                w!(buf, "        self.{} = ::clive::rt::restore(children);\n", ident)
            }
            ast::Member::Flatten { ident } => {
                w!(buf, "        ::clive::rt::Subcommands::restore(&mut self.{}, children);\n", ident)
            }
        }
    }
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
}

fn emit_text(buf: &mut String, it: &ast::Enum) {
    let texts = it.variants.iter().map(|it| it.text.as_str()).collect::<Vec<_>>();

    w!(buf, "impl ::clive::Text for {} {{\n", it.name);
    w!(
        buf,
        "    fn parse_text(text: &str) -> ::std::result::Result<Self, ::std::string::String> {{\n"
    );
    w!(buf, "        match text {{\n");
    for variant in &it.variants {
        w!(
            buf,
            "            {:?} => ::std::result::Result::Ok({}::{}),\n",
            variant.text,
            it.name,
            variant.ident
        );
    }
    w!(
        buf,
        "            _ => ::std::result::Result::Err(::std::format!({:?}, text)),\n",
        format!("expected one of [{}], got `{{}}`", texts.join(", "))
    );
    w!(buf, "        }}\n");
    w!(buf, "    }}\n");
    blank_line(buf);

    w!(buf, "    fn variants() -> ::std::option::Option<&'static [&'static str]> {{\n");
    w!(buf, "        ::std::option::Option::Some(&{:?})\n", texts);
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
