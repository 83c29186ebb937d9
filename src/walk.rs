//! Turns descriptor types into [`CommandNode`]s.
use heck::{ToKebabCase, ToShoutySnakeCase};

use crate::{
    descriptor::Command,
    node::{CommandNode, FieldMeta},
    rt::{RawField, RawKind},
    tag::Tag,
    ConfigError, Options,
};

pub struct Walker {
    options: Options,
}

impl Walker {
    pub(crate) fn new(options: Options) -> Walker {
        Walker { options }
    }

    /// Walks one command and, through its `subcommands` group, all of its
    /// descendants. The instance is owned by the returned node.
    pub fn command<C: Command>(
        &mut self,
        mut instance: Box<C>,
        parent: &str,
    ) -> Result<CommandNode, ConfigError> {
        let type_name = C::type_name();
        let tag = Tag::parse(C::tag()).map_err(|err| ConfigError::Command {
            command: type_name.to_string(),
            source: Box::new(err),
        })?;
        let name = tag.name.unwrap_or_else(|| type_name.to_lowercase());
        let path = format!("{}/{}", parent, name);
        let short_opt = tag.short_opt.unwrap_or(false);

        let mut fields = Vec::new();
        self.fields(type_name, C::fields(), "", &[], short_opt, &mut fields)?;
        let children = instance.subcommands(self, &path)?;
        tracing::debug!(command = %path, fields = fields.len(), children = children.len(), "walked");

        let description = instance.description();
        let version = instance.version();
        let instance: Box<dyn Command> = instance;
        Ok(CommandNode {
            name,
            type_name,
            usage: tag.usage,
            description,
            version,
            aliases: tag.aliases,
            hidden: tag.hidden,
            short_opt,
            path,
            parent: parent.to_string(),
            fields,
            children,
            instance: Some(instance),
        })
    }

    fn fields(
        &self,
        owner: &'static str,
        raw: Vec<RawField>,
        prefix: &str,
        path: &[usize],
        short_opt: bool,
        acc: &mut Vec<FieldMeta>,
    ) -> Result<(), ConfigError> {
        for field in raw {
            let tag = Tag::parse(field.tag).map_err(|err| err.in_field(owner, field.ident))?;
            if tag.skip {
                continue;
            }
            let mut name = tag.name.unwrap_or_else(|| field.ident.to_string());
            if !prefix.is_empty() {
                name = format!("{}-{}", prefix, name);
            }
            let mut field_path = path.to_vec();
            field_path.push(field.index);

            let (entry, unset) = match field.kind {
                RawKind::Inline { fields, owner } => {
                    self.fields(owner, fields(), &name, &field_path, short_opt, acc)?;
                    continue;
                }
                RawKind::Value { entry, unset } => (entry, unset),
            };

            let name = name.to_kebab_case();
            let envs = match tag.envs {
                Some(envs) => envs,
                None => {
                    let env = name.to_shouty_snake_case();
                    match &self.options.env_prefix {
                        Some(prefix) => vec![format!("{}_{}", prefix, env)],
                        None => vec![env],
                    }
                }
            };
            let required = tag.required.unwrap_or(tag.positional && tag.default.is_none());
            tracing::trace!(field = %name, ty = field.ty, positional = tag.positional, "field");
            acc.push(FieldMeta {
                name,
                ident: field.ident,
                owner,
                ty: field.ty,
                aliases: tag.aliases,
                envs,
                usage: tag.usage,
                hidden: tag.hidden,
                positional: tag.positional,
                required,
                short_opt: tag.short_opt.unwrap_or(short_opt),
                default: tag.default,
                path: field_path,
                entry,
                unset,
            });
        }
        Ok(())
    }
}
