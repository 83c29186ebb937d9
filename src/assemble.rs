//! Builds the tokenizer's command tree from [`CommandNode`]s.
use std::collections::HashSet;

use clap::{Arg, ArgAction};

use crate::{
    node::CommandNode,
    registry::{check_default, new_flag},
    ConfigError,
};

/// Id of the hidden positional collecting every positional token; the binder
/// hands them out to positional fields.
pub(crate) const ARGS: &str = "__args";

pub(crate) fn assemble(node: &CommandNode) -> Result<clap::Command, ConfigError> {
    validate_positionals(node)?;

    let mut cmd = clap::Command::new(node.name.clone())
        .args_override_self(true)
        .disable_help_subcommand(true)
        .hide(node.hidden)
        .override_usage(usage(node));
    for alias in &node.aliases {
        cmd = cmd.visible_alias(alias.clone());
    }
    if let Some(usage) = &node.usage {
        cmd = cmd.about(usage.clone());
    }
    if let Some(description) = &node.description {
        cmd = cmd.long_about(description.clone());
    }
    if let Some(version) = &node.version {
        cmd = cmd.version(version.clone());
    }

    let mut seen: HashSet<&str> = ["help", "h"].into_iter().collect();
    if node.version.is_some() {
        seen.extend(["version", "V"]);
    }
    for field in node.flags() {
        for name in std::iter::once(&field.name).chain(&field.aliases) {
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateFlag { name: name.clone(), command: node.path.clone() });
            }
        }
        cmd = cmd.arg(new_flag(field)?);
    }
    for field in node.positionals() {
        check_default(field)?;
    }
    if node.positionals().next().is_some() || node.children.is_empty() {
        cmd = cmd.arg(
            Arg::new(ARGS)
                .value_name("ARGS")
                .num_args(0..)
                .action(ArgAction::Append)
                .allow_negative_numbers(true)
                .hide(true),
        );
    }

    let mut names = HashSet::new();
    for child in &node.children {
        if !names.insert(child.name.as_str()) {
            return Err(ConfigError::DuplicateCommand {
                name: child.name.clone(),
                parent: node.path.clone(),
            });
        }
        cmd = cmd.subcommand(assemble(child)?);
    }
    tracing::debug!(command = %node.path, "assembled");
    Ok(cmd)
}

fn validate_positionals(node: &CommandNode) -> Result<(), ConfigError> {
    let mut variadic: Option<&str> = None;
    let mut optional: Option<&str> = None;
    for field in node.positionals() {
        if field.hidden {
            return Err(ConfigError::HiddenPositional { name: field.name.clone() });
        }
        if let Some(first) = variadic {
            return Err(ConfigError::PositionalAfterVariadic {
                current: field.name.clone(),
                first: first.to_string(),
            });
        }
        match optional {
            Some(optional) if field.required => {
                return Err(ConfigError::OptionalBeforeRequired {
                    required: field.name.clone(),
                    optional: optional.to_string(),
                })
            }
            None if !field.required => optional = Some(&field.name),
            _ => (),
        }
        if field.is_variadic() {
            variadic = Some(&field.name);
        }
    }
    Ok(())
}

fn usage(node: &CommandNode) -> String {
    let mut res: Vec<String> = node.path.split('/').filter(|it| !it.is_empty()).map(String::from).collect();
    res.push("[OPTIONS]".to_string());
    let args = node.args_usage();
    if !args.is_empty() {
        res.push(args);
    }
    if !node.children.is_empty() {
        res.push("[COMMAND]".to_string());
    }
    res.join(" ")
}
