//! Parser for the `#[cli("...")]` annotation attached to descriptors and
//! their fields.
//!
//! A tag is a comma separated list of sections. A section is either a bare
//! token (`-`, `positional`, `inline`, `required`, `shortOpt`) or a
//! `key:value` pair. Commas inside single quotes are literal, and a single
//! quoted value has its quotes trimmed.
use crate::{text::parse_bool, ConfigError};

/// Parsed annotation, before any name or environment defaulting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tag {
    pub skip: bool,
    pub positional: bool,
    pub inline: bool,
    pub required: Option<bool>,
    pub short_opt: Option<bool>,
    pub hidden: bool,
    pub name: Option<String>,
    pub usage: Option<String>,
    pub envs: Option<Vec<String>>,
    pub aliases: Vec<String>,
    pub default: Option<String>,
}

impl Tag {
    pub fn parse(tag: &str) -> Result<Tag, ConfigError> {
        let mut res = Tag::default();
        if tag.trim() == "-" {
            res.skip = true;
            return Ok(res);
        }

        for section in sections(tag) {
            match section.split_once(':') {
                None => match section {
                    "-" => res.skip = true,
                    "positional" => res.positional = true,
                    "inline" => res.inline = true,
                    "required" => res.required = Some(true),
                    "shortOpt" => res.short_opt = Some(true),
                    "entrypoint" => (),
                    _ => return Err(ConfigError::InvalidTag { section: section.to_string() }),
                },
                Some((key, value)) => {
                    let value = unquote(value);
                    match key {
                        "name" => res.name = Some(value.to_string()),
                        "usage" => res.usage = Some(value.to_string()),
                        "required" => res.required = Some(boolean(key, value)?),
                        "hidden" => res.hidden = boolean(key, value)?,
                        "shortOpt" => res.short_opt = Some(boolean(key, value)?),
                        "env" => res.envs = Some(list(value)),
                        "alias" => res.aliases = list(value),
                        "default" => {
                            res.default = if value.is_empty() { None } else { Some(value.to_string()) }
                        }
                        "entrypoint" => (),
                        "" => return Err(ConfigError::InvalidTag { section: section.to_string() }),
                        _ => return Err(ConfigError::UnknownTagKey { key: key.to_string() }),
                    }
                }
            }
        }
        Ok(res)
    }
}

/// Splits on commas that are not inside single quotes. Empty sections are
/// dropped.
pub(crate) fn sections(tag: &str) -> Vec<&str> {
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

// Quotes are trimmed independently on each side, so an unterminated
// `'a,b` still yields `a,b`.
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('\'').unwrap_or(value);
    value.strip_suffix('\'').unwrap_or(value)
}

fn boolean(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value)
        .ok_or_else(|| ConfigError::InvalidBoolean { key: key.to_string(), value: value.to_string() })
}

fn list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|it| !it.is_empty()).map(String::from).collect()
}
