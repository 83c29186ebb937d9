//! The type registry: how each bindable field type is declared to the
//! tokenizer and assigned from strings or from a parse context.
//!
//! Dispatch is static. Every bindable type implements [`Value`]; the walker
//! erases it into an [`Entry`] so metadata for heterogeneous fields can live
//! in one list. Nested `Option`s wrap their inner entry once per level.
use std::any::{type_name, Any};

use clap::{Arg, ArgAction};
use heck::ToShoutySnakeCase;

use crate::{node::FieldMeta, ConfigError, Context, Text};

/// How a field shows up on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `--name value`, the last occurrence wins.
    Single,
    /// `--name` or `--name=false`.
    Switch,
    /// `--name a --name b`, every occurrence is kept.
    Many,
    /// `-vvv`, the number of occurrences.
    Count,
}

pub trait Value: Default + 'static {
    /// Variadic values consume every remaining positional token.
    const VARIADIC: bool = false;

    fn shape(counting: bool) -> Shape;

    fn set_from_str(&mut self, text: &str) -> Result<(), String>;

    fn set_from_context(&mut self, name: &str, ctx: &Context<'_>) -> Result<(), String> {
        match ctx.string(name) {
            Some(text) => self.set_from_str(&text),
            None => Ok(()),
        }
    }

    fn set_from_strs(&mut self, _texts: &[String]) -> Result<(), String> {
        Err(format!("`{}` does not take multiple values", type_name::<Self>()))
    }

    fn variants() -> Option<&'static [&'static str]> {
        None
    }
}

impl<T: Text> Value for T {
    fn shape(_counting: bool) -> Shape {
        if T::SWITCH {
            Shape::Switch
        } else {
            Shape::Single
        }
    }

    fn set_from_str(&mut self, text: &str) -> Result<(), String> {
        *self = T::parse_text(text)?;
        Ok(())
    }

    fn variants() -> Option<&'static [&'static str]> {
        T::variants()
    }
}

impl<T: Text> Value for Vec<T> {
    const VARIADIC: bool = true;

    fn shape(_counting: bool) -> Shape {
        Shape::Many
    }

    fn set_from_str(&mut self, text: &str) -> Result<(), String> {
        *self = text.split(',').map(T::parse_text).collect::<Result<_, _>>()?;
        Ok(())
    }

    fn set_from_context(&mut self, name: &str, ctx: &Context<'_>) -> Result<(), String> {
        self.set_from_strs(&ctx.strings(name))
    }

    fn set_from_strs(&mut self, texts: &[String]) -> Result<(), String> {
        *self = texts.iter().map(|it| T::parse_text(it)).collect::<Result<_, _>>()?;
        Ok(())
    }

    fn variants() -> Option<&'static [&'static str]> {
        T::variants()
    }
}

impl<T: Value> Value for Option<T> {
    const VARIADIC: bool = T::VARIADIC;

    fn shape(counting: bool) -> Shape {
        T::shape(counting)
    }

    fn set_from_str(&mut self, text: &str) -> Result<(), String> {
        self.get_or_insert_with(T::default).set_from_str(text)
    }

    fn set_from_context(&mut self, name: &str, ctx: &Context<'_>) -> Result<(), String> {
        self.get_or_insert_with(T::default).set_from_context(name, ctx)
    }

    fn set_from_strs(&mut self, texts: &[String]) -> Result<(), String> {
        self.get_or_insert_with(T::default).set_from_strs(texts)
    }

    fn variants() -> Option<&'static [&'static str]> {
        T::variants()
    }
}

/// A flag bound by counting its occurrences (`-vvv` is 3) when short option
/// handling is enabled, and by parsing an integer otherwise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub value: u32,
}

impl Value for Counter {
    fn shape(counting: bool) -> Shape {
        if counting {
            Shape::Count
        } else {
            Shape::Single
        }
    }

    fn set_from_str(&mut self, text: &str) -> Result<(), String> {
        self.value = u32::parse_text(text)?;
        Ok(())
    }
}

/// Type-erased [`Value`] implementation for one field type.
#[derive(Clone, Copy)]
pub struct Entry {
    shape: fn(bool) -> Shape,
    variadic: bool,
    from_string: fn(&mut dyn Any, &str) -> Result<(), String>,
    from_context: fn(&mut dyn Any, &str, &Context<'_>) -> Result<(), String>,
    from_strings: fn(&mut dyn Any, &[String]) -> Result<(), String>,
    reset: fn(&mut dyn Any),
    check: fn(&str) -> Result<(), String>,
    variants: fn() -> Option<&'static [&'static str]>,
}

impl Entry {
    pub fn of<T: Value>() -> Entry {
        Entry {
            shape: T::shape,
            variadic: T::VARIADIC,
            from_string: from_string::<T>,
            from_context: from_context::<T>,
            from_strings: from_strings::<T>,
            reset: reset::<T>,
            check: check::<T>,
            variants: T::variants,
        }
    }

    pub(crate) fn shape(&self, counting: bool) -> Shape {
        (self.shape)(counting)
    }

    pub(crate) fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub(crate) fn variants(&self) -> Option<&'static [&'static str]> {
        (self.variants)()
    }

    pub(crate) fn from_string(&self, slot: &mut dyn Any, text: &str) -> Result<(), String> {
        (self.from_string)(slot, text)
    }

    pub(crate) fn from_context(
        &self,
        slot: &mut dyn Any,
        name: &str,
        ctx: &Context<'_>,
    ) -> Result<(), String> {
        (self.from_context)(slot, name, ctx)
    }

    pub(crate) fn from_strings(&self, slot: &mut dyn Any, texts: &[String]) -> Result<(), String> {
        (self.from_strings)(slot, texts)
    }

    /// Puts the slot back to `Default`, an `Option` back to `None`.
    pub(crate) fn reset(&self, slot: &mut dyn Any) {
        (self.reset)(slot)
    }
}

fn checked<'a, T: Value>(slot: &'a mut dyn Any, op: &str) -> &'a mut T {
    match slot.downcast_mut::<T>() {
        Some(it) => it,
        None => panic!("wrong type in {}, expected: {}", op, type_name::<T>()),
    }
}

fn from_string<T: Value>(slot: &mut dyn Any, text: &str) -> Result<(), String> {
    checked::<T>(slot, "from_string").set_from_str(text)
}

fn from_context<T: Value>(slot: &mut dyn Any, name: &str, ctx: &Context<'_>) -> Result<(), String> {
    checked::<T>(slot, "from_context").set_from_context(name, ctx)
}

fn from_strings<T: Value>(slot: &mut dyn Any, texts: &[String]) -> Result<(), String> {
    checked::<T>(slot, "from_strings").set_from_strs(texts)
}

fn reset<T: Value>(slot: &mut dyn Any) {
    *checked::<T>(slot, "reset") = T::default();
}

fn check<T: Value>(text: &str) -> Result<(), String> {
    T::default().set_from_str(text)
}

/// Parses the declared default with the field's own parser.
pub(crate) fn check_default(meta: &FieldMeta) -> Result<(), ConfigError> {
    match &meta.default {
        Some(default) => (meta.entry.check)(default).map_err(|reason| ConfigError::InvalidDefault {
            field: meta.name.clone(),
            value: default.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Declares a flag field to the tokenizer.
pub(crate) fn new_flag(meta: &FieldMeta) -> Result<Arg, ConfigError> {
    let shape = meta.shape();
    check_default(meta)?;

    let mut arg = Arg::new(meta.name.clone())
        .long(meta.name.clone())
        .help(meta.help())
        .hide(meta.hidden);
    for alias in &meta.aliases {
        let mut chars = alias.chars();
        arg = match (chars.next(), chars.next()) {
            (Some(short), None) if arg.get_short().is_none() => arg.short(short),
            (Some(short), None) => arg.visible_short_alias(short),
            _ => arg.visible_alias(alias.clone()),
        };
    }

    arg = match shape {
        Shape::Single => arg.action(ArgAction::Set).num_args(1),
        Shape::Switch => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        Shape::Many => arg.action(ArgAction::Append).num_args(1),
        Shape::Count => arg.action(ArgAction::Count),
    };
    if shape != Shape::Count {
        arg = arg.value_name(meta.name.to_shouty_snake_case());
    }
    match (&meta.default, shape) {
        (Some(default), Shape::Many) => arg = arg.default_values(default.split(',').map(String::from)),
        (Some(default), Shape::Single | Shape::Switch) => arg = arg.default_value(default.clone()),
        _ => (),
    }
    Ok(arg)
}
