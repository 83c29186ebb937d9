//! Moves values from the parsed command line, the environment and the
//! declared defaults into the fields of a descriptor.
use std::{any::Any, collections::VecDeque};

use crate::{
    descriptor::Fields,
    node::{CommandNode, FieldMeta},
    registry::Entry,
    rt::Slot,
    BindError, Context, Origin,
};

/// Binds every field of `node` into `instance`, in declaration order.
pub(crate) fn bind(
    instance: &mut dyn Fields,
    node: &CommandNode,
    ctx: &Context<'_>,
) -> Result<(), BindError> {
    let mut tokens: VecDeque<String> = ctx.args().into();
    let mut positional_seen = false;

    for field in &node.fields {
        let Some((&index, parents)) = field.path.split_last() else { continue };
        let owner = resolve(&mut *instance, parents);

        if field.positional {
            positional_seen = true;
            if tokens.is_empty() {
                if field.required {
                    return Err(BindError::MissingPositional { name: field.name.clone() });
                }
                match &field.default {
                    Some(default) => {
                        let origin = Origin::PositionalDefault(field.name.clone());
                        assign(owner, index, field, origin, |entry, slot| entry.from_string(slot, default))?
                    }
                    None => fallback(owner, field, ctx)?,
                }
            } else if field.is_variadic() {
                let rest: Vec<String> = tokens.drain(..).collect();
                let origin = Origin::Positional(field.name.clone());
                assign(owner, index, field, origin, |entry, slot| entry.from_strings(slot, &rest))?
            } else if let Some(token) = tokens.pop_front() {
                let origin = Origin::Positional(field.name.clone());
                assign(owner, index, field, origin, |entry, slot| entry.from_string(slot, &token))?
            }
        } else if ctx.is_set(&field.name) || field.default.is_some() {
            let origin = Origin::Flag(field.name.clone());
            assign(owner, index, field, origin, |entry, slot| entry.from_context(slot, &field.name, ctx))?
        } else if field.unset.is_some() {
            fallback(owner, field, ctx)?
        } else if field.required {
            return Err(BindError::MissingFlag { name: field.name.clone() });
        }
    }

    if positional_seen && !tokens.is_empty() {
        return Err(BindError::TooManyArguments { args: tokens.into() });
    }
    Ok(())
}

/// Clears every field of `node` left over from a previous run.
pub(crate) fn reset(instance: &mut dyn Fields, node: &CommandNode) {
    for field in &node.fields {
        let Some((&index, parents)) = field.path.split_last() else { continue };
        let owner = resolve(&mut *instance, parents);
        if let Slot::Value(slot) = owner.slot(index) {
            field.entry.reset(slot);
        }
    }
}

/// Follows inline hops down to the struct that declares the field.
fn resolve<'a>(fields: &'a mut dyn Fields, path: &[usize]) -> &'a mut dyn Fields {
    match path.split_first() {
        None => fields,
        Some((&index, rest)) => match fields.slot(index) {
            Slot::Inline(inner) => resolve(inner, rest),
            _ => panic!("field #{} of an inline path is not inline", index),
        },
    }
}

fn assign(
    owner: &mut dyn Fields,
    index: usize,
    field: &FieldMeta,
    origin: Origin,
    f: impl FnOnce(&Entry, &mut dyn Any) -> Result<(), String>,
) -> Result<(), BindError> {
    let slot = match owner.slot(index) {
        Slot::Value(slot) => slot,
        _ => panic!("no value slot for `{}` at #{}", field.name, index),
    };
    match f(&field.entry, slot) {
        Ok(()) => {
            tracing::debug!(field = %field.name, %origin, "bound");
            Ok(())
        }
        Err(cause) => Err(BindError::FieldAssign {
            field: field.name.clone(),
            ty: field.ty.to_string(),
            origin,
            cause: cause.into(),
        }),
    }
}

fn fallback(owner: &mut dyn Fields, field: &FieldMeta, ctx: &Context<'_>) -> Result<(), BindError> {
    let Some(hook) = &field.unset else { return Ok(()) };
    tracing::debug!(field = %field.name, method = %field.unset_method(), "unset fallback");
    hook(owner.as_any_mut(), ctx).map_err(|err| BindError::FieldAssign {
        field: field.name.clone(),
        ty: field.ty.to_string(),
        origin: Origin::Fallback(field.unset_method()),
        cause: err.into(),
    })
}
