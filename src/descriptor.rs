//! The traits a descriptor type implements.
//!
//! [`Action`] is written by hand. [`Fields`], [`Command`] and
//! [`Subcommands`] are generated by the derives of the same names.
use std::{any::Any, fmt};

use crate::{
    node::CommandNode,
    rt::{RawField, Slot},
    walk::Walker,
    ConfigError, Context,
};

/// User hooks of a command.
///
/// Every command type implements this. Only `action` is usually written;
/// a group command that does nothing on its own can use the default, which
/// prints its help.
pub trait Action {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        ctx.show_help()
    }

    /// Runs after the fields of this command were bound and before any
    /// subcommand or action.
    fn before(&mut self, ctx: &Context<'_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Runs on every return path, including a failed binding or `before`.
    fn after(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn version(&self) -> Option<String> {
        None
    }

    fn description(&self) -> Option<String> {
        None
    }
}

/// Field table of a struct, generated by `#[derive(Command)]` and
/// `#[derive(Inline)]`.
pub trait Fields: Any {
    fn fields() -> Vec<RawField>
    where
        Self: Sized;

    fn type_name() -> &'static str
    where
        Self: Sized;

    /// The field declared at `index`, for inline fields materialized on
    /// access.
    fn slot(&mut self, index: usize) -> Slot<'_>;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A descriptor that becomes a command, generated by `#[derive(Command)]`.
pub trait Command: Action + Fields {
    /// The struct-level `#[cli("...")]` annotation.
    fn tag() -> &'static str
    where
        Self: Sized;

    /// Detaches the children of the `subcommands` group and walks them.
    fn subcommands(&mut self, walker: &mut Walker, parent: &str) -> Result<Vec<CommandNode>, ConfigError> {
        let _ = (walker, parent);
        Ok(Vec::new())
    }

    /// Reattaches children detached by `subcommands`, in the same order.
    fn restore(&mut self, children: &mut dyn Iterator<Item = Box<dyn Any>>) {
        let _ = children;
    }

    /// The `run` hook, if the struct has one and it is set.
    fn run(&self, ctx: &Context<'_>) -> Option<anyhow::Result<()>> {
        let _ = ctx;
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn fields_mut(&mut self) -> &mut dyn Fields;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A subcommand group, generated by `#[derive(Subcommands)]`.
pub trait Subcommands {
    fn walk(&mut self, walker: &mut Walker, parent: &str) -> Result<Vec<CommandNode>, ConfigError>;

    fn restore(&mut self, children: &mut dyn Iterator<Item = Box<dyn Any>>);
}

type RunHook<T> = Box<dyn Fn(&T, &Context<'_>) -> anyhow::Result<()>>;

/// Optional replacement for [`Action::action`], stored in a field named
/// `run`.
///
/// ```ignore
/// let app = clive::build(Serve {
///     run: RunFn::new(|serve: &Serve, _ctx| serve.listen()),
///     ..Serve::default()
/// });
/// ```
pub struct RunFn<T> {
    hook: Option<RunHook<T>>,
}

impl<T> RunFn<T> {
    pub fn new(f: impl Fn(&T, &Context<'_>) -> anyhow::Result<()> + 'static) -> RunFn<T> {
        RunFn { hook: Some(Box::new(f)) }
    }

    pub fn is_set(&self) -> bool {
        self.hook.is_some()
    }

    pub fn call(&self, this: &T, ctx: &Context<'_>) -> Option<anyhow::Result<()>> {
        self.hook.as_ref().map(|hook| hook(this, ctx))
    }
}

impl<T> Default for RunFn<T> {
    fn default() -> RunFn<T> {
        RunFn { hook: None }
    }
}

impl<T> fmt::Debug for RunFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_set() { "RunFn(Some(..))" } else { "RunFn(None)" })
    }
}
