use std::any::{type_name, Any};

pub use anyhow;

pub use crate::{
    descriptor::{Command, Fields, Subcommands},
    node::CommandNode,
    registry::{Entry, Value},
    walk::Walker,
    ConfigError,
};
use crate::Context;

pub type UnsetHook = Box<dyn Fn(&mut dyn Any, &Context<'_>) -> anyhow::Result<()>>;

/// One declared field, as seen by the derive.
pub struct RawField {
    pub(crate) index: usize,
    pub(crate) ident: &'static str,
    pub(crate) tag: &'static str,
    pub(crate) ty: &'static str,
    pub(crate) kind: RawKind,
}

pub(crate) enum RawKind {
    Value { entry: Entry, unset: Option<UnsetHook> },
    Inline { fields: fn() -> Vec<RawField>, owner: &'static str },
}

impl RawField {
    pub fn value<T: Value>(
        index: usize,
        ident: &'static str,
        tag: &'static str,
        ty: &'static str,
        unset: Option<UnsetHook>,
    ) -> RawField {
        RawField { index, ident, tag, ty, kind: RawKind::Value { entry: Entry::of::<T>(), unset } }
    }

    pub fn inline<T: InlineSlot>(
        index: usize,
        ident: &'static str,
        tag: &'static str,
        ty: &'static str,
    ) -> RawField {
        let kind = RawKind::Inline { fields: <T as InlineSlot>::fields, owner: <T as InlineSlot>::owner() };
        RawField { index, ident, tag, ty, kind }
    }
}

/// Mutable access to one field of a descriptor.
pub enum Slot<'a> {
    Value(&'a mut dyn Any),
    Inline(&'a mut dyn Fields),
    Missing,
}

/// A field tagged `inline`: a struct deriving `Inline` or an `Option` of
/// one, allocated on first access.
pub trait InlineSlot: 'static {
    fn fields() -> Vec<RawField>;
    fn owner() -> &'static str;
    fn materialize(&mut self) -> &mut dyn Fields;
}

impl<T: Fields> InlineSlot for T {
    fn fields() -> Vec<RawField> {
        <T as Fields>::fields()
    }
    fn owner() -> &'static str {
        <T as Fields>::type_name()
    }
    fn materialize(&mut self) -> &mut dyn Fields {
        self
    }
}

impl<T: Fields + Default> InlineSlot for Option<T> {
    fn fields() -> Vec<RawField> {
        <T as Fields>::fields()
    }
    fn owner() -> &'static str {
        <T as Fields>::type_name()
    }
    fn materialize(&mut self) -> &mut dyn Fields {
        self.get_or_insert_with(T::default)
    }
}

/// Argument of the placeholder `on_<field>_unset` that stands in when the
/// descriptor has no such method.
pub struct NoUnset(());

pub struct Absent;
pub struct Plain;
pub struct WithContext;

/// Signatures accepted for an `on_<field>_unset` method. `M` only
/// disambiguates the impls.
pub trait UnsetFn<T, M> {
    fn into_hook(self) -> Option<UnsetHook>;
}

impl<T, F: Fn(NoUnset)> UnsetFn<T, Absent> for F {
    fn into_hook(self) -> Option<UnsetHook> {
        None
    }
}

impl<T: 'static, F> UnsetFn<T, Plain> for F
where
    F: Fn(&mut T) -> anyhow::Result<()> + 'static,
{
    fn into_hook(self) -> Option<UnsetHook> {
        Some(hook(move |this, _ctx| self(owner::<T>(this))))
    }
}

impl<T: 'static, F> UnsetFn<T, WithContext> for F
where
    F: Fn(&mut T, &Context<'_>) -> anyhow::Result<()> + 'static,
{
    fn into_hook(self) -> Option<UnsetHook> {
        Some(hook(move |this, ctx| self(owner::<T>(this), ctx)))
    }
}

pub fn unset_hook<T, F: UnsetFn<T, M>, M>(f: F) -> Option<UnsetHook> {
    f.into_hook()
}

fn hook(f: impl Fn(&mut dyn Any, &Context<'_>) -> anyhow::Result<()> + 'static) -> UnsetHook {
    Box::new(f)
}

fn owner<T: 'static>(this: &mut dyn Any) -> &mut T {
    match this.downcast_mut::<T>() {
        Some(it) => it,
        None => panic!("unset fallback called on the wrong owner, expected: {}", type_name::<T>()),
    }
}

/// Takes back a child detached by [`Subcommands::walk`].
pub fn restore<C: Command>(children: &mut dyn Iterator<Item = Box<dyn Any>>) -> Option<Box<C>> {
    children.next().and_then(|it| it.downcast::<C>().ok())
}
