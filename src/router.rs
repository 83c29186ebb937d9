//! Where bound descriptors live while the app runs, and the context handed
//! to hooks.
use std::{
    any::type_name,
    cell::{Ref, RefCell, RefMut},
    collections::HashMap,
};

use clap::{parser::ValueSource, ArgMatches};

use crate::{
    assemble::ARGS,
    descriptor::Command,
    node::CommandNode,
    registry::Shape,
    LookupError,
};

/// Key under which the root command is reachable in addition to its path.
pub(crate) const ROOT_KEY: &str = "cliveRoot";

/// Descriptor instances keyed by command path.
pub(crate) struct Router {
    slots: HashMap<String, RefCell<Box<dyn Command>>>,
    root: String,
}

impl Router {
    /// Moves every instance out of the tree.
    pub(crate) fn new(tree: &mut CommandNode) -> Router {
        let mut slots = HashMap::new();
        collect(tree, &mut slots);
        Router { slots, root: tree.path.clone() }
    }

    pub(crate) fn slot(&self, path: &str) -> Option<&RefCell<Box<dyn Command>>> {
        let path = if path == ROOT_KEY { self.root.as_str() } else { path };
        self.slots.get(path)
    }

    pub(crate) fn borrow<T: Command>(
        &self,
        path: &str,
        missing: impl FnOnce() -> LookupError,
    ) -> Result<Ref<'_, T>, LookupError> {
        let cell = self.slot(path).ok_or_else(missing)?;
        let instance = cell.try_borrow().map_err(|_| LookupError::InUse(path.to_string()))?;
        Ref::filter_map(instance, |it| it.as_any().downcast_ref::<T>()).map_err(|_| {
            LookupError::WrongType { path: path.to_string(), expected: type_name::<T>() }
        })
    }

    pub(crate) fn borrow_dyn(&self, path: &str) -> Result<Ref<'_, Box<dyn Command>>, LookupError> {
        let cell = self.slot(path).ok_or_else(|| LookupError::NoCurrent(path.to_string()))?;
        cell.try_borrow().map_err(|_| LookupError::InUse(path.to_string()))
    }

    pub(crate) fn borrow_dyn_mut(&self, path: &str) -> Result<RefMut<'_, Box<dyn Command>>, LookupError> {
        let cell = self.slot(path).ok_or_else(|| LookupError::NoCurrent(path.to_string()))?;
        cell.try_borrow_mut().map_err(|_| LookupError::InUse(path.to_string()))
    }

    pub(crate) fn into_slots(self) -> HashMap<String, Box<dyn Command>> {
        self.slots.into_iter().map(|(path, cell)| (path, cell.into_inner())).collect()
    }
}

fn collect(node: &mut CommandNode, slots: &mut HashMap<String, RefCell<Box<dyn Command>>>) {
    if let Some(instance) = node.instance.take() {
        slots.insert(node.path.clone(), RefCell::new(instance));
    }
    for child in &mut node.children {
        collect(child, slots);
    }
}

/// What a hook sees of the invocation: the parsed values of its own
/// command and the bound descriptors of the whole tree.
pub struct Context<'a> {
    matches: &'a ArgMatches,
    node: &'a CommandNode,
    command: &'a clap::Command,
    router: &'a Router,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        matches: &'a ArgMatches,
        node: &'a CommandNode,
        command: &'a clap::Command,
        router: &'a Router,
    ) -> Context<'a> {
        Context { matches, node, command, router }
    }

    pub fn path(&self) -> &str {
        &self.node.path
    }

    pub fn parent_path(&self) -> &str {
        &self.node.parent
    }

    /// The node of the command this context belongs to.
    pub fn node(&self) -> &CommandNode {
        self.node
    }

    /// Whether the flag was given on the command line or through one of its
    /// environment variables. Defaults don't count.
    pub fn is_set(&self, name: &str) -> bool {
        self.from_command_line(name) || self.from_env(name).is_some()
    }

    /// The last value of a flag, resolved from the command line, then the
    /// environment, then the declared default. A counted flag yields the
    /// number of occurrences.
    pub fn string(&self, name: &str) -> Option<String> {
        if self.from_command_line(name) {
            let counted = self.node.field(name).map(|it| it.shape()) == Some(Shape::Count);
            if counted {
                return Some(self.matches.get_count(name).to_string());
            }
            return self.values(name).pop();
        }
        if let Some(value) = self.from_env(name) {
            return Some(value);
        }
        self.node.field(name).and_then(|it| it.default.clone())
    }

    /// Every value of a flag. Values coming from the environment or from a
    /// default are split on `,`.
    pub fn strings(&self, name: &str) -> Vec<String> {
        if self.from_command_line(name) {
            return self.values(name);
        }
        let text = match self.from_env(name) {
            Some(it) => it,
            None => match self.node.field(name).and_then(|it| it.default.clone()) {
                Some(it) => it,
                None => return Vec::new(),
            },
        };
        text.split(',').map(String::from).collect()
    }

    /// Positional tokens of this command, before binding consumed them.
    pub fn args(&self) -> Vec<String> {
        match self.matches.try_get_many::<String>(ARGS) {
            Ok(Some(it)) => it.cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn show_help(&self) -> anyhow::Result<()> {
        self.command.clone().print_help()?;
        Ok(())
    }

    pub(crate) fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// The bound root descriptor.
    ///
    /// # Panics
    ///
    /// If the root is not a `T` or is being bound. See
    /// [`try_root`](Context::try_root).
    pub fn root<T: Command>(&self) -> Ref<'a, T> {
        fail_fast(self.try_root())
    }

    pub fn parent<T: Command>(&self) -> Ref<'a, T> {
        fail_fast(self.try_parent())
    }

    pub fn current<T: Command>(&self) -> Ref<'a, T> {
        fail_fast(self.try_current())
    }

    pub fn try_root<T: Command>(&self) -> Result<Ref<'a, T>, LookupError> {
        self.router.borrow(ROOT_KEY, || LookupError::NoRoot)
    }

    pub fn try_parent<T: Command>(&self) -> Result<Ref<'a, T>, LookupError> {
        let node = self.node;
        if node.parent.is_empty() {
            return Err(LookupError::NoParent(node.path.clone()));
        }
        self.router.borrow(&node.parent, || LookupError::NoParent(node.path.clone()))
    }

    pub fn try_current<T: Command>(&self) -> Result<Ref<'a, T>, LookupError> {
        let node = self.node;
        self.router.borrow(&node.path, || LookupError::NoCurrent(node.path.clone()))
    }

    /// The bound descriptor of the direct subcommand `name`. A child that was
    /// not invoked in this run holds its unbound fields.
    pub fn child<T: Command>(&self, name: &str) -> Ref<'a, T> {
        fail_fast(self.try_child(name))
    }

    /// The bound descriptor at a command path such as `/app/config`.
    pub fn get<T: Command>(&self, path: &str) -> Ref<'a, T> {
        fail_fast(self.try_get(path))
    }

    pub fn try_child<T: Command>(&self, name: &str) -> Result<Ref<'a, T>, LookupError> {
        let node = self.node;
        let child = node.child(name).ok_or_else(|| LookupError::NoChild {
            path: node.path.clone(),
            name: name.to_string(),
        })?;
        self.router.borrow(&child.path, || LookupError::NoCurrent(child.path.clone()))
    }

    pub fn try_get<T: Command>(&self, path: &str) -> Result<Ref<'a, T>, LookupError> {
        self.router.borrow(path, || LookupError::NoCurrent(path.to_string()))
    }

    fn from_command_line(&self, name: &str) -> bool {
        self.is_flag(name)
            && matches!(self.matches.value_source(name), Some(ValueSource::CommandLine))
    }

    fn from_env(&self, name: &str) -> Option<String> {
        let field = self.node.field(name).filter(|it| !it.positional)?;
        field.envs.iter().find_map(|env| std::env::var(env).ok().filter(|it| !it.is_empty()))
    }

    fn values(&self, name: &str) -> Vec<String> {
        match self.matches.try_get_many::<String>(name) {
            Ok(Some(it)) => it.cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn is_flag(&self, name: &str) -> bool {
        self.node.field(name).is_some_and(|it| !it.positional)
    }
}

fn fail_fast<T>(res: Result<T, LookupError>) -> T {
    match res {
        Ok(it) => it,
        Err(err) => panic!("{}", err),
    }
}
