use std::{
    any::Any,
    cell::{Cell, Ref},
    collections::HashMap,
    ffi::OsString,
    marker::PhantomData,
};

use clap::{error::ErrorKind, ArgMatches};

use crate::{
    assemble::assemble,
    bind::{bind, reset},
    descriptor::Command,
    node::CommandNode,
    router::{Router, ROOT_KEY},
    walk::Walker,
    ConfigError, Context, LookupError, Options, Result,
};

/// A runnable command line interface built from a descriptor of type `C`.
pub struct App<C> {
    tree: CommandNode,
    command: clap::Command,
    router: Router,
    options: Options,
    ran: Cell<bool>,
    _descriptor: PhantomData<fn() -> C>,
}

/// Builds an app from a descriptor.
///
/// # Panics
///
/// If the descriptor is malformed. Descriptors are static data, use
/// [`try_build`] to inspect the error instead.
pub fn build<C: Command>(descriptor: C) -> App<C> {
    build_custom(descriptor, Options::default())
}

/// [`build`] with [`Options`].
pub fn build_custom<C: Command>(descriptor: C, options: Options) -> App<C> {
    match try_build(descriptor, options) {
        Ok(app) => app,
        Err(err) => panic!("invalid command descriptor: {}", err),
    }
}

pub fn try_build<C: Command>(descriptor: C, options: Options) -> Result<App<C>, ConfigError> {
    let mut walker = Walker::new(options.clone());
    let mut tree = walker.command(Box::new(descriptor), "")?;
    let command = assemble(&tree)?;
    let router = Router::new(&mut tree);
    Ok(App { tree, command, router, options, ran: Cell::new(false), _descriptor: PhantomData })
}

impl<C: Command> App<C> {
    /// Parses `args` (the first one is the program name), binds the
    /// invoked commands and runs the innermost one.
    ///
    /// `--help` and `--version` print and return `Ok(())`. An app can run
    /// more than once; every field bound by a previous run is reset first.
    pub fn run<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        if self.ran.replace(true) {
            self.reset(&self.tree)?;
        }
        let matches = match self.command.clone().try_get_matches_from(args) {
            Ok(it) => it,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    err.print().map_err(clap::Error::from)?;
                    return Ok(());
                }
                _ => return Err(err.into()),
            },
        };
        self.dispatch(&self.tree, &self.command, &matches)
    }

    pub fn run_from_env(&self) -> Result<()> {
        self.run(std::env::args_os())
    }

    /// The assembled tokenizer command, for help or completion tooling.
    pub fn command(&self) -> &clap::Command {
        &self.command
    }

    pub fn tree(&self) -> &CommandNode {
        &self.tree
    }

    /// The root descriptor, as bound by the last run.
    pub fn root(&self) -> Ref<'_, C> {
        match self.router.borrow::<C>(ROOT_KEY, || LookupError::NoRoot) {
            Ok(it) => it,
            Err(err) => panic!("{}", err),
        }
    }

    /// Takes the root descriptor back, with every subcommand reattached to
    /// its group.
    pub fn into_descriptor(self) -> C {
        let App { tree, router, .. } = self;
        let mut slots = router.into_slots();
        match reattach(&tree, &mut slots).map(|it| it.into_any().downcast::<C>()) {
            Some(Ok(it)) => *it,
            _ => panic!("root descriptor is missing"),
        }
    }

    fn dispatch(&self, node: &CommandNode, command: &clap::Command, matches: &ArgMatches) -> Result<()> {
        let ctx = Context::new(matches, node, command, &self.router);
        tracing::debug!(command = %node.path, ty = node.type_name, "dispatch");

        let res = self.before(node, &ctx).and_then(|()| {
            let sub = matches.subcommand().and_then(|(name, sub_matches)| {
                Some((node.child(name)?, command.find_subcommand(name)?, sub_matches))
            });
            match sub {
                Some((child, sub_command, sub_matches)) => self.dispatch(child, sub_command, sub_matches),
                None => self.action(node, &ctx),
            }
        });

        let after = self.after(node, &ctx);
        match (res, after) {
            (Ok(()), after) => after,
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(after_err)) => {
                tracing::warn!(command = %node.path, error = %after_err, "after hook failed");
                Err(err)
            }
        }
    }

    fn reset(&self, node: &CommandNode) -> Result<()> {
        let mut instance = self.router.borrow_dyn_mut(&node.path)?;
        reset(instance.fields_mut(), node);
        drop(instance);
        node.children.iter().try_for_each(|child| self.reset(child))
    }

    fn before(&self, node: &CommandNode, ctx: &Context<'_>) -> Result<()> {
        let mut instance = self.router.borrow_dyn_mut(&node.path)?;
        if let Err(err) = bind(instance.fields_mut(), node, ctx) {
            if self.options.help_on_error {
                eprintln!("{}", ctx.render_help());
            }
            return Err(err.into());
        }
        instance.before(ctx)?;
        Ok(())
    }

    fn after(&self, node: &CommandNode, ctx: &Context<'_>) -> Result<()> {
        let instance = self.router.borrow_dyn(&node.path)?;
        instance.after(ctx)?;
        Ok(())
    }

    fn action(&self, node: &CommandNode, ctx: &Context<'_>) -> Result<()> {
        let instance = self.router.borrow_dyn(&node.path)?;
        match instance.run(ctx) {
            Some(res) => res?,
            None => instance.action(ctx)?,
        }
        Ok(())
    }
}

fn reattach(node: &CommandNode, slots: &mut HashMap<String, Box<dyn Command>>) -> Option<Box<dyn Command>> {
    let mut instance = slots.remove(&node.path)?;
    let children: Vec<Box<dyn Any>> = node
        .children
        .iter()
        .filter_map(|child| reattach(child, slots))
        .map(|it| it.into_any())
        .collect();
    instance.restore(&mut children.into_iter());
    Some(instance)
}
