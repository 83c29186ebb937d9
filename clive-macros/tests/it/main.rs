mod hooks;
mod positional;
mod subcommands;

use std::fmt;

use clive::{Command, Options};
use expect_test::Expect;

/// Runs `descriptor` with `args` and snapshots either the bound descriptor
/// tree or the error.
fn check<C: Command + fmt::Debug>(descriptor: C, args: &str, expect: Expect) {
    let app = clive::build_custom(descriptor, Options::new().help_on_error(false));
    let res = app.run(argv(args));
    match res {
        Ok(()) => expect.assert_debug_eq(&app.into_descriptor()),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

fn run<C: Command>(descriptor: C, args: &str) -> clive::Result<C> {
    let app = clive::build_custom(descriptor, Options::new().help_on_error(false));
    app.run(argv(args))?;
    Ok(app.into_descriptor())
}

fn argv(args: &str) -> Vec<String> {
    std::iter::once("app").chain(args.split_ascii_whitespace()).map(String::from).collect()
}

/// Commands whose action does nothing, so a run doesn't print help.
macro_rules! quiet {
    ($($ty:ty),* $(,)?) => {$(
        impl clive::Action for $ty {
            fn action(&self, _ctx: &clive::Context<'_>) -> anyhow::Result<()> {
                Ok(())
            }
        }
    )*};
}
pub(crate) use quiet;

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Json(serde_json::Value);

impl clive::Text for Json {
    fn parse_text(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map(Json).map_err(|err| err.to_string())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, clive::Text)]
pub(crate) enum Role {
    #[default]
    Server,
    Client,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, clive::Text)]
pub(crate) enum Color {
    Red,
    Green,
    #[default]
    Blue,
}
