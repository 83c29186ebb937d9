//! Declarative command line interfaces bound to annotated structs.
//!
//! A command is a struct deriving [`Command`]. Its fields become flags and
//! positional arguments, described by `#[cli("...")]` tags; a field named
//! `subcommands` holds child commands. Running the app binds the command
//! line, the environment and the declared defaults into the structs of the
//! invoked commands and then calls their [`Action`].
//!
//! ```ignore
//! #[derive(Debug, Default, clive::Command)]
//! #[cli("name:greet,usage:'say hello'")]
//! struct Greet {
//!     #[cli("positional,default:world")]
//!     name: String,
//!     #[cli("alias:l,usage:'how loud'")]
//!     loud: bool,
//! }
//!
//! impl clive::Action for Greet {
//!     fn action(&self, _ctx: &clive::Context<'_>) -> anyhow::Result<()> {
//!         println!("hello {}{}", self.name, if self.loud { "!" } else { "" });
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> clive::Result<()> {
//!     clive::build(Greet::default()).run_from_env()
//! }
//! ```
mod app;
mod assemble;
mod bind;
mod descriptor;
mod error;
mod node;
mod options;
mod registry;
mod router;
mod tag;
mod text;
mod walk;

pub use clive_macros::{Command, Inline, Subcommands, Text};

pub use crate::{
    app::{build, build_custom, try_build, App},
    descriptor::{Action, Command, Fields, RunFn, Subcommands},
    error::{BindError, ConfigError, Error, LookupError, Origin},
    node::{CommandNode, FieldMeta},
    options::Options,
    registry::{Counter, Shape, Value},
    router::Context,
    tag::Tag,
    text::Text,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Private impl details for macros.
#[doc(hidden)]
pub mod rt;
