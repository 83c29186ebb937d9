use std::{error::Error as StdError, fmt};

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Top-level error returned by [`App::run`](crate::App::run).
#[derive(Debug, Error)]
pub enum Error {
    /// The tokenizer rejected the command line.
    #[error(transparent)]
    Parse(#[from] clap::Error),

    /// A field could not be populated from its sources.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// A hook asked for a command that can't be handed out.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A user hook (`before`, `action`, `after` or a run hook) failed.
    #[error(transparent)]
    Action(#[from] anyhow::Error),
}

/// Structural and tag errors found while building the command tree.
///
/// Descriptors are static data, so [`build`](crate::build) panics with one of
/// these; [`try_build`](crate::try_build) hands them back instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed tag section `{section}`")]
    InvalidTag { section: String },

    #[error("unknown tag key: `{key}`")]
    UnknownTagKey { key: String },

    #[error("failed to parse `{key}` as a bool: `{value}`")]
    InvalidBoolean { key: String, value: String },

    #[error("invalid default `{value}` for `{field}`: {reason}")]
    InvalidDefault { field: String, value: String, reason: String },

    #[error("positional argument `{name}` can't be hidden")]
    HiddenPositional { name: String },

    #[error("positional argument `{current}` follows variadic positional `{first}`")]
    PositionalAfterVariadic { current: String, first: String },

    #[error("required positional argument `{required}` follows optional `{optional}`")]
    OptionalBeforeRequired { required: String, optional: String },

    #[error("flag `{name}` is declared more than once in `{command}`")]
    DuplicateFlag { name: String, command: String },

    #[error("subcommand `{name}` is declared more than once in `{parent}`")]
    DuplicateCommand { name: String, parent: String },

    #[error("command `{command}`: {source}")]
    Command {
        command: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("field `{field}` of `{owner}`: {source}")]
    Field {
        owner: String,
        field: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn in_field(self, owner: &str, field: &str) -> ConfigError {
        ConfigError::Field { owner: owner.to_string(), field: field.to_string(), source: Box::new(self) }
    }
}

/// Run-time failure to populate a descriptor.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("missing required positional argument `{name}`")]
    MissingPositional { name: String },

    #[error("too many arguments: {}", .args.join(" "))]
    TooManyArguments { args: Vec<String> },

    #[error("flag is required: `--{name}`")]
    MissingFlag { name: String },

    #[error("failed to assign `{field}` ({ty}) from {origin}: {cause}")]
    FieldAssign {
        field: String,
        ty: String,
        origin: Origin,
        #[source]
        cause: BoxError,
    },
}

/// Where the value that failed to bind came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Flag(String),
    Positional(String),
    PositionalDefault(String),
    Fallback(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Flag(name) => write!(f, "flag `--{}`", name),
            Origin::Positional(name) => write!(f, "positional argument `{}`", name),
            Origin::PositionalDefault(name) => {
                write!(f, "default of positional argument `{}`", name)
            }
            Origin::Fallback(method) => write!(f, "unset fallback `{}`", method),
        }
    }
}

/// Misuse of the router from inside a hook. These are programmer errors:
/// the panicking lookups on [`Context`](crate::Context) fail fast with them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no root command is registered")]
    NoRoot,

    #[error("command `{0}` has no parent")]
    NoParent(String),

    #[error("no command is registered at `{0}`")]
    NoCurrent(String),

    #[error("command `{path}` has no subcommand `{name}`")]
    NoChild { path: String, name: String },

    #[error("command `{0}` is being bound and can't be borrowed")]
    InUse(String),

    #[error("command `{path}` is not a `{expected}`")]
    WrongType { path: String, expected: &'static str },
}
