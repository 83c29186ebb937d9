/// Knobs for [`build_custom`](crate::build_custom).
#[derive(Debug, Clone)]
pub struct Options {
    pub(crate) env_prefix: Option<String>,
    pub(crate) help_on_error: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options { env_prefix: None, help_on_error: true }
    }
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    /// Prepended, joined with `_`, to every derived environment variable
    /// name. Variables named explicitly with `env:` are left alone.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Options {
        let prefix = prefix.into();
        self.env_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    /// Whether a binding failure prints the help of the failing command to
    /// stderr. On by default.
    pub fn help_on_error(mut self, yes: bool) -> Options {
        self.help_on_error = yes;
        self
    }
}
