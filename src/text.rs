use std::{path::PathBuf, time::Duration};

/// A scalar that can be parsed from its textual form.
///
/// This is the capability behind every single-valued field: the builtin
/// numbers, `bool`, `String`, `PathBuf` and `Duration` implement it, and so
/// can user types (`#[derive(Text)]` does it for fieldless enums). Slices and
/// `Option`s of a `Text` type are bindable too.
pub trait Text: Sized + Default + 'static {
    fn parse_text(text: &str) -> Result<Self, String>;

    /// Accepted tags, in declaration order. When present, the usage of every
    /// flag of this type lists them.
    fn variants() -> Option<&'static [&'static str]> {
        None
    }

    #[doc(hidden)]
    const SWITCH: bool = false;
}

macro_rules! from_str_text {
    ($($ty:ty),*) => {$(
        impl Text for $ty {
            fn parse_text(text: &str) -> Result<Self, String> {
                text.parse::<$ty>().map_err(|err| err.to_string())
            }
        }
    )*};
}

from_str_text!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f64, String, PathBuf);

impl Text for f32 {
    // Parsed at double precision and narrowed, so literals that are not
    // representable in `f32` lose precision instead of failing.
    fn parse_text(text: &str) -> Result<Self, String> {
        text.parse::<f64>().map(|it| it as f32).map_err(|err| err.to_string())
    }
}

impl Text for bool {
    fn parse_text(text: &str) -> Result<Self, String> {
        parse_bool(text).ok_or_else(|| format!("invalid boolean: `{}`", text))
    }

    const SWITCH: bool = true;
}

impl Text for Duration {
    fn parse_text(text: &str) -> Result<Self, String> {
        humantime::parse_duration(text).map_err(|err| err.to_string())
    }
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
