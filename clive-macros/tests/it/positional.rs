use clive::Command;
use expect_test::expect;

use crate::{check, quiet, run};

#[derive(Debug, Default, Command)]
#[cli("name:cp")]
struct Cp {
    #[cli("positional,usage:'file to copy'")]
    source: String,
    #[cli("positional,required:false")]
    targets: Vec<String>,
}

#[derive(Debug, Default, Command)]
struct Pair {
    #[cli("positional")]
    left: String,
    #[cli("positional,required:false")]
    right: Option<u32>,
}

#[derive(Debug, Default, Command)]
struct Greet {
    #[cli("positional,default:world")]
    name: String,
    #[cli("positional,required:false")]
    punctuation: String,
    #[cli("-")]
    calls: Vec<&'static str>,
}

impl Greet {
    fn on_name_unset(&mut self) -> anyhow::Result<()> {
        self.calls.push("name");
        Ok(())
    }

    fn on_punctuation_unset(&mut self) -> anyhow::Result<()> {
        self.calls.push("punctuation");
        self.punctuation = "!".to_string();
        Ok(())
    }
}

#[derive(Debug, Default, Command)]
struct Mixed {
    #[cli("alias:v")]
    verbosity: u8,
    #[cli("positional")]
    files: Vec<String>,
}

quiet!(Cp, Pair, Greet, Mixed);

#[test]
fn required_then_variadic() {
    check(Cp::default(), "", expect![[r#"missing required positional argument `source`"#]]);
    check(
        Cp::default(),
        "a.txt",
        expect![[r#"
            Cp {
                source: "a.txt",
                targets: [],
            }
        "#]],
    );
    check(
        Cp::default(),
        "a.txt b.txt c.txt",
        expect![[r#"
            Cp {
                source: "a.txt",
                targets: [
                    "b.txt",
                    "c.txt",
                ],
            }
        "#]],
    );
}

#[test]
fn leftover_tokens() {
    check(Pair::default(), "a 1 2 3", expect![[r#"too many arguments: 2 3"#]]);
    assert_eq!(run(Pair::default(), "a").unwrap().right, None);
    assert_eq!(run(Pair::default(), "a 3").unwrap().right, Some(3));
    check(
        Pair::default(),
        "a b",
        expect![[r#"failed to assign `right` (Option<u32>) from positional argument `right`: invalid digit found in string"#]],
    );
}

#[test]
fn default_skips_fallback() {
    check(
        Greet::default(),
        "",
        expect![[r#"
            Greet {
                name: "world",
                punctuation: "!",
                calls: [
                    "punctuation",
                ],
            }
        "#]],
    );
    check(
        Greet::default(),
        "you ?",
        expect![[r#"
            Greet {
                name: "you",
                punctuation: "?",
                calls: [],
            }
        "#]],
    );
}

#[test]
fn flags_between_positionals() {
    check(
        Mixed::default(),
        "a -v 2 b --verbosity=3 c",
        expect![[r#"
            Mixed {
                verbosity: 3,
                files: [
                    "a",
                    "b",
                    "c",
                ],
            }
        "#]],
    );
    check(Mixed::default(), "", expect![[r#"missing required positional argument `files`"#]]);
}

#[test]
fn usage() {
    let app = clive::build(Cp::default());
    assert_eq!(app.tree().args_usage(), "SOURCE [TARGETS [TARGETS]]");
    let usage = app.command().clone().render_usage().to_string();
    assert_eq!(usage, "Usage: cp [OPTIONS] SOURCE [TARGETS [TARGETS]]");

    let app = clive::build(Greet::default());
    assert_eq!(app.tree().args_usage(), "[NAME] [PUNCTUATION]");
    let positionals = app.tree().positionals().map(|it| it.name()).collect::<Vec<_>>();
    assert_eq!(positionals, ["name", "punctuation"]);
    assert!(app.tree().field("calls").is_none());
}
