use std::cell::RefCell;

use clive::{Action, Command, Context, Subcommands};
use serde_json::json;

use crate::{quiet, run, Json};

thread_local! {
    static INVOKED: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

fn invoked() -> Vec<String> {
    INVOKED.with(|it| it.borrow_mut().drain(..).collect())
}

fn record(ctx: &Context<'_>) -> anyhow::Result<()> {
    INVOKED.with(|it| it.borrow_mut().push(ctx.path().to_string()));
    Ok(())
}

#[derive(Debug, Default, Command)]
#[cli("name:app,usage:'service manager'")]
struct Manager {
    dry_run: bool,
    subcommands: ManagerCommands,
}

#[derive(Debug, Default, Subcommands)]
struct ManagerCommands {
    start: Option<Box<Start>>,
    stop: Option<Box<Stop>>,
    config: Option<Box<Config>>,
}

#[derive(Debug, Default, Command)]
#[cli("usage:'start a service',alias:s")]
struct Start {
    #[cli("positional")]
    service: String,
}

#[derive(Debug, Default, Command)]
struct Stop {
    #[cli("positional")]
    service: String,
    force: bool,
}

#[derive(Debug, Default, Command)]
#[cli("usage:'inspect and change settings'")]
struct Config {
    subcommands: ConfigCommands,
}

#[derive(Debug, Default, Subcommands)]
struct ConfigCommands {
    setoption: Option<Box<SetOption>>,
    #[cli("inline")]
    more: MoreConfig,
}

#[derive(Debug, Default, Subcommands)]
struct MoreConfig {
    show: Option<Box<Show>>,
}

#[derive(Debug, Default, Command)]
struct SetOption {
    #[cli("positional")]
    name: String,
    #[cli("positional")]
    value: Json,
}

#[derive(Debug, Default, Command)]
struct Show {}

quiet!(Manager);

impl Action for Config {}

impl Action for Start {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        record(ctx)
    }
}

impl Action for Stop {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        record(ctx)
    }
}

impl Action for SetOption {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        record(ctx)
    }
}

impl Action for Show {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        record(ctx)
    }
}

#[test]
fn nested_subcommand_with_json_value() {
    let manager = run(Manager::default(), r#"config setoption NAME {"k":1}"#).unwrap();
    assert_eq!(invoked(), ["/app/config/setoption"]);

    let config = manager.subcommands.config.unwrap();
    let setoption = config.subcommands.setoption.unwrap();
    assert_eq!(setoption.name, "NAME");
    assert_eq!(setoption.value, Json(json!({"k": 1})));
    assert!(!manager.dry_run);
}

#[test]
fn aliases_and_root_flags() {
    let manager = run(Manager::default(), "s web").unwrap();
    assert_eq!(invoked(), ["/app/start"]);
    assert_eq!(manager.subcommands.start.unwrap().service, "web");

    let manager = run(Manager::default(), "--dry-run stop --force db").unwrap();
    assert_eq!(invoked(), ["/app/stop"]);
    assert!(manager.dry_run);
    let stop = manager.subcommands.stop.unwrap();
    assert!(stop.force);
    assert_eq!(stop.service, "db");
}

#[test]
fn flattened_group() {
    run(Manager::default(), "config show").unwrap();
    assert_eq!(invoked(), ["/app/config/show"]);

    // A group command without an action prints its help.
    run(Manager::default(), "config").unwrap();
    assert!(invoked().is_empty());
}

#[test]
fn children_are_kept_after_the_run() {
    let manager = run(Manager::default(), "start web").unwrap();
    assert!(manager.subcommands.stop.is_some());
    let config = manager.subcommands.config.unwrap();
    assert!(config.subcommands.more.show.is_some());
    invoked();
}

#[test]
fn tree() {
    let app = clive::build(Manager::default());
    let root = app.tree();
    let children = root.children().iter().map(|it| it.name()).collect::<Vec<_>>();
    assert_eq!(children, ["start", "stop", "config"]);

    let config = root.child("config").unwrap();
    assert_eq!(config.path(), "/app/config");
    assert_eq!(config.parent_path(), "/app");
    let children = config.children().iter().map(|it| it.path()).collect::<Vec<_>>();
    assert_eq!(children, ["/app/config/setoption", "/app/config/show"]);

    let start = app.command().find_subcommand("start").unwrap();
    assert_eq!(start.get_all_aliases().collect::<Vec<_>>(), ["s"]);
    assert_eq!(start.get_about().map(|it| it.to_string()), Some("start a service".to_string()));
}

#[test]
fn unknown_subcommand() {
    let err = run(Manager::default(), "restart web").unwrap_err();
    assert!(matches!(err, clive::Error::Parse(_)));
    assert!(invoked().is_empty());
}
