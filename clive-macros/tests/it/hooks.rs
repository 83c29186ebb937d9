use std::cell::RefCell;

use anyhow::bail;
use clive::{Action, Command, Context, LookupError, RunFn, Subcommands};
use expect_test::expect;

use crate::{check, run};

thread_local! {
    static LOG: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

fn log(event: impl Into<String>) {
    LOG.with(|it| it.borrow_mut().push(event.into()));
}

fn take_log() -> Vec<String> {
    LOG.with(|it| it.borrow_mut().drain(..).collect())
}

#[derive(Debug, Default, Command)]
#[cli("name:root")]
struct Root {
    #[cli("default:fast")]
    mode: String,
    fail_before: bool,
    subcommands: RootCommands,
}

#[derive(Debug, Default, Subcommands)]
struct RootCommands {
    leaf: Option<Box<Leaf>>,
}

#[derive(Debug, Default, Command)]
struct Leaf {
    #[cli("positional,required:false")]
    fail: String,
}

impl Action for Root {
    fn before(&mut self, _ctx: &Context<'_>) -> anyhow::Result<()> {
        log("root before");
        if self.fail_before {
            bail!("root before failed")
        }
        Ok(())
    }

    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        log(format!(
            "root action mode={} set={}",
            ctx.string("mode").unwrap_or_default(),
            ctx.is_set("mode")
        ));
        if ctx.try_parent::<Root>().err() == Some(LookupError::NoParent("/root".to_string())) {
            log("root has no parent");
        }
        Ok(())
    }

    fn after(&self, _ctx: &Context<'_>) -> anyhow::Result<()> {
        log("root after");
        Ok(())
    }

    fn version(&self) -> Option<String> {
        Some("1.2.3".to_string())
    }

    fn description(&self) -> Option<String> {
        Some("Runs the leaves.".to_string())
    }
}

impl Action for Leaf {
    fn before(&mut self, ctx: &Context<'_>) -> anyhow::Result<()> {
        log("leaf before");
        if let Err(LookupError::InUse(path)) = ctx.try_current::<Leaf>() {
            log(format!("{} in use", path));
        }
        Ok(())
    }

    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        log("leaf action");
        log(format!("root mode={}", ctx.root::<Root>().mode));
        log(format!("parent mode={}", ctx.parent::<Root>().mode));
        log(format!("current fail={:?}", ctx.current::<Leaf>().fail));
        if let Err(LookupError::WrongType { path, .. }) = ctx.try_root::<Leaf>() {
            log(format!("{} is not a leaf", path));
        }
        if self.fail == "action" || self.fail == "both" {
            bail!("leaf action failed")
        }
        Ok(())
    }

    fn after(&self, _ctx: &Context<'_>) -> anyhow::Result<()> {
        log("leaf after");
        if self.fail == "after" || self.fail == "both" {
            bail!("leaf after failed")
        }
        Ok(())
    }
}

#[test]
fn hook_order() {
    run(Root::default(), "--mode slow leaf").unwrap();
    expect![[r#"
        [
            "root before",
            "leaf before",
            "/root/leaf in use",
            "leaf action",
            "root mode=slow",
            "parent mode=slow",
            "current fail=\"\"",
            "cliveRoot is not a leaf",
            "leaf after",
            "root after",
        ]
    "#]]
    .assert_debug_eq(&take_log());
}

#[test]
fn root_action() {
    run(Root::default(), "").unwrap();
    expect![[r#"
        [
            "root before",
            "root action mode=fast set=false",
            "root has no parent",
            "root after",
        ]
    "#]]
    .assert_debug_eq(&take_log());

    run(Root::default(), "--mode slow").unwrap();
    assert_eq!(take_log()[1], "root action mode=slow set=true");
}

#[test]
fn after_runs_on_failure() {
    let err = run(Root::default(), "--fail-before leaf").unwrap_err();
    assert_eq!(err.to_string(), "root before failed");
    assert_eq!(take_log(), ["root before", "root after"]);

    let err = run(Root::default(), "leaf action").unwrap_err();
    assert_eq!(err.to_string(), "leaf action failed");
    let log = take_log();
    assert_eq!(log[log.len() - 2..], ["leaf after", "root after"]);

    let err = run(Root::default(), "leaf after").unwrap_err();
    assert_eq!(err.to_string(), "leaf after failed");
    assert_eq!(take_log().last().map(String::as_str), Some("root after"));

    let err = run(Root::default(), "leaf both").unwrap_err();
    assert_eq!(err.to_string(), "leaf action failed");
    take_log();
}

#[test]
fn after_runs_on_bind_failure() {
    let err = run(Root::default(), "leaf a b").unwrap_err();
    assert!(matches!(err, clive::Error::Bind(clive::BindError::TooManyArguments { .. })));
    assert_eq!(take_log(), ["root before", "leaf after", "root after"]);
}

#[test]
fn version_and_description() {
    let app = clive::build(Root::default());
    assert_eq!(app.command().get_version(), Some("1.2.3"));
    assert_eq!(
        app.command().get_long_about().map(|it| it.to_string()),
        Some("Runs the leaves.".to_string())
    );
    app.run(crate::argv("--version")).unwrap();
    assert!(take_log().is_empty());
}

#[derive(Debug, Default, Command)]
struct Task {
    #[cli("positional")]
    name: String,
    run: RunFn<Task>,
}

impl Action for Task {
    fn action(&self, _ctx: &Context<'_>) -> anyhow::Result<()> {
        log(format!("task action {}", self.name));
        Ok(())
    }
}

#[test]
fn run_hook_replaces_action() {
    let task = Task {
        run: RunFn::new(|task: &Task, ctx| {
            log(format!("run {} at {}", task.name, ctx.path()));
            Ok(())
        }),
        ..Task::default()
    };
    let task = run(task, "build").unwrap();
    assert!(task.run.is_set());
    assert_eq!(take_log(), ["run build at /task"]);

    run(Task::default(), "test").unwrap();
    assert_eq!(take_log(), ["task action test"]);

    let app = clive::build(Task::default());
    assert!(app.tree().field("run").is_none());
}

#[derive(Debug, Default, Command)]
struct Fallbacks {
    listen_port: u16,
    bind_host: String,
    #[cli("default:3")]
    retries: u32,
}

impl Fallbacks {
    fn on_listen_port_unset(&mut self) -> anyhow::Result<()> {
        self.listen_port = 8080;
        Ok(())
    }

    fn on_bind_host_unset(&mut self, ctx: &Context<'_>) -> anyhow::Result<()> {
        self.bind_host = format!("{}.local", ctx.path().trim_start_matches('/'));
        Ok(())
    }

    fn on_retries_unset(&mut self) -> anyhow::Result<()> {
        self.retries = 99;
        Ok(())
    }
}

#[derive(Debug, Default, Command)]
struct Strict {
    secret_token: String,
}

impl Strict {
    fn on_secret_token_unset(&mut self) -> anyhow::Result<()> {
        bail!("token missing")
    }
}

crate::quiet!(Fallbacks, Strict);

#[test]
fn unset_fallbacks() {
    check(
        Fallbacks::default(),
        "",
        expect![[r#"
            Fallbacks {
                listen_port: 8080,
                bind_host: "fallbacks.local",
                retries: 3,
            }
        "#]],
    );
    check(
        Fallbacks::default(),
        "--listen-port 1 --bind-host h --retries 5",
        expect![[r#"
            Fallbacks {
                listen_port: 1,
                bind_host: "h",
                retries: 5,
            }
        "#]],
    );
    check(
        Strict::default(),
        "",
        expect![[r#"failed to assign `secret-token` (String) from unset fallback `Strict::on_secret_token_unset`: token missing"#]],
    );
    check(
        Strict::default(),
        "--secret-token t",
        expect![[r#"
            Strict {
                secret_token: "t",
            }
        "#]],
    );
}

#[derive(Debug, Default, Command)]
#[cli("name:pipeline")]
struct Pipeline {
    subcommands: PipelineCommands,
}

#[derive(Debug, Default, Subcommands)]
struct PipelineCommands {
    step: Option<Box<Step>>,
    other: Option<Box<Other>>,
}

#[derive(Debug, Default, Command)]
struct Step {
    #[cli("positional")]
    label: String,
}

#[derive(Debug, Default, Command)]
struct Other {}

crate::quiet!(Step, Other);

impl Action for Pipeline {
    fn after(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        log(format!("child label={}", ctx.child::<Step>("step").label));
        log(format!("by path label={}", ctx.get::<Step>("/pipeline/step").label));
        if let Err(err) = ctx.try_child::<Step>("missing") {
            log(err.to_string());
        }
        if let Err(LookupError::WrongType { path, .. }) = ctx.try_child::<Step>("other") {
            log(format!("{} is not a step", path));
        }
        Ok(())
    }
}

#[test]
fn parent_reads_bound_child() {
    run(Pipeline::default(), "step compile").unwrap();
    expect![[r#"
        [
            "child label=compile",
            "by path label=compile",
            "command `/pipeline` has no subcommand `missing`",
            "/pipeline/other is not a step",
        ]
    "#]]
    .assert_debug_eq(&take_log());
}
