use std::{path::PathBuf, time::Duration};

use clive::{Action, Command, Context, Counter, Inline, Subcommands, Text};

#[derive(Debug, Default, Command)]
#[cli("name:multi,usage:'a service manager',shortOpt")]
struct Multi {
    #[cli("alias:v,usage:'more output, repeat for even more'")]
    verbose: Counter,
    #[cli("usage:'settings file'")]
    config_file: Option<PathBuf>,
    subcommands: MultiCommands,
}

#[derive(Debug, Default, Subcommands)]
struct MultiCommands {
    serve: Option<Box<Serve>>,
    config: Option<Box<Config>>,
}

#[derive(Debug, Default, Clone, Copy, Text)]
enum Role {
    #[default]
    Primary,
    Replica,
}

#[derive(Debug, Default, Inline)]
struct Listen {
    #[cli("default:127.0.0.1")]
    host: String,
    #[cli("default:8080")]
    port: u16,
}

#[derive(Debug, Default, Command)]
#[cli("usage:'run the service',alias:s")]
struct Serve {
    #[cli("inline")]
    listen: Listen,
    role: Role,
    #[cli("default:30s,usage:'shutdown grace period'")]
    grace: Duration,
    #[cli("positional,required:false,usage:'services to start'")]
    services: Vec<String>,
}

impl Serve {
    fn on_services_unset(&mut self) -> anyhow::Result<()> {
        self.services = vec!["web".to_string()];
        Ok(())
    }
}

#[derive(Debug, Default, Command)]
#[cli("usage:'inspect and change settings'")]
struct Config {
    subcommands: ConfigCommands,
}

#[derive(Debug, Default, Subcommands)]
struct ConfigCommands {
    set_option: Option<Box<SetOption>>,
    show: Option<Box<Show>>,
}

#[derive(Debug, Default, Command)]
#[cli("name:set-option,usage:'change one setting'")]
struct SetOption {
    #[cli("positional")]
    name: String,
    #[cli("positional")]
    value: String,
}

#[derive(Debug, Default, Command)]
#[cli("usage:'print the settings'")]
struct Show {}

impl Action for Multi {
    fn before(&mut self, _ctx: &Context<'_>) -> anyhow::Result<()> {
        tracing::debug!(verbose = self.verbose.value, "starting");
        Ok(())
    }

    fn version(&self) -> Option<String> {
        Some(env!("CARGO_PKG_VERSION").to_string())
    }
}

impl Action for Serve {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        let root = ctx.root::<Multi>();
        if root.verbose.value > 0 {
            eprintln!("{:#?}", self);
        }
        println!(
            "serving {} as {:?} on {}:{} (grace {:?})",
            self.services.join(", "),
            self.role,
            self.listen.host,
            self.listen.port,
            self.grace,
        );
        Ok(())
    }
}

impl Action for Config {}

impl Action for SetOption {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        let file = ctx.root::<Multi>().config_file.clone().unwrap_or_else(|| "multi.toml".into());
        println!("{}: {} = {}", file.display(), self.name, self.value);
        Ok(())
    }
}

impl Action for Show {
    fn action(&self, ctx: &Context<'_>) -> anyhow::Result<()> {
        let file = ctx.root::<Multi>().config_file.clone().unwrap_or_else(|| "multi.toml".into());
        println!("{} (from {})", file.display(), ctx.parent_path());
        Ok(())
    }
}

fn main() -> clive::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("clive=info,multi=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = clive::build_custom(Multi::default(), clive::Options::new().env_prefix("MULTI"));
    app.run_from_env()
}
