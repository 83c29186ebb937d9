use clive::{Action, Command, Context};

#[derive(Debug, Default, Command)]
#[cli("name:hello,usage:'greets someone'")]
struct Hello {
    #[cli("positional,default:world")]
    name: String,
    #[cli("alias:e,usage:'end with a heart'")]
    emoji: bool,
}

impl Action for Hello {
    fn action(&self, _ctx: &Context<'_>) -> anyhow::Result<()> {
        let bang = if self.emoji { "❣️" } else { "!" };
        println!("Hello {}{}", self.name, bang);
        Ok(())
    }
}

fn main() {
    if let Err(err) = clive::build(Hello::default()).run_from_env() {
        eprintln!("{}", err);
        std::process::exit(1)
    }
}
