mod cli;
mod config;
mod dialects_cmd;
mod render_cmd;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Render(args) => render_cmd::run(args),
        cli::Command::Dialects => dialects_cmd::run(),
    }
}
