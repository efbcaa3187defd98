use std::path::PathBuf;

use parambind::Dialect;

pub const DEFAULT_CONFIG: &str = "parambind.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Render,
    Dialects,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Render(RenderArgs),
    Dialects,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub config: PathBuf,
    /// `--config` was given, so a missing file is an error.
    pub config_explicit: bool,
    pub dialect: Option<Dialect>,
    pub params: Option<Source>,
    /// `None` reads the template from stdin.
    pub template: Option<Source>,
    pub reject_empty_lists: bool,
    pub max_params: Option<usize>,
    pub json: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "render" => parse_render(it.map(|s| s.as_str())),
        "dialects" => parse_dialects(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_render<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut config_explicit = false;
    let mut dialect: Option<Dialect> = None;
    let mut params: Option<Source> = None;
    let mut file: Option<PathBuf> = None;
    let mut positional: Option<String> = None;
    let mut reject_empty_lists = false;
    let mut max_params: Option<usize> = None;
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Render)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
                config_explicit = true;
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
                config_explicit = true;
            }
            "--dialect" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--dialect requires a value");
                };
                dialect = Some(v.parse()?);
            }
            _ if token.starts_with("--dialect=") => {
                dialect = Some(token.trim_start_matches("--dialect=").parse()?);
            }
            "--params" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--params requires a value");
                };
                set_params(&mut params, Source::Inline(v.to_string()))?;
            }
            _ if token.starts_with("--params=") => {
                let v = token.trim_start_matches("--params=");
                set_params(&mut params, Source::Inline(v.to_string()))?;
            }
            "--params-file" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--params-file requires a value");
                };
                set_params(&mut params, Source::File(PathBuf::from(v)))?;
            }
            _ if token.starts_with("--params-file=") => {
                let v = token.trim_start_matches("--params-file=");
                set_params(&mut params, Source::File(PathBuf::from(v)))?;
            }
            "--file" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--file requires a value");
                };
                file = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--file=") => {
                file = Some(PathBuf::from(token.trim_start_matches("--file=")));
            }
            "--reject-empty-lists" => reject_empty_lists = true,
            "--max-params" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--max-params requires a value");
                };
                max_params = Some(parse_count("--max-params", v)?);
            }
            _ if token.starts_with("--max-params=") => {
                let v = token.trim_start_matches("--max-params=");
                max_params = Some(parse_count("--max-params", v)?);
            }
            "--json" => json = true,
            other if other.starts_with("--") => anyhow::bail!("unknown argument: {other}"),
            other => {
                if positional.is_some() {
                    anyhow::bail!("unexpected argument: {other}");
                }
                positional = Some(other.to_string());
            }
        }
    }

    let template = match (file, positional) {
        (Some(_), Some(_)) => anyhow::bail!("pass either --file or a template argument, not both"),
        (Some(path), None) => Some(Source::File(path)),
        (None, Some(sql)) => Some(Source::Inline(sql)),
        (None, None) => None,
    };

    Ok(Command::Render(RenderArgs {
        config,
        config_explicit,
        dialect,
        params,
        template,
        reject_empty_lists,
        max_params,
        json,
    }))
}

fn parse_dialects<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    match it.next() {
        None => Ok(Command::Dialects),
        Some("-h" | "--help") => Ok(Command::Help(HelpTopic::Dialects)),
        Some(other) => anyhow::bail!("unknown argument: {other}"),
    }
}

fn set_params(slot: &mut Option<Source>, source: Source) -> anyhow::Result<()> {
    if slot.is_some() {
        anyhow::bail!("--params and --params-file may be given only once");
    }
    *slot = Some(source);
    Ok(())
}

fn parse_count(flag: &str, v: &str) -> anyhow::Result<usize> {
    v.parse()
        .map_err(|_| anyhow::anyhow!("{flag} expects a non-negative integer, got {v:?}"))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
parambind - render named SQL parameters as dialect placeholders

USAGE:
  parambind <COMMAND> [OPTIONS]

COMMANDS:
  render                Render a template to SQL and ordered values
  dialects              List supported dialects

Run `parambind <command> --help` for more."
            );
        }
        HelpTopic::Render => {
            println!(
                "\
USAGE:
  parambind render [OPTIONS] [TEMPLATE]

NOTES:
  - Without TEMPLATE or --file, the template is read from stdin.
  - JSON arrays in the params object expand as lists: `IN (:ids)`.

OPTIONS:
  --dialect <NAME>      Target dialect (default: from config, else postgres)
  --params <JSON>       Parameter values as a JSON object
  --params-file <FILE>  Read the JSON object from a file
  --file <FILE>         Read the template from a file
  --config <FILE>       Config file path (default: parambind.toml)
  --reject-empty-lists  Fail on empty list parameters instead of rendering NULL
  --max-params <N>      Fail if more than N values would be bound
  --json                Print {{\"sql\", \"values\"}} as JSON
  -h, --help            Print help"
            );
        }
        HelpTopic::Dialects => {
            println!(
                "\
USAGE:
  parambind dialects

Lists dialect names accepted by --dialect with their first placeholder."
            );
        }
    }
}
