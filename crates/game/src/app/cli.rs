use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LevelChoice {
    BuiltIn,
    Named(String),
    Path(PathBuf),
}

impl LevelChoice {
    fn from_arg(value: &str) -> Self {
        if value.ends_with(".json") || value.contains('/') || value.contains('\\') {
            Self::Path(PathBuf::from(value))
        } else {
            Self::Named(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CliOptions {
    pub(crate) level: LevelChoice,
    pub(crate) interval: Option<Duration>,
    pub(crate) target_tps: Option<u32>,
    pub(crate) realtime: bool,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) script: Option<String>,
    pub(crate) json: bool,
    pub(crate) keep_markers: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            level: LevelChoice::BuiltIn,
            interval: None,
            target_tps: None,
            realtime: false,
            max_ticks: None,
            script: None,
            json: false,
            keep_markers: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    Run(CliOptions),
    Help,
}

pub(crate) fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    let mut options = CliOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--level" => {
                let value = flag_value(args, index, "--level")?;
                options.level = LevelChoice::from_arg(value);
                index += 2;
            }
            "--interval-ms" => {
                let value = flag_value(args, index, "--interval-ms")?;
                let millis = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --interval-ms value '{value}' (expected u64)"))?;
                if millis == 0 {
                    return Err("--interval-ms must be greater than zero".to_string());
                }
                options.interval = Some(Duration::from_millis(millis));
                index += 2;
            }
            "--tps" => {
                let value = flag_value(args, index, "--tps")?;
                let tps = value
                    .parse::<u32>()
                    .map_err(|_| format!("invalid --tps value '{value}' (expected u32)"))?;
                if tps == 0 {
                    return Err("--tps must be greater than zero".to_string());
                }
                options.target_tps = Some(tps);
                index += 2;
            }
            "--max-ticks" => {
                let value = flag_value(args, index, "--max-ticks")?;
                options.max_ticks = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("invalid --max-ticks value '{value}' (expected u64)"))?,
                );
                index += 2;
            }
            "--script" => {
                let value = flag_value(args, index, "--script")?;
                options.script = Some(value.to_string());
                index += 2;
            }
            "--realtime" => {
                options.realtime = true;
                index += 1;
            }
            "--json" => {
                options.json = true;
                index += 1;
            }
            "--keep-markers" => {
                options.keep_markers = true;
                index += 1;
            }
            other => return Err(format!("unknown argument '{other}'\n\n{}", usage_text())),
        }
    }
    Ok(CliCommand::Run(options))
}

fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str, String> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub(crate) fn usage_text() -> String {
    [
        "Usage:",
        "  game [options]",
        "",
        "Options:",
        "  --level <name|path>   level name under assets/levels or a .json path (default: moon)",
        "  --interval-ms <u64>   override the level's command interval",
        "  --tps <u32>           fixed ticks per second (default: 60)",
        "  --max-ticks <u64>     stop after this many ticks",
        "  --script <UDLR...>    queue these moves, then press Go (no stdin)",
        "  --realtime            pace a scripted run against the wall clock",
        "  --keep-markers        revert markers stay on the board after firing",
        "  --json                print the final summary as JSON",
        "  -h, --help            show this help",
        "",
        "Without --script, commands are read from stdin:",
        "  u d l r | up down left right | go | restart | quit",
        "",
        "Exit codes: 0 win or quit, 2 lose, 1 startup error.",
    ]
    .join("\n")
}
