use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use engine::{resolve_app_paths, ClockMode, InputSource, LoopConfig, StartupError};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::cli::{parse_args, usage_text, CliCommand, CliOptions, LevelChoice};
use super::gameplay::{
    GameSession, Level, LevelError, Outcome, PuzzleScene, BUILT_IN_LEVEL_NAME,
};
use super::input::{ScriptedInput, StdinInput};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: PuzzleScene,
    pub(crate) input: Box<dyn InputSource>,
    pub(crate) outcomes: Receiver<Outcome>,
    pub(crate) json_summary: bool,
}

pub(crate) enum Startup {
    Run(AppWiring),
    Help(String),
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Paths(#[from] StartupError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("level '{name}' not found in {}", dir.display())]
    UnknownLevel { name: String, dir: PathBuf },
    #[error("failed to start stdin reader: {0}")]
    Stdin(#[source] io::Error),
}

pub(crate) fn build_app(args: &[String]) -> Result<Startup, BootstrapError> {
    info!("=== Moonstep Startup ===");

    let options = match parse_args(args).map_err(BootstrapError::Usage)? {
        CliCommand::Help => return Ok(Startup::Help(usage_text())),
        CliCommand::Run(options) => options,
    };

    let mut level = load_level(&options.level)?;
    if let Some(interval) = options.interval {
        level = level.with_interval(interval);
    }

    let mut session =
        GameSession::new(level).with_revert_marker_consumption(!options.keep_markers);
    let outcomes = session.outcomes_mut().subscribe_channel();
    let (input, clock) = build_input(&options)?;
    let config = LoopConfig {
        target_tps: options.target_tps.unwrap_or(LoopConfig::default().target_tps),
        max_ticks: options.max_ticks,
        clock,
        ..LoopConfig::default()
    };

    Ok(Startup::Run(AppWiring {
        config,
        scene: PuzzleScene::new(session),
        input,
        outcomes,
        json_summary: options.json,
    }))
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn build_input(
    options: &CliOptions,
) -> Result<(Box<dyn InputSource>, ClockMode), BootstrapError> {
    match &options.script {
        Some(script) => {
            let input = ScriptedInput::from_script(script).map_err(BootstrapError::Usage)?;
            let clock = if options.realtime {
                ClockMode::Realtime
            } else {
                ClockMode::Simulated
            };
            Ok((Box::new(input), clock))
        }
        None => {
            let input = StdinInput::spawn().map_err(BootstrapError::Stdin)?;
            Ok((Box::new(input), ClockMode::Realtime))
        }
    }
}

fn load_level(choice: &LevelChoice) -> Result<Level, BootstrapError> {
    match choice {
        LevelChoice::BuiltIn => Ok(Level::built_in()),
        LevelChoice::Path(path) => load_level_file(path),
        LevelChoice::Named(name) => {
            let levels_dir = match resolve_app_paths() {
                Ok(paths) => paths.levels_dir,
                Err(error) if name == BUILT_IN_LEVEL_NAME => {
                    warn!(error = %error, "levels_dir_unavailable");
                    return Ok(Level::built_in());
                }
                Err(error) => return Err(error.into()),
            };
            load_named_level(&levels_dir, name)
        }
    }
}

fn load_named_level(levels_dir: &Path, name: &str) -> Result<Level, BootstrapError> {
    let path = levels_dir.join(format!("{name}.json"));
    if path.is_file() {
        load_level_file(&path)
    } else if name == BUILT_IN_LEVEL_NAME {
        Ok(Level::built_in())
    } else {
        Err(BootstrapError::UnknownLevel {
            name: name.to_string(),
            dir: levels_dir.to_path_buf(),
        })
    }
}

fn load_level_file(path: &Path) -> Result<Level, BootstrapError> {
    let level = Level::load(path)?;
    info!(level = level.name(), path = %path.display(), "level_loaded");
    Ok(level)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn named_level_is_read_from_levels_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("walk.json"),
            r#"{"name": "walk", "interval_secs": 1.0, "rows": ["P.G"]}"#,
        )
        .expect("write level");

        let level = load_named_level(dir.path(), "walk").expect("level");
        assert_eq!(level.name(), "walk");
    }

    #[test]
    fn built_in_name_falls_back_when_file_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let level = load_named_level(dir.path(), BUILT_IN_LEVEL_NAME).expect("level");
        assert_eq!(level.board().render_rows(), vec!["###", "GR#", "#P#"]);
    }

    #[test]
    fn unknown_level_names_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_named_level(dir.path(), "nowhere").expect_err("missing");
        assert!(matches!(err, BootstrapError::UnknownLevel { .. }));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn scripted_run_uses_simulated_clock() {
        let args = ["--script", "UL", "--tps", "20", "--interval-ms", "500"]
            .map(str::to_string)
            .to_vec();
        let Startup::Run(app) = build_app(&args).expect("startup") else {
            panic!("expected a run");
        };
        assert_eq!(app.config.clock, ClockMode::Simulated);
        assert_eq!(app.config.target_tps, 20);
        assert_eq!(
            app.scene.session().level().interval(),
            std::time::Duration::from_millis(500)
        );
        assert!(!app.json_summary);
    }

    #[test]
    fn help_returns_usage() {
        let Startup::Help(text) = build_app(&["--help".to_string()]).expect("help") else {
            panic!("expected help");
        };
        assert!(text.contains("--script"));
    }

    #[test]
    fn bad_script_is_a_usage_error() {
        let args = ["--script", "UZ"].map(str::to_string).to_vec();
        assert!(matches!(build_app(&args), Err(BootstrapError::Usage(_))));
    }
}
