use std::process::ExitCode;

use engine::{run_headless, LoopSummary, StopReason};
use serde::Serialize;
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::gameplay::{Outcome, SessionSummary};

const EXIT_LOSE: u8 = 2;

#[derive(Debug, Serialize)]
struct RunReport {
    #[serde(flatten)]
    session: SessionSummary,
    ticks: u64,
    sim_time_ms: u64,
    stop_reason: &'static str,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        mut scene,
        mut input,
        outcomes,
        json_summary,
    } = app;

    let summary = run_headless(&config, &mut scene, input.as_mut());
    let outcome = outcomes.try_iter().last();
    let report = RunReport {
        session: scene.session().summary(),
        ticks: summary.ticks,
        sim_time_ms: summary.sim_time.as_millis() as u64,
        stop_reason: stop_reason_token(&summary),
    };

    if json_summary {
        match serde_json::to_string(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!(error = %err, "summary_encode_failed");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", render_report(&report));
    }

    let status = exit_status(outcome);
    info!(
        outcome = outcome.map(Outcome::as_token).unwrap_or("none"),
        status, "run_finished"
    );
    ExitCode::from(status)
}

fn exit_status(outcome: Option<Outcome>) -> u8 {
    match outcome {
        Some(Outcome::Lose(_)) => EXIT_LOSE,
        Some(Outcome::Win) | None => 0,
    }
}

fn stop_reason_token(summary: &LoopSummary) -> &'static str {
    match summary.stop_reason {
        StopReason::SceneQuit => "scene_quit",
        StopReason::QuitRequested => "quit_requested",
        StopReason::TickLimit => "tick_limit",
    }
}

fn render_report(report: &RunReport) -> String {
    let session = &report.session;
    let (outcome, reason) = match session.outcome {
        Some(Outcome::Win) => ("win", "reached_goal"),
        Some(Outcome::Lose(reason)) => ("lose", reason.as_token()),
        None => ("none", report.stop_reason),
    };
    let mut text = format!(
        "level={} outcome={outcome} reason={reason} player={} ticks={} pending={} commands={}\n",
        session.level,
        session.player,
        report.ticks,
        session.pending.len(),
        session.commands
    );
    for row in &session.board {
        text.push_str(row);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engine::IVec2;

    use super::*;
    use crate::app::gameplay::{LoseReason, SessionPhase};

    fn report(outcome: Option<Outcome>) -> RunReport {
        RunReport {
            session: SessionSummary {
                level: "moon".to_string(),
                phase: SessionPhase::Lost,
                outcome,
                player: IVec2::new(0, 2),
                pending: Vec::new(),
                commands: "↑←".to_string(),
                board: vec!["###".to_string(), "G.#".to_string(), "P.#".to_string()],
            },
            ticks: 53,
            sim_time_ms: Duration::from_millis(5_300).as_millis() as u64,
            stop_reason: "scene_quit",
        }
    }

    #[test]
    fn exit_status_maps_outcomes() {
        assert_eq!(exit_status(Some(Outcome::Win)), 0);
        assert_eq!(exit_status(Some(Outcome::Lose(LoseReason::OffBoard))), 2);
        assert_eq!(exit_status(None), 0);
    }

    #[test]
    fn plain_report_lists_outcome_and_board() {
        let text = render_report(&report(Some(Outcome::Lose(LoseReason::HitWall))));
        assert_eq!(
            text,
            "level=moon outcome=lose reason=hit_wall player=(0, 2) ticks=53 pending=0 commands=↑←\n\
             ###\nG.#\nP.#\n"
        );
    }

    #[test]
    fn plain_report_without_outcome_uses_stop_reason() {
        let text = render_report(&report(None));
        assert!(text.starts_with("level=moon outcome=none reason=scene_quit"), "{text}");
    }

    #[test]
    fn json_report_flattens_session_fields() {
        let value = serde_json::to_value(report(Some(Outcome::Win))).expect("json");
        assert_eq!(value["level"], "moon");
        assert_eq!(value["outcome"]["outcome"], "win");
        assert_eq!(value["player"], serde_json::json!({"x": 0, "y": 2}));
        assert_eq!(value["ticks"], 53);
        assert_eq!(value["sim_time_ms"], 5_300);
        assert_eq!(value["stop_reason"], "scene_quit");
    }
}
