use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::scene::{hard_reset, Scene, SceneCommand};
use super::InputSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    /// Advance simulation time by `fixed_dt` per tick without sleeping.
    Simulated,
    /// Pace ticks against the wall clock.
    Realtime,
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub max_ticks: Option<u64>,
    pub clock: ClockMode,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            max_ticks: None,
            clock: ClockMode::Simulated,
        }
    }
}

pub trait InputSource {
    fn snapshot_for_tick(&mut self) -> InputSnapshot;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    SceneQuit,
    QuitRequested,
    TickLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub sim_time: Duration,
    pub stop_reason: StopReason,
}

pub fn run_headless(
    config: &LoopConfig,
    scene: &mut dyn Scene,
    input: &mut dyn InputSource,
) -> LoopSummary {
    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        max_ticks = ?config.max_ticks,
        clock = ?config.clock,
        "loop_config"
    );

    scene.load();
    let mut driver = TickDriver::new(fixed_dt, config.max_ticks);
    let stop_reason = match config.clock {
        ClockMode::Simulated => loop {
            if let Some(reason) = driver.step(scene, input) {
                break reason;
            }
        },
        ClockMode::Realtime => run_realtime(
            &mut driver,
            scene,
            input,
            max_frame_delta,
            max_ticks_per_frame,
        ),
    };
    scene.unload();

    info!(
        ticks = driver.ticks,
        sim_time_ms = driver.sim_time.as_millis() as u64,
        reason = ?stop_reason,
        "shutdown"
    );

    LoopSummary {
        ticks: driver.ticks,
        sim_time: driver.sim_time,
        stop_reason,
    }
}

fn run_realtime(
    driver: &mut TickDriver,
    scene: &mut dyn Scene,
    input: &mut dyn InputSource,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
) -> StopReason {
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();

    loop {
        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;

        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
        accumulator = accumulator.saturating_add(clamped_frame_dt);
        let step_plan = plan_sim_steps(accumulator, driver.fixed_dt, max_ticks_per_frame);
        for _ in 0..step_plan.ticks_to_run {
            if let Some(reason) = driver.step(scene, input) {
                return reason;
            }
        }
        accumulator = step_plan.remaining_accumulator;

        if step_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame, "sim_clamp_triggered"
            );
        }

        let sleep = compute_tick_sleep(accumulator, driver.fixed_dt);
        if sleep > Duration::ZERO {
            thread::sleep(sleep);
        }
    }
}

struct TickDriver {
    fixed_dt: Duration,
    max_ticks: Option<u64>,
    ticks: u64,
    sim_time: Duration,
    last_title: Option<String>,
}

impl TickDriver {
    fn new(fixed_dt: Duration, max_ticks: Option<u64>) -> Self {
        Self {
            fixed_dt,
            max_ticks,
            ticks: 0,
            sim_time: Duration::ZERO,
            last_title: None,
        }
    }

    fn step(&mut self, scene: &mut dyn Scene, input: &mut dyn InputSource) -> Option<StopReason> {
        if self.max_ticks.is_some_and(|limit| self.ticks >= limit) {
            return Some(StopReason::TickLimit);
        }

        let snapshot = input.snapshot_for_tick();
        if snapshot.quit_requested() {
            info!(reason = "quit_input", "shutdown_requested");
            return Some(StopReason::QuitRequested);
        }

        self.ticks = self.ticks.saturating_add(1);
        self.sim_time = self.sim_time.saturating_add(self.fixed_dt);
        let command = scene.update(self.fixed_dt, self.sim_time, &snapshot);

        let stop = match command {
            SceneCommand::None => None,
            SceneCommand::HardReset => {
                hard_reset(scene);
                info!(tick = self.ticks, "scene_reset");
                None
            }
            SceneCommand::Quit => Some(StopReason::SceneQuit),
        };

        let next_title = scene.debug_title();
        if next_title != self.last_title {
            if let Some(title) = &next_title {
                info!(title = title.as_str(), "scene_title");
            }
            self.last_title = next_title;
        }

        stop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub remaining_accumulator: Duration,
    pub dropped_backlog: Duration,
}

pub fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn compute_tick_sleep(accumulated: Duration, fixed_dt: Duration) -> Duration {
    fixed_dt.saturating_sub(accumulated)
}
