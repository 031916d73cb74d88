use std::collections::VecDeque;
use std::time::Duration;

use engine::IVec2;
use tracing::info;

use super::board::Board;
use super::outcome::{LoseReason, Outcome, OutcomeSignal};
use super::tiles::Direction;

/// Plays queued commands against the board, one transition per eligible tick.
///
/// A command that lands on a revert marker stays at the head of the queue
/// and is undone on the next eligible tick instead of letting the queue
/// advance. The first terminal outcome latches; later ticks are no-ops until
/// [`ReplayEngine::reset`].
#[derive(Debug, Clone)]
pub(crate) struct ReplayEngine {
    queue: VecDeque<Direction>,
    interval: Duration,
    next_allowed: Duration,
    must_revert: bool,
    outcome: Option<Outcome>,
    consume_revert_markers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdleReason {
    Finished,
    EmptyQueue,
    CoolingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickReport {
    Idle(IdleReason),
    Executed {
        direction: Direction,
        position: IVec2,
        outcome: Option<Outcome>,
        must_revert: bool,
    },
    Reverted {
        direction: Direction,
        position: IVec2,
        undone: bool,
    },
}

impl TickReport {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle(_))
    }
}

impl ReplayEngine {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            interval,
            next_allowed: Duration::ZERO,
            must_revert: false,
            outcome: None,
            consume_revert_markers: true,
        }
    }

    pub(crate) fn with_revert_marker_consumption(mut self, consume: bool) -> Self {
        self.consume_revert_markers = consume;
        self
    }

    pub(crate) fn enqueue(&mut self, direction: Direction) {
        self.queue.push_back(direction);
    }

    pub(crate) fn tick(
        &mut self,
        now: Duration,
        board: &mut Board,
        outcomes: &mut OutcomeSignal,
    ) -> TickReport {
        if self.outcome.is_some() {
            return TickReport::Idle(IdleReason::Finished);
        }
        let Some(&direction) = self.queue.front() else {
            return TickReport::Idle(IdleReason::EmptyQueue);
        };
        if now < self.next_allowed {
            return TickReport::Idle(IdleReason::CoolingDown);
        }

        if self.must_revert {
            self.revert_head(now, direction, board)
        } else {
            self.execute_head(now, direction, board, outcomes)
        }
    }

    pub(crate) fn reset(&mut self) {
        self.queue.clear();
        self.next_allowed = Duration::ZERO;
        self.must_revert = false;
        self.outcome = None;
    }

    pub(crate) fn pending(&self) -> impl Iterator<Item = Direction> + '_ {
        self.queue.iter().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub(crate) fn must_revert(&self) -> bool {
        self.must_revert
    }

    pub(crate) fn next_allowed(&self) -> Duration {
        self.next_allowed
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    fn execute_head(
        &mut self,
        now: Duration,
        direction: Direction,
        board: &mut Board,
        outcomes: &mut OutcomeSignal,
    ) -> TickReport {
        let moved = board.try_move(direction.delta());
        let outcome = if !moved {
            Some(Outcome::Lose(LoseReason::OffBoard))
        } else if board.is_player_on_wall() {
            Some(Outcome::Lose(LoseReason::HitWall))
        } else if board.is_player_on_goal() {
            Some(Outcome::Win)
        } else {
            None
        };
        if outcome.is_none() && board.is_player_on_revert_marker() {
            self.must_revert = true;
        }

        if self.must_revert {
            self.next_allowed = now.saturating_add(self.interval / 2);
        } else {
            self.queue.pop_front();
            self.next_allowed = now.saturating_add(self.interval);
        }

        let position = board.player_position();
        info!(
            direction = direction.as_token(),
            moved,
            landed = board.tile_under_player().as_token(),
            x = position.x,
            y = position.y,
            must_revert = self.must_revert,
            remaining = self.queue.len(),
            "command_executed"
        );

        if let Some(outcome) = outcome {
            self.outcome = Some(outcome);
            let delivered = outcomes.emit(&outcome);
            info!(
                outcome = outcome.as_token(),
                x = position.x,
                y = position.y,
                delivered,
                "outcome_fired"
            );
        }

        TickReport::Executed {
            direction,
            position,
            outcome,
            must_revert: self.must_revert,
        }
    }

    fn revert_head(
        &mut self,
        now: Duration,
        direction: Direction,
        board: &mut Board,
    ) -> TickReport {
        let marker_removed =
            self.consume_revert_markers && board.remove_revert_marker_under_player();
        let undone = board.try_move(direction.opposite().delta());
        self.must_revert = false;
        self.queue.pop_front();
        self.next_allowed = now.saturating_add(self.interval / 2);

        let position = board.player_position();
        info!(
            direction = direction.as_token(),
            undone,
            marker_removed,
            x = position.x,
            y = position.y,
            remaining = self.queue.len(),
            "command_reverted"
        );

        TickReport::Reverted {
            direction,
            position,
            undone,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;

    use super::super::board::board_from_text;
    use super::super::tiles::TileKind;
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(5);

    fn secs(value: f64) -> Duration {
        Duration::from_secs_f64(value)
    }

    fn sample_board() -> Board {
        board_from_text(&["###", "GR#", "#P#"])
    }

    fn engine_with(commands: &[Direction]) -> ReplayEngine {
        let mut engine = ReplayEngine::new(INTERVAL);
        for direction in commands {
            engine.enqueue(*direction);
        }
        engine
    }

    fn outcome_channel() -> (OutcomeSignal, Receiver<Outcome>) {
        let mut signal = OutcomeSignal::new();
        let receiver = signal.subscribe_channel();
        (signal, receiver)
    }

    #[test]
    fn idle_when_queue_is_empty_or_cooling_down() {
        let mut board = sample_board();
        let (mut signal, _receiver) = outcome_channel();
        let mut engine = ReplayEngine::new(INTERVAL);

        assert_eq!(
            engine.tick(INTERVAL, &mut board, &mut signal),
            TickReport::Idle(IdleReason::EmptyQueue)
        );

        let mut board = board_from_text(&["...", ".P.", "..."]);
        engine.enqueue(Direction::Up);
        engine.enqueue(Direction::Down);
        assert!(!engine.tick(secs(5.0), &mut board, &mut signal).is_idle());
        assert_eq!(engine.next_allowed(), secs(10.0));
        assert_eq!(
            engine.tick(secs(9.9), &mut board, &mut signal),
            TickReport::Idle(IdleReason::CoolingDown)
        );
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn executes_commands_in_fifo_order_one_per_interval() {
        let order = [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Left,
        ];
        let mut board = board_from_text(&[".....", ".....", "..P..", ".....", "....."]);
        let (mut signal, receiver) = outcome_channel();
        let mut engine = engine_with(&order);

        let mut executed = Vec::new();
        for step in 1..=order.len() as u32 {
            match engine.tick(INTERVAL * step, &mut board, &mut signal) {
                TickReport::Executed {
                    direction, outcome, ..
                } => {
                    assert_eq!(outcome, None);
                    executed.push(direction);
                }
                other => panic!("tick {step} did not execute: {other:?}"),
            }
        }

        assert_eq!(executed, order);
        assert!(engine.is_empty());
        assert_eq!(board.player_position(), IVec2::new(2, 3));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn revert_marker_is_undone_once_before_queue_advances() {
        let mut board = sample_board();
        let (mut signal, receiver) = outcome_channel();
        let mut engine = engine_with(&[Direction::Up]);

        let first = engine.tick(secs(5.0), &mut board, &mut signal);
        assert_eq!(
            first,
            TickReport::Executed {
                direction: Direction::Up,
                position: IVec2::new(1, 1),
                outcome: None,
                must_revert: true,
            }
        );
        assert!(engine.must_revert());
        assert_eq!(engine.pending().collect::<Vec<_>>(), vec![Direction::Up]);
        assert_eq!(engine.next_allowed(), secs(7.5));

        let second = engine.tick(secs(7.5), &mut board, &mut signal);
        assert_eq!(
            second,
            TickReport::Reverted {
                direction: Direction::Up,
                position: IVec2::new(1, 2),
                undone: true,
            }
        );
        assert!(!engine.must_revert());
        assert!(engine.is_empty());
        assert_eq!(board.player_position(), IVec2::new(1, 2));
        assert_eq!(board.tile_under_player(), TileKind::Empty);
        assert_eq!(engine.outcome(), None);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn consumed_marker_becomes_floor() {
        let mut board = sample_board();
        let (mut signal, _receiver) = outcome_channel();
        let mut engine = engine_with(&[Direction::Up]);

        engine.tick(secs(5.0), &mut board, &mut signal);
        engine.tick(secs(7.5), &mut board, &mut signal);

        assert_eq!(board.render_rows(), vec!["###", "G.#", "#P#"]);
    }

    #[test]
    fn kept_marker_triggers_again() {
        let mut board = sample_board();
        let (mut signal, _receiver) = outcome_channel();
        let mut engine =
            engine_with(&[Direction::Up, Direction::Up]).with_revert_marker_consumption(false);

        engine.tick(secs(5.0), &mut board, &mut signal);
        engine.tick(secs(7.5), &mut board, &mut signal);
        assert_eq!(board.render_rows(), vec!["###", "GR#", "#P#"]);

        let again = engine.tick(secs(10.0), &mut board, &mut signal);
        assert!(matches!(
            again,
            TickReport::Executed {
                must_revert: true,
                ..
            }
        ));
    }

    #[test]
    fn walking_into_wall_loses_and_freezes_engine() {
        let mut board = sample_board();
        let (mut signal, receiver) = outcome_channel();
        let mut engine = engine_with(&[Direction::Left, Direction::Up]);

        let report = engine.tick(secs(5.0), &mut board, &mut signal);
        assert_eq!(
            report,
            TickReport::Executed {
                direction: Direction::Left,
                position: IVec2::new(0, 2),
                outcome: Some(Outcome::Lose(LoseReason::HitWall)),
                must_revert: false,
            }
        );
        assert_eq!(engine.len(), 1);
        assert_eq!(
            receiver.try_recv().expect("lose"),
            Outcome::Lose(LoseReason::HitWall)
        );

        for step in 2..5 {
            assert_eq!(
                engine.tick(INTERVAL * step, &mut board, &mut signal),
                TickReport::Idle(IdleReason::Finished)
            );
        }
        assert_eq!(engine.len(), 1);
        assert_eq!(board.player_position(), IVec2::new(0, 2));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn revert_then_wall_loses_on_third_tick() {
        let mut board = sample_board();
        let (mut signal, receiver) = outcome_channel();
        let mut engine = engine_with(&[Direction::Up, Direction::Left]);

        engine.tick(secs(5.0), &mut board, &mut signal);
        assert_eq!(board.player_position(), IVec2::new(1, 1));
        engine.tick(secs(7.5), &mut board, &mut signal);
        assert_eq!(board.player_position(), IVec2::new(1, 2));
        assert_eq!(engine.next_allowed(), secs(10.0));

        let third = engine.tick(secs(10.0), &mut board, &mut signal);
        assert!(matches!(
            third,
            TickReport::Executed {
                direction: Direction::Left,
                outcome: Some(Outcome::Lose(LoseReason::HitWall)),
                ..
            }
        ));
        assert_eq!(board.player_position(), IVec2::new(0, 2));
        assert_eq!(
            receiver.try_recv().expect("lose"),
            Outcome::Lose(LoseReason::HitWall)
        );
    }

    #[test]
    fn leaving_the_board_loses_without_moving() {
        let mut board = board_from_text(&["P."]);
        let (mut signal, receiver) = outcome_channel();
        let mut engine = engine_with(&[Direction::Up]);

        let report = engine.tick(secs(5.0), &mut board, &mut signal);
        assert!(matches!(
            report,
            TickReport::Executed {
                outcome: Some(Outcome::Lose(LoseReason::OffBoard)),
                position: IVec2 { x: 0, y: 0 },
                ..
            }
        ));
        assert!(engine.is_empty());
        assert_eq!(
            receiver.try_recv().expect("lose"),
            Outcome::Lose(LoseReason::OffBoard)
        );
    }

    #[test]
    fn reaching_goal_wins_once() {
        let mut board = sample_board();
        let (mut signal, receiver) = outcome_channel();
        let mut engine = engine_with(&[Direction::Up, Direction::Up, Direction::Left]);

        // Up lands on the marker, is undone, then Up again crosses the consumed cell.
        engine.tick(secs(5.0), &mut board, &mut signal);
        engine.tick(secs(7.5), &mut board, &mut signal);
        engine.tick(secs(10.0), &mut board, &mut signal);
        assert_eq!(board.player_position(), IVec2::new(1, 1));
        assert!(!engine.must_revert());

        let win = engine.tick(secs(15.0), &mut board, &mut signal);
        assert!(matches!(
            win,
            TickReport::Executed {
                outcome: Some(Outcome::Win),
                ..
            }
        ));
        assert_eq!(engine.outcome(), Some(Outcome::Win));
        assert_eq!(receiver.try_recv().expect("win"), Outcome::Win);

        engine.enqueue(Direction::Right);
        assert_eq!(
            engine.tick(secs(100.0), &mut board, &mut signal),
            TickReport::Idle(IdleReason::Finished)
        );
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn reset_clears_queue_flag_and_latch() {
        let mut board = sample_board();
        let (mut signal, _receiver) = outcome_channel();
        let mut engine = engine_with(&[Direction::Up, Direction::Left]);
        engine.tick(secs(5.0), &mut board, &mut signal);
        assert!(engine.must_revert());

        engine.reset();

        assert!(engine.is_empty());
        assert!(!engine.must_revert());
        assert_eq!(engine.outcome(), None);
        assert_eq!(engine.next_allowed(), Duration::ZERO);
        assert_eq!(engine.interval(), INTERVAL);
    }
}
