use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use engine::{InputAction, InputSnapshot, InputSource};
use tracing::{debug, warn};

use super::gameplay::Direction;

/// Replays a fixed list of actions, one per tick, then presses Go once.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedInput {
    actions: VecDeque<InputAction>,
    go_sent: bool,
}

impl ScriptedInput {
    pub(crate) fn new(actions: impl IntoIterator<Item = InputAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            go_sent: false,
        }
    }

    /// Parses `U`/`D`/`L`/`R` letters. Whitespace and commas are ignored.
    pub(crate) fn from_script(script: &str) -> Result<Self, String> {
        let directions = script
            .chars()
            .enumerate()
            .filter(|(_, letter)| !letter.is_whitespace() && *letter != ',')
            .map(|(index, letter)| {
                Direction::from_script_char(letter).ok_or_else(|| {
                    format!("invalid script letter {letter:?} at {index} (expected U, D, L or R)")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(directions.into_iter().map(Direction::to_action)))
    }
}

impl InputSource for ScriptedInput {
    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        if let Some(action) = self.actions.pop_front() {
            return InputSnapshot::empty().with_action_pressed(action, true);
        }
        if !self.go_sent {
            self.go_sent = true;
            return InputSnapshot::empty().with_action_pressed(InputAction::Go, true);
        }
        InputSnapshot::empty()
    }
}

/// Line-oriented commands read on a background thread.
///
/// Tokens are drained at tick time and delivered one per tick so every
/// command gets its own input edge. End of input presses Go.
#[derive(Debug)]
pub(crate) struct StdinInput {
    receiver: Receiver<InputAction>,
    pending: VecDeque<InputAction>,
}

impl StdinInput {
    pub(crate) fn spawn() -> io::Result<Self> {
        Self::spawn_reader(io::BufReader::new(io::stdin()))
    }

    pub(crate) fn spawn_reader(reader: impl BufRead + Send + 'static) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-input".to_string())
            .spawn(move || read_commands(reader, &sender))?;
        Ok(Self {
            receiver,
            pending: VecDeque::new(),
        })
    }

    fn drain_channel(&mut self) {
        while let Ok(action) = self.receiver.try_recv() {
            self.pending.push_back(action);
        }
    }
}

impl InputSource for StdinInput {
    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        self.drain_channel();
        match self.pending.pop_front() {
            Some(action) => InputSnapshot::empty().with_action_pressed(action, true),
            None => InputSnapshot::empty(),
        }
    }
}

fn read_commands(reader: impl BufRead, sender: &Sender<InputAction>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!(error = %error, "stdin_read_failed");
                break;
            }
        };
        for token in line.split_whitespace() {
            let Some(action) = parse_token(token) else {
                warn!(token, "unknown_input_token");
                continue;
            };
            debug!(token, action = ?action, "input_token");
            if sender.send(action).is_err() {
                return;
            }
        }
    }
    let _ = sender.send(InputAction::Go);
}

pub(crate) fn parse_token(token: &str) -> Option<InputAction> {
    match token.to_ascii_lowercase().as_str() {
        "u" | "up" => Some(InputAction::MoveUp),
        "d" | "down" => Some(InputAction::MoveDown),
        "l" | "left" => Some(InputAction::MoveLeft),
        "r" | "right" => Some(InputAction::MoveRight),
        "go" | "g" => Some(InputAction::Go),
        "restart" => Some(InputAction::Restart),
        "quit" | "q" => Some(InputAction::Quit),
        _ => None,
    }
}
