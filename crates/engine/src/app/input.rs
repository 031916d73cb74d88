#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Go,
    Restart,
    Quit,
}

const ACTION_COUNT: usize = 7;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Go,
        InputAction::Restart,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Go => 4,
            InputAction::Restart => 5,
            InputAction::Quit => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActionStates {
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    fn set(&mut self, action: InputAction, is_pressed: bool) {
        self.pressed[action.index()] = is_pressed;
    }

    fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }
}

/// Actions pressed since the previous tick. Every press is an edge: it is
/// reported for exactly one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_action_pressed(mut self, action: InputAction, is_pressed: bool) -> Self {
        self.actions.set(action, is_pressed);
        self
    }

    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.actions.is_pressed(action)
    }

    pub fn quit_requested(&self) -> bool {
        self.is_pressed(InputAction::Quit)
    }

    pub fn is_empty(&self) -> bool {
        self.pressed_actions().next().is_none()
    }

    /// Pressed actions in the fixed order of [`InputAction::ALL`].
    pub fn pressed_actions(&self) -> impl Iterator<Item = InputAction> + '_ {
        InputAction::ALL
            .into_iter()
            .filter(|action| self.is_pressed(*action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_presses() {
        let snapshot = InputSnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(!snapshot.quit_requested());
    }

    #[test]
    fn pressed_actions_follow_declaration_order() {
        let snapshot = InputSnapshot::empty()
            .with_action_pressed(InputAction::Go, true)
            .with_action_pressed(InputAction::MoveLeft, true);
        let pressed = snapshot.pressed_actions().collect::<Vec<_>>();
        assert_eq!(pressed, vec![InputAction::MoveLeft, InputAction::Go]);
    }

    #[test]
    fn releasing_clears_press() {
        let snapshot = InputSnapshot::empty()
            .with_action_pressed(InputAction::Quit, true)
            .with_action_pressed(InputAction::Quit, false);
        assert!(!snapshot.quit_requested());
    }
}
