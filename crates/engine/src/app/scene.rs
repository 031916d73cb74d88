use std::time::Duration;

use super::input::InputSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    HardReset,
    Quit,
}

/// Hook driven by the loop runner. `now` is simulation time since the loop
/// started and advances by exactly `fixed_dt` per tick.
pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt: Duration, now: Duration, input: &InputSnapshot)
        -> SceneCommand;
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}

/// Unloads and reloads `scene` in place.
pub(crate) fn hard_reset(scene: &mut dyn Scene) {
    scene.unload();
    scene.load();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingScene {
        loads: u32,
        unloads: u32,
    }

    impl Scene for CountingScene {
        fn load(&mut self) {
            self.loads += 1;
        }

        fn update(
            &mut self,
            _fixed_dt: Duration,
            _now: Duration,
            _input: &InputSnapshot,
        ) -> SceneCommand {
            SceneCommand::None
        }

        fn unload(&mut self) {
            self.unloads += 1;
        }
    }

    #[test]
    fn hard_reset_unloads_then_loads() {
        let mut scene = CountingScene::default();
        scene.load();
        hard_reset(&mut scene);
        assert_eq!(scene.loads, 2);
        assert_eq!(scene.unloads, 1);
    }

    #[test]
    fn default_debug_title_is_none() {
        assert_eq!(CountingScene::default().debug_title(), None);
    }
}
