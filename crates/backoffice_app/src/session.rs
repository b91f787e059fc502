use std::time::{Duration, Instant};

use backoffice_core::{update, Msg, PageState, PageViewModel};
use backoffice_logging::bo_warn;

use crate::effects::EffectRunner;

/// One list page driven by user messages and engine answers.
pub struct Session {
    state: PageState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(state: PageState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    pub fn view(&self) -> PageViewModel {
        self.state.view()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    /// Feeds engine answers back in until nothing is in flight. Returns
    /// false if `timeout` ran out first.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_busy() {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                bo_warn!("Gave up waiting for the engine after {:?}", timeout);
                return false;
            };
            match self.runner.next_msg(remaining) {
                Some(msg) => self.dispatch(msg),
                None => {
                    bo_warn!("Gave up waiting for the engine after {:?}", timeout);
                    return false;
                }
            }
        }
        true
    }

    /// Whether the view changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        self.state.consume_dirty()
    }
}
