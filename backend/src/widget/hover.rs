//! Debounced scroll-zoom toggle driven by pointer hover.
//!
//! Entering the map enables scroll-zoom after [`HOVER_DEBOUNCE`], leaving
//! disables it after the same delay. Each transition cancels the pending
//! one, and a fired timer only applies if it is still the latest transition,
//! so the flag always ends up matching the last hover state.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Delay between a hover transition and the scroll-zoom change.
pub const HOVER_DEBOUNCE: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct HoverState {
    generation: u64,
    scroll_zoom: bool,
}

/// Owns the pending hover timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct HoverDebouncer {
    delay: Duration,
    state: Arc<Mutex<HoverState>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl HoverDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(HoverState::default())),
            pending: Mutex::new(None),
        }
    }

    /// Schedules scroll-zoom to become `enable` after the delay.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, enable: bool) {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.generation
        };

        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock();
            if state.generation == generation {
                state.scroll_zoom = enable;
                debug!("scroll zoom {}", if enable { "enabled" } else { "disabled" });
            }
        });

        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    /// Drops any pending transition without applying it.
    pub fn cancel(&self) {
        self.state.lock().generation += 1;
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }

    pub fn scroll_zoom_enabled(&self) -> bool {
        self.state.lock().scroll_zoom
    }
}

impl Default for HoverDebouncer {
    fn default() -> Self {
        Self::new(HOVER_DEBOUNCE)
    }
}

impl Drop for HoverDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_enable_applies_after_delay() {
        let hover = HoverDebouncer::default();
        hover.schedule(true);

        sleep(Duration::from_millis(900)).await;
        assert!(!hover.scroll_zoom_enabled());

        sleep(Duration::from_millis(200)).await;
        assert!(hover.scroll_zoom_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_leave_then_enter_ends_enabled() {
        let hover = HoverDebouncer::default();
        hover.schedule(true);
        sleep(Duration::from_millis(1100)).await;
        assert!(hover.scroll_zoom_enabled());

        hover.schedule(false);
        sleep(Duration::from_millis(300)).await;
        hover.schedule(true);

        // Past the moment the stale "disable" would have fired.
        sleep(Duration::from_millis(900)).await;
        assert!(hover.scroll_zoom_enabled());
        sleep(Duration::from_millis(500)).await;
        assert!(hover.scroll_zoom_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_transition() {
        let hover = HoverDebouncer::default();
        hover.schedule(true);
        hover.cancel();
        sleep(Duration::from_secs(2)).await;
        assert!(!hover.scroll_zoom_enabled());
    }
}
