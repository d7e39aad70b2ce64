use std::time::Duration;

use tracing::info;

/// Length of a timed simulation
pub const SIMULATION_DURATION: Duration = Duration::from_secs(45 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Expired,
}

/// Whole-second countdown advanced by runtime ticks.
///
/// Ticks report the wall-clock time elapsed since the previous tick; the
/// remainder below one second is carried over so that irregular tick spacing
/// does not drift the countdown.
#[derive(Debug, Clone)]
pub struct Countdown {
    seconds_remaining: u64,
    carry: Duration,
    running: bool,
}

impl Countdown {
    pub fn start(duration: Duration) -> Self {
        info!(seconds = duration.as_secs(), "countdown started");
        Self {
            seconds_remaining: duration.as_secs(),
            carry: Duration::ZERO,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> Duration {
        Duration::from_secs(self.seconds_remaining)
    }

    pub fn cancel(&mut self) {
        if self.running {
            self.running = false;
            info!(seconds_remaining = self.seconds_remaining, "countdown cancelled");
        }
    }

    /// Advance by `elapsed`. Returns `Expired` on the tick that reaches zero
    /// and never again.
    pub fn on_tick(&mut self, elapsed: Duration) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }

        self.carry += elapsed;
        while self.carry >= Duration::from_secs(1) && self.seconds_remaining > 0 {
            self.carry -= Duration::from_secs(1);
            self.seconds_remaining -= 1;
        }

        if self.seconds_remaining == 0 {
            self.running = false;
            info!("countdown expired");
            return Some(TimerEvent::Expired);
        }
        None
    }

    /// `mm:ss`
    pub fn display(&self) -> String {
        format_clock(self.remaining())
    }
}

pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
