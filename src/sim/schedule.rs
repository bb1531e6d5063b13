//! Repeating task scheduling
//!
//! The director only needs to start and cancel repeating tasks. The host
//! decides how time advances: [`FrameScheduler`] is polled once per rendered
//! frame with the current clock and reports which tasks are due.

use crate::consts::MAX_CATCH_UP_FIRES;

/// Work the director performs when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Spawn `spawn_rate` random shapes
    Spawn,
    /// Advance physics and refresh stats
    Frame,
}

/// When a repeating task fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Fixed wall-clock period in milliseconds
    Every(f64),
    /// Once per rendered frame
    EveryFrame,
}

/// Cancelable handle returned by [`Scheduler::schedule_repeating`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

/// Capability to run repeating tasks
pub trait Scheduler {
    /// Start a repeating task; the first period elapses before the first fire
    fn schedule_repeating(&mut self, cadence: Cadence, task: Task, now: f64) -> TimerId;

    /// Stop a task. Returns false if the handle was not active.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Tasks due at `now`, in firing order
    fn due(&mut self, now: f64) -> Vec<Task>;
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    cadence: Cadence,
    task: Task,
    /// Next fire time (ms), unused for `EveryFrame`
    next_due: f64,
}

/// Clock-driven scheduler polled from the host's frame loop
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    timers: Vec<Timer>,
    next_id: u32,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active timers running `task`
    pub fn active(&self, task: Task) -> usize {
        self.timers.iter().filter(|t| t.task == task).count()
    }
}

impl Scheduler for FrameScheduler {
    fn schedule_repeating(&mut self, cadence: Cadence, task: Task, now: f64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let next_due = match cadence {
            Cadence::Every(period) => now + period,
            Cadence::EveryFrame => now,
        };
        self.timers.push(Timer {
            id,
            cadence,
            task,
            next_due,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    fn due(&mut self, now: f64) -> Vec<Task> {
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            match timer.cadence {
                Cadence::EveryFrame => fired.push(timer.task),
                Cadence::Every(period) => {
                    let mut fires = 0;
                    while timer.next_due <= now && fires < MAX_CATCH_UP_FIRES {
                        fired.push(timer.task);
                        timer.next_due += period;
                        fires += 1;
                    }
                    // Still behind after the cap: drop the backlog
                    if timer.next_due <= now {
                        timer.next_due = now + period;
                    }
                }
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_fires_after_first_period() {
        let mut sched = FrameScheduler::new();
        sched.schedule_repeating(Cadence::Every(1000.0), Task::Spawn, 0.0);
        assert!(sched.due(999.0).is_empty());
        assert_eq!(sched.due(1000.0), vec![Task::Spawn]);
        assert!(sched.due(1500.0).is_empty());
        assert_eq!(sched.due(2100.0), vec![Task::Spawn]);
    }

    #[test]
    fn test_every_frame_fires_each_poll() {
        let mut sched = FrameScheduler::new();
        sched.schedule_repeating(Cadence::EveryFrame, Task::Frame, 0.0);
        assert_eq!(sched.due(16.0), vec![Task::Frame]);
        assert_eq!(sched.due(16.0), vec![Task::Frame]);
    }

    #[test]
    fn test_cancel() {
        let mut sched = FrameScheduler::new();
        let id = sched.schedule_repeating(Cadence::Every(100.0), Task::Spawn, 0.0);
        assert_eq!(sched.active(Task::Spawn), 1);
        assert!(sched.cancel(id));
        assert!(!sched.cancel(id));
        assert_eq!(sched.active(Task::Spawn), 0);
        assert!(sched.due(1000.0).is_empty());
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut sched = FrameScheduler::new();
        sched.schedule_repeating(Cadence::Every(1000.0), Task::Spawn, 0.0);
        let fired = sched.due(60_000.0);
        assert_eq!(fired.len(), MAX_CATCH_UP_FIRES as usize);
        // Backlog dropped: next fire one period after the stall
        assert!(sched.due(60_999.0).is_empty());
        assert_eq!(sched.due(61_000.0), vec![Task::Spawn]);
    }

    #[test]
    fn test_firing_order_follows_schedule_order() {
        let mut sched = FrameScheduler::new();
        sched.schedule_repeating(Cadence::Every(10.0), Task::Spawn, 0.0);
        sched.schedule_repeating(Cadence::EveryFrame, Task::Frame, 0.0);
        assert_eq!(sched.due(10.0), vec![Task::Spawn, Task::Frame]);
    }
}
