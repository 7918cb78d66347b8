use crate::SCHEDULER;
use std::time::Duration;
use timer::Timer;

/// Spawn an async task on a new thread.
/// Each subscription gets its own producer thread, so independent
/// subscriptions never contend for a shared pool.
pub fn async_task<OP>(op: OP)
where
    OP: FnOnce() + Send + 'static,
{
    std::thread::spawn(op);
}

/// Schedule a one-shot task after the given delay.
#[inline]
pub fn schedule_once<F>(delay: Duration, f: F)
where
    F: 'static + FnOnce() + Send,
{
    SCHEDULER.schedule_once(delay, f);
}

pub(crate) struct Scheduler {
    timer: Timer,
}

impl Scheduler {
    pub fn new() -> Scheduler {
        Scheduler {
            timer: Timer::new(),
        }
    }

    #[inline]
    pub fn schedule_once<F>(&self, delay: Duration, f: F)
    where
        F: 'static + FnOnce() + Send,
    {
        match chrono::Duration::from_std(delay) {
            Ok(chrono_delay) => {
                let mut slot = Some(f);
                // The guard is detached so the task fires even though the
                // caller does not hold on to it.
                self.timer
                    .schedule_with_delay(chrono_delay, move || {
                        if let Some(f) = slot.take() {
                            f();
                        }
                    })
                    .ignore();
            }
            Err(e) => {
                log::error!(
                    "Failed to convert delay to chrono::Duration: {}, skipping task scheduling",
                    e
                );
            }
        }
    }
}
