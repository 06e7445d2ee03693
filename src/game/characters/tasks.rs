// Deferred work advanced once per frame tick

use crate::core::math::ping_pong;
use crate::engine::physics::ContactId;

/// What a running task may touch on its owner
pub trait TaskHost {
    fn end_invincibility(&mut self, animate: bool);

    /// Whether any flickering invincibility grant is still active
    fn is_flickering(&self) -> bool;

    /// The flicker loop ended and opacity was restored
    fn flicker_finished(&mut self);

    fn set_alpha(&mut self, alpha: f32);

    fn restore_platform(&mut self, platform: ContactId);
}

/// A continuation that runs until its condition fires.
///
/// Tasks are never cancelled, so completing one must be harmless even when
/// the state that scheduled it is long gone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledTask {
    EndInvincibility { remaining: f32, animate: bool },
    Flicker { elapsed: f32, fade_speed: f32, alpha_change: f32 },
    RestorePlatformCollision { remaining: f32, platform: ContactId },
}

impl ScheduledTask {
    /// Run one frame of the task; returns true once it is done
    fn advance(&mut self, dt: f32, host: &mut impl TaskHost) -> bool {
        match self {
            Self::EndInvincibility { remaining, animate } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return false;
                }
                host.end_invincibility(*animate);
                true
            }
            Self::Flicker {
                elapsed,
                fade_speed,
                alpha_change,
            } => {
                if !host.is_flickering() {
                    host.set_alpha(1.0);
                    host.flicker_finished();
                    return true;
                }
                *elapsed += dt * *fade_speed;
                host.set_alpha(1.0 - ping_pong(*elapsed, *alpha_change));
                false
            }
            Self::RestorePlatformCollision { remaining, platform } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return false;
                }
                host.restore_platform(*platform);
                true
            }
        }
    }
}

/// Tasks owned by one character
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<ScheduledTask>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: ScheduledTask) {
        self.tasks.push(task);
    }

    /// Advance every task by `dt`, dropping the finished ones
    pub fn advance(&mut self, dt: f32, host: &mut impl TaskHost) {
        self.tasks.retain_mut(|task| !task.advance(dt, host));
    }

    /// Move tasks scheduled elsewhere into this list
    pub fn append(&mut self, other: &mut TaskList) {
        self.tasks.append(&mut other.tasks);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Host {
        ended: Vec<bool>,
        flickering: bool,
        flicker_done: u32,
        alpha: Vec<f32>,
        restored: Vec<ContactId>,
    }

    impl TaskHost for Host {
        fn end_invincibility(&mut self, animate: bool) {
            self.ended.push(animate);
        }

        fn is_flickering(&self) -> bool {
            self.flickering
        }

        fn flicker_finished(&mut self) {
            self.flicker_done += 1;
        }

        fn set_alpha(&mut self, alpha: f32) {
            self.alpha.push(alpha);
        }

        fn restore_platform(&mut self, platform: ContactId) {
            self.restored.push(platform);
        }
    }

    #[test]
    fn test_timed_tasks_fire_once() {
        let mut host = Host::default();
        let mut tasks = TaskList::new();
        tasks.schedule(ScheduledTask::EndInvincibility {
            remaining: 0.3,
            animate: true,
        });
        tasks.schedule(ScheduledTask::RestorePlatformCollision {
            remaining: 0.25,
            platform: ContactId(9),
        });

        tasks.advance(0.2, &mut host);
        assert_eq!(tasks.len(), 2);
        assert!(host.ended.is_empty());

        tasks.advance(0.06, &mut host);
        assert_eq!(host.restored, vec![ContactId(9)]);
        assert_eq!(tasks.len(), 1);

        tasks.advance(0.1, &mut host);
        tasks.advance(0.1, &mut host);
        assert_eq!(host.ended, vec![true]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_flicker_pulses_then_restores_alpha() {
        let mut host = Host {
            flickering: true,
            ..Host::default()
        };
        let mut tasks = TaskList::new();
        tasks.schedule(ScheduledTask::Flicker {
            elapsed: 0.0,
            fade_speed: 2.0,
            alpha_change: 0.5,
        });

        tasks.advance(0.1, &mut host);
        assert_relative_eq!(host.alpha[0], 0.8);
        tasks.advance(0.2, &mut host);
        // ping_pong(0.6, 0.5) bounces back to 0.4
        assert_relative_eq!(host.alpha[1], 0.6, epsilon = 1e-5);

        host.flickering = false;
        tasks.advance(0.1, &mut host);
        assert_eq!(host.alpha.last(), Some(&1.0));
        assert_eq!(host.flicker_done, 1);
        assert!(tasks.is_empty());
    }
}
