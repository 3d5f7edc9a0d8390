//! Long-running action tasks.
//!
//! Actions like `Wander` or `Patrol` outlive the tick that dispatched them.
//! Each is an explicit state machine driven once per tick, replacing the
//! engine coroutines of a typical game runtime: an agent holds at most one
//! [`ActiveTask`], and dispatching any action drops the previous task —
//! cancellation is the drop, there are no timers to leak.

use ai_tree::{ExecutableNode, Operation, Vec2};

use crate::adapter::AgentAdapter;
use crate::config::InterpreterConfig;
use crate::rng::Pcg32;

/// Outcome of driving a task for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    /// The task is done and should be cleared; the agent holds no behavior
    /// until the next action dispatch.
    Finished,
}

/// The one background behavior an agent is currently carrying out.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveTask {
    Wander(WanderTask),
    /// Steer toward the current target until it is gone.
    MoveToTarget,
    Chase,
    Flee,
    Patrol(PatrolTask),
    Guard(GuardTask),
    Wait(WaitTask),
    /// Keep the turret rotated onto the current target.
    TrackTarget,
}

impl ActiveTask {
    /// Advances the task by one fixed step.
    pub fn drive<A: AgentAdapter>(
        &mut self,
        adapter: &mut A,
        config: &InterpreterConfig,
        rng: &mut Pcg32,
    ) -> TaskStatus {
        match self {
            Self::Wander(wander) => wander.drive(adapter, config, rng),
            Self::MoveToTarget | Self::Chase => steer_toward_target(adapter),
            Self::Flee => steer_away_from_target(adapter),
            Self::Patrol(patrol) => patrol.drive(adapter, config),
            Self::Guard(guard) => guard.drive(adapter, config),
            Self::Wait(wait) => wait.drive(adapter),
            Self::TrackTarget => track_target(adapter),
        }
    }
}

/// Roam between random points: steer to a point drawn from a disc around the
/// agent, idle briefly on arrival, then draw the next one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WanderTask {
    target: Option<Vec2>,
    idle_left: u32,
}

impl WanderTask {
    fn drive<A: AgentAdapter>(
        &mut self,
        adapter: &mut A,
        config: &InterpreterConfig,
        rng: &mut Pcg32,
    ) -> TaskStatus {
        if self.idle_left > 0 {
            self.idle_left -= 1;
            if self.idle_left == 0 {
                self.target = None;
            }
            adapter.stop_movement();
            return TaskStatus::Running;
        }

        let position = adapter.position();
        let target = *self
            .target
            .get_or_insert_with(|| position + rng.in_unit_circle() * config.wander_radius);

        if position.distance(target) <= config.arrive_tolerance {
            self.idle_left = config.wander_idle_ticks.max(1);
            adapter.stop_movement();
        } else {
            adapter.move_toward((target - position).normalized());
        }
        TaskStatus::Running
    }
}

/// Shuttle between two endpoints offset from the dispatch position, pausing
/// at each end.
#[derive(Clone, Debug, PartialEq)]
pub struct PatrolTask {
    points: [Vec2; 2],
    heading_to: usize,
    pause_left: u32,
}

impl PatrolTask {
    pub(crate) fn new(origin: Vec2, offset: Vec2) -> Self {
        Self {
            points: [origin + offset, origin - offset],
            heading_to: 0,
            pause_left: 0,
        }
    }

    fn drive<A: AgentAdapter>(
        &mut self,
        adapter: &mut A,
        config: &InterpreterConfig,
    ) -> TaskStatus {
        if self.pause_left > 0 {
            self.pause_left -= 1;
            adapter.stop_movement();
            return TaskStatus::Running;
        }

        let position = adapter.position();
        let target = self.points[self.heading_to];
        if position.distance(target) <= config.patrol_tolerance {
            self.heading_to = (self.heading_to + 1) % self.points.len();
            self.pause_left = config.patrol_pause_ticks;
            adapter.stop_movement();
        } else {
            adapter.move_toward((target - position).normalized());
        }
        TaskStatus::Running
    }
}

/// Hold near a fixed post; inside tolerance the agent brakes and scans.
#[derive(Clone, Debug, PartialEq)]
pub struct GuardTask {
    post: Vec2,
}

impl GuardTask {
    fn drive<A: AgentAdapter>(
        &mut self,
        adapter: &mut A,
        config: &InterpreterConfig,
    ) -> TaskStatus {
        let position = adapter.position();
        if position.distance(self.post) > config.guard_tolerance {
            adapter.move_toward((self.post - position).normalized());
        } else {
            adapter.stop_movement();
            adapter.rotate_in_place();
        }
        TaskStatus::Running
    }
}

/// Brake and hold still for a fixed number of ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct WaitTask {
    remaining: u32,
}

impl WaitTask {
    pub(crate) fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    fn drive<A: AgentAdapter>(&mut self, adapter: &mut A) -> TaskStatus {
        adapter.stop_movement();
        if self.remaining == 0 {
            return TaskStatus::Finished;
        }
        self.remaining -= 1;
        TaskStatus::Running
    }
}

fn steer_toward_target<A: AgentAdapter>(adapter: &mut A) -> TaskStatus {
    match target_position(adapter) {
        Some(target) => {
            let direction = (target - adapter.position()).normalized();
            adapter.move_toward(direction);
            TaskStatus::Running
        }
        None => TaskStatus::Finished,
    }
}

fn steer_away_from_target<A: AgentAdapter>(adapter: &mut A) -> TaskStatus {
    match target_position(adapter) {
        Some(target) => {
            let direction = (adapter.position() - target).normalized();
            adapter.move_toward(direction);
            TaskStatus::Running
        }
        None => TaskStatus::Finished,
    }
}

fn track_target<A: AgentAdapter>(adapter: &mut A) -> TaskStatus {
    match adapter.current_target() {
        Some(target) => {
            adapter.rotate_turret_toward(target);
            TaskStatus::Running
        }
        None => TaskStatus::Finished,
    }
}

fn target_position<A: AgentAdapter>(adapter: &A) -> Option<Vec2> {
    adapter
        .current_target()
        .and_then(|t| adapter.target_position(t))
}

/// Runs an action node's immediate effect and returns its replacement task.
///
/// Always called with the intent to supersede: the caller installs the
/// returned value even when it is `None` (e.g. `Fire` and `Stop` leave the
/// agent with no background behavior).
pub(crate) fn dispatch<A: AgentAdapter>(
    node: &ExecutableNode,
    adapter: &mut A,
    config: &InterpreterConfig,
) -> Option<ActiveTask> {
    match &node.operation {
        Operation::Fire => {
            if adapter.can_fire()
                && let Some(target) = adapter.current_target()
            {
                adapter.fire_at(target);
            }
            None
        }
        Operation::Wander => Some(ActiveTask::Wander(WanderTask::default())),
        Operation::Move => {
            // Without a target, Move degrades to Wander.
            if adapter.has_target() {
                Some(ActiveTask::MoveToTarget)
            } else {
                Some(ActiveTask::Wander(WanderTask::default()))
            }
        }
        Operation::Stop => {
            adapter.stop_movement();
            None
        }
        Operation::Chase => adapter.has_target().then_some(ActiveTask::Chase),
        Operation::Flee => adapter.has_target().then_some(ActiveTask::Flee),
        Operation::Patrol => Some(ActiveTask::Patrol(PatrolTask::new(
            adapter.position(),
            config.patrol_offset,
        ))),
        Operation::Guard => Some(ActiveTask::Guard(GuardTask {
            post: adapter.position(),
        })),
        Operation::Wait => Some(ActiveTask::Wait(WaitTask::new(config.wait_ticks))),
        Operation::TrackTarget => adapter.has_target().then_some(ActiveTask::TrackTarget),
        other => {
            tracing::warn!(
                node = %node.node_id,
                operation = %other,
                "unrecognized action, treating as no-op"
            );
            None
        }
    }
}
