//! Weekly plan repository: the single writer over planner state.
//!
//! # Responsibility
//! - Own `RepositoryState` and expose every query and mutation over it.
//! - Keep each day column in `ordering` order after every structural change.
//! - Notify subscribers after each commit.
//!
//! # Invariants
//! - A mutation edits state in place and notifies subscribers only once the
//!   edit is complete; subscribers never observe a half-applied change.
//! - Unknown task ids and patches that change nothing are silent no-ops
//!   reported as `MutationOutcome::Unchanged`.
//! - Mutations lazily insert the current week's plan; `current_plan` never does.
//! - `revision` increases by exactly one per commit.

use crate::calendar::{add_weeks, WeekId};
use crate::clock::Clock;
use crate::model::plan::{DayId, WeeklyPlan};
use crate::model::settings::{AppSettings, SettingsPatch};
use crate::model::state::RepositoryState;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::ordering::sort_in_place;
use log::debug;
use std::borrow::Cow;
use std::rc::Rc;

/// Result of a mutation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// State was committed and subscribers were notified.
    Applied,
    /// Nothing matched or nothing would change; state and revision are
    /// untouched.
    Unchanged,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Reference to one task inside the current week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub day: DayId,
    pub task_id: TaskId,
}

impl TaskRef {
    pub fn new(day: DayId, task_id: impl Into<TaskId>) -> Self {
        Self {
            day,
            task_id: task_id.into(),
        }
    }
}

/// Handle returned by `subscribe`.
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&RepositoryState, u64)>;

/// In-memory planner repository.
///
/// Constructed once per session and passed by reference to consumers.
pub struct WeeklyPlanRepository {
    state: RepositoryState,
    revision: u64,
    clock: Rc<dyn Clock>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl WeeklyPlanRepository {
    /// Wraps an already-migrated state.
    pub fn new(state: RepositoryState, clock: Rc<dyn Clock>) -> Self {
        Self {
            state,
            revision: 0,
            clock,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Read-only snapshot of the whole state.
    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    pub fn into_state(self) -> RepositoryState {
        self.state
    }

    /// Number of commits since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn current_week_id(&self) -> WeekId {
        self.state.current_week_id
    }

    pub fn settings(&self) -> &AppSettings {
        &self.state.settings
    }

    pub fn plan(&self, week_id: WeekId) -> Option<&WeeklyPlan> {
        self.state.weeks.get(&week_id)
    }

    /// Plan for the current week.
    ///
    /// When the week has no stored plan an empty one is built and returned
    /// without being inserted.
    pub fn current_plan(&self) -> Cow<'_, WeeklyPlan> {
        match self.state.current_plan() {
            Some(plan) => Cow::Borrowed(plan),
            None => Cow::Owned(WeeklyPlan::empty(
                self.state.current_week_id,
                self.clock.now(),
            )),
        }
    }

    /// Registers a listener called with the new state and revision after
    /// every commit.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&RepositoryState, u64) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Points the repository at `week_id`, inserting an empty plan first when
    /// the week has never been visited.
    pub fn set_current_week(&mut self, week_id: WeekId) -> MutationOutcome {
        let known = self.state.weeks.contains_key(&week_id);
        if known && self.state.current_week_id == week_id {
            return MutationOutcome::Unchanged;
        }

        if !known {
            let plan = WeeklyPlan::empty(week_id, self.clock.now());
            self.state.weeks.insert(week_id, plan);
        }
        debug!(
            "event=week_switch module=plan_repo status=ok from={} to={} created={}",
            self.state.current_week_id, week_id, !known
        );
        self.state.current_week_id = week_id;
        self.publish();
        MutationOutcome::Applied
    }

    /// Moves to the previous week and returns the new current week id.
    pub fn go_to_previous_week(&mut self) -> WeekId {
        let target = add_weeks(self.state.current_week_id, -1);
        self.set_current_week(target);
        target
    }

    /// Moves to the next week and returns the new current week id.
    pub fn go_to_next_week(&mut self) -> WeekId {
        let target = add_weeks(self.state.current_week_id, 1);
        self.set_current_week(target);
        target
    }

    /// Replaces the current week's plan with a brand-new empty plan.
    pub fn reset_current_week(&mut self) -> MutationOutcome {
        let week_id = self.state.current_week_id;
        debug!("event=week_reset module=plan_repo status=ok week_id={week_id}");
        self.commit_plan(WeeklyPlan::empty(week_id, self.clock.now()));
        MutationOutcome::Applied
    }

    /// Adds a task to `day` of the current week and returns the stored task.
    pub fn add_task(&mut self, day: DayId, input: NewTask) -> Task {
        let task = Task::from_input(input, self.clock.now());
        let mut plan = self.editable_current_plan();
        let column = plan.day_mut(day);
        column.tasks.push(task.clone());
        sort_in_place(&mut column.tasks);
        debug!(
            "event=task_add module=plan_repo status=ok week_id={} day={} points={} priority={}",
            plan.week_id,
            day.as_str(),
            task.points,
            task.priority.as_str()
        );
        self.commit_plan(plan);
        task
    }

    /// Merges `patch` into the matching task of `day`.
    pub fn update_task(&mut self, day: DayId, task_id: &str, patch: &TaskPatch) -> MutationOutcome {
        let mut plan = self.editable_current_plan();
        let column = plan.day_mut(day);
        let Some(index) = column.position(task_id) else {
            return noop("task_update", day);
        };
        let patched = column.tasks[index].patched(patch);
        if patched == column.tasks[index] {
            debug!(
                "event=task_update module=plan_repo status=noop reason=no_change day={}",
                day.as_str()
            );
            return MutationOutcome::Unchanged;
        }
        column.tasks[index] = patched;
        if patch.touches_order() {
            sort_in_place(&mut column.tasks);
        }
        self.commit_plan(plan);
        MutationOutcome::Applied
    }

    /// Removes the matching task from `day`.
    pub fn delete_task(&mut self, day: DayId, task_id: &str) -> MutationOutcome {
        let mut plan = self.editable_current_plan();
        let column = plan.day_mut(day);
        let Some(index) = column.position(task_id) else {
            return noop("task_delete", day);
        };
        column.tasks.remove(index);
        self.commit_plan(plan);
        MutationOutcome::Applied
    }

    /// Flips `completed` on the matching task of `day`.
    pub fn toggle_task(&mut self, day: DayId, task_id: &str) -> MutationOutcome {
        let mut plan = self.editable_current_plan();
        let column = plan.day_mut(day);
        let Some(index) = column.position(task_id) else {
            return noop("task_toggle", day);
        };
        let task = &mut column.tasks[index];
        task.completed = !task.completed;
        self.commit_plan(plan);
        MutationOutcome::Applied
    }

    /// Resolves a drag intent: move `from` to the position `to` occupies.
    ///
    /// The affected columns are re-sorted right after the move, so the drop
    /// position only survives when it agrees with the column order; otherwise
    /// the task snaps back to its sorted slot.
    pub fn reorder_task(&mut self, from: &TaskRef, to: &TaskRef) -> MutationOutcome {
        let mut plan = self.editable_current_plan();
        let Some(from_index) = plan.day(from.day).position(&from.task_id) else {
            return noop("task_reorder", from.day);
        };
        let Some(to_index) = plan.day(to.day).position(&to.task_id) else {
            return noop("task_reorder", to.day);
        };

        if from.day == to.day {
            let tasks = &mut plan.day_mut(from.day).tasks;
            let moved = tasks.remove(from_index);
            let target = to_index.min(tasks.len());
            tasks.insert(target, moved);
            sort_in_place(tasks);
        } else {
            let moved = plan.day_mut(from.day).tasks.remove(from_index);
            let destination = &mut plan.day_mut(to.day).tasks;
            destination.insert(to_index, moved);
            sort_in_place(destination);
            sort_in_place(&mut plan.day_mut(from.day).tasks);
        }

        debug!(
            "event=task_reorder module=plan_repo status=ok from_day={} to_day={}",
            from.day.as_str(),
            to.day.as_str()
        );
        self.commit_plan(plan);
        MutationOutcome::Applied
    }

    /// Moves `from` to the end of `to_day`, then re-sorts `to_day`.
    ///
    /// The sort runs after the append, so the task does not necessarily end
    /// up last.
    pub fn move_task_to_day_end(&mut self, from: &TaskRef, to_day: DayId) -> MutationOutcome {
        let mut plan = self.editable_current_plan();
        let Some(index) = plan.day(from.day).position(&from.task_id) else {
            return noop("task_move", from.day);
        };
        let moved = plan.day_mut(from.day).tasks.remove(index);
        let destination = &mut plan.day_mut(to_day).tasks;
        destination.push(moved);
        sort_in_place(destination);
        self.commit_plan(plan);
        MutationOutcome::Applied
    }

    /// Merges a field-by-field settings update.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> MutationOutcome {
        let settings = self.state.settings.patched(patch);
        if settings == self.state.settings {
            return MutationOutcome::Unchanged;
        }
        debug!("event=settings_update module=plan_repo status=ok");
        self.state.settings = settings;
        self.publish();
        MutationOutcome::Applied
    }

    fn editable_current_plan(&self) -> WeeklyPlan {
        self.current_plan().into_owned()
    }

    fn commit_plan(&mut self, plan: WeeklyPlan) {
        self.state.weeks.insert(plan.week_id, plan);
        self.publish();
    }

    fn publish(&mut self) {
        self.revision += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state, self.revision);
        }
    }
}

fn noop(event: &str, day: DayId) -> MutationOutcome {
    debug!(
        "event={event} module=plan_repo status=noop reason=task_not_found day={}",
        day.as_str()
    );
    MutationOutcome::Unchanged
}
