//! A queue of runtime parameter changes sorted by day.
//!
//! Defines an `InterventionSchedule` that stores [`ScheduledChange`]s keyed by the day they take
//! effect. The simulation calls [`InterventionSchedule::apply_due`] between ticks, which writes
//! every change due on or before that day through
//! [`RuntimeParameterExt::set_runtime_parameter`]. Adding a change is *O*(log(*n*)) while
//! cancellation is *O*(1).
//!
//! [`InterventionSchedule::from_parameters`] derives the changes implied by the day markers in
//! [`LockdownParameters`](crate::parameters::LockdownParameters): lockdowns, elderly lockdowns,
//! testing on symptoms, the app turn-on day and repeating lockdown cycles.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::AccessError;
use crate::log::{debug, warn, AuditTarget};
use crate::parameters::{ParameterSet, ParameterValue, RuntimeParameter, RuntimeParameterExt};
use crate::{HashMap, HashMapExt};

const AUDIT: &str = AuditTarget::Schedule.target();

/// A write of `value` to `parameter`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScheduledChange {
    pub parameter: RuntimeParameter,
    pub value: ParameterValue,
}

impl ScheduledChange {
    #[must_use]
    pub fn new(parameter: RuntimeParameter, value: impl Into<ParameterValue>) -> Self {
        ScheduledChange {
            parameter,
            value: value.into(),
        }
    }
}

/// Breaks ties between changes due on the same day. Changes that switch something off run
/// first, so a lockdown ending on the day another begins leaves it on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangePriority {
    Off,
    On,
}

/// A unique identifier for a change added to an `InterventionSchedule`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChangeId {
    id: u64,
}

/// A priority queue of scheduled runtime parameter changes.
///
/// Changes are ordered by day, then by [`ChangePriority`], then by the order they were added.
/// The day, id and priority are stored in a binary heap of `Entry` objects; the change itself is
/// stored in a hash map by id, and cancellation removes it from the map only.
///
/// A repeating lockdown is queued one cycle at a time, when its next cycle becomes the earliest
/// pending change, so the queue stays small however long the run is.
#[derive(Debug, Default)]
pub struct InterventionSchedule {
    queue: BinaryHeap<Entry>,
    changes: HashMap<u64, ScheduledChange>,
    change_counter: u64,
    cycle: Option<LockdownCycle>,
}

impl InterventionSchedule {
    #[must_use]
    pub fn new() -> InterventionSchedule {
        InterventionSchedule {
            queue: BinaryHeap::new(),
            changes: HashMap::new(),
            change_counter: 0,
            cycle: None,
        }
    }

    /// Builds the schedule implied by the day markers in `parameters`. Markers that are `None`
    /// produce no change.
    #[must_use]
    pub fn from_parameters(parameters: &ParameterSet) -> InterventionSchedule {
        let mut schedule = InterventionSchedule::new();
        let lockdown = &parameters.lockdown;

        schedule.add_switch(
            RuntimeParameter::LockdownOn,
            lockdown.lockdown_time_on,
            lockdown.lockdown_time_off,
        );
        schedule.add_switch(
            RuntimeParameter::LockdownElderlyOn,
            lockdown.lockdown_elderly_time_on,
            lockdown.lockdown_elderly_time_off,
        );
        schedule.add_switch(
            RuntimeParameter::TestOnSymptoms,
            lockdown.testing_symptoms_time_on,
            lockdown.testing_symptoms_time_off,
        );
        schedule.add_switch(RuntimeParameter::AppTurnedOn, lockdown.app_turn_on_time, None);

        schedule.cycle = lockdown.successive_lockdown_time_on.and_then(|start| {
            LockdownCycle::new(
                start,
                lockdown.successive_lockdown_duration,
                lockdown.successive_lockdown_gap,
                parameters.run.end_time,
            )
        });

        let n_changes = schedule.len();
        debug!(target: AUDIT, "Scheduled {n_changes} runtime parameter changes");
        schedule
    }

    fn add_switch(&mut self, parameter: RuntimeParameter, on: Option<i32>, off: Option<i32>) {
        if let Some(day) = on {
            self.add_change(day, ScheduledChange::new(parameter, 1), ChangePriority::On);
        }
        if let Some(day) = off {
            self.add_change(day, ScheduledChange::new(parameter, 0), ChangePriority::Off);
        }
    }

    /// Adds a change taking effect on `day`.
    ///
    /// Returns a `ChangeId` that can be used to cancel it.
    pub fn add_change(
        &mut self,
        day: i32,
        change: ScheduledChange,
        priority: ChangePriority,
    ) -> ChangeId {
        let id = self.change_counter;
        self.queue.push(Entry { day, id, priority });
        self.changes.insert(id, change);
        self.change_counter += 1;
        ChangeId { id }
    }

    /// Cancels a change that has been added to the schedule.
    ///
    /// # Panics
    ///
    /// This function panics if you cancel a change which has already
    /// been cancelled or applied.
    pub fn cancel_change(&mut self, id: &ChangeId) {
        // The entry stays in the heap and is skipped when popped
        self.changes.remove(&id.id).expect("Change does not exist");
    }

    /// The number of changes not yet applied or cancelled, counting the cycles of a repeating
    /// lockdown that are not queued yet.
    #[must_use]
    pub fn len(&self) -> usize {
        let unqueued = self.cycle.map_or(0, |cycle| cycle.pending_changes());
        self.changes.len().saturating_add(unqueued)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.cycle.is_none()
    }

    /// The day of the earliest pending change.
    pub fn next_day(&mut self) -> Option<i32> {
        let queued = self.next_queued_day();
        let Some(cycle) = self.cycle else {
            return queued;
        };
        if queued.is_some_and(|day| day < cycle.next_on) {
            return queued;
        }
        // Ties are queued too, so an off and an on due the same day keep their priority order.
        self.cycle = cycle.advance();
        let on = cycle.next_on;
        self.add_switch(RuntimeParameter::LockdownOn, Some(on), cycle.off_day(on));
        Some(on)
    }

    fn next_queued_day(&mut self) -> Option<i32> {
        while let Some(entry) = self.queue.peek() {
            if self.changes.contains_key(&entry.id) {
                return Some(entry.day);
            }
            self.queue.pop();
        }
        None
    }

    /// Removes and returns the earliest pending change if it is due on or before `day`.
    pub fn pop_due(&mut self, day: i32) -> Option<(i32, ScheduledChange)> {
        let next_day = self.next_day()?;
        if next_day > day {
            return None;
        }
        let entry = self.queue.pop()?;
        let change = self.changes.remove(&entry.id)?;
        Some((entry.day, change))
    }

    /// Applies every change due on or before `day` to `parameters`, in order.
    ///
    /// A change outside its parameter's domain is rejected by the write and skipped; the rest
    /// are still applied. Returns the rejected writes.
    pub fn apply_due<P: RuntimeParameterExt>(
        &mut self,
        day: i32,
        parameters: &mut P,
    ) -> Vec<AccessError> {
        let mut rejected = Vec::new();
        while let Some((due, change)) = self.pop_due(day) {
            match parameters.set_runtime_parameter(change.parameter, change.value) {
                Ok(_) => debug!(
                    target: AUDIT,
                    "Applied change of {} to {} scheduled for day {due}",
                    change.parameter, change.value
                ),
                Err(e) => {
                    warn!(target: AUDIT, "Skipped change scheduled for day {due}: {e}");
                    rejected.push(e);
                }
            }
        }
        rejected
    }
}

/// A lockdown `duration` days long starting every `period` days, from `next_on` through
/// `last_on`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct LockdownCycle {
    next_on: i32,
    last_on: i32,
    duration: i32,
    period: i64,
}

impl LockdownCycle {
    /// `None` if no cycle starts on or before `end_time`.
    fn new(start: i32, duration: i32, gap: i32, end_time: i32) -> Option<LockdownCycle> {
        if duration <= 0 || start > end_time {
            return None;
        }
        let period = i64::from(duration) + i64::from(gap.max(0));
        let span = i64::from(end_time) - i64::from(start);
        let last_on = i64::from(start) + span / period * period;
        Some(LockdownCycle {
            next_on: start,
            last_on: i32::try_from(last_on).ok()?,
            duration,
            period,
        })
    }

    /// The end of the cycle starting on `on`. `None` past the last representable day.
    fn off_day(&self, on: i32) -> Option<i32> {
        on.checked_add(self.duration)
    }

    fn advance(self) -> Option<LockdownCycle> {
        let next_on = i64::from(self.next_on) + self.period;
        if next_on > i64::from(self.last_on) {
            return None;
        }
        Some(LockdownCycle {
            next_on: i32::try_from(next_on).ok()?,
            ..self
        })
    }

    fn pending_changes(&self) -> usize {
        let cycles = (i64::from(self.last_on) - i64::from(self.next_on)) / self.period + 1;
        // Cycles do not overlap, so only the last one can run past the last representable day.
        let open_ended = usize::from(self.off_day(self.last_on).is_none());
        usize::try_from(cycles).unwrap_or(usize::MAX).saturating_mul(2) - open_ended
    }
}

/// A day, id, and priority object used to order changes in the `InterventionSchedule`
#[derive(PartialEq, Eq, Debug)]
struct Entry {
    day: i32,
    id: u64,
    priority: ChangePriority,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entry objects are ordered in increasing order by day, priority, and then
/// change id. `BinaryHeap` is a max-heap, so the comparison is reversed.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.day
            .cmp(&other.day)
            .then(self.priority.cmp(&other.priority))
            .then(self.id.cmp(&other.id))
            .reverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lockdown(value: i32) -> ScheduledChange {
        ScheduledChange::new(RuntimeParameter::LockdownOn, value)
    }

    #[test]
    fn empty_schedule() {
        let mut schedule = InterventionSchedule::new();
        assert!(schedule.is_empty());
        assert_eq!(schedule.next_day(), None);
        assert!(schedule.pop_due(i32::MAX).is_none());
    }

    #[test]
    fn changes_come_out_by_day() {
        let mut schedule = InterventionSchedule::new();
        schedule.add_change(3, lockdown(1), ChangePriority::On);
        schedule.add_change(1, lockdown(1), ChangePriority::On);
        schedule.add_change(2, lockdown(0), ChangePriority::Off);

        assert_eq!(schedule.next_day(), Some(1));
        assert_eq!(schedule.pop_due(5).map(|(day, _)| day), Some(1));
        assert_eq!(schedule.pop_due(5), Some((2, lockdown(0))));
        assert_eq!(schedule.pop_due(5).map(|(day, _)| day), Some(3));
        assert!(schedule.pop_due(5).is_none());
    }

    #[test]
    fn changes_not_yet_due_stay() {
        let mut schedule = InterventionSchedule::new();
        schedule.add_change(10, lockdown(1), ChangePriority::On);
        assert!(schedule.pop_due(9).is_none());
        assert_eq!(schedule.len(), 1);
        assert!(schedule.pop_due(10).is_some());
    }

    #[test]
    fn off_runs_before_on_on_the_same_day() {
        let mut schedule = InterventionSchedule::new();
        schedule.add_change(5, lockdown(1), ChangePriority::On);
        schedule.add_change(5, lockdown(0), ChangePriority::Off);
        assert_eq!(schedule.pop_due(5), Some((5, lockdown(0))));
        assert_eq!(schedule.pop_due(5), Some((5, lockdown(1))));
    }

    #[test]
    fn same_day_and_priority_keeps_insertion_order() {
        let mut schedule = InterventionSchedule::new();
        let first = ScheduledChange::new(RuntimeParameter::AppUsersFraction, 0.2);
        let second = ScheduledChange::new(RuntimeParameter::AppUsersFraction, 0.4);
        schedule.add_change(1, first, ChangePriority::On);
        schedule.add_change(1, second, ChangePriority::On);
        assert_eq!(schedule.pop_due(1), Some((1, first)));
        assert_eq!(schedule.pop_due(1), Some((1, second)));
    }

    #[test]
    fn add_and_cancel_changes() {
        let mut schedule = InterventionSchedule::new();
        schedule.add_change(1, lockdown(1), ChangePriority::On);
        let to_cancel = schedule.add_change(2, lockdown(0), ChangePriority::Off);
        schedule.add_change(3, lockdown(1), ChangePriority::On);
        schedule.cancel_change(&to_cancel);

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.pop_due(5).map(|(day, _)| day), Some(1));
        assert_eq!(schedule.next_day(), Some(3));
    }

    #[test]
    #[should_panic(expected = "Change does not exist")]
    fn cancel_applied_change() {
        let mut schedule = InterventionSchedule::new();
        let id = schedule.add_change(1, lockdown(1), ChangePriority::On);
        schedule.pop_due(1);
        schedule.cancel_change(&id);
    }

    #[test]
    fn from_parameters_with_no_markers_is_empty() {
        let schedule = InterventionSchedule::from_parameters(&ParameterSet::default());
        assert!(schedule.is_empty());
    }

    #[test]
    fn from_parameters_lockdown_and_app() {
        let mut parameters = ParameterSet::default();
        parameters.lockdown.lockdown_time_on = Some(20);
        parameters.lockdown.lockdown_time_off = Some(40);
        parameters.lockdown.app_turn_on_time = Some(25);
        let mut schedule = InterventionSchedule::from_parameters(&parameters);

        assert_eq!(schedule.pop_due(100), Some((20, lockdown(1))));
        assert_eq!(
            schedule.pop_due(100),
            Some((25, ScheduledChange::new(RuntimeParameter::AppTurnedOn, 1)))
        );
        assert_eq!(schedule.pop_due(100), Some((40, lockdown(0))));
        assert!(schedule.is_empty());
    }

    #[test]
    fn from_parameters_successive_lockdowns() {
        let mut parameters = ParameterSet::default();
        parameters.run.end_time = 50;
        parameters.lockdown.successive_lockdown_time_on = Some(10);
        parameters.lockdown.successive_lockdown_duration = 7;
        parameters.lockdown.successive_lockdown_gap = 14;
        let mut schedule = InterventionSchedule::from_parameters(&parameters);

        let mut days = Vec::new();
        while let Some((day, change)) = schedule.pop_due(i32::MAX) {
            days.push((day, change.value));
        }
        // Cycles start on days 10, 31 and 52; the last is after end_time.
        assert_eq!(
            days,
            vec![
                (10, ParameterValue::Integer(1)),
                (17, ParameterValue::Integer(0)),
                (31, ParameterValue::Integer(1)),
                (38, ParameterValue::Integer(0)),
            ]
        );
    }

    fn repeating_lockdown(start: i32, duration: i32, gap: i32, end_time: i32) -> ParameterSet {
        let mut parameters = ParameterSet::default();
        parameters.run.end_time = end_time;
        parameters.lockdown.successive_lockdown_time_on = Some(start);
        parameters.lockdown.successive_lockdown_duration = duration;
        parameters.lockdown.successive_lockdown_gap = gap;
        parameters
    }

    #[test]
    fn last_cycle_at_the_end_of_time_has_no_off() {
        let parameters = repeating_lockdown(i32::MAX - 1, 5, 0, i32::MAX);
        let mut schedule = InterventionSchedule::from_parameters(&parameters);

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.pop_due(i32::MAX), Some((i32::MAX - 1, lockdown(1))));
        assert!(schedule.pop_due(i32::MAX).is_none());
        assert!(schedule.is_empty());
    }

    #[test]
    fn daily_cycles_are_queued_as_they_come_due() {
        let parameters = repeating_lockdown(0, 1, 0, i32::MAX);
        let mut schedule = InterventionSchedule::from_parameters(&parameters);

        // One on and one off per day, except the last cycle whose off day does not exist.
        assert_eq!(schedule.len(), 2 * (i32::MAX as usize + 1) - 1);
        assert!(schedule.queue.is_empty());

        assert_eq!(schedule.pop_due(1), Some((0, lockdown(1))));
        assert_eq!(schedule.pop_due(1), Some((1, lockdown(0))));
        assert_eq!(schedule.pop_due(1), Some((1, lockdown(1))));
        // At most the current cycle and the next one are queued.
        assert_eq!(schedule.next_day(), Some(2));
        assert_eq!(schedule.queue.len(), 3);
    }

    #[test]
    fn cycle_ties_with_queued_changes_keep_priority_order() {
        let parameters = repeating_lockdown(5, 5, 0, 20);
        let mut schedule = InterventionSchedule::from_parameters(&parameters);
        schedule.add_change(10, lockdown(1), ChangePriority::On);

        let due: Vec<_> = std::iter::from_fn(|| schedule.pop_due(10)).collect();
        assert_eq!(
            due,
            vec![(5, lockdown(1)), (10, lockdown(0)), (10, lockdown(1)), (10, lockdown(1))]
        );
    }

    #[test]
    fn cycle_does_not_start_after_end_time() {
        let parameters = repeating_lockdown(30, 5, 5, 20);
        assert!(InterventionSchedule::from_parameters(&parameters).is_empty());
    }
}
