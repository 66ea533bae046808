//! Planner state container.
//!
//! Holds the in-memory event list together with the viewed month, the
//! in-fiction "today" and the selected day. Every mutation goes through
//! [`PlannerState::dispatch`] and reports whether the event list changed, so
//! the caller knows when a save has to be scheduled.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use shared::calendar::{CalendarDate, TimeOfDay, DAYS_IN_MONTH, FIXED_YEAR, HOURS_PER_DAY};
use shared::{Document, Event, EventStatus, Error, Result};

/// Input of the event editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    /// 1-based month
    pub month: u8,
    pub day: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            month: 1,
            day: 1,
            start_time: TimeOfDay::NOON,
            end_time: TimeOfDay::NOON.plus_hours(1),
        }
    }
}

impl EventDraft {
    /// Validate the draft and turn it into a pending event.
    pub fn into_event(self, id: i64) -> Result<Event> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Event title is required".to_string()));
        }
        if self.end_time < self.start_time {
            return Err(Error::Validation(
                "End time cannot be earlier than start time".to_string(),
            ));
        }
        let date = CalendarDate::new(FIXED_YEAR, self.month, self.day)?;

        Ok(Event {
            id,
            title: self.title,
            description: self.description,
            date,
            start_time: self.start_time,
            end_time: Some(self.end_time),
            status: EventStatus::Pending,
        })
    }
}

/// Operations accepted by the state container.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace all events with freshly loaded ones
    Load(Vec<Event>),
    AddEvent { draft: EventDraft, now: DateTime<Utc> },
    DeleteEvent(i64),
    ToggleStatus(i64),
    /// Set the in-fiction today (1-based month); also moves the view there
    SetToday { month: i64, day: i64 },
    PrevMonth,
    NextMonth,
    /// Select a day of the viewed month
    SelectDay(u8),
    ClearSelection,
}

/// Events scheduled during one hour of the selected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlot<'a> {
    pub hour: u8,
    pub events: Vec<&'a Event>,
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u8,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_events: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerState {
    events: Vec<Event>,
    viewing_date: CalendarDate,
    today: CalendarDate,
    selected_day: Option<CalendarDate>,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            viewing_date: CalendarDate::start_of_year(),
            today: CalendarDate::start_of_year(),
            selected_day: None,
        }
    }
}

impl PlannerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn viewing_date(&self) -> CalendarDate {
        self.viewing_date
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn selected_day(&self) -> Option<CalendarDate> {
        self.selected_day
    }

    /// The document to persist: every event, in list order.
    pub fn document(&self) -> Document {
        Document::new(self.events.clone())
    }

    /// Apply an action. Returns `true` when the event list changed.
    pub fn dispatch(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Load(events) => {
                self.replace_events(events);
                Ok(true)
            }
            Action::AddEvent { draft, now } => {
                self.add_event(draft, now)?;
                Ok(true)
            }
            Action::DeleteEvent(id) => Ok(self.delete_event(id)),
            Action::ToggleStatus(id) => Ok(self.toggle_status(id)),
            Action::SetToday { month, day } => {
                self.set_today(month, day);
                Ok(false)
            }
            Action::PrevMonth => {
                self.shift_view(-1);
                Ok(false)
            }
            Action::NextMonth => {
                self.shift_view(1);
                Ok(false)
            }
            Action::SelectDay(day) => {
                self.select_day(day)?;
                Ok(false)
            }
            Action::ClearSelection => {
                self.selected_day = None;
                Ok(false)
            }
        }
    }

    /// Replace the event list, filling missing end times with start + 1h.
    ///
    /// The fill only happens in memory; it reaches the store with the next save.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        self.events = events
            .into_iter()
            .map(Event::with_end_time_filled)
            .collect();
    }

    /// Add a new pending event. Its id is the creation timestamp in
    /// milliseconds, bumped past the largest existing id on collision.
    pub fn add_event(&mut self, draft: EventDraft, now: DateTime<Utc>) -> Result<i64> {
        let next_free = match self.events.iter().map(|e| e.id).max() {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                Error::Validation("No event id left after the largest one".to_string())
            })?,
            None => i64::MIN,
        };
        let id = now.timestamp_millis().max(next_free);

        let event = draft.into_event(id)?;
        self.events.push(event);
        Ok(id)
    }

    /// Remove the event with the given id. Unknown ids are a no-op.
    pub fn delete_event(&mut self, id: i64) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }

    /// Flip an event between pending and done.
    pub fn toggle_status(&mut self, id: i64) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.status = event.status.toggled();
                true
            }
            None => false,
        }
    }

    pub fn set_today(&mut self, month: i64, day: i64) {
        let today = CalendarDate::clamped(month, day);
        self.today = today;
        self.viewing_date = today;
    }

    /// Move the view by whole months, landing on the first day.
    pub fn shift_view(&mut self, delta: i32) {
        self.viewing_date = self.viewing_date.shift_months(delta).with_day(1);
    }

    pub fn select_day(&mut self, day: u8) -> Result<()> {
        self.selected_day = Some(CalendarDate::new(
            FIXED_YEAR,
            self.viewing_date.month(),
            day,
        )?);
        Ok(())
    }

    /// Events on or after today, pending first, then by date and start time.
    pub fn upcoming(&self) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.date >= self.today)
            .collect();
        upcoming.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then(a.date.cmp(&b.date))
                .then(a.start_time.cmp(&b.start_time))
        });
        upcoming
    }

    /// Events on the selected day, ordered by start time.
    pub fn day_schedule(&self) -> Vec<&Event> {
        let Some(selected) = self.selected_day else {
            return Vec::new();
        };
        let mut events: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.date.same_day_of_year(&selected))
            .collect();
        events.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        events
    }

    /// The selected day split into 24 hour slots. An event is listed in
    /// every slot its `[start, end)` interval touches.
    pub fn hourly_schedule(&self) -> Vec<HourSlot<'_>> {
        let events = self.day_schedule();
        (0..HOURS_PER_DAY)
            .map(|hour| HourSlot {
                hour,
                events: events
                    .iter()
                    .copied()
                    .filter(|e| e.occupies_hour(hour))
                    .collect(),
            })
            .collect()
    }

    /// Days of the viewed month that carry at least one event.
    pub fn event_days(&self) -> BTreeSet<u8> {
        self.events
            .iter()
            .filter(|e| e.date.month() == self.viewing_date.month())
            .map(|e| e.date.day())
            .collect()
    }

    /// Cells of the viewed month, day 1 through 28.
    pub fn month_grid(&self) -> Vec<DayCell> {
        let month = self.viewing_date.month();
        let event_days = self.event_days();
        (1..=DAYS_IN_MONTH)
            .map(|day| DayCell {
                day,
                is_today: self.today.month() == month && self.today.day() == day,
                is_selected: self
                    .selected_day
                    .is_some_and(|s| s.month() == month && s.day() == day),
                has_events: event_days.contains(&day),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn event(id: i64, date: &str, start: &str, end: Option<&str>, status: EventStatus) -> Event {
        Event {
            id,
            title: format!("event {}", id),
            description: String::new(),
            date: date.parse().unwrap(),
            start_time: time(start),
            end_time: end.map(time),
            status,
        }
    }

    fn draft(title: &str, month: u8, day: u8, start: &str, end: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: "opis".to_string(),
            month,
            day,
            start_time: time(start),
            end_time: time(end),
        }
    }

    fn at_millis(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_load_fills_missing_end_times() {
        let mut state = PlannerState::new();
        state.dispatch(Action::Load(vec![
            event(1, "2025-01-02", "10:15", None, EventStatus::Pending),
            event(2, "2025-01-02", "23:40", None, EventStatus::Pending),
            event(3, "2025-01-02", "08:00", Some("08:30"), EventStatus::Done),
        ]))
        .unwrap();

        let ends: Vec<String> = state
            .events()
            .iter()
            .map(|e| e.end_time.unwrap().to_string())
            .collect();
        assert_eq!(ends, vec!["11:15", "00:40", "08:30"]);
    }

    #[test]
    fn test_add_event() {
        let mut state = PlannerState::new();
        let id = state
            .add_event(draft("Zbiórka", 3, 14, "09:00", "10:00"), at_millis(1_700_000_000_000))
            .unwrap();

        assert_eq!(id, 1_700_000_000_000);
        let added = &state.events()[0];
        assert_eq!(added.status, EventStatus::Pending);
        assert_eq!(added.date.to_string(), "2025-03-14");
        assert_eq!(added.end_time, Some(time("10:00")));
    }

    #[test]
    fn test_add_event_ids_stay_unique_within_a_millisecond() {
        let mut state = PlannerState::new();
        let now = at_millis(5_000);
        let first = state.add_event(draft("a", 1, 1, "09:00", "10:00"), now).unwrap();
        let second = state.add_event(draft("b", 1, 1, "09:00", "10:00"), now).unwrap();
        assert_eq!(first, 5_000);
        assert_eq!(second, 5_001);
        assert!(state.document().validate().is_ok());
    }

    #[test]
    fn test_add_event_after_largest_possible_id_fails() {
        let mut state = PlannerState::new();
        state.replace_events(vec![event(
            i64::MAX,
            "2025-01-02",
            "10:00",
            None,
            EventStatus::Pending,
        )]);

        let result = state.add_event(draft("a", 1, 1, "09:00", "10:00"), at_millis(5_000));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(state.events().len(), 1);
    }

    #[test]
    fn test_add_event_validation() {
        let mut state = PlannerState::new();
        let now = at_millis(1);

        let blank = state.add_event(draft("   ", 1, 1, "09:00", "10:00"), now);
        assert!(matches!(blank, Err(Error::Validation(_))));

        let backwards = state.add_event(draft("Odwrót", 1, 1, "10:00", "09:59"), now);
        assert!(matches!(backwards, Err(Error::Validation(_))));

        let bad_day = state.add_event(draft("Dzień 29", 1, 29, "10:00", "11:00"), now);
        assert!(matches!(bad_day, Err(Error::Validation(_))));

        let zero_length = state.add_event(draft("Chwila", 1, 1, "10:00", "10:00"), now);
        assert!(zero_length.is_ok());
        assert_eq!(state.events().len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut state = PlannerState::new();
        state.replace_events(vec![event(1, "2025-01-02", "10:00", None, EventStatus::Pending)]);
        let before = state.clone();

        assert!(!state.dispatch(Action::DeleteEvent(99)).unwrap());
        assert_eq!(state, before);

        assert!(state.dispatch(Action::DeleteEvent(1)).unwrap());
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        let mut state = PlannerState::new();
        state.replace_events(vec![event(1, "2025-01-02", "10:00", None, EventStatus::Pending)]);

        assert!(state.toggle_status(1));
        assert_eq!(state.events()[0].status, EventStatus::Done);
        assert!(state.toggle_status(1));
        assert_eq!(state.events()[0].status, EventStatus::Pending);
        assert!(!state.toggle_status(2));
    }

    #[test]
    fn test_upcoming_ordering() {
        let mut state = PlannerState::new();
        state.replace_events(vec![
            event(1, "2025-03-05", "12:00", None, EventStatus::Done),
            event(2, "2025-03-10", "08:00", None, EventStatus::Pending),
            event(3, "2025-03-05", "18:00", None, EventStatus::Pending),
            event(4, "2025-03-05", "07:30", None, EventStatus::Pending),
            event(5, "2025-03-04", "07:30", None, EventStatus::Pending),
            event(6, "2025-03-05", "06:00", None, EventStatus::Done),
        ]);
        state.set_today(3, 5);

        let ids: Vec<i64> = state.upcoming().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 6, 1]);
    }

    #[test]
    fn test_upcoming_includes_today() {
        let mut state = PlannerState::new();
        state.replace_events(vec![event(1, "2025-06-28", "23:59", None, EventStatus::Pending)]);
        state.set_today(6, 28);
        assert_eq!(state.upcoming().len(), 1);
        state.set_today(7, 1);
        assert!(state.upcoming().is_empty());
    }

    #[test]
    fn test_set_today_clamps_and_moves_view() {
        let mut state = PlannerState::new();
        state.dispatch(Action::SetToday { month: 4, day: 31 }).unwrap();
        assert_eq!(state.today().to_string(), "2025-04-28");
        assert_eq!(state.viewing_date(), state.today());

        state.set_today(4, 0);
        assert_eq!(state.today().day(), 1);
    }

    #[test]
    fn test_month_navigation_wraps_year() {
        let mut state = PlannerState::new();
        state.set_today(1, 15);

        state.dispatch(Action::PrevMonth).unwrap();
        assert_eq!(state.viewing_date().to_string(), "2024-12-01");
        state.dispatch(Action::NextMonth).unwrap();
        state.dispatch(Action::NextMonth).unwrap();
        assert_eq!(state.viewing_date().to_string(), "2025-02-01");

        // Navigation leaves today untouched.
        assert_eq!(state.today().to_string(), "2025-01-15");
    }

    #[test]
    fn test_day_schedule_sorted_by_start() {
        let mut state = PlannerState::new();
        state.replace_events(vec![
            event(1, "2025-02-10", "15:00", None, EventStatus::Pending),
            event(2, "2025-02-10", "07:45", None, EventStatus::Done),
            event(3, "2025-02-11", "07:00", None, EventStatus::Pending),
        ]);
        assert!(state.day_schedule().is_empty());

        state.set_today(2, 1);
        state.dispatch(Action::SelectDay(10)).unwrap();
        let ids: Vec<i64> = state.day_schedule().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);

        state.dispatch(Action::ClearSelection).unwrap();
        assert!(state.day_schedule().is_empty());
    }

    #[test]
    fn test_hourly_buckets() {
        let mut state = PlannerState::new();
        state.replace_events(vec![event(
            1,
            "2025-01-05",
            "09:30",
            Some("11:00"),
            EventStatus::Pending,
        )]);
        state.select_day(5).unwrap();

        let slots = state.hourly_schedule();
        assert_eq!(slots.len(), 24);
        let busy: Vec<u8> = slots
            .iter()
            .filter(|s| !s.events.is_empty())
            .map(|s| s.hour)
            .collect();
        assert_eq!(busy, vec![9, 10]);
    }

    #[test]
    fn test_month_grid_marks() {
        let mut state = PlannerState::new();
        state.replace_events(vec![
            event(1, "2025-05-03", "10:00", None, EventStatus::Pending),
            event(2, "2025-05-20", "10:00", None, EventStatus::Done),
            event(3, "2025-06-03", "10:00", None, EventStatus::Pending),
        ]);
        state.set_today(5, 7);
        state.select_day(20).unwrap();

        let grid = state.month_grid();
        assert_eq!(grid.len(), 28);
        assert!(grid[2].has_events);
        assert!(grid[19].has_events && grid[19].is_selected);
        assert!(grid[6].is_today && !grid[6].has_events);
        assert_eq!(grid.iter().filter(|c| c.has_events).count(), 2);
    }

    #[test]
    fn test_select_day_out_of_range() {
        let mut state = PlannerState::new();
        assert!(state.dispatch(Action::SelectDay(29)).is_err());
        assert_eq!(state.selected_day(), None);
    }
}
