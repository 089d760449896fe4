//! Service calendar: which services run on a given date.
//!
//! Combines the weekly pattern of `calendar.txt` with the date-specific
//! exceptions of `calendar_dates.txt`.

use chrono::{Datelike, NaiveDate, Weekday};
use hashbrown::{HashMap, HashSet};

/// Compact representation of which weekdays a service runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeekdayFlags {
    flags: u8,
}

impl WeekdayFlags {
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    pub fn set(&mut self, weekday: Weekday) {
        self.flags |= 1 << weekday.num_days_from_monday();
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        (self.flags & (1 << weekday.num_days_from_monday())) != 0
    }

    /// Flags in `calendar.txt` column order, Monday first
    pub fn from_bools(days: [bool; 7]) -> Self {
        let mut flags = Self::new();
        for (offset, runs) in days.into_iter().enumerate() {
            if runs {
                flags.flags |= 1 << offset;
            }
        }
        flags
    }
}

/// Weekly recurrence of one service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEntry {
    pub service_id: String,
    pub weekdays: WeekdayFlags,
    pub start_date: NaiveDate,
    /// Inclusive
    pub end_date: NaiveDate,
}

impl CalendarEntry {
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&date) && self.weekdays.contains(date.weekday())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceptionKind {
    /// `exception_type` 1
    Add,
    /// `exception_type` 2
    Remove,
}

impl ExceptionKind {
    pub fn from_gtfs(value: &str) -> Result<Self, String> {
        match value {
            "1" => Ok(Self::Add),
            "2" => Ok(Self::Remove),
            other => Err(format!("invalid exception_type '{other}', expected 1 or 2")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarException {
    pub service_id: String,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
}

#[derive(Clone, Debug, Default)]
pub struct ServiceCalendar {
    entries: Vec<CalendarEntry>,
    exceptions: HashMap<NaiveDate, Vec<(String, ExceptionKind)>>,
}

impl ServiceCalendar {
    pub fn new(entries: Vec<CalendarEntry>, exceptions: Vec<CalendarException>) -> Self {
        let mut by_date: HashMap<NaiveDate, Vec<(String, ExceptionKind)>> = HashMap::new();
        for exception in exceptions {
            by_date
                .entry(exception.date)
                .or_default()
                .push((exception.service_id, exception.kind));
        }
        Self {
            entries,
            exceptions: by_date,
        }
    }

    /// Services running on `date`.
    ///
    /// Weekly-active services first, then all additions of that date, then
    /// all removals. A service both added and removed on the same date does
    /// not run, whatever the row order.
    pub fn active_services(&self, date: NaiveDate) -> HashSet<String> {
        let mut active: HashSet<String> = self
            .entries
            .iter()
            .filter(|entry| entry.runs_on(date))
            .map(|entry| entry.service_id.clone())
            .collect();

        if let Some(exceptions) = self.exceptions.get(&date) {
            for (service_id, _) in exceptions
                .iter()
                .filter(|(_, kind)| *kind == ExceptionKind::Add)
            {
                active.insert(service_id.clone());
            }
            for (service_id, _) in exceptions
                .iter()
                .filter(|(_, kind)| *kind == ExceptionKind::Remove)
            {
                active.remove(service_id);
            }
        }

        active
    }

    /// Check if a single service runs on `date`, consistent with [`Self::active_services`]
    pub fn runs_on(&self, service_id: &str, date: NaiveDate) -> bool {
        let exception = |kind: ExceptionKind| {
            self.exceptions.get(&date).is_some_and(|exceptions| {
                exceptions
                    .iter()
                    .any(|(id, k)| id == service_id && *k == kind)
            })
        };

        if exception(ExceptionKind::Remove) {
            return false;
        }
        if exception(ExceptionKind::Add) {
            return true;
        }
        self.entries
            .iter()
            .any(|entry| entry.service_id == service_id && entry.runs_on(date))
    }

    /// Every service id mentioned by the weekly pattern or an exception
    pub fn known_services(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .map(|entry| entry.service_id.as_str())
            .chain(
                self.exceptions
                    .values()
                    .flatten()
                    .map(|(service_id, _)| service_id.as_str()),
            )
            .collect()
    }

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monday_only(service_id: &str) -> CalendarEntry {
        CalendarEntry {
            service_id: service_id.to_string(),
            weekdays: WeekdayFlags::from_bools([true, false, false, false, false, false, false]),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
        }
    }

    fn exception(service_id: &str, on: NaiveDate, kind: ExceptionKind) -> CalendarException {
        CalendarException {
            service_id: service_id.to_string(),
            date: on,
            kind,
        }
    }

    #[test]
    fn test_weekday_flags() {
        let mut flags = WeekdayFlags::new();
        flags.set(Weekday::Mon);
        flags.set(Weekday::Wed);
        flags.set(Weekday::Sun);

        assert!(flags.contains(Weekday::Mon));
        assert!(!flags.contains(Weekday::Tue));
        assert!(flags.contains(Weekday::Wed));
        assert!(flags.contains(Weekday::Sun));

        let weekend = WeekdayFlags::from_bools([false, false, false, false, false, true, true]);
        assert!(weekend.contains(Weekday::Sat));
        assert!(weekend.contains(Weekday::Sun));
        assert!(!weekend.contains(Weekday::Fri));
    }

    #[test]
    fn weekly_service_runs_in_range() {
        // 2024-01-08 is a Monday
        let calendar = ServiceCalendar::new(vec![monday_only("S1")], vec![]);

        assert!(calendar.active_services(date(2024, 1, 8)).contains("S1"));
        assert!(!calendar.active_services(date(2024, 1, 9)).contains("S1"));
        // range is inclusive on both ends
        assert!(calendar.active_services(date(2024, 1, 1)).contains("S1"));
        assert!(calendar.active_services(date(2024, 12, 30)).contains("S1"));
        assert!(calendar.active_services(date(2025, 1, 6)).is_empty());
    }

    #[test]
    fn removal_exception_disables_weekly_service() {
        let monday = date(2024, 1, 8);
        let calendar = ServiceCalendar::new(
            vec![monday_only("S1")],
            vec![exception("S1", monday, ExceptionKind::Remove)],
        );

        assert!(!calendar.active_services(monday).contains("S1"));
        assert!(!calendar.runs_on("S1", monday));
        assert!(calendar.runs_on("S1", date(2024, 1, 15)));
    }

    #[test]
    fn addition_exception_enables_extra_service() {
        let saturday = date(2024, 1, 13);
        let calendar = ServiceCalendar::new(
            vec![monday_only("S1")],
            vec![exception("HOLIDAY", saturday, ExceptionKind::Add)],
        );

        let active = calendar.active_services(saturday);
        assert!(active.contains("HOLIDAY"));
        assert!(!active.contains("S1"));
        assert!(calendar.runs_on("HOLIDAY", saturday));
    }

    #[test]
    fn removal_wins_regardless_of_order() {
        let monday = date(2024, 1, 8);
        for exceptions in [
            vec![
                exception("S1", monday, ExceptionKind::Remove),
                exception("S1", monday, ExceptionKind::Add),
            ],
            vec![
                exception("S1", monday, ExceptionKind::Add),
                exception("S1", monday, ExceptionKind::Remove),
            ],
        ] {
            let calendar = ServiceCalendar::new(vec![monday_only("S1")], exceptions);
            assert!(!calendar.active_services(monday).contains("S1"));
            assert!(!calendar.runs_on("S1", monday));
        }
    }

    #[test]
    fn active_services_are_known_services() {
        let calendar = ServiceCalendar::new(
            vec![monday_only("S1"), monday_only("S2")],
            vec![
                exception("X", date(2024, 3, 2), ExceptionKind::Add),
                exception("S2", date(2024, 3, 4), ExceptionKind::Remove),
            ],
        );
        let known = calendar.known_services();

        let mut day = date(2024, 2, 25);
        while day <= date(2024, 3, 10) {
            for service in calendar.active_services(day) {
                assert!(known.contains(service.as_str()));
                assert!(calendar.runs_on(&service, day));
            }
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn exception_kind_from_gtfs() {
        assert_eq!(ExceptionKind::from_gtfs("1"), Ok(ExceptionKind::Add));
        assert_eq!(ExceptionKind::from_gtfs("2"), Ok(ExceptionKind::Remove));
        assert!(ExceptionKind::from_gtfs("3").is_err());
    }
}
