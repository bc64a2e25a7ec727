//! Follow-up ("retoque") date derivation and due checks.
//!
//! All arithmetic is on calendar dates; there is no time-of-day component.
//! "Today" is supplied by the caller, normally from a [`mockable::Clock`].

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::domain::record::{ClientRecord, ServiceType};

/// Default offset in days for every service except the retouch.
pub const DEFAULT_FOLLOW_UP_DAYS: u32 = 20;
/// Default offset in days for the retouch service.
pub const DEFAULT_RETOUCH_DAYS: u32 = 365;

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Offsets used to derive a follow-up date from a service date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use salon_crm::domain::{FollowUpPolicy, ServiceType};
///
/// let policy = FollowUpPolicy::default();
/// let visit = NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date");
/// assert_eq!(
///     policy.follow_up_date(visit, ServiceType::Eyebrows, None),
///     NaiveDate::from_ymd_opt(2025, 1, 30).expect("valid date"),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpPolicy {
    /// Days added for every service except the retouch.
    pub default_offset_days: u32,
    /// Days added for the retouch service.
    pub retouch_offset_days: u32,
}

impl Default for FollowUpPolicy {
    fn default() -> Self {
        Self {
            default_offset_days: DEFAULT_FOLLOW_UP_DAYS,
            retouch_offset_days: DEFAULT_RETOUCH_DAYS,
        }
    }
}

impl FollowUpPolicy {
    /// Policy with explicit offsets.
    #[must_use]
    pub const fn new(default_offset_days: u32, retouch_offset_days: u32) -> Self {
        Self {
            default_offset_days,
            retouch_offset_days,
        }
    }

    /// Policy where a retouch is followed up on its own service date.
    #[must_use]
    pub const fn same_day_retouch(default_offset_days: u32) -> Self {
        Self::new(default_offset_days, 0)
    }

    /// Derive the follow-up date. A manual override always wins.
    #[must_use]
    pub fn follow_up_date(
        &self,
        service_date: NaiveDate,
        service_type: ServiceType,
        manual_override: Option<NaiveDate>,
    ) -> NaiveDate {
        if let Some(date) = manual_override {
            return date;
        }
        let offset = if service_type.is_retouch() {
            self.retouch_offset_days
        } else {
            self.default_offset_days
        };
        add_days(service_date, offset)
    }

    /// Follow-up date for a stored record.
    #[must_use]
    pub fn for_record(&self, record: &ClientRecord) -> NaiveDate {
        self.follow_up_date(
            record.service_date,
            record.service_type,
            record.follow_up_override,
        )
    }
}

/// Add `days` to `date`, returning `date` unchanged if the result would leave
/// the supported calendar range.
fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or_else(|| {
            warn!(%date, days, "follow-up offset overflows the calendar; using service date");
            date
        })
}

/// Whether a follow-up date has arrived.
#[must_use]
pub fn is_due(follow_up: NaiveDate, today: NaiveDate) -> bool {
    follow_up <= today
}

/// Textual due check. Malformed or blank input is never due.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use salon_crm::domain::is_due_str;
///
/// let today = NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date");
/// assert!(is_due_str("30/01/2025", today));
/// assert!(!is_due_str("not a date", today));
/// ```
#[must_use]
pub fn is_due_str(text: &str, today: NaiveDate) -> bool {
    parse_service_date(text).is_some_and(|date| is_due(date, today))
}

/// Parse `dd/mm/yyyy` or ISO `yyyy-mm-dd`, ignoring surrounding whitespace.
#[must_use]
pub fn parse_service_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DISPLAY_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .ok()
}

/// Render a date as `dd/mm/yyyy`.
#[must_use]
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Where the nearest follow-up stands relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpState {
    /// There are no records.
    None,
    /// The nearest follow-up is still in the future.
    Upcoming,
    /// The nearest follow-up is today or overdue.
    Due,
}

/// Banner data computed over a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpSummary {
    /// Banner state.
    pub state: FollowUpState,
    /// Earliest follow-up date across all records.
    pub nearest: Option<NaiveDate>,
    /// Days from today to `nearest`; negative when overdue.
    pub days_until: Option<i64>,
    /// Records whose follow-up is today or earlier.
    pub due_count: usize,
}

impl FollowUpSummary {
    /// Summarise follow-ups for `records` as of `today`.
    #[must_use]
    pub fn summarise(records: &[ClientRecord], policy: &FollowUpPolicy, today: NaiveDate) -> Self {
        let dates = records.iter().map(|record| policy.for_record(record));
        let nearest = dates.clone().min();
        let due_count = dates.filter(|date| is_due(*date, today)).count();

        match nearest {
            None => Self {
                state: FollowUpState::None,
                nearest: None,
                days_until: None,
                due_count,
            },
            Some(date) => Self {
                state: if is_due(date, today) {
                    FollowUpState::Due
                } else {
                    FollowUpState::Upcoming
                },
                nearest: Some(date),
                days_until: Some((date - today).num_days()),
                due_count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{ClientName, RecordId};
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn record(service_date: NaiveDate, service_type: ServiceType) -> ClientRecord {
        ClientRecord {
            id: RecordId::random(),
            name: ClientName::new("Ana").expect("valid name"),
            phone: None,
            service_date,
            service_type,
            follow_up_override: None,
            comment: None,
            reminder_sent: false,
            created_at: None,
        }
    }

    #[fixture]
    fn policy() -> FollowUpPolicy {
        FollowUpPolicy::default()
    }

    #[rstest]
    #[case(ServiceType::Eyebrows)]
    #[case(ServiceType::Eyeliner)]
    #[case(ServiceType::Lips)]
    #[case(ServiceType::HyaluronicAcid)]
    #[case(ServiceType::Biostimulators)]
    fn non_retouch_services_use_default_offset(policy: FollowUpPolicy, #[case] service: ServiceType) {
        assert_eq!(
            policy.follow_up_date(date(2024, 12, 20), service, None),
            date(2025, 1, 9)
        );
    }

    #[rstest]
    #[case(date(2025, 3, 1), date(2026, 3, 1))]
    #[case(date(2024, 2, 29), date(2025, 2, 28))]
    fn retouch_uses_year_offset(
        policy: FollowUpPolicy,
        #[case] visit: NaiveDate,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(
            policy.follow_up_date(visit, ServiceType::Retouch, None),
            expected
        );
    }

    #[rstest]
    fn same_day_policy_keeps_retouch_date() {
        let policy = FollowUpPolicy::same_day_retouch(21);
        assert_eq!(
            policy.follow_up_date(date(2025, 5, 5), ServiceType::Retouch, None),
            date(2025, 5, 5)
        );
        assert_eq!(
            policy.follow_up_date(date(2025, 5, 5), ServiceType::Lips, None),
            date(2025, 5, 26)
        );
    }

    #[rstest]
    #[case(ServiceType::Eyebrows)]
    #[case(ServiceType::Retouch)]
    fn manual_override_always_wins(policy: FollowUpPolicy, #[case] service: ServiceType) {
        let manual = date(2030, 7, 4);
        assert_eq!(
            policy.follow_up_date(date(2025, 1, 1), service, Some(manual)),
            manual
        );
    }

    #[rstest]
    fn offsets_past_the_calendar_saturate() {
        let policy = FollowUpPolicy::new(u32::MAX, u32::MAX);
        assert_eq!(
            policy.follow_up_date(NaiveDate::MAX, ServiceType::Lips, None),
            NaiveDate::MAX
        );
    }

    #[rstest]
    fn eyebrows_visit_becomes_due_three_weeks_later(policy: FollowUpPolicy) {
        let follow_up = policy.follow_up_date(date(2025, 1, 10), ServiceType::Eyebrows, None);
        assert_eq!(follow_up, date(2025, 1, 30));
        assert!(is_due(follow_up, date(2025, 2, 1)));
        assert!(is_due(follow_up, date(2025, 1, 30)));
        assert!(!is_due(follow_up, date(2025, 1, 29)));
    }

    #[rstest]
    #[case("2025-01-30", true)]
    #[case(" 30/01/2025 ", true)]
    #[case("02/02/2025", false)]
    #[case("", false)]
    #[case("31/02/2025", false)]
    #[case("yesterday", false)]
    fn textual_due_check(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_due_str(text, date(2025, 2, 1)), expected);
    }

    #[rstest]
    fn display_format_is_day_first() {
        assert_eq!(format_display_date(date(2025, 1, 5)), "05/01/2025");
    }

    #[rstest]
    fn summary_of_empty_set_is_none(policy: FollowUpPolicy) {
        let summary = FollowUpSummary::summarise(&[], &policy, date(2025, 1, 1));
        assert_eq!(summary.state, FollowUpState::None);
        assert_eq!(summary.nearest, None);
        assert_eq!(summary.due_count, 0);
    }

    #[rstest]
    fn summary_reports_nearest_and_due_count(policy: FollowUpPolicy) {
        let records = vec![
            record(date(2025, 1, 10), ServiceType::Eyebrows),
            record(date(2025, 1, 1), ServiceType::Lips),
            record(date(2025, 1, 5), ServiceType::Retouch),
        ];
        let summary = FollowUpSummary::summarise(&records, &policy, date(2025, 1, 25));
        assert_eq!(summary.state, FollowUpState::Due);
        assert_eq!(summary.nearest, Some(date(2025, 1, 21)));
        assert_eq!(summary.days_until, Some(-4));
        assert_eq!(summary.due_count, 1);
    }

    #[rstest]
    fn summary_counts_down_to_upcoming_follow_up(policy: FollowUpPolicy) {
        let records = vec![record(date(2025, 1, 10), ServiceType::Eyebrows)];
        let summary = FollowUpSummary::summarise(&records, &policy, date(2025, 1, 20));
        assert_eq!(summary.state, FollowUpState::Upcoming);
        assert_eq!(summary.days_until, Some(10));
        assert_eq!(summary.due_count, 0);
    }
}
