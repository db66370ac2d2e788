use chrono::{Duration, Months, NaiveDate};

use crate::domain::VehicleType;
use crate::settings::ReminderTemplates;

/// The reminder a subscriber receives, based on how far away their test is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderTier {
    OneMonth,
    TwoWeeks,
    OneDayAfter,
    OneMonthHgvPsv,
    TwoMonthsHgvPsv,
}

impl ReminderTier {
    /// Pick the reminder due on `request_date` for a test expiring on `expiry_date`
    pub fn select(
        vehicle_type: VehicleType,
        request_date: NaiveDate,
        expiry_date: NaiveDate,
    ) -> Option<Self> {
        let plus_months = |months| request_date.checked_add_months(Months::new(months));
        let is = |date: Option<NaiveDate>| date == Some(expiry_date);

        if vehicle_type.is_annual_test() {
            if is(plus_months(2)) {
                Some(Self::TwoMonthsHgvPsv)
            } else if is(plus_months(1)) {
                Some(Self::OneMonthHgvPsv)
            } else {
                None
            }
        } else if is(plus_months(1)) {
            Some(Self::OneMonth)
        } else if is(request_date.checked_add_signed(Duration::days(14))) {
            Some(Self::TwoWeeks)
        } else if is(request_date.checked_sub_signed(Duration::days(1))) {
            Some(Self::OneDayAfter)
        } else {
            None
        }
    }

    /// Every due date a loader run on `request_date` should pick up, with the vehicles it applies to
    pub fn due_dates(request_date: NaiveDate) -> Vec<(NaiveDate, bool)> {
        let mut dates = Vec::new();
        let mut push = |date: Option<NaiveDate>, annual_test: bool| {
            if let Some(date) = date {
                dates.push((date, annual_test));
            }
        };

        push(request_date.checked_add_months(Months::new(1)), false);
        push(request_date.checked_add_signed(Duration::days(14)), false);
        push(request_date.checked_sub_signed(Duration::days(1)), false);
        push(request_date.checked_add_months(Months::new(1)), true);
        push(request_date.checked_add_months(Months::new(2)), true);

        dates
    }

    pub fn template_id<'a>(&self, templates: &'a ReminderTemplates) -> &'a str {
        match self {
            Self::OneMonth => &templates.one_month,
            Self::TwoWeeks => &templates.two_weeks,
            Self::OneDayAfter => &templates.one_day_after,
            Self::OneMonthHgvPsv => &templates.one_month_hgv_psv,
            Self::TwoMonthsHgvPsv => &templates.two_months_hgv_psv,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OneMonth => "one-month",
            Self::TwoWeeks => "two-weeks",
            Self::OneDayAfter => "one-day-after",
            Self::OneMonthHgvPsv => "one-month-hgv-psv",
            Self::TwoMonthsHgvPsv => "two-months-hgv-psv",
        }
    }
}
