use crate::config::CalendarConfig;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use scoring_engine::{Period, PeriodClock};

/// Regular-season calendar: week 1 starts on `season_start`, each week lasts
/// seven days and becomes final `days_until_closed` days after it starts.
#[derive(Debug, Clone)]
pub struct SeasonCalendar {
    season_start: NaiveDate,
    days_until_closed: i64,
    weeks: u32,
}

impl SeasonCalendar {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            season_start: config.season_start,
            days_until_closed: config.days_until_closed,
            weeks: config.regular_season_weeks.max(1),
        }
    }

    fn start(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.season_start.and_time(NaiveTime::default()))
    }

    /// When the given week's results become final; `None` for a week outside
    /// the regular season
    pub fn closes_at(&self, period: Period) -> Option<DateTime<Utc>> {
        if !(1..=self.weeks).contains(&period) {
            return None;
        }
        let weeks_in = i64::from(period - 1);
        self.start()
            .checked_add_signed(Duration::weeks(weeks_in))?
            .checked_add_signed(Duration::days(self.days_until_closed))
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }
}

impl PeriodClock for SeasonCalendar {
    fn is_period_closed(&self, period: Period, now: DateTime<Utc>) -> bool {
        self.closes_at(period).map_or(false, |closes| now >= closes)
    }

    fn current_period(&self, now: DateTime<Utc>) -> Period {
        let days = (now - self.start()).num_days();
        let week = days.div_euclid(7) + 1;
        week.clamp(1, i64::from(self.weeks)) as Period
    }

    fn season_weeks(&self) -> Period {
        self.weeks
    }
}
