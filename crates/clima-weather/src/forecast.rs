//! Forecast aggregation: collapse the provider's 3-hour sample feed into a
//! daily summary and a fixed set of targeted-hour selections.
//!
//! Both views are derived wholesale on every fetch; nothing here mutates a
//! previously built bucket. The functions are generic over [`TimeZone`] so
//! the app can pass `Local` while tests pin a `FixedOffset`.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use thiserror::Error;

use crate::types::{Condition, ForecastSample};

/// Upper bound on daily buckets; the provider feed spans 5 days.
pub const MAX_DAILY_BUCKETS: usize = 5;

/// Clock hours the hourly view samples at; values past 24 mean the next day.
pub const DEFAULT_TARGET_HOURS: [u32; 8] = [10, 13, 16, 19, 22, 25, 28, 31];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// Zero samples in the feed. Callers must treat this as "no data",
    /// not as an empty-but-valid view.
    #[error("no forecast samples to aggregate")]
    EmptyInput,
}

/// All samples that fall on the same local calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    /// Local calendar date of every contained sample
    pub date: NaiveDate,
    /// Samples in feed order
    pub samples: Vec<ForecastSample>,
    pub min_temp: f64,
    pub max_temp: f64,
    /// Condition of the day's first sample
    pub condition: Condition,
}

/// The forecast sample nearest to one requested clock hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySelection {
    /// The requested hour offset (25 = 1 AM the next day)
    pub target_hour: u32,
    pub sample: ForecastSample,
}

/// Group samples by local calendar date into at most [`MAX_DAILY_BUCKETS`]
/// buckets, in first-seen day order.
///
/// A feed that starts mid-day yields a partial first bucket; fewer than five
/// distinct days yield fewer buckets, never padding.
pub fn daily_buckets<Tz: TimeZone>(
    samples: &[ForecastSample],
    tz: &Tz,
) -> Result<Vec<DailyBucket>, AggregateError> {
    if samples.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let mut buckets: Vec<DailyBucket> = Vec::new();
    for sample in samples {
        let date = sample.local_date(tz);
        match buckets.iter_mut().find(|bucket| bucket.date == date) {
            Some(bucket) => {
                bucket.min_temp = bucket.min_temp.min(sample.main.temp);
                bucket.max_temp = bucket.max_temp.max(sample.main.temp);
                bucket.samples.push(sample.clone());
            }
            None => buckets.push(DailyBucket {
                date,
                min_temp: sample.main.temp,
                max_temp: sample.main.temp,
                condition: sample.condition(),
                samples: vec![sample.clone()],
            }),
        }
    }

    buckets.truncate(MAX_DAILY_BUCKETS);
    Ok(buckets)
}

/// For each target hour, pick the sample whose timestamp is nearest to the
/// synthetic target instant derived from `now`.
///
/// Output order follows `target_hours`, not the chronology of the chosen
/// samples; with a sparse feed a later target can resolve to an earlier
/// sample. Ties go to the first sample in feed order.
pub fn hourly_selections<Tz: TimeZone>(
    samples: &[ForecastSample],
    target_hours: &[u32],
    now: DateTime<Tz>,
) -> Result<Vec<HourlySelection>, AggregateError> {
    if samples.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let selections = target_hours
        .iter()
        .map(|&target_hour| {
            let target_ts = resolve_target(&now, target_hour).timestamp();
            let nearest = samples
                .iter()
                .min_by_key(|sample| (sample.dt - target_ts).abs())
                .cloned();
            HourlySelection {
                target_hour,
                // non-empty checked above
                sample: nearest.unwrap_or_else(|| samples[0].clone()),
            }
        })
        .collect();

    Ok(selections)
}

/// Synthetic target instant for one hour offset, anchored to `now`.
///
/// `offset / 24` whole days ahead at clock hour `offset % 24`; an instant
/// that has already passed rolls forward one more day.
fn resolve_target<Tz: TimeZone>(now: &DateTime<Tz>, target_hour: u32) -> DateTime<Tz> {
    let days_ahead = i64::from(target_hour / 24);
    let hour_of_day = target_hour % 24;

    let date = now.date_naive() + Duration::days(days_ahead);
    let target = at_hour(now, date, hour_of_day);
    if target <= *now {
        at_hour(now, date + Duration::days(1), hour_of_day)
    } else {
        target
    }
}

fn at_hour<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate, hour: u32) -> DateTime<Tz> {
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    match now.timezone().from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        // DST gap or fold: take the earlier interpretation
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => now.timezone().from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Measurements;
    use chrono::{FixedOffset, Utc};

    fn sample(dt: i64, temp: f64, main: &str) -> ForecastSample {
        ForecastSample {
            dt,
            main: Measurements {
                temp,
                feels_like: temp - 1.0,
                humidity: 55,
                pressure: 1012,
            },
            weather: vec![Condition {
                main: main.to_string(),
                description: main.to_lowercase(),
            }],
            wind: None,
        }
    }

    /// 2024-03-01 00:00:00 UTC
    const DAY1: i64 = 1_709_251_200;
    const HOUR: i64 = 3600;

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(daily_buckets(&[], &Utc), Err(AggregateError::EmptyInput));
        assert_eq!(
            hourly_selections(&[], &DEFAULT_TARGET_HOURS, Utc::now()),
            Err(AggregateError::EmptyInput)
        );
    }

    #[test]
    fn groups_by_calendar_date_with_min_max() {
        let samples = vec![
            sample(DAY1, 5.0, "Clouds"),
            sample(DAY1 + 3 * HOUR, 9.0, "Clear"),
            sample(DAY1 + 6 * HOUR, 2.0, "Rain"),
            sample(DAY1 + 24 * HOUR, 11.0, "Clear"),
        ];
        let buckets = daily_buckets(&samples, &Utc).unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].samples.len(), 3);
        assert_eq!(buckets[0].min_temp, 2.0);
        assert_eq!(buckets[0].max_temp, 9.0);
        // Representative condition comes from the day's first sample
        assert_eq!(buckets[0].condition.main, "Clouds");
        assert_eq!(buckets[1].samples.len(), 1);
        assert_eq!(buckets[1].condition.main, "Clear");
        assert!(buckets[0].date < buckets[1].date);
    }

    #[test]
    fn bucket_bounds_contain_every_sample() {
        let samples: Vec<_> = (0..40)
            .map(|i| sample(DAY1 + i * 3 * HOUR, (i % 13) as f64 - 3.0, "Clear"))
            .collect();
        let buckets = daily_buckets(&samples, &Utc).unwrap();

        assert_eq!(buckets.len(), MAX_DAILY_BUCKETS);
        for bucket in &buckets {
            for s in &bucket.samples {
                assert!(bucket.min_temp <= s.main.temp);
                assert!(s.main.temp <= bucket.max_temp);
                assert_eq!(s.local_date(&Utc), bucket.date);
            }
        }
    }

    #[test]
    fn fewer_than_five_days_yields_fewer_buckets() {
        let samples = vec![
            sample(DAY1, 5.0, "Clear"),
            sample(DAY1 + 24 * HOUR, 6.0, "Clear"),
        ];
        assert_eq!(daily_buckets(&samples, &Utc).unwrap().len(), 2);
    }

    #[test]
    fn feed_starting_late_evening_keeps_partial_first_day() {
        // Feed starts 21:00 UTC; with a -03:00 offset the 21:00 and 00:00
        // UTC samples both land on the same local day (18:00 and 21:00).
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let start = DAY1 + 21 * HOUR;
        let samples: Vec<_> = (0..42)
            .map(|i| sample(start + i * 3 * HOUR, 10.0 + i as f64, "Clear"))
            .collect();

        let buckets = daily_buckets(&samples, &tz).unwrap();

        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].samples.len(), 2);
        assert_eq!(buckets[0].samples[0].dt, start);
        assert_eq!(buckets[0].samples[1].dt, start + 3 * HOUR);
        // Remaining full days carry 8 samples each
        assert_eq!(buckets[1].samples.len(), 8);
    }

    #[test]
    fn hourly_selects_nearest_sample_per_target() {
        // now = 08:00, so every default target lies ahead of it
        let now = Utc.timestamp_opt(DAY1 + 8 * HOUR, 0).unwrap();
        let samples: Vec<_> = (0..16)
            .map(|i| sample(DAY1 + 9 * HOUR + i * 3 * HOUR, 12.0, "Clear"))
            .collect();

        let selections = hourly_selections(&samples, &DEFAULT_TARGET_HOURS, now).unwrap();

        assert_eq!(selections.len(), DEFAULT_TARGET_HOURS.len());
        for (selection, &hour) in selections.iter().zip(DEFAULT_TARGET_HOURS.iter()) {
            assert_eq!(selection.target_hour, hour);
            let target_ts = resolve_target(&now, hour).timestamp();
            let best = samples
                .iter()
                .map(|s| (s.dt - target_ts).abs())
                .min()
                .unwrap();
            assert_eq!((selection.sample.dt - target_ts).abs(), best);
        }
    }

    #[test]
    fn passed_hour_anchors_to_tomorrow() {
        // now = 23:00; target hour 10 resolves to 10:00 the next day
        let now = Utc.timestamp_opt(DAY1 + 23 * HOUR, 0).unwrap();
        let target = resolve_target(&now, 10);
        assert_eq!(target.timestamp(), DAY1 + 24 * HOUR + 10 * HOUR);
    }

    #[test]
    fn future_hour_stays_on_today() {
        let now = Utc.timestamp_opt(DAY1 + 8 * HOUR, 0).unwrap();
        let target = resolve_target(&now, 13);
        assert_eq!(target.timestamp(), DAY1 + 13 * HOUR);
    }

    #[test]
    fn offsets_past_24_denote_the_next_day() {
        // 01:00 next day, even when today's 01:00 is still ahead of now
        let now = Utc.timestamp_opt(DAY1 + 30 * 60, 0).unwrap();
        let target = resolve_target(&now, 25);
        assert_eq!(target.timestamp(), DAY1 + 25 * HOUR);
    }

    #[test]
    fn sparse_feed_can_resolve_out_of_chronological_order() {
        let now = Utc.timestamp_opt(DAY1 + 8 * HOUR, 0).unwrap();
        // Single sample: every target resolves to it regardless of order
        let samples = vec![sample(DAY1 + 12 * HOUR, 15.0, "Clear")];
        let selections = hourly_selections(&samples, &[10, 25], now).unwrap();
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].sample.dt, selections[1].sample.dt);
        assert_eq!(selections[0].target_hour, 10);
        assert_eq!(selections[1].target_hour, 25);
    }

    #[test]
    fn ties_go_to_the_first_sample_in_feed_order() {
        let now = Utc.timestamp_opt(DAY1 + 8 * HOUR, 0).unwrap();
        // Samples equidistant from the 13:00 target (12:00 and 14:00)
        let samples = vec![
            sample(DAY1 + 12 * HOUR, 1.0, "Clear"),
            sample(DAY1 + 14 * HOUR, 2.0, "Clear"),
        ];
        let selections = hourly_selections(&samples, &[13], now).unwrap();
        assert_eq!(selections[0].sample.dt, DAY1 + 12 * HOUR);
    }
}
