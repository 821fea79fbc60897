use chrono::{Duration, NaiveDateTime};

use crate::data::models::{ReviewError, ReviewStatus, ReviewableStatistic, MIN_EASINESS_FACTOR};

/// Thresholds separating the scheduling stages. The REVIEW/MASTERED cut is
/// calibrated, not fixed, so it can be overridden through the environment.
#[derive(Debug, Clone, Copy)]
pub struct SrsConfig {
    pub review_min_repetitions: i32,
    pub mastered_min_repetitions: i32,
    pub mastered_min_interval_days: i32,
}

impl Default for SrsConfig {
    fn default() -> Self {
        SrsConfig {
            review_min_repetitions: 3,
            mastered_min_repetitions: 5,
            mastered_min_interval_days: 30,
        }
    }
}

impl SrsConfig {
    pub fn from_env() -> Self {
        let defaults = SrsConfig::default();
        SrsConfig {
            review_min_repetitions: env_threshold(
                "SRS_REVIEW_MIN_REPETITIONS",
                defaults.review_min_repetitions,
            ),
            mastered_min_repetitions: env_threshold(
                "SRS_MASTERED_MIN_REPETITIONS",
                defaults.mastered_min_repetitions,
            ),
            mastered_min_interval_days: env_threshold(
                "SRS_MASTERED_MIN_INTERVAL_DAYS",
                defaults.mastered_min_interval_days,
            ),
        }
    }
}

fn env_threshold(name: &str, fallback: i32) -> i32 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}

/// Applies one review outcome to the stored scheduling state (SM-2).
///
/// Quality below 3 resets the repetition streak; otherwise the interval walks
/// 1 day, 6 days, then previous interval times the easiness factor. The
/// easiness factor itself is adjusted on every review and floored at 1.3.
pub fn apply_review(
    current: &ReviewableStatistic,
    quality: i32,
    now: NaiveDateTime,
    config: &SrsConfig,
) -> Result<ReviewableStatistic, ReviewError> {
    if !(0..=5).contains(&quality) {
        return Err(ReviewError::Validation(format!(
            "quality must be between 0 and 5, got {}",
            quality
        )));
    }

    let mut updated = current.clone();

    if quality < 3 {
        updated.repetitions = 0;
        updated.interval = 1;
    } else {
        updated.repetitions = current.repetitions + 1;
        updated.interval = match updated.repetitions {
            1 => 1,
            2 => 6,
            _ => (current.interval as f64 * current.easiness_factor).round() as i32,
        };
    }

    let q = quality as f64;
    let easiness = current.easiness_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    updated.easiness_factor = easiness.max(MIN_EASINESS_FACTOR);

    updated.next_review_date = now.date() + Duration::days(updated.interval as i64);
    updated.status = derive_status(updated.repetitions, updated.interval, config);
    updated.updated_at = now;

    Ok(updated)
}

/// Status is a function of (repetitions, interval); it is never set directly.
pub fn derive_status(repetitions: i32, interval: i32, config: &SrsConfig) -> ReviewStatus {
    if repetitions >= config.mastered_min_repetitions
        && interval >= config.mastered_min_interval_days
    {
        ReviewStatus::Mastered
    } else if repetitions >= config.review_min_repetitions {
        ReviewStatus::Review
    } else {
        ReviewStatus::Learning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_noon(date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(12, 0, 0).unwrap()
    }

    fn stat(easiness_factor: f64, interval: i32, repetitions: i32) -> ReviewableStatistic {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        ReviewableStatistic {
            user_id: 1,
            item_id: 10,
            status: derive_status(repetitions, interval, &SrsConfig::default()),
            easiness_factor,
            interval,
            repetitions,
            next_review_date: now.date(),
            updated_at: now,
        }
    }

    #[test]
    fn first_successful_review_starts_at_one_day() {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let current = ReviewableStatistic::baseline(1, 10, now);

        let next = apply_review(&current, 5, now, &SrsConfig::default()).unwrap();

        assert_eq!(next.repetitions, 1);
        assert_eq!(next.interval, 1);
        assert_eq!(next.status, ReviewStatus::Learning);
        assert_eq!(next.next_review_date, now.date() + Duration::days(1));
        assert!((next.easiness_factor - 2.6).abs() < 1e-9);
    }

    #[test]
    fn second_successful_review_jumps_to_six_days() {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let current = stat(2.3, 1, 1);

        let next = apply_review(&current, 4, now, &SrsConfig::default()).unwrap();

        assert_eq!(next.repetitions, 2);
        assert_eq!(next.interval, 6);
        assert_eq!(next.status, ReviewStatus::Learning);
        assert_eq!(next.next_review_date, now.date() + Duration::days(6));
    }

    #[test]
    fn failure_resets_streak_but_keeps_easiness_floored() {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        let current = stat(2.5, 7, 3);

        let next = apply_review(&current, 0, now, &SrsConfig::default()).unwrap();

        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval, 1);
        assert_eq!(next.status, ReviewStatus::Learning);
        assert!(next.easiness_factor < 2.5);
        assert!(next.easiness_factor >= MIN_EASINESS_FACTOR);
        assert_eq!(next.next_review_date, now.date() + Duration::days(1));
    }

    #[test]
    fn easiness_factor_never_drops_below_floor() {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
        let mut current = stat(MIN_EASINESS_FACTOR, 1, 1);

        for quality in 0..3 {
            let next = apply_review(&current, quality, now, &SrsConfig::default()).unwrap();
            assert!(next.easiness_factor >= MIN_EASINESS_FACTOR);
            current = next;
        }
    }

    #[test]
    fn interval_growth_uses_easiness_before_adjustment() {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());
        let current = stat(2.0, 10, 3);

        let next = apply_review(&current, 3, now, &SrsConfig::default()).unwrap();

        // round(10 * 2.0), not round(10 * adjusted EF)
        assert_eq!(next.repetitions, 4);
        assert_eq!(next.interval, 20);
        assert!((next.easiness_factor - 1.86).abs() < 1e-9);
    }

    #[test]
    fn long_retention_state_becomes_mastered() {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 6).unwrap());
        let current = stat(2.5, 12, 4);

        let next = apply_review(&current, 4, now, &SrsConfig::default()).unwrap();

        assert_eq!(next.repetitions, 5);
        assert_eq!(next.interval, 30);
        assert_eq!(next.status, ReviewStatus::Mastered);
    }

    #[test]
    fn stable_mastery_point_is_classified_mastered() {
        assert_eq!(
            derive_status(5, 30, &SrsConfig::default()),
            ReviewStatus::Mastered
        );
        assert_eq!(
            derive_status(3, 7, &SrsConfig::default()),
            ReviewStatus::Review
        );
        assert_eq!(
            derive_status(2, 6, &SrsConfig::default()),
            ReviewStatus::Learning
        );
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        let now = at_noon(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap());
        let current = stat(2.5, 1, 1);

        assert!(matches!(
            apply_review(&current, 6, now, &SrsConfig::default()),
            Err(ReviewError::Validation(_))
        ));
        assert!(matches!(
            apply_review(&current, -1, now, &SrsConfig::default()),
            Err(ReviewError::Validation(_))
        ));
    }

    #[test]
    fn thresholds_are_configurable() {
        let config = SrsConfig {
            review_min_repetitions: 2,
            mastered_min_repetitions: 4,
            mastered_min_interval_days: 20,
        };

        assert_eq!(derive_status(2, 6, &config), ReviewStatus::Review);
        assert_eq!(derive_status(4, 20, &config), ReviewStatus::Mastered);
    }
}
