//! Database models matching schema tables
//!
//! All measurement fields are optional: the source reports "no data"
//! either by omitting the key or with a numeric sentinel, and both must
//! stay distinguishable from a legitimate zero once stored.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One day of summary stats, body composition, and hydration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub calendar_date: NaiveDate,
    pub total_steps: Option<i64>,
    pub total_distance_meters: Option<i64>,
    pub daily_step_goal: Option<i64>,
    pub total_kilocalories: Option<f64>,
    pub active_kilocalories: Option<f64>,
    pub bmr_kilocalories: Option<f64>,
    pub highly_active_seconds: Option<i64>,
    pub active_seconds: Option<i64>,
    pub sedentary_seconds: Option<i64>,
    pub sleeping_seconds: Option<i64>,
    pub moderate_intensity_minutes: Option<i64>,
    pub vigorous_intensity_minutes: Option<i64>,
    pub floors_ascended: Option<f64>,
    pub floors_descended: Option<f64>,
    pub min_heart_rate: Option<i64>,
    pub max_heart_rate: Option<i64>,
    pub resting_heart_rate: Option<i64>,
    pub last_7d_avg_resting_hr: Option<i64>,
    pub average_stress_level: Option<i64>,
    pub max_stress_level: Option<i64>,
    pub stress_duration: Option<i64>,
    pub rest_stress_duration: Option<i64>,
    pub low_stress_duration: Option<i64>,
    pub medium_stress_duration: Option<i64>,
    pub high_stress_duration: Option<i64>,
    pub body_battery_charged: Option<i64>,
    pub body_battery_drained: Option<i64>,
    pub body_battery_highest: Option<i64>,
    pub body_battery_lowest: Option<i64>,
    pub body_battery_most_recent: Option<i64>,
    pub body_battery_at_wake: Option<i64>,
    pub body_battery_during_sleep: Option<i64>,
    pub average_spo2: Option<f64>,
    pub lowest_spo2: Option<f64>,
    pub avg_waking_respiration: Option<f64>,
    pub highest_respiration: Option<f64>,
    pub lowest_respiration: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub body_fat: Option<f64>,
    pub body_water: Option<f64>,
    pub bone_mass: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub visceral_fat: Option<f64>,
    pub metabolic_age: Option<f64>,
    pub hydration_value_ml: Option<i64>,
    pub hydration_goal_ml: Option<i64>,
}

/// One night of sleep, keyed by the wake-up calendar date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySleep {
    pub calendar_date: NaiveDate,
    /// Sleep window start, local wall-clock (converted from epoch-ms GMT)
    pub sleep_start_timestamp_local: Option<NaiveDateTime>,
    /// Sleep window end, local wall-clock (converted from epoch-ms GMT)
    pub sleep_end_timestamp_local: Option<NaiveDateTime>,
    pub sleep_time_seconds: Option<i64>,
    pub nap_time_seconds: Option<i64>,
    pub deep_sleep_seconds: Option<i64>,
    pub light_sleep_seconds: Option<i64>,
    pub rem_sleep_seconds: Option<i64>,
    pub awake_sleep_seconds: Option<i64>,
    pub awake_count: Option<i64>,
    pub avg_sleep_stress: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub average_respiration: Option<f64>,
    pub lowest_respiration: Option<f64>,
    pub highest_respiration: Option<f64>,
    pub sleep_score_overall: Option<i64>,
    pub sleep_score_qualifier: Option<String>,
    pub rem_percentage: Option<i64>,
    pub light_percentage: Option<i64>,
    pub deep_percentage: Option<i64>,
    pub sleep_need_baseline_minutes: Option<i64>,
    pub sleep_need_actual_minutes: Option<i64>,
    pub body_battery_change: Option<f64>,
    pub resting_heart_rate: Option<f64>,
    pub avg_overnight_hrv: Option<f64>,
}

/// One day of heart-rate-variability summary data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyHrv {
    pub calendar_date: NaiveDate,
    pub weekly_avg: Option<f64>,
    pub last_night_avg: Option<f64>,
    pub last_night_5min_high: Option<f64>,
    pub baseline_low_upper: Option<f64>,
    pub baseline_balanced_low: Option<f64>,
    pub baseline_balanced_upper: Option<f64>,
    pub status: Option<String>,
}

/// Activity summary, keyed by the source-assigned activity id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: i64,
    /// The sync's target date, not the payload's own (local-time) dates
    pub calendar_date: NaiveDate,
    pub activity_name: Option<String>,
    pub activity_type_key: Option<String>,
    pub activity_type_id: Option<i64>,
    pub start_time_local: Option<NaiveDateTime>,
    pub start_time_gmt: Option<NaiveDateTime>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub elapsed_duration_seconds: Option<f64>,
    pub moving_duration_seconds: Option<f64>,
    pub elevation_gain: Option<f64>,
    pub elevation_loss: Option<f64>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub calories: Option<f64>,
    pub bmr_calories: Option<f64>,
    pub average_hr: Option<f64>,
    pub max_hr: Option<f64>,
    pub average_cadence: Option<f64>,
    pub max_cadence: Option<f64>,
    pub steps: Option<i64>,
    pub avg_power: Option<f64>,
    pub max_power: Option<f64>,
    pub norm_power: Option<f64>,
    pub aerobic_training_effect: Option<f64>,
    pub anaerobic_training_effect: Option<f64>,
    pub vo2_max: Option<f64>,
    pub avg_vertical_oscillation: Option<f64>,
    pub avg_ground_contact_time: Option<f64>,
    pub avg_stride_length: Option<f64>,
    pub avg_vertical_ratio: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub training_effect_label: Option<String>,
    pub activity_training_load: Option<f64>,
    pub fastest_split_1000: Option<f64>,
    pub fastest_split_1609: Option<f64>,
    pub fastest_split_5000: Option<f64>,
    pub fastest_split_10000: Option<f64>,
    pub hr_time_in_zone_1: Option<f64>,
    pub hr_time_in_zone_2: Option<f64>,
    pub hr_time_in_zone_3: Option<f64>,
    pub hr_time_in_zone_4: Option<f64>,
    pub hr_time_in_zone_5: Option<f64>,
    pub difference_body_battery: Option<i64>,
    /// Child rows, replaced as a unit with the activity
    pub splits: Vec<ActivitySplitSummary>,
}

/// Per-split-type rollup owned by one activity.
/// The source assigns no stable id to these, so they are never merged
/// individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySplitSummary {
    pub split_type: Option<String>,
    pub no_of_splits: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub distance_meters: Option<f64>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub total_ascent: Option<f64>,
    pub elevation_loss: Option<f64>,
}

/// Everything parsed for one sync run, handed to the upsert engine as a
/// single transactional unit
#[derive(Debug, Clone, Default)]
pub struct DayBatch {
    pub summary: Option<DailySummary>,
    pub sleep: Option<DailySleep>,
    pub hrv: Option<DailyHrv>,
    pub activities: Vec<Activity>,
}

impl DayBatch {
    /// True when there is nothing to persist and no transaction is needed
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.sleep.is_none()
            && self.hrv.is_none()
            && self.activities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        assert!(DayBatch::default().is_empty());
    }

    #[test]
    fn test_batch_with_one_record_is_not_empty() {
        let batch = DayBatch {
            hrv: Some(DailyHrv::default()),
            ..Default::default()
        };
        assert!(!batch.is_empty());
    }
}
