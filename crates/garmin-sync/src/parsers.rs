//! Parsers converting raw Garmin JSON payloads into typed records
//!
//! Every optional numeric field goes through the sentinel normalizer
//! before it reaches a record, and every nested object access tolerates
//! null/absent/mis-shaped input by resolving to absent fields.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::warn;

use crate::db::models::{Activity, ActivitySplitSummary, DailyHrv, DailySleep, DailySummary};
use crate::error::{Result, SyncError};

static NULL: Value = Value::Null;

/// Timestamp format used by activity payloads
const ACTIVITY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Map the API's "no data" encodings to an absent value.
///
/// The source uses -1 ("not available") and -2 ("not applicable") in
/// place of real measurements. Detection is numeric-only: the string
/// "-1" passes through, as does a legitimate zero.
pub fn normalize(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == -1.0 || f == -2.0 => None,
            _ => Some(value),
        },
        _ => Some(value),
    }
}

/// Optional integer field, sentinel-normalized. Integral floats are
/// accepted by rounding, matching how the source mixes number shapes.
fn opt_i64(obj: &Value, key: &str) -> Option<i64> {
    let value = obj.get(key).and_then(normalize)?;
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    value.as_f64().map(|float| float.round() as i64)
}

/// Optional float field, sentinel-normalized
fn opt_f64(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(normalize).and_then(|v| v.as_f64())
}

/// Optional string field
fn opt_str(obj: &Value, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Nested object access that degrades to Null, so field lookups on a
/// missing or mis-shaped sub-object resolve to absent instead of raising
fn child<'a>(obj: &'a Value, key: &str) -> &'a Value {
    obj.get(key).unwrap_or(&NULL)
}

/// True when the key holds a non-empty JSON object
fn has_object(obj: &Value, key: &str) -> bool {
    obj.get(key)
        .and_then(|v| v.as_object())
        .is_some_and(|m| !m.is_empty())
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Convert an epoch-milliseconds instant to local wall-clock time.
/// Malformed or out-of-range input yields absent, never an error.
fn epoch_ms_to_local(obj: &Value, key: &str) -> Option<NaiveDateTime> {
    let ms = obj.get(key)?.as_i64()?;
    DateTime::from_timestamp_millis(ms).map(|dt| dt.with_timezone(&Local).naive_local())
}

/// Parse a local-time activity timestamp, degrading to absent on failure
fn parse_activity_datetime(obj: &Value, key: &str) -> Option<NaiveDateTime> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDateTime::parse_from_str(s, ACTIVITY_DATETIME_FORMAT).ok())
}

/// Parse the daily stats/body payload, merging the optional hydration
/// payload as purely additive fields.
///
/// `calendarDate` is mandatory here; there is no other date source for
/// this record.
pub fn parse_daily_summary(stats: &Value, hydration: Option<&Value>) -> Result<DailySummary> {
    let calendar_date = stats
        .get("calendarDate")
        .and_then(|v| v.as_str())
        .and_then(parse_calendar_date)
        .ok_or_else(|| {
            SyncError::invalid_response("daily summary payload is missing calendarDate")
        })?;

    let h = hydration.unwrap_or(&NULL);

    Ok(DailySummary {
        calendar_date,
        total_steps: opt_i64(stats, "totalSteps"),
        total_distance_meters: opt_i64(stats, "totalDistanceMeters"),
        daily_step_goal: opt_i64(stats, "dailyStepGoal"),
        total_kilocalories: opt_f64(stats, "totalKilocalories"),
        active_kilocalories: opt_f64(stats, "activeKilocalories"),
        bmr_kilocalories: opt_f64(stats, "bmrKilocalories"),
        highly_active_seconds: opt_i64(stats, "highlyActiveSeconds"),
        active_seconds: opt_i64(stats, "activeSeconds"),
        sedentary_seconds: opt_i64(stats, "sedentarySeconds"),
        sleeping_seconds: opt_i64(stats, "sleepingSeconds"),
        moderate_intensity_minutes: opt_i64(stats, "moderateIntensityMinutes"),
        vigorous_intensity_minutes: opt_i64(stats, "vigorousIntensityMinutes"),
        floors_ascended: opt_f64(stats, "floorsAscended"),
        floors_descended: opt_f64(stats, "floorsDescended"),
        min_heart_rate: opt_i64(stats, "minHeartRate"),
        max_heart_rate: opt_i64(stats, "maxHeartRate"),
        resting_heart_rate: opt_i64(stats, "restingHeartRate"),
        last_7d_avg_resting_hr: opt_i64(stats, "lastSevenDaysAvgRestingHeartRate"),
        average_stress_level: opt_i64(stats, "averageStressLevel"),
        max_stress_level: opt_i64(stats, "maxStressLevel"),
        stress_duration: opt_i64(stats, "stressDuration"),
        rest_stress_duration: opt_i64(stats, "restStressDuration"),
        low_stress_duration: opt_i64(stats, "lowStressDuration"),
        medium_stress_duration: opt_i64(stats, "mediumStressDuration"),
        high_stress_duration: opt_i64(stats, "highStressDuration"),
        body_battery_charged: opt_i64(stats, "bodyBatteryChargedValue"),
        body_battery_drained: opt_i64(stats, "bodyBatteryDrainedValue"),
        body_battery_highest: opt_i64(stats, "bodyBatteryHighestValue"),
        body_battery_lowest: opt_i64(stats, "bodyBatteryLowestValue"),
        body_battery_most_recent: opt_i64(stats, "bodyBatteryMostRecentValue"),
        body_battery_at_wake: opt_i64(stats, "bodyBatteryAtWakeTime"),
        body_battery_during_sleep: opt_i64(stats, "bodyBatteryDuringSleep"),
        average_spo2: opt_f64(stats, "averageSpo2"),
        lowest_spo2: opt_f64(stats, "lowestSpo2"),
        avg_waking_respiration: opt_f64(stats, "avgWakingRespirationValue"),
        highest_respiration: opt_f64(stats, "highestRespirationValue"),
        lowest_respiration: opt_f64(stats, "lowestRespirationValue"),
        weight: opt_f64(stats, "weight"),
        bmi: opt_f64(stats, "bmi"),
        body_fat: opt_f64(stats, "bodyFat"),
        body_water: opt_f64(stats, "bodyWater"),
        bone_mass: opt_f64(stats, "boneMass"),
        muscle_mass: opt_f64(stats, "muscleMass"),
        visceral_fat: opt_f64(stats, "visceralFat"),
        metabolic_age: opt_f64(stats, "metabolicAge"),
        hydration_value_ml: opt_i64(h, "valueInML"),
        hydration_goal_ml: opt_i64(h, "goalInML"),
    })
}

/// Parse the sleep payload. Returns None when there is no usable sleep
/// summary (absent or empty `dailySleepDTO`, or no calendar date in it).
pub fn parse_daily_sleep(payload: &Value) -> Option<DailySleep> {
    if !has_object(payload, "dailySleepDTO") {
        return None;
    }
    let dto = child(payload, "dailySleepDTO");

    let calendar_date = dto
        .get("calendarDate")
        .and_then(|v| v.as_str())
        .and_then(parse_calendar_date)?;

    let scores = child(dto, "sleepScores");
    let overall = child(scores, "overall");
    let rem_pct = child(scores, "remPercentage");
    let light_pct = child(scores, "lightPercentage");
    let deep_pct = child(scores, "deepPercentage");
    let sleep_need = child(dto, "sleepNeed");

    Some(DailySleep {
        calendar_date,
        sleep_start_timestamp_local: epoch_ms_to_local(dto, "sleepStartTimestampGMT"),
        sleep_end_timestamp_local: epoch_ms_to_local(dto, "sleepEndTimestampGMT"),
        sleep_time_seconds: opt_i64(dto, "sleepTimeSeconds"),
        nap_time_seconds: opt_i64(dto, "napTimeSeconds"),
        deep_sleep_seconds: opt_i64(dto, "deepSleepSeconds"),
        light_sleep_seconds: opt_i64(dto, "lightSleepSeconds"),
        rem_sleep_seconds: opt_i64(dto, "remSleepSeconds"),
        awake_sleep_seconds: opt_i64(dto, "awakeSleepSeconds"),
        awake_count: opt_i64(dto, "awakeCount"),
        avg_sleep_stress: opt_f64(dto, "avgSleepStress"),
        avg_heart_rate: opt_f64(dto, "avgHeartRate"),
        average_respiration: opt_f64(dto, "averageRespirationValue"),
        lowest_respiration: opt_f64(dto, "lowestRespirationValue"),
        highest_respiration: opt_f64(dto, "highestRespirationValue"),
        sleep_score_overall: opt_i64(overall, "value"),
        sleep_score_qualifier: opt_str(overall, "qualifierKey"),
        rem_percentage: opt_i64(rem_pct, "value"),
        light_percentage: opt_i64(light_pct, "value"),
        deep_percentage: opt_i64(deep_pct, "value"),
        sleep_need_baseline_minutes: opt_i64(sleep_need, "baseline"),
        sleep_need_actual_minutes: opt_i64(sleep_need, "actual"),
        body_battery_change: opt_f64(payload, "bodyBatteryChange"),
        resting_heart_rate: opt_f64(payload, "restingHeartRate"),
        avg_overnight_hrv: opt_f64(payload, "avgOvernightHrv"),
    })
}

/// Parse the HRV payload. Returns None when there is no usable summary.
/// A `baseline` of unexpected shape yields absent baseline fields.
pub fn parse_daily_hrv(payload: &Value) -> Option<DailyHrv> {
    if !has_object(payload, "hrvSummary") {
        return None;
    }
    let summary = child(payload, "hrvSummary");

    let calendar_date = summary
        .get("calendarDate")
        .and_then(|v| v.as_str())
        .and_then(parse_calendar_date)?;

    let baseline = child(summary, "baseline");

    Some(DailyHrv {
        calendar_date,
        weekly_avg: opt_f64(summary, "weeklyAvg"),
        last_night_avg: opt_f64(summary, "lastNightAvg"),
        last_night_5min_high: opt_f64(summary, "lastNight5MinHigh"),
        baseline_low_upper: opt_f64(baseline, "lowUpper"),
        baseline_balanced_low: opt_f64(baseline, "balancedLow"),
        baseline_balanced_upper: opt_f64(baseline, "balancedUpper"),
        status: opt_str(summary, "status"),
    })
}

/// Parse a list of raw activity entries fetched for `target_date`.
///
/// The activity's own date strings are local time and are not used for
/// bucketing; every parsed activity is attributed to the target date.
/// Entries without an `activityId` are skipped individually.
pub fn parse_activities(entries: &[Value], target_date: NaiveDate) -> Vec<Activity> {
    let mut results = Vec::new();

    for entry in entries {
        let Some(activity_id) = entry.get("activityId").and_then(|v| v.as_i64()) else {
            warn!("skipping activity entry without activityId");
            continue;
        };

        let act_type = child(entry, "activityType");

        let splits = entry
            .get("splitSummaries")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().map(parse_split_summary).collect())
            .unwrap_or_default();

        results.push(Activity {
            activity_id,
            calendar_date: target_date,
            activity_name: opt_str(entry, "activityName"),
            activity_type_key: opt_str(act_type, "typeKey"),
            activity_type_id: act_type.get("typeId").and_then(|v| v.as_i64()),
            start_time_local: parse_activity_datetime(entry, "startTimeLocal"),
            start_time_gmt: parse_activity_datetime(entry, "startTimeGMT"),
            distance_meters: opt_f64(entry, "distance"),
            duration_seconds: opt_f64(entry, "duration"),
            elapsed_duration_seconds: opt_f64(entry, "elapsedDuration"),
            moving_duration_seconds: opt_f64(entry, "movingDuration"),
            elevation_gain: opt_f64(entry, "elevationGain"),
            elevation_loss: opt_f64(entry, "elevationLoss"),
            average_speed: opt_f64(entry, "averageSpeed"),
            max_speed: opt_f64(entry, "maxSpeed"),
            start_latitude: opt_f64(entry, "startLatitude"),
            start_longitude: opt_f64(entry, "startLongitude"),
            calories: opt_f64(entry, "calories"),
            bmr_calories: opt_f64(entry, "bmrCalories"),
            average_hr: opt_f64(entry, "averageHR"),
            max_hr: opt_f64(entry, "maxHR"),
            average_cadence: opt_f64(entry, "averageRunningCadenceInStepsPerMinute"),
            max_cadence: opt_f64(entry, "maxRunningCadenceInStepsPerMinute"),
            steps: opt_i64(entry, "steps"),
            avg_power: opt_f64(entry, "avgPower"),
            max_power: opt_f64(entry, "maxPower"),
            norm_power: opt_f64(entry, "normPower"),
            aerobic_training_effect: opt_f64(entry, "aerobicTrainingEffect"),
            anaerobic_training_effect: opt_f64(entry, "anaerobicTrainingEffect"),
            vo2_max: opt_f64(entry, "vO2MaxValue"),
            avg_vertical_oscillation: opt_f64(entry, "avgVerticalOscillation"),
            avg_ground_contact_time: opt_f64(entry, "avgGroundContactTime"),
            avg_stride_length: opt_f64(entry, "avgStrideLength"),
            avg_vertical_ratio: opt_f64(entry, "avgVerticalRatio"),
            min_temperature: opt_f64(entry, "minTemperature"),
            max_temperature: opt_f64(entry, "maxTemperature"),
            training_effect_label: opt_str(entry, "trainingEffectLabel"),
            activity_training_load: opt_f64(entry, "activityTrainingLoad"),
            fastest_split_1000: opt_f64(entry, "fastestSplit_1000"),
            fastest_split_1609: opt_f64(entry, "fastestSplit_1609"),
            fastest_split_5000: opt_f64(entry, "fastestSplit_5000"),
            fastest_split_10000: opt_f64(entry, "fastestSplit_10000"),
            hr_time_in_zone_1: opt_f64(entry, "hrTimeInZone_1"),
            hr_time_in_zone_2: opt_f64(entry, "hrTimeInZone_2"),
            hr_time_in_zone_3: opt_f64(entry, "hrTimeInZone_3"),
            hr_time_in_zone_4: opt_f64(entry, "hrTimeInZone_4"),
            hr_time_in_zone_5: opt_f64(entry, "hrTimeInZone_5"),
            difference_body_battery: opt_i64(entry, "differenceBodyBattery"),
            splits,
        });
    }

    results
}

fn parse_split_summary(entry: &Value) -> ActivitySplitSummary {
    ActivitySplitSummary {
        split_type: opt_str(entry, "splitType"),
        no_of_splits: opt_f64(entry, "noOfSplits"),
        duration_seconds: opt_f64(entry, "duration"),
        distance_meters: opt_f64(entry, "distance"),
        average_speed: opt_f64(entry, "averageSpeed"),
        max_speed: opt_f64(entry, "maxSpeed"),
        total_ascent: opt_f64(entry, "totalAscent"),
        elevation_loss: opt_f64(entry, "elevationLoss"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_normalize_sentinels() {
        assert!(normalize(&json!(-1)).is_none());
        assert!(normalize(&json!(-2)).is_none());
        assert!(normalize(&json!(-1.0)).is_none());
        assert!(normalize(&json!(null)).is_none());
    }

    #[test]
    fn test_normalize_keeps_zero() {
        assert_eq!(normalize(&json!(0)), Some(&json!(0)));
        assert_eq!(normalize(&json!(0.0)), Some(&json!(0.0)));
    }

    #[test]
    fn test_normalize_is_numeric_only() {
        // A string "-1" is a real value, not a sentinel
        assert_eq!(normalize(&json!("-1")), Some(&json!("-1")));
        assert_eq!(normalize(&json!(-1.5)), Some(&json!(-1.5)));
    }

    #[test]
    fn test_daily_summary_sentinels_and_zero() {
        let stats = json!({
            "calendarDate": "2024-03-01",
            "totalSteps": -1,
            "restingHeartRate": 52,
            "totalKilocalories": 0.0,
            "averageStressLevel": -2,
        });

        let summary = parse_daily_summary(&stats, None).unwrap();
        assert_eq!(summary.calendar_date, date("2024-03-01"));
        assert_eq!(summary.total_steps, None);
        assert_eq!(summary.resting_heart_rate, Some(52));
        assert_eq!(summary.total_kilocalories, Some(0.0));
        assert_eq!(summary.average_stress_level, None);
        assert_eq!(summary.hydration_value_ml, None);
        assert_eq!(summary.hydration_goal_ml, None);
    }

    #[test]
    fn test_daily_summary_merges_hydration() {
        let stats = json!({"calendarDate": "2024-03-01"});
        let hydration = json!({"valueInML": 1500, "goalInML": 2400});

        let summary = parse_daily_summary(&stats, Some(&hydration)).unwrap();
        assert_eq!(summary.hydration_value_ml, Some(1500));
        assert_eq!(summary.hydration_goal_ml, Some(2400));
    }

    #[test]
    fn test_daily_summary_requires_calendar_date() {
        let stats = json!({"totalSteps": 9000});
        assert!(parse_daily_summary(&stats, None).is_err());

        let malformed = json!({"calendarDate": "03/01/2024"});
        assert!(parse_daily_summary(&malformed, None).is_err());
    }

    #[test]
    fn test_sleep_without_dto_is_no_record() {
        assert!(parse_daily_sleep(&json!({})).is_none());
        assert!(parse_daily_sleep(&json!({"dailySleepDTO": null})).is_none());
        assert!(parse_daily_sleep(&json!({"dailySleepDTO": {}})).is_none());
    }

    #[test]
    fn test_sleep_without_date_is_no_record() {
        let payload = json!({"dailySleepDTO": {"sleepTimeSeconds": 28800}});
        assert!(parse_daily_sleep(&payload).is_none());
    }

    #[test]
    fn test_sleep_nested_scores_tolerate_null() {
        let payload = json!({
            "dailySleepDTO": {
                "calendarDate": "2024-03-01",
                "sleepTimeSeconds": 28800,
                "sleepScores": null,
                "sleepNeed": null,
            }
        });

        let sleep = parse_daily_sleep(&payload).unwrap();
        assert_eq!(sleep.sleep_time_seconds, Some(28800));
        assert_eq!(sleep.sleep_score_overall, None);
        assert_eq!(sleep.sleep_score_qualifier, None);
        assert_eq!(sleep.sleep_need_baseline_minutes, None);
    }

    #[test]
    fn test_sleep_epoch_timestamps_to_local() {
        let payload = json!({
            "dailySleepDTO": {
                "calendarDate": "2024-03-01",
                "sleepStartTimestampGMT": 1709247600000i64,
                "sleepEndTimestampGMT": "not-an-epoch",
            },
            "avgOvernightHrv": 48.0,
        });

        let sleep = parse_daily_sleep(&payload).unwrap();
        assert!(sleep.sleep_start_timestamp_local.is_some());
        // Malformed epoch degrades to absent, not to a failed record
        assert!(sleep.sleep_end_timestamp_local.is_none());
        assert_eq!(sleep.avg_overnight_hrv, Some(48.0));
    }

    #[test]
    fn test_sleep_scores_parsed() {
        let payload = json!({
            "dailySleepDTO": {
                "calendarDate": "2024-03-01",
                "sleepScores": {
                    "overall": {"value": 81, "qualifierKey": "GOOD"},
                    "remPercentage": {"value": 22},
                    "lightPercentage": {"value": 55},
                    "deepPercentage": {"value": 23},
                },
                "sleepNeed": {"baseline": 480, "actual": 510},
            },
        });

        let sleep = parse_daily_sleep(&payload).unwrap();
        assert_eq!(sleep.sleep_score_overall, Some(81));
        assert_eq!(sleep.sleep_score_qualifier.as_deref(), Some("GOOD"));
        assert_eq!(sleep.rem_percentage, Some(22));
        assert_eq!(sleep.sleep_need_actual_minutes, Some(510));
    }

    #[test]
    fn test_hrv_without_summary_is_no_record() {
        assert!(parse_daily_hrv(&json!({})).is_none());
        assert!(parse_daily_hrv(&json!({"hrvSummary": {}})).is_none());
    }

    #[test]
    fn test_hrv_baseline_of_wrong_shape() {
        let payload = json!({
            "hrvSummary": {
                "calendarDate": "2024-03-01",
                "weeklyAvg": 52.0,
                "baseline": "unavailable",
                "status": "BALANCED",
            }
        });

        let hrv = parse_daily_hrv(&payload).unwrap();
        assert_eq!(hrv.weekly_avg, Some(52.0));
        assert_eq!(hrv.baseline_low_upper, None);
        assert_eq!(hrv.baseline_balanced_low, None);
        assert_eq!(hrv.baseline_balanced_upper, None);
        assert_eq!(hrv.status.as_deref(), Some("BALANCED"));
    }

    #[test]
    fn test_hrv_baseline_parsed() {
        let payload = json!({
            "hrvSummary": {
                "calendarDate": "2024-03-01",
                "baseline": {"lowUpper": 44, "balancedLow": 46, "balancedUpper": 58},
            }
        });

        let hrv = parse_daily_hrv(&payload).unwrap();
        assert_eq!(hrv.baseline_low_upper, Some(44.0));
        assert_eq!(hrv.baseline_balanced_upper, Some(58.0));
    }

    #[test]
    fn test_activity_without_id_is_skipped() {
        let entries = vec![
            json!({"activityName": "orphan"}),
            json!({"activityId": 101, "activityName": "kept"}),
        ];

        let activities = parse_activities(&entries, date("2024-03-01"));
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity_id, 101);
    }

    #[test]
    fn test_activity_dates_come_from_target_date() {
        let entries = vec![json!({
            "activityId": 101,
            "startTimeLocal": "2024-02-29 23:45:00",
            "startTimeGMT": "2024-03-01 07:45:00",
        })];

        let activities = parse_activities(&entries, date("2024-03-01"));
        let act = &activities[0];
        assert_eq!(act.calendar_date, date("2024-03-01"));
        assert_eq!(
            act.start_time_local.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-02-29 23:45:00"
        );
    }

    #[test]
    fn test_activity_bad_timestamp_degrades_to_absent() {
        let entries = vec![json!({
            "activityId": 101,
            "startTimeLocal": "yesterday evening",
        })];

        let activities = parse_activities(&entries, date("2024-03-01"));
        assert!(activities[0].start_time_local.is_none());
    }

    #[test]
    fn test_activity_fields_and_type() {
        let entries = vec![json!({
            "activityId": 101,
            "activityName": "Morning Run",
            "activityType": {"typeKey": "running", "typeId": 1},
            "distance": 10500.0,
            "duration": 3600.0,
            "averageHR": 151,
            "maxHR": -1,
            "vO2MaxValue": 53.0,
            "differenceBodyBattery": -12,
        })];

        let activities = parse_activities(&entries, date("2024-03-01"));
        let act = &activities[0];
        assert_eq!(act.activity_type_key.as_deref(), Some("running"));
        assert_eq!(act.activity_type_id, Some(1));
        assert_eq!(act.distance_meters, Some(10500.0));
        assert_eq!(act.average_hr, Some(151.0));
        assert_eq!(act.max_hr, None);
        // -12 is a real signed measurement, not a sentinel
        assert_eq!(act.difference_body_battery, Some(-12));
    }

    #[test]
    fn test_split_summaries_parsed() {
        let entries = vec![json!({
            "activityId": 101,
            "splitSummaries": [
                {"splitType": "RWD_RUN", "noOfSplits": 4, "duration": 2700.0, "distance": 9800.0},
                {"splitType": "RWD_WALK", "noOfSplits": 2, "maxSpeed": -1},
            ],
        })];

        let activities = parse_activities(&entries, date("2024-03-01"));
        let splits = &activities[0].splits;
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].split_type.as_deref(), Some("RWD_RUN"));
        assert_eq!(splits[0].no_of_splits, Some(4.0));
        assert_eq!(splits[1].max_speed, None);
    }

    #[test]
    fn test_split_summaries_null_is_empty() {
        let entries = vec![json!({"activityId": 101, "splitSummaries": null})];
        let activities = parse_activities(&entries, date("2024-03-01"));
        assert!(activities[0].splits.is_empty());
    }
}
