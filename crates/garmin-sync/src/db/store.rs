//! Upsert engine: replace-semantics persistence for one sync run
//!
//! Every record in a `DayBatch` lands inside a single transaction.
//! Daily rows are full-row replaced by calendar date. Activities are
//! full-row replaced by activity id, and their split summaries are
//! replaced as a unit in a fixed order: delete children by parent key,
//! upsert the parent, insert the fresh children. That ordering leaves
//! no window where a split row references a missing parent, regardless
//! of any cascade behavior.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Transaction};
use tracing::debug;

use crate::db::models::{Activity, ActivitySplitSummary, DailyHrv, DailySleep, DailySummary, DayBatch};
use crate::db::Database;
use crate::error::{Result, SyncError};

/// What a persist call actually wrote, for outcome reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub daily_summary: bool,
    pub daily_sleep: bool,
    pub daily_hrv: bool,
    pub activities: usize,
    pub splits: usize,
}

fn sql_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn sql_datetime(ts: Option<NaiveDateTime>) -> Option<String> {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn db_err(context: &str, e: rusqlite::Error) -> SyncError {
    SyncError::Database(format!("{}: {}", context, e))
}

impl Database {
    /// Persist a parsed day inside one transaction: everything lands or
    /// nothing does. The transaction rolls back on drop if any step
    /// fails; there is no per-record retry.
    pub fn persist_day(&mut self, batch: &DayBatch) -> Result<PersistReport> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| db_err("Failed to begin transaction", e))?;

        let mut report = PersistReport::default();

        if let Some(summary) = &batch.summary {
            upsert_daily_summary(&tx, summary)?;
            report.daily_summary = true;
        }

        if let Some(sleep) = &batch.sleep {
            upsert_daily_sleep(&tx, sleep)?;
            report.daily_sleep = true;
        }

        if let Some(hrv) = &batch.hrv {
            upsert_daily_hrv(&tx, hrv)?;
            report.daily_hrv = true;
        }

        for activity in &batch.activities {
            replace_activity(&tx, activity)?;
            report.activities += 1;
            report.splits += activity.splits.len();
        }

        tx.commit()
            .map_err(|e| db_err("Failed to commit transaction", e))?;

        debug!(
            activities = report.activities,
            splits = report.splits,
            "persisted day batch"
        );
        Ok(report)
    }
}

fn upsert_daily_summary(tx: &Transaction, summary: &DailySummary) -> Result<()> {
    tx.execute(
        "INSERT OR REPLACE INTO daily_summary (
            calendar_date, total_steps, total_distance_meters, daily_step_goal,
            total_kilocalories, active_kilocalories, bmr_kilocalories,
            highly_active_seconds, active_seconds, sedentary_seconds, sleeping_seconds,
            moderate_intensity_minutes, vigorous_intensity_minutes,
            floors_ascended, floors_descended,
            min_heart_rate, max_heart_rate, resting_heart_rate, last_7d_avg_resting_hr,
            average_stress_level, max_stress_level, stress_duration,
            rest_stress_duration, low_stress_duration, medium_stress_duration,
            high_stress_duration,
            body_battery_charged, body_battery_drained, body_battery_highest,
            body_battery_lowest, body_battery_most_recent, body_battery_at_wake,
            body_battery_during_sleep,
            average_spo2, lowest_spo2,
            avg_waking_respiration, highest_respiration, lowest_respiration,
            weight, bmi, body_fat, body_water, bone_mass, muscle_mass,
            visceral_fat, metabolic_age,
            hydration_value_ml, hydration_goal_ml
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?)",
        params![
            sql_date(summary.calendar_date),
            summary.total_steps,
            summary.total_distance_meters,
            summary.daily_step_goal,
            summary.total_kilocalories,
            summary.active_kilocalories,
            summary.bmr_kilocalories,
            summary.highly_active_seconds,
            summary.active_seconds,
            summary.sedentary_seconds,
            summary.sleeping_seconds,
            summary.moderate_intensity_minutes,
            summary.vigorous_intensity_minutes,
            summary.floors_ascended,
            summary.floors_descended,
            summary.min_heart_rate,
            summary.max_heart_rate,
            summary.resting_heart_rate,
            summary.last_7d_avg_resting_hr,
            summary.average_stress_level,
            summary.max_stress_level,
            summary.stress_duration,
            summary.rest_stress_duration,
            summary.low_stress_duration,
            summary.medium_stress_duration,
            summary.high_stress_duration,
            summary.body_battery_charged,
            summary.body_battery_drained,
            summary.body_battery_highest,
            summary.body_battery_lowest,
            summary.body_battery_most_recent,
            summary.body_battery_at_wake,
            summary.body_battery_during_sleep,
            summary.average_spo2,
            summary.lowest_spo2,
            summary.avg_waking_respiration,
            summary.highest_respiration,
            summary.lowest_respiration,
            summary.weight,
            summary.bmi,
            summary.body_fat,
            summary.body_water,
            summary.bone_mass,
            summary.muscle_mass,
            summary.visceral_fat,
            summary.metabolic_age,
            summary.hydration_value_ml,
            summary.hydration_goal_ml,
        ],
    )
    .map_err(|e| db_err("Failed to upsert daily summary", e))?;

    Ok(())
}

fn upsert_daily_sleep(tx: &Transaction, sleep: &DailySleep) -> Result<()> {
    tx.execute(
        "INSERT OR REPLACE INTO daily_sleep (
            calendar_date, sleep_start_timestamp_local, sleep_end_timestamp_local,
            sleep_time_seconds, nap_time_seconds, deep_sleep_seconds,
            light_sleep_seconds, rem_sleep_seconds, awake_sleep_seconds, awake_count,
            avg_sleep_stress, avg_heart_rate,
            average_respiration, lowest_respiration, highest_respiration,
            sleep_score_overall, sleep_score_qualifier,
            rem_percentage, light_percentage, deep_percentage,
            sleep_need_baseline_minutes, sleep_need_actual_minutes,
            body_battery_change, resting_heart_rate, avg_overnight_hrv
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?)",
        params![
            sql_date(sleep.calendar_date),
            sql_datetime(sleep.sleep_start_timestamp_local),
            sql_datetime(sleep.sleep_end_timestamp_local),
            sleep.sleep_time_seconds,
            sleep.nap_time_seconds,
            sleep.deep_sleep_seconds,
            sleep.light_sleep_seconds,
            sleep.rem_sleep_seconds,
            sleep.awake_sleep_seconds,
            sleep.awake_count,
            sleep.avg_sleep_stress,
            sleep.avg_heart_rate,
            sleep.average_respiration,
            sleep.lowest_respiration,
            sleep.highest_respiration,
            sleep.sleep_score_overall,
            sleep.sleep_score_qualifier,
            sleep.rem_percentage,
            sleep.light_percentage,
            sleep.deep_percentage,
            sleep.sleep_need_baseline_minutes,
            sleep.sleep_need_actual_minutes,
            sleep.body_battery_change,
            sleep.resting_heart_rate,
            sleep.avg_overnight_hrv,
        ],
    )
    .map_err(|e| db_err("Failed to upsert daily sleep", e))?;

    Ok(())
}

fn upsert_daily_hrv(tx: &Transaction, hrv: &DailyHrv) -> Result<()> {
    tx.execute(
        "INSERT OR REPLACE INTO daily_hrv (
            calendar_date, weekly_avg, last_night_avg, last_night_5min_high,
            baseline_low_upper, baseline_balanced_low, baseline_balanced_upper, status
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            sql_date(hrv.calendar_date),
            hrv.weekly_avg,
            hrv.last_night_avg,
            hrv.last_night_5min_high,
            hrv.baseline_low_upper,
            hrv.baseline_balanced_low,
            hrv.baseline_balanced_upper,
            hrv.status,
        ],
    )
    .map_err(|e| db_err("Failed to upsert daily hrv", e))?;

    Ok(())
}

/// Replace one activity and its whole split set.
/// Children go first: the previous split rows must be gone before the
/// parent row is touched, and the fresh set is inserted only after the
/// parent upsert has landed.
fn replace_activity(tx: &Transaction, activity: &Activity) -> Result<()> {
    tx.execute(
        "DELETE FROM activity_split_summaries WHERE activity_id = ?",
        params![activity.activity_id],
    )
    .map_err(|e| db_err("Failed to delete split summaries", e))?;

    upsert_activity(tx, activity)?;

    for split in &activity.splits {
        insert_split_summary(tx, activity.activity_id, split)?;
    }

    Ok(())
}

fn upsert_activity(tx: &Transaction, activity: &Activity) -> Result<()> {
    tx.execute(
        "INSERT OR REPLACE INTO activities (
            activity_id, calendar_date, activity_name, activity_type_key,
            activity_type_id, start_time_local, start_time_gmt,
            distance_meters, duration_seconds, elapsed_duration_seconds,
            moving_duration_seconds, elevation_gain, elevation_loss,
            average_speed, max_speed, start_latitude, start_longitude,
            calories, bmr_calories, average_hr, max_hr,
            average_cadence, max_cadence, steps,
            avg_power, max_power, norm_power,
            aerobic_training_effect, anaerobic_training_effect, vo2_max,
            avg_vertical_oscillation, avg_ground_contact_time, avg_stride_length,
            avg_vertical_ratio, min_temperature, max_temperature,
            training_effect_label, activity_training_load,
            fastest_split_1000, fastest_split_1609, fastest_split_5000,
            fastest_split_10000,
            hr_time_in_zone_1, hr_time_in_zone_2, hr_time_in_zone_3,
            hr_time_in_zone_4, hr_time_in_zone_5,
            difference_body_battery
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?)",
        params![
            activity.activity_id,
            sql_date(activity.calendar_date),
            activity.activity_name,
            activity.activity_type_key,
            activity.activity_type_id,
            sql_datetime(activity.start_time_local),
            sql_datetime(activity.start_time_gmt),
            activity.distance_meters,
            activity.duration_seconds,
            activity.elapsed_duration_seconds,
            activity.moving_duration_seconds,
            activity.elevation_gain,
            activity.elevation_loss,
            activity.average_speed,
            activity.max_speed,
            activity.start_latitude,
            activity.start_longitude,
            activity.calories,
            activity.bmr_calories,
            activity.average_hr,
            activity.max_hr,
            activity.average_cadence,
            activity.max_cadence,
            activity.steps,
            activity.avg_power,
            activity.max_power,
            activity.norm_power,
            activity.aerobic_training_effect,
            activity.anaerobic_training_effect,
            activity.vo2_max,
            activity.avg_vertical_oscillation,
            activity.avg_ground_contact_time,
            activity.avg_stride_length,
            activity.avg_vertical_ratio,
            activity.min_temperature,
            activity.max_temperature,
            activity.training_effect_label,
            activity.activity_training_load,
            activity.fastest_split_1000,
            activity.fastest_split_1609,
            activity.fastest_split_5000,
            activity.fastest_split_10000,
            activity.hr_time_in_zone_1,
            activity.hr_time_in_zone_2,
            activity.hr_time_in_zone_3,
            activity.hr_time_in_zone_4,
            activity.hr_time_in_zone_5,
            activity.difference_body_battery,
        ],
    )
    .map_err(|e| db_err("Failed to upsert activity", e))?;

    Ok(())
}

fn insert_split_summary(
    tx: &Transaction,
    activity_id: i64,
    split: &ActivitySplitSummary,
) -> Result<()> {
    tx.execute(
        "INSERT INTO activity_split_summaries (
            activity_id, split_type, no_of_splits, duration_seconds,
            distance_meters, average_speed, max_speed, total_ascent, elevation_loss
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            activity_id,
            split.split_type,
            split.no_of_splits,
            split.duration_seconds,
            split.distance_meters,
            split.average_speed,
            split.max_speed,
            split.total_ascent,
            split.elevation_loss,
        ],
    )
    .map_err(|e| db_err("Failed to insert split summary", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DayBatch;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_summary(day: &str) -> DailySummary {
        DailySummary {
            calendar_date: date(day),
            total_steps: Some(9543),
            resting_heart_rate: Some(52),
            total_kilocalories: Some(2310.0),
            ..Default::default()
        }
    }

    fn sample_activity(id: i64, day: &str, split_count: usize) -> Activity {
        Activity {
            activity_id: id,
            calendar_date: date(day),
            activity_name: Some(format!("Run {}", id)),
            distance_meters: Some(10000.0),
            splits: (0..split_count)
                .map(|i| ActivitySplitSummary {
                    split_type: Some(format!("INTERVAL_{}", i)),
                    duration_seconds: Some(600.0 * (i + 1) as f64),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn row_count(db: &Database, table: &str) -> i64 {
        db.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn test_daily_rows_replace_by_date() {
        let mut db = Database::open_in_memory().unwrap();

        let batch = DayBatch {
            summary: Some(sample_summary("2024-03-01")),
            ..Default::default()
        };
        db.persist_day(&batch).unwrap();

        let mut updated = sample_summary("2024-03-01");
        updated.total_steps = Some(11000);
        updated.resting_heart_rate = None;
        let batch = DayBatch {
            summary: Some(updated),
            ..Default::default()
        };
        db.persist_day(&batch).unwrap();

        assert_eq!(row_count(&db, "daily_summary"), 1);
        let (steps, resting): (Option<i64>, Option<i64>) = db
            .connection()
            .query_row(
                "SELECT total_steps, resting_heart_rate FROM daily_summary
                 WHERE calendar_date = '2024-03-01'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(steps, Some(11000));
        // Full-row replace: the previously stored value does not survive
        assert_eq!(resting, None);
    }

    #[test]
    fn test_persist_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        let batch = DayBatch {
            summary: Some(sample_summary("2024-03-01")),
            hrv: Some(DailyHrv {
                calendar_date: date("2024-03-01"),
                weekly_avg: Some(51.0),
                ..Default::default()
            }),
            activities: vec![sample_activity(101, "2024-03-01", 2)],
            ..Default::default()
        };

        let first = db.persist_day(&batch).unwrap();
        let second = db.persist_day(&batch).unwrap();
        assert_eq!(first, second);

        assert_eq!(row_count(&db, "daily_summary"), 1);
        assert_eq!(row_count(&db, "daily_hrv"), 1);
        assert_eq!(row_count(&db, "activities"), 1);
        assert_eq!(row_count(&db, "activity_split_summaries"), 2);
    }

    #[test]
    fn test_split_set_shrinks_without_orphans() {
        let mut db = Database::open_in_memory().unwrap();

        let batch = DayBatch {
            activities: vec![sample_activity(101, "2024-03-01", 3)],
            ..Default::default()
        };
        db.persist_day(&batch).unwrap();
        assert_eq!(row_count(&db, "activity_split_summaries"), 3);

        let batch = DayBatch {
            activities: vec![sample_activity(101, "2024-03-01", 1)],
            ..Default::default()
        };
        let report = db.persist_day(&batch).unwrap();
        assert_eq!(report.splits, 1);
        assert_eq!(row_count(&db, "activity_split_summaries"), 1);
    }

    #[test]
    fn test_split_set_can_shrink_to_empty() {
        let mut db = Database::open_in_memory().unwrap();

        db.persist_day(&DayBatch {
            activities: vec![sample_activity(101, "2024-03-01", 2)],
            ..Default::default()
        })
        .unwrap();

        db.persist_day(&DayBatch {
            activities: vec![sample_activity(101, "2024-03-01", 0)],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(row_count(&db, "activities"), 1);
        assert_eq!(row_count(&db, "activity_split_summaries"), 0);
    }

    #[test]
    fn test_independent_activities_share_a_date() {
        let mut db = Database::open_in_memory().unwrap();

        let report = db
            .persist_day(&DayBatch {
                activities: vec![
                    sample_activity(101, "2024-03-01", 1),
                    sample_activity(102, "2024-03-01", 2),
                ],
                ..Default::default()
            })
            .unwrap();

        assert_eq!(report.activities, 2);
        assert_eq!(report.splits, 3);
        assert_eq!(row_count(&db, "activities"), 2);

        let dates: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(DISTINCT calendar_date) FROM activities",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(dates, 1);
    }

    #[test]
    fn test_absent_stays_distinct_from_zero() {
        let mut db = Database::open_in_memory().unwrap();

        let mut summary = sample_summary("2024-03-01");
        summary.total_steps = Some(0);
        summary.daily_step_goal = None;
        db.persist_day(&DayBatch {
            summary: Some(summary),
            ..Default::default()
        })
        .unwrap();

        let (steps, goal): (Option<i64>, Option<i64>) = db
            .connection()
            .query_row(
                "SELECT total_steps, daily_step_goal FROM daily_summary",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(steps, Some(0));
        assert_eq!(goal, None);
    }

    #[test]
    fn test_sleep_timestamps_stored_as_text() {
        let mut db = Database::open_in_memory().unwrap();

        let sleep = DailySleep {
            calendar_date: date("2024-03-01"),
            sleep_start_timestamp_local: Some(
                date("2024-02-29").and_hms_opt(23, 15, 0).unwrap(),
            ),
            sleep_time_seconds: Some(28800),
            ..Default::default()
        };
        db.persist_day(&DayBatch {
            sleep: Some(sleep),
            ..Default::default()
        })
        .unwrap();

        let start: Option<String> = db
            .connection()
            .query_row(
                "SELECT sleep_start_timestamp_local FROM daily_sleep",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(start.as_deref(), Some("2024-02-29 23:15:00"));
    }
}
