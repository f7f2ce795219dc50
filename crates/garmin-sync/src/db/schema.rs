//! Database schema and migrations

use rusqlite::Connection;

use crate::error::{Result, SyncError};

/// Run all pending migrations
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )
    .map_err(|e| SyncError::Database(e.to_string()))?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration v1: the five entity tables
fn migration_v1(conn: &Connection) -> Result<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS daily_summary (
            calendar_date TEXT PRIMARY KEY,
            total_steps INTEGER,
            total_distance_meters INTEGER,
            daily_step_goal INTEGER,
            total_kilocalories REAL,
            active_kilocalories REAL,
            bmr_kilocalories REAL,
            highly_active_seconds INTEGER,
            active_seconds INTEGER,
            sedentary_seconds INTEGER,
            sleeping_seconds INTEGER,
            moderate_intensity_minutes INTEGER,
            vigorous_intensity_minutes INTEGER,
            floors_ascended REAL,
            floors_descended REAL,
            min_heart_rate INTEGER,
            max_heart_rate INTEGER,
            resting_heart_rate INTEGER,
            last_7d_avg_resting_hr INTEGER,
            average_stress_level INTEGER,
            max_stress_level INTEGER,
            stress_duration INTEGER,
            rest_stress_duration INTEGER,
            low_stress_duration INTEGER,
            medium_stress_duration INTEGER,
            high_stress_duration INTEGER,
            body_battery_charged INTEGER,
            body_battery_drained INTEGER,
            body_battery_highest INTEGER,
            body_battery_lowest INTEGER,
            body_battery_most_recent INTEGER,
            body_battery_at_wake INTEGER,
            body_battery_during_sleep INTEGER,
            average_spo2 REAL,
            lowest_spo2 REAL,
            avg_waking_respiration REAL,
            highest_respiration REAL,
            lowest_respiration REAL,
            weight REAL,
            bmi REAL,
            body_fat REAL,
            body_water REAL,
            bone_mass REAL,
            muscle_mass REAL,
            visceral_fat REAL,
            metabolic_age REAL,
            hydration_value_ml INTEGER,
            hydration_goal_ml INTEGER
        )",
        "CREATE TABLE IF NOT EXISTS daily_sleep (
            calendar_date TEXT PRIMARY KEY,
            sleep_start_timestamp_local TEXT,
            sleep_end_timestamp_local TEXT,
            sleep_time_seconds INTEGER,
            nap_time_seconds INTEGER,
            deep_sleep_seconds INTEGER,
            light_sleep_seconds INTEGER,
            rem_sleep_seconds INTEGER,
            awake_sleep_seconds INTEGER,
            awake_count INTEGER,
            avg_sleep_stress REAL,
            avg_heart_rate REAL,
            average_respiration REAL,
            lowest_respiration REAL,
            highest_respiration REAL,
            sleep_score_overall INTEGER,
            sleep_score_qualifier TEXT,
            rem_percentage INTEGER,
            light_percentage INTEGER,
            deep_percentage INTEGER,
            sleep_need_baseline_minutes INTEGER,
            sleep_need_actual_minutes INTEGER,
            body_battery_change REAL,
            resting_heart_rate REAL,
            avg_overnight_hrv REAL
        )",
        "CREATE TABLE IF NOT EXISTS daily_hrv (
            calendar_date TEXT PRIMARY KEY,
            weekly_avg REAL,
            last_night_avg REAL,
            last_night_5min_high REAL,
            baseline_low_upper REAL,
            baseline_balanced_low REAL,
            baseline_balanced_upper REAL,
            status TEXT
        )",
        "CREATE TABLE IF NOT EXISTS activities (
            activity_id INTEGER PRIMARY KEY,
            calendar_date TEXT,
            activity_name TEXT,
            activity_type_key TEXT,
            activity_type_id INTEGER,
            start_time_local TEXT,
            start_time_gmt TEXT,
            distance_meters REAL,
            duration_seconds REAL,
            elapsed_duration_seconds REAL,
            moving_duration_seconds REAL,
            elevation_gain REAL,
            elevation_loss REAL,
            average_speed REAL,
            max_speed REAL,
            start_latitude REAL,
            start_longitude REAL,
            calories REAL,
            bmr_calories REAL,
            average_hr REAL,
            max_hr REAL,
            average_cadence REAL,
            max_cadence REAL,
            steps INTEGER,
            avg_power REAL,
            max_power REAL,
            norm_power REAL,
            aerobic_training_effect REAL,
            anaerobic_training_effect REAL,
            vo2_max REAL,
            avg_vertical_oscillation REAL,
            avg_ground_contact_time REAL,
            avg_stride_length REAL,
            avg_vertical_ratio REAL,
            min_temperature REAL,
            max_temperature REAL,
            training_effect_label TEXT,
            activity_training_load REAL,
            fastest_split_1000 REAL,
            fastest_split_1609 REAL,
            fastest_split_5000 REAL,
            fastest_split_10000 REAL,
            hr_time_in_zone_1 REAL,
            hr_time_in_zone_2 REAL,
            hr_time_in_zone_3 REAL,
            hr_time_in_zone_4 REAL,
            hr_time_in_zone_5 REAL,
            difference_body_battery INTEGER
        )",
        "CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(calendar_date)",
        "CREATE TABLE IF NOT EXISTS activity_split_summaries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            activity_id INTEGER NOT NULL REFERENCES activities(activity_id),
            split_type TEXT,
            no_of_splits REAL,
            duration_seconds REAL,
            distance_meters REAL,
            average_speed REAL,
            max_speed REAL,
            total_ascent REAL,
            elevation_loss REAL
        )",
        "CREATE INDEX IF NOT EXISTS idx_splits_activity
         ON activity_split_summaries(activity_id)",
        "INSERT INTO schema_migrations (version) VALUES (1)",
    ];

    for sql in statements {
        conn.execute(sql, []).map_err(|e| {
            SyncError::Database(format!(
                "{}: {}",
                sql.chars().take(50).collect::<String>(),
                e
            ))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_v1() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).expect("Migration failed");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"daily_summary".to_string()));
        assert!(tables.contains(&"daily_sleep".to_string()));
        assert!(tables.contains(&"daily_hrv".to_string()));
        assert!(tables.contains(&"activities".to_string()));
        assert!(tables.contains(&"activity_split_summaries".to_string()));
    }

    #[test]
    fn test_migration_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).expect("First migration failed");
        migrate(&conn).expect("Second migration should be idempotent");

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(versions, 1);
    }
}
