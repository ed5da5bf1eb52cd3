//! One-off data fixes run from the command line. Each routine only writes documents that need
//! it, so running it twice changes nothing the second time.

use crate::database::courses::MODULE_COUNT_FIELD;
use crate::database::{CollectionPath, Database, Fields, Query, WriteBatch, collections};
use crate::error::StoreError;
use crate::models::{DailyProblem, FeedbackStatus, UserRole};
use log::info;
use serde_json::Value;
use std::fmt;

/// Daily-problem fields filled in when absent
const DAILY_PROBLEM_DEFAULTS: [&str; 4] = ["difficulty", "type", "testCases", "points"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub examined: usize,
    pub updated: usize,
}

impl fmt::Display for MaintenanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} examined, {} updated", self.examined, self.updated)
    }
}

/// Sets every course's `moduleCount` to the number of modules actually stored under it.
/// Works on the raw documents, so a counter that is absent or not an integer is rewritten too.
pub fn backfill_module_counts(db: &Database) -> Result<MaintenanceReport, StoreError> {
    let path = CollectionPath::new(collections::COURSES);
    let mut report = MaintenanceReport::default();
    let mut batch = WriteBatch::new();

    for doc in db.store().list(&path, &Query::new())? {
        report.examined += 1;
        let live = db.modules(&doc.id).count()? as i64;
        let stored = doc.fields.get(MODULE_COUNT_FIELD);
        if stored.and_then(Value::as_i64) == Some(live) {
            continue;
        }
        let mut fields = Fields::new();
        fields.insert(MODULE_COUNT_FIELD.to_string(), Value::from(live));
        batch.merge(&path, &doc.id, fields);
        info!("Course {} moduleCount {:?} -> {}", doc.id, stored, live);
        report.updated += 1;
    }

    if !batch.is_empty() {
        db.store().commit(batch)?;
    }
    info!("Module counts: {}", report);
    Ok(report)
}

/// Adds the default difficulty, type, test cases and points to daily problems missing them
pub fn backfill_daily_problem_defaults(db: &Database) -> Result<MaintenanceReport, StoreError> {
    let defaults = match serde_json::to_value(DailyProblem::default())? {
        Value::Object(fields) => fields,
        _ => Fields::new(),
    };
    let path = CollectionPath::new(collections::DAILY_PROBLEMS);
    let mut report = MaintenanceReport::default();
    let mut batch = WriteBatch::new();

    for doc in db.store().list(&path, &Query::new())? {
        report.examined += 1;
        let missing: Fields = DAILY_PROBLEM_DEFAULTS
            .iter()
            .filter(|key| doc.fields.get(**key).is_none_or(Value::is_null))
            .filter_map(|key| defaults.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect();
        if !missing.is_empty() {
            batch.merge(&path, &doc.id, missing);
            report.updated += 1;
        }
    }

    if !batch.is_empty() {
        db.store().commit(batch)?;
    }
    info!("Daily problem defaults: {}", report);
    Ok(report)
}

/// Rewrites feedback statuses to their canonical lowercase spelling; missing or unknown
/// statuses become `new`
pub fn normalize_feedback_status(db: &Database) -> Result<MaintenanceReport, StoreError> {
    let path = CollectionPath::new(collections::FEEDBACK);
    let mut report = MaintenanceReport::default();
    let mut batch = WriteBatch::new();

    for doc in db.store().list(&path, &Query::new())? {
        report.examined += 1;
        let stored = doc.fields.get("status").and_then(Value::as_str);
        let canonical = stored.and_then(FeedbackStatus::parse).unwrap_or_default();
        if stored == Some(canonical.as_str()) {
            continue;
        }
        let mut fields = Fields::new();
        fields.insert("status".to_string(), Value::from(canonical.as_str()));
        batch.merge(&path, &doc.id, fields);
        report.updated += 1;
    }

    if !batch.is_empty() {
        db.store().commit(batch)?;
    }
    info!("Feedback statuses: {}", report);
    Ok(report)
}

/// Gives the user registered under `email` the `role`; returns the user id
pub fn assign_role(db: &Database, email: &str, role: UserRole) -> Result<String, StoreError> {
    let users = db.users();
    let user = users.find_by_email(email)?.ok_or_else(|| StoreError::NotFound {
        path: collections::USERS.to_string(),
        id: email.to_string(),
    })?;
    if user.role != role {
        users.update_role(&user.id, role)?;
    }
    Ok(user.id)
}
