// ✅ Input Validation - form-level checks before a record enters a store
// An empty issue list means the record is acceptable.

use crate::config::StoreConfig;
use crate::records::{Person, PersonKind, Vehicle, VehicleKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        FieldIssue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn require_positive(issues: &mut Vec<FieldIssue>, field: &str, value: f64) {
    if value <= 0.0 {
        issues.push(FieldIssue::new(field, format!("{} must be a positive number", field)));
    }
}

fn require_text(issues: &mut Vec<FieldIssue>, field: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(field, format!("{} cannot be empty", field)));
    }
}

pub fn validate_person(person: &Person, config: &StoreConfig) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    require_text(&mut issues, "firstName", &person.first_name);
    require_text(&mut issues, "lastName", &person.last_name);

    if person.age < config.min_age {
        issues.push(FieldIssue::new(
            "age",
            format!("age must be at least {}", config.min_age),
        ));
    }

    match &person.kind {
        PersonKind::Base => {}
        PersonKind::Employee { salary, sales } => {
            require_positive(&mut issues, "salary", *salary);
            require_positive(&mut issues, "sales", *sales);
        }
        PersonKind::Customer { purchases, phone } => {
            require_positive(&mut issues, "purchases", *purchases);
            if phone.trim().chars().count() < config.min_phone_len {
                issues.push(FieldIssue::new(
                    "phone",
                    format!("phone must have at least {} digits", config.min_phone_len),
                ));
            }
        }
    }

    issues
}

pub fn validate_vehicle(vehicle: &Vehicle) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    require_text(&mut issues, "model", &vehicle.model);
    require_positive(&mut issues, "maxSpeed", vehicle.max_speed);

    match &vehicle.kind {
        VehicleKind::Base => {}
        VehicleKind::Land { doors, wheels } => {
            require_positive(&mut issues, "doors", f64::from(*doors));
            require_positive(&mut issues, "wheels", f64::from(*wheels));
        }
        VehicleKind::Air {
            max_altitude,
            range,
        } => {
            require_positive(&mut issues, "maxAltitude", *max_altitude);
            require_positive(&mut issues, "range", *range);
        }
    }

    issues
}
