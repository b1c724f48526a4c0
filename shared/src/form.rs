use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::api::{AppointmentPatch, NewAppointment};
use crate::models::{
    parse_date, parse_time, Appointment, AppointmentStatus, Priority, DEFAULT_APPOINTMENT_KIND,
    DEFAULT_DURATION_MINUTES,
};

/// Errors raised before an appointment form reaches the network
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequired(Vec<&'static str>),

    #[error("Invalid appointment details: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Raw values of the new/edit appointment dialog.
///
/// `appointment_id` is set while editing an existing record; submitting then
/// produces an update instead of a create.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct AppointmentForm {
    pub appointment_id: Option<String>,

    #[validate(length(max = 200))]
    pub patient_name: String,

    #[validate(custom = "validate_date")]
    pub date: String,

    #[validate(custom = "validate_time")]
    pub time: String,

    #[validate(custom = "validate_duration")]
    pub duration: String,

    #[validate(length(max = 100))]
    pub kind: String,

    pub priority: Priority,
    pub status: AppointmentStatus,

    #[validate(length(max = 5000))]
    pub notes: String,

    pub clinic_id: String,
    pub patient_id: String,

    /// Patient linked to the record when the edit dialog opened
    pub linked_patient_id: Option<String>,
}

impl AppointmentForm {
    /// Blank form with the documented defaults
    pub fn blank() -> Self {
        Self {
            duration: DEFAULT_DURATION_MINUTES.to_string(),
            kind: DEFAULT_APPOINTMENT_KIND.to_string(),
            ..Self::default()
        }
    }

    /// Blank form with the date (and optionally the slot time) pre-filled
    pub fn for_slot(date: chrono::NaiveDate, time: Option<chrono::NaiveTime>) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            time: time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            ..Self::blank()
        }
    }

    /// Form pre-filled from a loaded record, in edit mode
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            appointment_id: Some(appointment.id.clone()),
            patient_name: appointment.patient_name.clone(),
            date: appointment.date.format("%Y-%m-%d").to_string(),
            time: appointment.time.format("%H:%M").to_string(),
            duration: appointment.duration_minutes.to_string(),
            kind: appointment.kind.clone(),
            priority: appointment.priority,
            status: appointment.status,
            notes: appointment.notes.clone().unwrap_or_default(),
            clinic_id: appointment.clinic_id.clone().unwrap_or_default(),
            patient_id: appointment.patient_id.clone().unwrap_or_default(),
            linked_patient_id: appointment.patient_id.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.appointment_id.is_some()
    }

    fn check(&self) -> Result<(), FormError> {
        let mut missing = Vec::new();
        if self.patient_name.trim().is_empty() {
            missing.push("patient_name");
        }
        if self.date.trim().is_empty() {
            missing.push("date");
        }
        if self.time.trim().is_empty() {
            missing.push("time");
        }
        if !missing.is_empty() {
            return Err(FormError::MissingRequired(missing));
        }

        self.validate()?;
        Ok(())
    }

    fn duration_minutes(&self) -> u32 {
        self.duration
            .trim()
            .parse()
            .ok()
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    fn kind_or_default(&self) -> String {
        match self.kind.trim() {
            "" => DEFAULT_APPOINTMENT_KIND.to_string(),
            kind => kind.to_string(),
        }
    }

    /// Validate and build a create request. A blank clinic falls back to the
    /// currently selected clinic filter.
    pub fn to_new_appointment(
        &self,
        selected_clinic: Option<&str>,
    ) -> Result<NewAppointment, FormError> {
        self.check()?;

        let (date, time) = self.parsed_slot()?;
        Ok(NewAppointment {
            patient_name: self.patient_name.trim().to_string(),
            date,
            time,
            duration_minutes: self.duration_minutes(),
            kind: self.kind_or_default(),
            priority: self.priority,
            notes: self.notes.trim().to_string(),
            clinic_id: non_blank(&self.clinic_id)
                .or_else(|| selected_clinic.and_then(non_blank)),
            patient_id: non_blank(&self.patient_id),
        })
    }

    /// Validate and build a full-replacement update request. Clearing the
    /// patient field of a linked record sends `null` to unlink it.
    pub fn to_patch(&self) -> Result<AppointmentPatch, FormError> {
        self.check()?;

        let (date, time) = self.parsed_slot()?;
        Ok(AppointmentPatch {
            patient_name: Some(self.patient_name.trim().to_string()),
            date: Some(date),
            time: Some(time),
            duration_minutes: Some(self.duration_minutes()),
            kind: Some(self.kind_or_default()),
            priority: Some(self.priority),
            status: Some(self.status),
            notes: Some(self.notes.trim().to_string()),
            patient_id: match non_blank(&self.patient_id) {
                Some(patient_id) => Some(Some(patient_id)),
                None if self.linked_patient_id.is_some() => Some(None),
                None => None,
            },
        })
    }

    fn parsed_slot(&self) -> Result<(chrono::NaiveDate, chrono::NaiveTime), FormError> {
        match (parse_date(&self.date), parse_time(&self.time)) {
            (Some(date), Some(time)) => Ok((date, time)),
            _ => Err(FormError::MissingRequired(vec!["date", "time"])),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("date_format"))
}

fn validate_time(value: &str) -> Result<(), ValidationError> {
    parse_time(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("time_format"))
}

fn validate_duration(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match value.parse::<u32>() {
        Ok(minutes) if (1..=24 * 60).contains(&minutes) => Ok(()),
        _ => Err(ValidationError::new("duration_range")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn filled() -> AppointmentForm {
        AppointmentForm {
            patient_name: "  Ada Lovelace ".into(),
            date: "2024-03-15".into(),
            time: "09:00".into(),
            ..AppointmentForm::blank()
        }
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let err = AppointmentForm::blank().to_new_appointment(None).unwrap_err();
        match err {
            FormError::MissingRequired(fields) => {
                assert_eq!(fields, vec!["patient_name", "date", "time"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            FormError::MissingRequired(vec![]).to_string(),
            "Please fill in all required fields"
        );
    }

    #[test]
    fn malformed_time_is_invalid() {
        let form = AppointmentForm {
            time: "25:99".into(),
            ..filled()
        };
        assert!(matches!(
            form.to_new_appointment(None),
            Err(FormError::Invalid(_))
        ));
    }

    #[test]
    fn builds_create_request_with_defaults() {
        let form = AppointmentForm {
            duration: "".into(),
            kind: " ".into(),
            ..filled()
        };

        let request = form.to_new_appointment(Some("clinic-7")).unwrap();
        assert_eq!(request.patient_name, "Ada Lovelace");
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(request.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(request.duration_minutes, 30);
        assert_eq!(request.kind, "checkup");
        assert_eq!(request.clinic_id.as_deref(), Some("clinic-7"));
        assert_eq!(request.patient_id, None);
    }

    #[test]
    fn explicit_clinic_wins_over_selection() {
        let form = AppointmentForm {
            clinic_id: "clinic-1".into(),
            ..filled()
        };
        let request = form.to_new_appointment(Some("clinic-7")).unwrap();
        assert_eq!(request.clinic_id.as_deref(), Some("clinic-1"));
    }

    #[test]
    fn edit_form_round_trips_into_patch() {
        let appointment = Appointment {
            id: "apt-1".into(),
            patient_name: "Grace Hopper".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            duration_minutes: 60,
            kind: "surgery".into(),
            priority: Priority::High,
            status: AppointmentStatus::Scheduled,
            notes: Some("bring x-rays".into()),
            clinic_id: Some("c1".into()),
            patient_id: Some("p9".into()),
        };

        let form = AppointmentForm::from_appointment(&appointment);
        assert!(form.is_edit());
        assert_eq!(form.time, "14:30");

        let patch = form.to_patch().unwrap();
        assert_eq!(patch.duration_minutes, Some(60));
        assert_eq!(patch.kind.as_deref(), Some("surgery"));
        assert_eq!(patch.patient_id, Some(Some("p9".to_string())));
        assert_eq!(patch.time, NaiveTime::from_hms_opt(14, 30, 0));
    }

    #[test]
    fn clearing_patient_unlinks_it() {
        let appointment = Appointment {
            id: "apt-2".into(),
            patient_name: "Grace Hopper".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_minutes: 30,
            kind: "checkup".into(),
            priority: Priority::Normal,
            status: AppointmentStatus::Scheduled,
            notes: None,
            clinic_id: None,
            patient_id: Some("p9".into()),
        };

        let mut form = AppointmentForm::from_appointment(&appointment);
        form.patient_id = "  ".into();
        let patch = form.to_patch().unwrap();
        assert_eq!(patch.patient_id, Some(None));
        assert_eq!(
            serde_json::to_value(&patch).unwrap()["patient_id"],
            serde_json::Value::Null
        );

        let unlinked = Appointment {
            patient_id: None,
            ..appointment
        };
        let patch = AppointmentForm::from_appointment(&unlinked).to_patch().unwrap();
        assert_eq!(patch.patient_id, None);
    }

    #[test]
    fn slot_prefill_formats_date_and_time() {
        let form = AppointmentForm::for_slot(
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0),
        );
        assert_eq!(form.date, "2024-03-11");
        assert_eq!(form.time, "08:30");
        assert_eq!(form.duration, "30");
        assert!(!form.is_edit());
    }
}
