use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{hhmm, Appointment, AppointmentStatus, Priority};

// ============================================================================
// Appointment API Types
// ============================================================================

/// Body of `POST {base}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
    pub notes: String,
    pub clinic_id: Option<String>,
    pub patient_id: Option<String>,
}

/// Body of `PUT {base}/{id}`; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", with = "opt_hhmm")]
    pub time: Option<NaiveTime>,
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `Some(None)` is sent as `null`, which unlinks the patient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Option<String>>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parameters of `GET {base}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAppointmentsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub clinic_id: Option<String>,
}

impl ListAppointmentsQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(clinic_id) = self.clinic_id.as_deref().filter(|c| !c.is_empty()) {
            params.push(("clinic_id", clinic_id.to_string()));
        }
        params
    }
}

/// Envelope every appointments endpoint answers with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub appointments: Option<Vec<Appointment>>,
    #[serde(default)]
    pub appointment_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Acknowledgement of an accepted create/update/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationAck {
    pub message: String,
    pub appointment_id: Option<String>,
}

mod opt_hhmm {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => super::hhmm::serialize(time, serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_appointment_uses_wire_names() {
        let body = NewAppointment {
            patient_name: "Ada".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 30,
            kind: "checkup".into(),
            priority: Priority::Normal,
            notes: String::new(),
            clinic_id: None,
            patient_id: None,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "patient_name": "Ada",
                "date": "2024-03-15",
                "time": "10:00",
                "duration": 30,
                "type": "checkup",
                "priority": "normal",
                "notes": "",
                "clinic_id": null,
                "patient_id": null
            })
        );
    }

    #[test]
    fn patch_only_sends_set_fields() {
        let patch = AppointmentPatch {
            time: NaiveTime::from_hms_opt(15, 30, 0),
            patient_id: Some(None),
            ..AppointmentPatch::status(AppointmentStatus::Cancelled)
        };

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "time": "15:30", "status": "cancelled", "patient_id": null })
        );
        assert!(AppointmentPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn list_params_skip_blank_clinic() {
        let mut query = ListAppointmentsQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 2, 25).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 6).unwrap(),
            clinic_id: Some(String::new()),
        };
        assert_eq!(
            query.params(),
            vec![
                ("start_date", "2024-02-25".to_string()),
                ("end_date", "2024-04-06".to_string()),
            ]
        );

        query.clinic_id = Some("c42".into());
        assert_eq!(query.params().last(), Some(&("clinic_id", "c42".to_string())));
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let envelope: ApiEnvelope =
            serde_json::from_value(json!({ "success": false, "error": "Time slot already booked" }))
                .unwrap();
        assert!(!envelope.success);
        assert!(envelope.appointments.is_none());
        assert_eq!(envelope.error.as_deref(), Some("Time slot already booked"));
    }
}
