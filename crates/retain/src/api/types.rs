//! Request and response models of the prediction API.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Demographic and academic attributes of one student.
///
/// Categorical attributes are the integer codes of the underlying dataset;
/// grades and macroeconomic indicators are floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub marital_status: i32,
    pub application_mode: i32,
    pub application_order: i32,
    pub course: i32,
    pub daytime_evening_attendance: i32,
    pub previous_qualification: i32,
    pub nationality: i32,
    pub gender: i32,
    pub age_at_enrollment: i32,
    pub international: i32,
    pub displaced: i32,
    pub educational_special_needs: i32,

    pub mothers_qualification: i32,
    pub fathers_qualification: i32,
    pub mothers_occupation: i32,
    pub fathers_occupation: i32,

    pub scholarship_holder: i32,
    pub debtor: i32,
    pub tuition_fees_up_to_date: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_grade: Option<f64>,

    pub curricular_units_1st_sem_credited: i32,
    pub curricular_units_1st_sem_enrolled: i32,
    pub curricular_units_1st_sem_evaluations: i32,
    pub curricular_units_1st_sem_approved: i32,
    pub curricular_units_1st_sem_grade: f64,
    pub curricular_units_1st_sem_without_evaluations: i32,

    pub curricular_units_2nd_sem_credited: i32,
    pub curricular_units_2nd_sem_enrolled: i32,
    pub curricular_units_2nd_sem_evaluations: i32,
    pub curricular_units_2nd_sem_approved: i32,
    pub curricular_units_2nd_sem_grade: f64,
    pub curricular_units_2nd_sem_without_evaluations: i32,

    pub unemployment_rate: f64,
    pub inflation_rate: f64,
    pub gdp: f64,
}

/// Body of `POST /predict/`.
#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    #[serde(flatten)]
    pub input: &'a PredictionInput,
    pub save_record: bool,
}

/// Model output for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_class: String,
    pub dropout_probability: f64,
    pub all_probabilities: BTreeMap<String, f64>,
    pub grade_trend: f64,
    pub high_risk: bool,
    pub intervention_recommended: bool,
    /// Id of the stored student record, when the prediction was saved.
    #[serde(default)]
    pub saved_record_id: Option<i64>,
}

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    /// Owning user id.
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(flatten)]
    pub input: PredictionInput,
    #[serde(default)]
    pub last_prediction: Option<String>,
    #[serde(default)]
    pub last_dropout_probability: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The student list comes back either paginated or as a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StudentPage {
    Paginated { results: Vec<Student> },
    Plain(Vec<Student>),
}

impl StudentPage {
    pub fn into_students(self) -> Vec<Student> {
        match self {
            StudentPage::Paginated { results } => results,
            StudentPage::Plain(students) => students,
        }
    }
}

/// Cohort averages used for comparison against a single student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAverage {
    #[serde(rename = "1st_sem_grade")]
    pub first_sem_grade: f64,
    #[serde(rename = "2nd_sem_grade")]
    pub second_sem_grade: f64,
    #[serde(rename = "1st_sem_approved")]
    pub first_sem_approved: f64,
    #[serde(rename = "2nd_sem_approved")]
    pub second_sem_approved: f64,
    #[serde(rename = "1st_sem_enrolled")]
    pub first_sem_enrolled: f64,
    #[serde(rename = "2nd_sem_enrolled")]
    pub second_sem_enrolled: f64,
    pub admission_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub ml_models_loaded: bool,
}

/// Result of a bulk CSV upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub message: String,
    pub processed_count: u32,
    pub high_risk_count: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    Teacher,
    Analyst,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Analyst => "Analyst",
        };
        f.write_str(name)
    }
}

/// Body of `POST /register/`.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Server default is [`Role::Student`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Registration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
            first_name: None,
            last_name: None,
            role: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: RegisteredUser,
    pub role: Role,
    pub message: String,
}

// ============================================================================
// Support and Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: i64,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /support/`.
#[derive(Debug, Serialize)]
pub(crate) struct NewTicket<'a> {
    pub subject: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}
