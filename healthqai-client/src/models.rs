use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;
pub const MIN_SYMPTOMS_CHARS: usize = 10;

pub const DEFAULT_RECOMMENDATIONS: [&str; 2] =
    ["Rest and hydration", "Consult a doctor if symptoms persist"];

pub mod messages {
    pub const MISSING_FIELDS: &str = "Please fill all required fields";
    pub const SYMPTOMS_TOO_SHORT: &str =
        "Please describe symptoms in more detail (at least 10 characters)";
    pub const INVALID_AGE: &str = "Age must be a whole number between 1 and 120";
    pub const INVALID_GENDER: &str = "Please select a valid gender";
    pub const EMPTY_QUESTION: &str = "Please enter a question";
    pub const MISSING_CREDENTIALS: &str = "Username and password are required";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    /// Text sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ClientError::Validation(messages::INVALID_GENDER.to_string()))
    }
}

/// Raw symptom checker input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomForm {
    pub age: String,
    pub gender: String,
    pub symptoms: String,
    pub medical_history: String,
}

/// A validated symptom report, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomReport {
    pub age: u8,
    pub gender: Gender,
    pub symptoms: String,
    pub medical_history: Option<String>,
}

impl SymptomReport {
    pub fn from_form(form: &SymptomForm) -> Result<Self, ClientError> {
        let age = form.age.trim();
        let symptoms = form.symptoms.trim();
        if age.is_empty() || form.gender.trim().is_empty() || symptoms.is_empty() {
            return Err(ClientError::Validation(messages::MISSING_FIELDS.to_string()));
        }
        if symptoms.chars().count() < MIN_SYMPTOMS_CHARS {
            return Err(ClientError::Validation(messages::SYMPTOMS_TOO_SHORT.to_string()));
        }

        let age = age
            .parse::<u8>()
            .ok()
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(|| ClientError::Validation(messages::INVALID_AGE.to_string()))?;
        let gender = form.gender.parse::<Gender>()?;

        let medical_history = Some(form.medical_history.trim())
            .filter(|history| !history.is_empty())
            .map(str::to_string);

        Ok(Self {
            age,
            gender,
            symptoms: symptoms.to_string(),
            medical_history,
        })
    }

    /// Form-encoded fields for `POST /predict`.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("age", self.age.to_string()),
            ("gender", self.gender.as_str().to_string()),
            ("symptoms", self.symptoms.clone()),
        ];
        if let Some(history) = &self.medical_history {
            fields.push(("medical_history", history.clone()));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub diagnosis: String,
    /// Fraction in `[0, 1]`.
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

impl DiagnosisResult {
    /// Confidence as a percentage with one decimal place, e.g. `"82.3"`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}", self.confidence * 100.0)
    }

    pub fn confidence_display(&self) -> String {
        format!("{}%", self.confidence_percent())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
}

impl Question {
    /// The text is kept as typed. Only its emptiness is judged on the trimmed form.
    pub fn new(text: &str) -> Result<Self, ClientError> {
        if text.trim().is_empty() {
            return Err(ClientError::Validation(messages::EMPTY_QUESTION.to_string()));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaResult {
    pub question: String,
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Result<Self, ClientError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                messages::MISSING_CREDENTIALS.to_string(),
            ));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", self.username.clone()),
            ("password", self.password.clone()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// Wire payloads

#[derive(Debug, Deserialize)]
pub(crate) struct LivenessResponse {
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    pub diagnosis: Option<String>,
    pub confidence: Option<f64>,
    pub recommendations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskResponse {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub sources: Option<Vec<String>>,
}
