// Request body parsing and validation. Mirrors the journal's transport
// conventions: every error is collected into a field -> messages map and the
// whole map is returned to the client with status 400.
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use super::Category;

pub type FieldErrors = HashMap<String, Vec<String>>;

pub const EMOTION_CHOICES: [&str; 7] =
    ["awful", "terrible", "bad", "okay", "good", "great", "excellent"];

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NOT_A_STRING: &str = "Not a valid string.";
const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const INVALID_TIME: &str = "Time has wrong format. Use one of these formats instead: hh:mm[:ss].";
const INVALID_INTEGER: &str = "A valid integer is required.";
const INVALID_BOOLEAN: &str = "Must be a valid boolean.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const TIME_ORDER: &str = "'From' must start before the time set on 'Until'.";

/// A validated entry body. Client-supplied owner or timestamp fields are
/// ignored; the server always assigns those.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPayload {
    Appointment {
        title: String,
        date: NaiveDate,
        time_from: NaiveTime,
        time_until: NaiveTime,
    },
    Emotion {
        emotion: String,
    },
    Freeform {
        content: String,
    },
    Target {
        title: String,
        order: i64,
    },
    Win {
        title: String,
    },
}

impl EntryPayload {
    pub fn parse(category: Category, body: &Value) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        match category {
            Category::Appointments => {
                let title = require_text(body, "title", &mut errors);
                let date = require_date(body, "date", &mut errors);
                let time_from = require_time(body, "time_from", &mut errors);
                let time_until = require_time(body, "time_until", &mut errors);

                // Domain rule, checked across fields once both parse: an
                // appointment must start strictly before it ends.
                if let (Some(from), Some(until)) = (time_from, time_until) {
                    if from >= until {
                        push_error(&mut errors, "non_field_errors", TIME_ORDER);
                    }
                }

                match (title, date, time_from, time_until) {
                    (Some(title), Some(date), Some(time_from), Some(time_until))
                        if errors.is_empty() =>
                    {
                        Ok(EntryPayload::Appointment { title, date, time_from, time_until })
                    }
                    _ => Err(errors),
                }
            }
            Category::Emotions => {
                let emotion = require_choice(body, "emotion", &EMOTION_CHOICES, &mut errors);
                match emotion {
                    Some(emotion) if errors.is_empty() => Ok(EntryPayload::Emotion { emotion }),
                    _ => Err(errors),
                }
            }
            Category::Gratitude
            | Category::Ideas
            | Category::Improvement
            | Category::Knowledge
            | Category::Notes => {
                let content = require_text(body, "content", &mut errors);
                match content {
                    Some(content) if errors.is_empty() => Ok(EntryPayload::Freeform { content }),
                    _ => Err(errors),
                }
            }
            Category::Target => {
                let title = require_text(body, "title", &mut errors);
                let order = require_integer(body, "order", &mut errors);
                match (title, order) {
                    (Some(title), Some(order)) if errors.is_empty() => {
                        Ok(EntryPayload::Target { title, order })
                    }
                    _ => Err(errors),
                }
            }
            Category::Win => {
                let title = require_text(body, "title", &mut errors);
                match title {
                    Some(title) if errors.is_empty() => Ok(EntryPayload::Win { title }),
                    _ => Err(errors),
                }
            }
        }
    }
}

/// A validated user-settings body.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsPayload {
    pub start_week_day: i64,
    pub morning_check_in: NaiveTime,
    pub evening_check_in: NaiveTime,
}

pub fn parse_settings(body: &Value) -> Result<SettingsPayload, FieldErrors> {
    let mut errors = FieldErrors::new();

    let start_week_day = match require_integer(body, "start_week_day", &mut errors) {
        Some(day) if (1..=7).contains(&day) => Some(day),
        Some(day) => {
            push_error(
                &mut errors,
                "start_week_day",
                format!("\"{}\" is not a valid choice.", day),
            );
            None
        }
        None => None,
    };
    let morning_check_in = require_time(body, "morning_check_in", &mut errors);
    let evening_check_in = require_time(body, "evening_check_in", &mut errors);

    match (start_week_day, morning_check_in, evening_check_in) {
        (Some(start_week_day), Some(morning_check_in), Some(evening_check_in))
            if errors.is_empty() =>
        {
            Ok(SettingsPayload { start_week_day, morning_check_in, evening_check_in })
        }
        _ => Err(errors),
    }
}

/// A validated signup body.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn parse_signup(body: &Value) -> Result<SignupPayload, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = require_email(body, "email", &mut errors);
    let password = require_text(body, "password", &mut errors);
    let first_name = require_text(body, "first_name", &mut errors);
    let last_name = require_text(body, "last_name", &mut errors);

    match (email, password, first_name, last_name) {
        (Some(email), Some(password), Some(first_name), Some(last_name))
            if errors.is_empty() =>
        {
            Ok(SignupPayload { email, password, first_name, last_name })
        }
        _ => Err(errors),
    }
}

/// A validated full-replacement user body. Flags absent from the body keep
/// their stored values; slug and password are never updated through this
/// path.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdatePayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

pub fn parse_user_update(body: &Value) -> Result<UserUpdatePayload, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = require_email(body, "email", &mut errors);
    let first_name = require_text(body, "first_name", &mut errors);
    let last_name = require_text(body, "last_name", &mut errors);
    let is_active = optional_bool(body, "is_active", &mut errors);
    let is_staff = optional_bool(body, "is_staff", &mut errors);
    let is_superuser = optional_bool(body, "is_superuser", &mut errors);

    match (email, first_name, last_name) {
        (Some(email), Some(first_name), Some(last_name)) if errors.is_empty() => {
            Ok(UserUpdatePayload {
                email,
                first_name,
                last_name,
                is_active,
                is_staff,
                is_superuser,
            })
        }
        _ => Err(errors),
    }
}

/// A validated login body.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

pub fn parse_login(body: &Value) -> Result<LoginPayload, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = require_text(body, "email", &mut errors);
    let password = require_text(body, "password", &mut errors);

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => {
            Ok(LoginPayload { email, password })
        }
        _ => Err(errors),
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_default().push(message.into());
}

fn require_text(body: &Value, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, REQUIRED);
            None
        }
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                push_error(errors, field, BLANK);
                None
            } else {
                Some(s.clone())
            }
        }
        Some(_) => {
            push_error(errors, field, NOT_A_STRING);
            None
        }
    }
}

fn require_email(body: &Value, field: &str, errors: &mut FieldErrors) -> Option<String> {
    let email = require_text(body, field, errors)?;
    if is_valid_email(&email) {
        Some(email)
    } else {
        push_error(errors, field, INVALID_EMAIL);
        None
    }
}

fn is_valid_email(address: &str) -> bool {
    if address.contains(char::is_whitespace) {
        return false;
    }
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn require_date(body: &Value, field: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    match body.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, REQUIRED);
            None
        }
        Some(Value::String(s)) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                push_error(errors, field, INVALID_DATE);
                None
            }
        },
        Some(_) => {
            push_error(errors, field, INVALID_DATE);
            None
        }
    }
}

fn require_time(body: &Value, field: &str, errors: &mut FieldErrors) -> Option<NaiveTime> {
    match body.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, REQUIRED);
            None
        }
        Some(Value::String(s)) => match parse_time(s) {
            Some(time) => Some(time),
            None => {
                push_error(errors, field, INVALID_TIME);
                None
            }
        },
        Some(_) => {
            push_error(errors, field, INVALID_TIME);
            None
        }
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn require_integer(body: &Value, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    match body.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, REQUIRED);
            None
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(i),
            None => {
                push_error(errors, field, INVALID_INTEGER);
                None
            }
        },
        // String digits coerce, matching the transport's lenient integer field
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => {
                push_error(errors, field, INVALID_INTEGER);
                None
            }
        },
        Some(_) => {
            push_error(errors, field, INVALID_INTEGER);
            None
        }
    }
}

fn require_choice(
    body: &Value,
    field: &str,
    choices: &[&str],
    errors: &mut FieldErrors,
) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, REQUIRED);
            None
        }
        Some(Value::String(s)) if choices.contains(&s.as_str()) => Some(s.clone()),
        Some(other) => {
            let shown = match other {
                Value::String(s) => s.clone(),
                v => v.to_string(),
            };
            push_error(errors, field, format!("\"{}\" is not a valid choice.", shown));
            None
        }
    }
}

fn optional_bool(body: &Value, field: &str, errors: &mut FieldErrors) -> Option<bool> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            push_error(errors, field, INVALID_BOOLEAN);
            None
        }
    }
}
