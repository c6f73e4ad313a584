//! Create-program payload validation.
//!
//! [`validate_create_payload`] checks a JSON body field by field and collects
//! every problem as a [`ValidationIssue`] instead of stopping at the first.
//! Issues carry a machine code, the path to the offending value, and a
//! human-readable message.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use bounty_storage::{AssetType, Eligibility, NewProgram, ProgramId};

const NAME_MAX: usize = 255;
const IDENTIFIER_MAX: usize = 255;
const WEBSITE_MAX: usize = 500;
const TWITTER_MAX: usize = 100;

/// One segment of the path to an invalid value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

/// Machine-readable category of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidString,
    InvalidDate,
    InvalidEnumValue,
}

/// A single structured validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    fn new(code: IssueCode, path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        ValidationIssue {
            code,
            path,
            message: message.into(),
        }
    }

    fn at(code: IssueCode, field: &str, message: impl Into<String>) -> Self {
        Self::new(code, vec![field.into()], message)
    }
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProgram {
    pub program: NewProgram,
    pub related_programs: Vec<ProgramId>,
}

/// JSON type name used in `invalid_type` messages.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Collects issues while fields are read from the payload object.
struct Checker<'a> {
    body: &'a Map<String, Value>,
    issues: Vec<ValidationIssue>,
}

impl<'a> Checker<'a> {
    /// A present, non-null value for `field`.
    fn value(&self, field: &str) -> Option<&'a Value> {
        let body: &'a Map<String, Value> = self.body;
        body.get(field).filter(|v| !v.is_null())
    }

    fn string(&mut self, field: &str, required: bool) -> Option<&'a str> {
        match self.value(field) {
            None => {
                if required {
                    self.issues
                        .push(ValidationIssue::at(IssueCode::InvalidType, field, "Required"));
                }
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.issues.push(ValidationIssue::at(
                    IssueCode::InvalidType,
                    field,
                    format!("Expected string, received {}", kind_of(other)),
                ));
                None
            }
        }
    }

    fn required_text(&mut self, field: &str, label: &str, max: usize) -> Option<String> {
        let s = self.string(field, true)?;
        if s.trim().is_empty() {
            self.issues.push(ValidationIssue::at(
                IssueCode::TooSmall,
                field,
                format!("{label} is required"),
            ));
            return None;
        }
        self.bounded(field, label, s, max)
    }

    /// Absent, null and empty strings all mean "not set".
    fn optional_text(&mut self, field: &str, label: &str, max: Option<usize>) -> Option<String> {
        let s = self.string(field, false).filter(|s| !s.is_empty())?;
        match max {
            Some(max) => self.bounded(field, label, s, max),
            None => Some(s.to_string()),
        }
    }

    fn bounded(&mut self, field: &str, label: &str, s: &str, max: usize) -> Option<String> {
        if s.chars().count() > max {
            self.issues.push(ValidationIssue::at(
                IssueCode::TooBig,
                field,
                format!("{label} must be at most {max} characters"),
            ));
            return None;
        }
        Some(s.to_string())
    }

    fn start_date(&mut self) -> Option<DateTime<Utc>> {
        let field = "startDate";
        let raw = self.string(field, true)?;
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.issues
                .push(ValidationIssue::at(IssueCode::InvalidDate, field, "Invalid date"));
        }
        parsed
    }

    fn website(&mut self) -> Option<String> {
        let field = "website";
        let site = self.optional_text(field, "Website", Some(WEBSITE_MAX))?;
        match url::Url::parse(&site) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(site),
            _ => {
                self.issues
                    .push(ValidationIssue::at(IssueCode::InvalidString, field, "Invalid url"));
                None
            }
        }
    }

    fn choice<T: Copy>(
        &mut self,
        field: &str,
        options: &[T],
        name: impl Fn(T) -> &'static str,
    ) -> Option<T> {
        let raw = self.string(field, false)?;
        if let Some(found) = options.iter().copied().find(|o| name(*o) == raw) {
            return Some(found);
        }
        let expected = options
            .iter()
            .map(|o| format!("'{}'", name(*o)))
            .collect::<Vec<_>>()
            .join(" | ");
        self.issues.push(ValidationIssue::at(
            IssueCode::InvalidEnumValue,
            field,
            format!("Invalid enum value. Expected {expected}, received '{raw}'"),
        ));
        None
    }

    fn related_programs(&mut self) -> Vec<ProgramId> {
        let field = "relatedPrograms";
        let items = match self.value(field) {
            None => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.issues.push(ValidationIssue::at(
                    IssueCode::InvalidType,
                    field,
                    format!("Expected array, received {}", kind_of(other)),
                ));
                return Vec::new();
            }
        };

        let mut ids = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = vec![field.into(), PathSegment::Index(index)];
            match item {
                Value::String(s) => match s.parse::<ProgramId>() {
                    Ok(id) => ids.push(id),
                    Err(_) => self.issues.push(ValidationIssue::new(
                        IssueCode::InvalidString,
                        path,
                        "Invalid uuid",
                    )),
                },
                other => self.issues.push(ValidationIssue::new(
                    IssueCode::InvalidType,
                    path,
                    format!("Expected string, received {}", kind_of(other)),
                )),
            }
        }
        ids
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Validates a create-program body.
pub fn validate_create_payload(payload: &Value) -> Result<CreateProgram, Vec<ValidationIssue>> {
    let Value::Object(body) = payload else {
        return Err(vec![ValidationIssue::new(
            IssueCode::InvalidType,
            Vec::new(),
            format!("Expected object, received {}", kind_of(payload)),
        )]);
    };

    let mut checker = Checker {
        body,
        issues: Vec::new(),
    };

    let name = checker.required_text("name", "Name", NAME_MAX);
    let start_date = checker.start_date();
    let website = checker.website();
    let twitter = checker.optional_text("twitter", "Twitter handle", Some(TWITTER_MAX));
    let asset_type = checker.choice("type", &AssetType::ALL, AssetType::as_str);
    let identifier = checker.required_text("identifier", "Identifier", IDENTIFIER_MAX);
    let description = checker.optional_text("description", "Description", None);
    let related_programs = checker.related_programs();

    match (name, start_date, identifier) {
        (Some(name), Some(start_date), Some(identifier)) if checker.issues.is_empty() => {
            Ok(CreateProgram {
                program: NewProgram {
                    name,
                    start_date,
                    website,
                    twitter,
                    asset_type,
                    identifier,
                    description,
                    // Not client-settable; any `eligibility` key is ignored.
                    eligibility: Eligibility::default(),
                },
                related_programs,
            })
        }
        _ => Err(checker.issues),
    }
}
