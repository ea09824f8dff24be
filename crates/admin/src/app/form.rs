//! Form handling: bind submitted key/value pairs onto a view model, validate
//! it, and produce a serializable view for re-rendering.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::app::csrf::{CsrfTokens, INVALID_TOKEN_MESSAGE, TOKEN_FIELD};

/// Flat urlencoded submission.
pub type FormData = HashMap<String, String>;

pub const INVALID_VALUE_MESSAGE: &str = "This value is not valid.";

/// Field name -> messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn merge_validation(&mut self, errors: &ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| INVALID_VALUE_MESSAGE.to_string());
                self.add(field.to_string(), message);
            }
        }
    }
}

/// A view model a form can bind submissions onto.
pub trait FormType: Validate + Serialize {
    /// Form name; doubles as the CSRF intention.
    const NAME: &'static str;

    /// Writes submitted values onto `self`; conversion failures go to `errors`.
    fn bind(&mut self, data: &FormData, errors: &mut FormErrors);
}

pub struct Form<D> {
    data: D,
    action: Option<String>,
    csrf: Option<CsrfTokens>,
    submitted: bool,
    validated: bool,
    errors: FormErrors,
}

impl<D: FormType> Form<D> {
    pub fn new(data: D) -> Self {
        Self {
            data,
            action: None,
            csrf: None,
            submitted: false,
            validated: false,
            errors: FormErrors::default(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Requires a valid `_token` for the form's intention on submit.
    pub fn with_csrf(mut self, tokens: &CsrfTokens) -> Self {
        self.csrf = Some(tokens.clone());
        self
    }

    /// `None` means the request carried no submission (a plain GET).
    pub fn handle_request(&mut self, submission: Option<&FormData>) -> &mut Self {
        let Some(data) = submission else {
            return self;
        };
        self.submitted = true;
        self.validated = false;
        self.errors = FormErrors::default();
        self.data.bind(data, &mut self.errors);

        if let Some(tokens) = &self.csrf {
            let candidate = data.get(TOKEN_FIELD).map(String::as_str).unwrap_or_default();
            if !tokens.is_valid(D::NAME, candidate) {
                tracing::debug!(form = D::NAME, "csrf token rejected");
                self.errors.add(TOKEN_FIELD, INVALID_TOKEN_MESSAGE);
            }
        }
        self
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_valid(&mut self) -> bool {
        if !self.submitted {
            return false;
        }
        if !self.validated {
            if let Err(errors) = self.data.validate() {
                self.errors.merge_validation(&errors);
            }
            self.validated = true;
        }
        self.errors.is_empty()
    }

    /// Error found after validation, e.g. by the service acting on the data.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn view(&self) -> FormView {
        FormView {
            name: D::NAME,
            values: serde_json::to_value(&self.data).unwrap_or(serde_json::Value::Null),
            errors: self.errors.clone(),
            action: self.action.clone(),
            token: self.csrf.as_ref().map(|t| t.token(D::NAME)),
        }
    }
}

/// What templates see of a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub name: &'static str,
    pub values: serde_json::Value,
    pub errors: FormErrors,
    pub action: Option<String>,
    pub token: Option<String>,
}

/// Submitted text value with surrounding whitespace removed, if the key was sent.
pub fn text(data: &FormData, field: &str) -> Option<String> {
    data.get(field).map(|v| v.trim().to_string())
}

/// Parses a submitted value; blank keeps the current value, garbage is a field error.
pub fn parse_field<T: std::str::FromStr>(
    data: &FormData,
    field: &str,
    current: &mut T,
    errors: &mut FormErrors,
) {
    let Some(raw) = data.get(field) else {
        return;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return;
    }
    match raw.parse() {
        Ok(value) => *current = value,
        Err(_) => errors.add(field, INVALID_VALUE_MESSAGE),
    }
}

/// Checkbox semantics: absent means unchecked.
pub fn checkbox(data: &FormData, field: &str) -> bool {
    data.get(field).is_some_and(|v| {
        matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
    })
}
