// ── Form state ──
//
// Field values, per-field errors, touched flags, and the submitting flag
// for one create/edit flow. Validation rules live in a `FormSchema`; the
// per-entity schemas are in `crate::forms`.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

// ── Values ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Number(Option<i64>),
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FieldValue {
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Bool(_) | Self::Number(_) => "",
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Empty text or a missing number. Booleans are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => n.is_none(),
            Self::Bool(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(Some(n))
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(n: Option<i64>) -> Self {
        Self::Number(n)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(Some(n)) => write!(f, "{n}"),
            Self::Number(None) => Ok(()),
        }
    }
}

pub type FormValues = IndexMap<String, FieldValue>;

/// Look up a text value, `""` when missing.
pub fn text<'a>(values: &'a FormValues, field: &str) -> &'a str {
    values.get(field).map_or("", FieldValue::as_text)
}

/// Trimmed text, `None` when blank.
pub fn opt_text(values: &FormValues, field: &str) -> Option<String> {
    let value = text(values, field).trim();
    (!value.is_empty()).then(|| value.to_owned())
}

pub fn flag(values: &FormValues, field: &str) -> bool {
    values.get(field).is_some_and(FieldValue::as_bool)
}

pub fn number(values: &FormValues, field: &str) -> Option<i64> {
    values.get(field).and_then(FieldValue::as_number)
}

// ── Rules ────────────────────────────────────────────────────────────

pub type Validator = Arc<dyn Fn(&FieldValue, &FormValues) -> Option<String> + Send + Sync>;
pub type Derive = Arc<dyn Fn(&mut FormValues) + Send + Sync>;

/// Validation rule for one field. Checks run in order: required, length,
/// pattern, then the custom validator. A blank optional field skips the
/// length and pattern checks but still reaches the custom validator, so
/// cross-field rules ("required unless ...") can live there.
#[derive(Clone, Default)]
pub struct FieldRule {
    pub label: String,
    pub required: bool,
    pub required_message: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub pattern_message: Option<String>,
    pub validate: Option<Validator>,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("label", &self.label)
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("validate", &self.validate.is_some())
            .finish_non_exhaustive()
    }
}

impl FieldRule {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = Some(message.into());
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: &Regex, message: impl Into<String>) -> Self {
        self.pattern = Some(pattern.clone());
        self.pattern_message = Some(message.into());
        self
    }

    pub fn validate(
        mut self,
        validator: impl Fn(&FieldValue, &FormValues) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Arc::new(validator));
        self
    }

    /// First failing check's message, or `None` when the value passes.
    pub fn check(&self, value: &FieldValue, all: &FormValues) -> Option<String> {
        if value.is_blank() {
            if self.required {
                return Some(
                    self.required_message
                        .clone()
                        .unwrap_or_else(|| format!("{} is required", self.label)),
                );
            }
        } else if let FieldValue::Text(s) = value {
            let len = s.trim().chars().count();
            if let Some(min) = self.min_length.filter(|min| len < *min) {
                return Some(format!(
                    "{} must be at least {min} characters",
                    self.label
                ));
            }
            if let Some(max) = self.max_length.filter(|max| len > *max) {
                return Some(format!("{} must be at most {max} characters", self.label));
            }
            if let Some(pattern) = &self.pattern {
                if !pattern.is_match(s.trim()) {
                    return Some(
                        self.pattern_message
                            .clone()
                            .unwrap_or_else(|| format!("{} is invalid", self.label)),
                    );
                }
            }
        }
        self.validate.as_ref().and_then(|v| v(value, all))
    }
}

// ── Schema ───────────────────────────────────────────────────────────

/// Fields, initial values, and an optional derive step that runs after
/// every value change and before submit.
#[derive(Clone, Default)]
pub struct FormSchema {
    rules: IndexMap<String, FieldRule>,
    initial: FormValues,
    derive: Option<Derive>,
}

impl fmt::Debug for FormSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSchema")
            .field("rules", &self.rules)
            .field("initial", &self.initial)
            .field("derive", &self.derive.is_some())
            .finish()
    }
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        initial: impl Into<FieldValue>,
        rule: FieldRule,
    ) -> Self {
        let name = name.into();
        self.initial.insert(name.clone(), initial.into());
        self.rules.insert(name, rule);
        self
    }

    pub fn derive(mut self, derive: impl Fn(&mut FormValues) + Send + Sync + 'static) -> Self {
        self.derive = Some(Arc::new(derive));
        self
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn initial_values(&self) -> &FormValues {
        &self.initial
    }

    fn apply_derive(&self, values: &mut FormValues) {
        if let Some(derive) = &self.derive {
            derive(values);
        }
    }
}

// ── State ────────────────────────────────────────────────────────────

/// Outcome of `FormState::handle_submit`.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission<R> {
    /// Validation failed; `on_submit` was not called.
    Invalid,
    Submitted(R),
}

/// Holds `is_submitting` high until dropped.
struct SubmittingGuard<'a>(&'a mut bool);

impl<'a> SubmittingGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    schema: FormSchema,
    values: FormValues,
    errors: IndexMap<String, String>,
    touched: HashSet<String>,
    is_submitting: bool,
}

impl FormState {
    pub fn new(schema: FormSchema) -> Self {
        let mut values = schema.initial.clone();
        schema.apply_derive(&mut values);
        Self {
            schema,
            values,
            errors: IndexMap::new(),
            touched: HashSet::new(),
            is_submitting: false,
        }
    }

    /// Start an edit flow from existing values. Unknown fields are kept so
    /// a round-trip does not lose data.
    pub fn with_values(schema: FormSchema, values: FormValues) -> Self {
        let mut state = Self::new(schema);
        state.values.extend(values);
        state.schema.apply_derive(&mut state.values);
        state
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// The error worth showing: only once the field has been touched.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.touched.contains(field) {
            self.error(field)
        } else {
            None
        }
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Set a value and re-run the derive step. With `should_validate`, the
    /// field is validated along with any field that already shows an error
    /// (derived changes can clear those).
    pub fn set_field_value(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
        should_validate: bool,
    ) {
        self.values.insert(field.to_owned(), value.into());
        self.schema.apply_derive(&mut self.values);
        if should_validate {
            self.validate_field(field);
            let flagged: Vec<String> = self
                .errors
                .keys()
                .filter(|k| k.as_str() != field)
                .cloned()
                .collect();
            for other in flagged {
                self.validate_field(&other);
            }
        }
    }

    /// An input change: the field counts as touched and is validated.
    pub fn handle_change(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.touched.insert(field.to_owned());
        self.set_field_value(field, value, true);
    }

    pub fn handle_blur(&mut self, field: &str) {
        self.touched.insert(field.to_owned());
        self.validate_field(field);
    }

    /// Validate one field, recording or clearing its error.
    pub fn validate_field(&mut self, field: &str) -> Option<String> {
        let rule = self.schema.rules.get(field)?;
        let empty = FieldValue::default();
        let value = self.values.get(field).unwrap_or(&empty);
        match rule.check(value, &self.values) {
            Some(message) => {
                self.errors.insert(field.to_owned(), message.clone());
                Some(message)
            }
            None => {
                self.errors.shift_remove(field);
                None
            }
        }
    }

    /// Derive, validate every field, and mark all touched. Returns whether
    /// the form is valid.
    pub fn validate_all(&mut self) -> bool {
        self.schema.apply_derive(&mut self.values);
        let fields: Vec<String> = self.schema.rules.keys().cloned().collect();
        for field in fields {
            self.touched.insert(field.clone());
            self.validate_field(&field);
        }
        self.errors.is_empty()
    }

    /// Validate and, only when there are no errors, call `on_submit` with
    /// the values. `is_submitting` is set for the duration of the call and
    /// reset whatever the outcome, including when the future is dropped
    /// mid-flight. A failing submit keeps the values.
    pub async fn handle_submit<F, Fut, R, E>(&mut self, on_submit: F) -> Result<Submission<R>, E>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        if !self.validate_all() {
            debug!(errors = self.errors.len(), "form submit blocked by validation");
            return Ok(Submission::Invalid);
        }
        let values = self.values.clone();
        let _submitting = SubmittingGuard::engage(&mut self.is_submitting);
        on_submit(values).await.map(Submission::Submitted)
    }

    /// Back to the schema's initial values with no errors or touched fields.
    pub fn reset(&mut self) {
        self.values = self.schema.initial.clone();
        self.schema.apply_derive(&mut self.values);
        self.errors.clear();
        self.touched.clear();
        self.is_submitting = false;
    }
}
