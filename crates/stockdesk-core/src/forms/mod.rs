// ── Per-entity form schemas ──
//
// Each module builds the `FormSchema` for one create/edit flow and turns
// validated values into the matching request body.

pub mod branch;
pub mod login;
pub mod module;
pub mod print;
pub mod stock;
pub mod teacher;

use crate::error::CoreError;
use crate::form::{FormState, FormValues};

/// Validate a form that was filled in one go (e.g. from CLI flags) and
/// return its values, or every field error joined into one message.
pub fn validated(mut form: FormState) -> Result<FormValues, CoreError> {
    if form.validate_all() {
        return Ok(form.values().clone());
    }
    Err(rejected(&form))
}

/// Every current field error of `form`, joined into one error.
pub fn rejected(form: &FormState) -> CoreError {
    let message = form
        .errors()
        .iter()
        .map(|(field, error)| format!("{field}: {error}"))
        .collect::<Vec<_>>()
        .join("; ");
    CoreError::ValidationFailed { message }
}

/// Non-negative quantity check shared by the stock forms.
pub(crate) fn non_negative(label: &'static str) -> impl Fn(&crate::form::FieldValue, &FormValues) -> Option<String> {
    move |value, _| match value.as_number() {
        Some(n) if n < 0 => Some(format!("{label} cannot be negative")),
        None if !value.is_blank() => Some(format!("{label} must be a whole number")),
        _ => None,
    }
}

pub(crate) fn quantity(values: &FormValues, field: &str) -> u64 {
    crate::form::number(values, field)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}
