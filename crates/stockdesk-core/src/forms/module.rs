// Learning module form.

use stockdesk_api::{LearningModule, ModuleRequest};

use crate::form::{FieldRule, FieldValue, FormSchema, FormState, FormValues, number, opt_text, text};
use crate::validate::{CODE, normalize_code};

pub fn schema() -> FormSchema {
    FormSchema::new()
        .field(
            "module_code",
            "",
            FieldRule::new("Module code")
                .required()
                .pattern(&CODE, "Module code must be 2-10 uppercase letters, digits, or dashes"),
        )
        .field(
            "module_name",
            "",
            FieldRule::new("Module name").required().min_length(3).max_length(100),
        )
        .field("description", "", FieldRule::new("Description").max_length(500))
        .field("division", "", FieldRule::new("Division").max_length(50))
        .field(
            "min_age",
            FieldValue::Number(None),
            FieldRule::new("Minimum age").validate(age_in_range("Minimum age")),
        )
        .field(
            "max_age",
            FieldValue::Number(None),
            FieldRule::new("Maximum age").validate(|value, all| {
                if let Some(message) = age_in_range("Maximum age")(value, all) {
                    return Some(message);
                }
                match (number(all, "min_age"), value.as_number()) {
                    (Some(min), Some(max)) if max < min => {
                        Some("Maximum age must not be below minimum age".into())
                    }
                    _ => None,
                }
            }),
        )
}

fn age_in_range(label: &'static str) -> impl Fn(&FieldValue, &FormValues) -> Option<String> {
    move |value, _| match value.as_number() {
        Some(age) if !(0..=100).contains(&age) => Some(format!("{label} must be between 0 and 100")),
        None if !value.is_blank() => Some(format!("{label} must be a whole number")),
        _ => None,
    }
}

pub fn create() -> FormState {
    FormState::new(schema())
}

pub fn edit(module: &LearningModule) -> FormState {
    let mut values = FormValues::new();
    values.insert("module_code".into(), module.code.clone().into());
    values.insert("module_name".into(), module.name.clone().into());
    values.insert(
        "description".into(),
        module.description.clone().unwrap_or_default().into(),
    );
    values.insert(
        "division".into(),
        module.division.clone().unwrap_or_default().into(),
    );
    values.insert("min_age".into(), module.min_age.map(i64::from).into());
    values.insert("max_age".into(), module.max_age.map(i64::from).into());
    FormState::with_values(schema(), values)
}

pub fn to_request(values: &FormValues) -> ModuleRequest {
    let age = |field: &str| number(values, field).and_then(|n| u32::try_from(n).ok());
    ModuleRequest {
        code: normalize_code(text(values, "module_code")),
        name: text(values, "module_name").trim().to_owned(),
        description: opt_text(values, "description"),
        division: opt_text(values, "division"),
        min_age: age("min_age"),
        max_age: age("max_age"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::forms::validated;

    #[test]
    fn age_range_is_ordered() {
        let mut form = create();
        form.handle_change("module_code", "M1");
        form.handle_change("module_name", "Mental Arithmetic");
        form.handle_change("min_age", 9_i64);
        form.handle_change("max_age", 6_i64);
        assert_eq!(
            form.error("max_age"),
            Some("Maximum age must not be below minimum age")
        );

        form.handle_change("max_age", 12_i64);
        let request = to_request(&validated(form).unwrap());
        assert_eq!((request.min_age, request.max_age), (Some(9), Some(12)));
    }

    #[test]
    fn non_numeric_age_is_rejected() {
        let mut form = create();
        form.handle_change("min_age", "nine");
        assert_eq!(form.error("min_age"), Some("Minimum age must be a whole number"));
    }
}
