// Certificate print form (teacher-facing).

use stockdesk_api::PrintRequest;

use crate::form::{FieldRule, FormSchema, FormState, FormValues, text};
use crate::validate::{CODE, normalize_code, parse_date};

pub fn schema() -> FormSchema {
    FormSchema::new()
        .field(
            "module_code",
            "",
            FieldRule::new("Module")
                .required_with("Select a module")
                .pattern(&CODE, "Module code is invalid"),
        )
        .field(
            "student_name",
            "",
            FieldRule::new("Student name").required().min_length(3).max_length(100),
        )
        .field(
            "print_date",
            "",
            FieldRule::new("Print date").validate(|value, _| {
                (!value.is_blank() && parse_date(value.as_text()).is_none())
                    .then(|| "Print date must be YYYY-MM-DD".to_owned())
            }),
        )
}

pub fn create() -> FormState {
    FormState::new(schema())
}

pub fn to_request(values: &FormValues) -> PrintRequest {
    PrintRequest {
        module_code: normalize_code(text(values, "module_code")),
        student_name: text(values, "student_name").trim().to_owned(),
        print_date: parse_date(text(values, "print_date")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::forms::validated;

    #[test]
    fn print_date_is_optional_but_checked() {
        let mut form = create();
        form.handle_change("module_code", "M1");
        form.handle_change("student_name", "Budi Santoso");
        form.handle_change("print_date", "01/03/2024");
        assert_eq!(form.error("print_date"), Some("Print date must be YYYY-MM-DD"));

        form.handle_change("print_date", "");
        let request = to_request(&validated(form).unwrap());
        assert_eq!(request.print_date, None);
    }
}
