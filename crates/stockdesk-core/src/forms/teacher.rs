// Teacher account form. Passwords are generated by the backend, so the
// form only carries profile fields.

use stockdesk_api::{Teacher, TeacherRequest};

use crate::form::{FieldRule, FormSchema, FormState, FormValues, opt_text, text};
use crate::validate::{CODE, EMAIL, PHONE, USERNAME, normalize_code};

pub fn schema() -> FormSchema {
    FormSchema::new()
        .field(
            "username",
            "",
            FieldRule::new("Username").required().pattern(
                &USERNAME,
                "Username must be 3-30 lowercase letters, digits, dots, or underscores",
            ),
        )
        .field(
            "full_name",
            "",
            FieldRule::new("Full name").required().min_length(3).max_length(100),
        )
        .field(
            "email",
            "",
            FieldRule::new("Email").pattern(&EMAIL, "Email address is invalid"),
        )
        .field(
            "phone",
            "",
            FieldRule::new("Phone").pattern(&PHONE, "Phone number is invalid"),
        )
        .field(
            "branch_code",
            "",
            FieldRule::new("Branch")
                .required_with("Select the teacher's branch")
                .pattern(&CODE, "Branch code is invalid"),
        )
        .field("division", "", FieldRule::new("Division").max_length(50))
}

pub fn create() -> FormState {
    FormState::new(schema())
}

pub fn edit(teacher: &Teacher) -> FormState {
    let mut values = FormValues::new();
    values.insert("username".into(), teacher.username.clone().into());
    values.insert("full_name".into(), teacher.full_name.clone().into());
    values.insert("email".into(), teacher.email.clone().unwrap_or_default().into());
    values.insert("phone".into(), teacher.phone.clone().unwrap_or_default().into());
    values.insert("branch_code".into(), teacher.branch_code.clone().into());
    values.insert(
        "division".into(),
        teacher.division.clone().unwrap_or_default().into(),
    );
    FormState::with_values(schema(), values)
}

pub fn to_request(values: &FormValues) -> TeacherRequest {
    TeacherRequest {
        username: text(values, "username").trim().to_owned(),
        full_name: text(values, "full_name").trim().to_owned(),
        email: opt_text(values, "email"),
        phone: opt_text(values, "phone"),
        branch_code: normalize_code(text(values, "branch_code")),
        division: opt_text(values, "division"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::forms::validated;

    #[test]
    fn branch_has_custom_required_message() {
        let mut form = create();
        form.handle_blur("branch_code");
        assert_eq!(form.error("branch_code"), Some("Select the teacher's branch"));
    }

    #[test]
    fn optional_contacts_are_checked_when_present() {
        let mut form = create();
        form.handle_change("username", "rina.putri");
        form.handle_change("full_name", "Rina Putri");
        form.handle_change("branch_code", "SND");
        form.handle_change("email", "rina@");
        assert!(validated(form.clone()).is_err());

        form.handle_change("email", "rina@example.com");
        let request = to_request(&validated(form).unwrap());
        assert_eq!(request.email.as_deref(), Some("rina@example.com"));
        assert_eq!(request.phone, None);
    }
}
