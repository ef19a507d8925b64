// Login form.

use crate::form::{FieldRule, FormSchema, FormState};

pub fn schema() -> FormSchema {
    FormSchema::new()
        .field("username", "", FieldRule::new("Username").required())
        .field(
            "password",
            "",
            FieldRule::new("Password").required_with("Enter your password"),
        )
}

pub fn create() -> FormState {
    FormState::new(schema())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_fields_required() {
        let mut form = create();
        assert!(!form.validate_all());
        assert_eq!(form.error("password"), Some("Enter your password"));
        form.handle_change("username", "admin");
        form.handle_change("password", "secret");
        assert!(form.is_valid());
    }
}
