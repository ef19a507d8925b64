// Branch create/edit form.
//
// A head branch is its own regional hub, so `regional_hub` is forced to the
// branch code whenever `is_head_branch` is set. A regular branch must name
// the hub it belongs to.

use stockdesk_api::{Branch, BranchRequest};

use crate::error::CoreError;
use crate::form::{FieldRule, FieldValue, FormSchema, FormState, FormValues, flag, opt_text, text};
use crate::validate::{CODE, PHONE, normalize_code};

pub const REGIONAL_HUB_REQUIRED: &str = "Regional hub is required for regular branches";

pub fn schema() -> FormSchema {
    FormSchema::new()
        .field(
            "branch_code",
            "",
            FieldRule::new("Branch code")
                .required()
                .pattern(&CODE, "Branch code must be 2-10 uppercase letters, digits, or dashes"),
        )
        .field(
            "branch_name",
            "",
            FieldRule::new("Branch name").required().min_length(3).max_length(100),
        )
        .field("is_head_branch", false, FieldRule::new("Head branch"))
        .field(
            "regional_hub",
            "",
            FieldRule::new("Regional hub").validate(|value, all| {
                (!flag(all, "is_head_branch") && value.is_blank())
                    .then(|| REGIONAL_HUB_REQUIRED.to_owned())
            }),
        )
        .field("address", "", FieldRule::new("Address").max_length(255))
        .field(
            "phone",
            "",
            FieldRule::new("Phone").pattern(&PHONE, "Phone number is invalid"),
        )
        .derive(|values| {
            if flag(values, "is_head_branch") {
                let code = text(values, "branch_code").to_owned();
                values.insert("regional_hub".into(), FieldValue::Text(code));
            }
        })
}

pub fn create() -> FormState {
    FormState::new(schema())
}

pub fn edit(branch: &Branch) -> FormState {
    let mut values = FormValues::new();
    values.insert("branch_code".into(), branch.code.clone().into());
    values.insert("branch_name".into(), branch.name.clone().into());
    values.insert("is_head_branch".into(), branch.is_head_branch.into());
    values.insert(
        "regional_hub".into(),
        branch.regional_hub.clone().unwrap_or_default().into(),
    );
    values.insert("address".into(), branch.address.clone().unwrap_or_default().into());
    values.insert("phone".into(), branch.phone.clone().unwrap_or_default().into());
    FormState::with_values(schema(), values)
}

pub fn to_request(values: &FormValues) -> Result<BranchRequest, CoreError> {
    let code = normalize_code(text(values, "branch_code"));
    let is_head_branch = flag(values, "is_head_branch");
    let regional_hub = if is_head_branch {
        code.clone()
    } else {
        opt_text(values, "regional_hub")
            .map(|hub| normalize_code(&hub))
            .ok_or_else(|| CoreError::ValidationFailed {
                message: REGIONAL_HUB_REQUIRED.into(),
            })?
    };
    Ok(BranchRequest {
        code,
        name: text(values, "branch_name").trim().to_owned(),
        is_head_branch,
        regional_hub,
        address: opt_text(values, "address"),
        phone: opt_text(values, "phone"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::forms::validated;

    #[test]
    fn head_branch_forces_regional_hub() {
        let mut form = create();
        form.handle_change("branch_code", "SND");
        form.handle_change("regional_hub", "BKS");
        form.handle_change("is_head_branch", true);
        assert_eq!(form.value("regional_hub"), Some(&FieldValue::from("SND")));

        // Still tracks the code while the flag is on.
        form.handle_change("branch_code", "SNDX");
        assert_eq!(form.value("regional_hub"), Some(&FieldValue::from("SNDX")));
    }

    #[test]
    fn regular_branch_requires_regional_hub() {
        let mut form = create();
        form.handle_change("branch_code", "BKS");
        form.handle_change("branch_name", "Bekasi");
        form.handle_change("is_head_branch", false);

        assert!(!form.validate_all());
        assert_eq!(form.error("regional_hub"), Some(REGIONAL_HUB_REQUIRED));
    }

    #[test]
    fn switching_to_head_clears_hub_error() {
        let mut form = create();
        form.handle_change("branch_code", "BKS");
        form.handle_blur("regional_hub");
        assert_eq!(form.error("regional_hub"), Some(REGIONAL_HUB_REQUIRED));

        form.handle_change("is_head_branch", true);
        assert_eq!(form.error("regional_hub"), None);
    }

    #[test]
    fn request_from_valid_head_branch() {
        let mut form = create();
        form.handle_change("branch_code", "SND");
        form.handle_change("branch_name", "Sunda");
        form.handle_change("is_head_branch", true);

        let request = to_request(&validated(form).unwrap()).unwrap();
        assert_eq!(request.regional_hub, "SND");
        assert_eq!(request.address, None);
    }

    #[test]
    fn validated_joins_errors() {
        let err = validated(create()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("branch_code: Branch code is required"));
        assert!(message.contains(REGIONAL_HUB_REQUIRED));
    }
}
