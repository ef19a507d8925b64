// Stock batch and stock migration forms.
//
// Quantities are whole, non-negative numbers and at least one of the two
// must be positive. Whether the source branch holds enough stock is the
// backend's call.

use stockdesk_api::{MigrationRequest, StockBatchRequest};

use super::{non_negative, quantity};
use crate::form::{FieldRule, FieldValue, FormSchema, FormState, FormValues, number, opt_text, text};
use crate::validate::{CODE, normalize_code};

pub const EMPTY_QUANTITY: &str = "Enter a certificate or medal quantity";
pub const SAME_BRANCH: &str = "Source and destination branches must differ";

fn quantity_fields(schema: FormSchema) -> FormSchema {
    schema
        .field(
            "certificate_quantity",
            FieldValue::Number(None),
            FieldRule::new("Certificate quantity").validate(non_negative("Certificate quantity")),
        )
        .field(
            "medal_quantity",
            FieldValue::Number(None),
            FieldRule::new("Medal quantity").validate(|value, all| {
                non_negative("Medal quantity")(value, all).or_else(|| {
                    let certificates = number(all, "certificate_quantity").unwrap_or(0);
                    let medals = value.as_number().unwrap_or(0);
                    (certificates <= 0 && medals <= 0).then(|| EMPTY_QUANTITY.to_owned())
                })
            }),
        )
        .field("notes", "", FieldRule::new("Notes").max_length(500))
}

// ── Stock batch ──────────────────────────────────────────────────────

pub fn batch_schema() -> FormSchema {
    quantity_fields(FormSchema::new().field(
        "branch_code",
        "",
        FieldRule::new("Branch")
            .required_with("Select a branch")
            .pattern(&CODE, "Branch code is invalid"),
    ))
}

pub fn batch_form() -> FormState {
    FormState::new(batch_schema())
}

pub fn batch_request(values: &FormValues) -> StockBatchRequest {
    StockBatchRequest {
        branch_code: normalize_code(text(values, "branch_code")),
        certificate_quantity: quantity(values, "certificate_quantity"),
        medal_quantity: quantity(values, "medal_quantity"),
        notes: opt_text(values, "notes"),
    }
}

// ── Stock migration ──────────────────────────────────────────────────

pub fn migration_schema() -> FormSchema {
    quantity_fields(
        FormSchema::new()
            .field(
                "from_branch",
                "",
                FieldRule::new("Source branch")
                    .required_with("Select the source branch")
                    .pattern(&CODE, "Branch code is invalid"),
            )
            .field(
                "to_branch",
                "",
                FieldRule::new("Destination branch")
                    .required_with("Select the destination branch")
                    .pattern(&CODE, "Branch code is invalid")
                    .validate(|value, all| {
                        let from = normalize_code(text(all, "from_branch"));
                        (!from.is_empty() && normalize_code(value.as_text()) == from)
                            .then(|| SAME_BRANCH.to_owned())
                    }),
            ),
    )
}

pub fn migration_form() -> FormState {
    FormState::new(migration_schema())
}

pub fn migration_request(values: &FormValues) -> MigrationRequest {
    MigrationRequest {
        from_branch: normalize_code(text(values, "from_branch")),
        to_branch: normalize_code(text(values, "to_branch")),
        certificate_quantity: quantity(values, "certificate_quantity"),
        medal_quantity: quantity(values, "medal_quantity"),
        notes: opt_text(values, "notes"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::forms::validated;

    #[test]
    fn batch_needs_some_quantity() {
        let mut form = batch_form();
        form.handle_change("branch_code", "SND");
        assert!(!form.validate_all());
        assert_eq!(form.error("medal_quantity"), Some(EMPTY_QUANTITY));

        form.handle_change("certificate_quantity", 250_i64);
        let request = batch_request(&validated(form).unwrap());
        assert_eq!((request.certificate_quantity, request.medal_quantity), (250, 0));
    }

    #[test]
    fn negative_quantity_rejected() {
        let mut form = batch_form();
        form.handle_change("certificate_quantity", -5_i64);
        assert_eq!(
            form.error("certificate_quantity"),
            Some("Certificate quantity cannot be negative")
        );
    }

    #[test]
    fn migration_branches_must_differ() {
        let mut form = migration_form();
        form.handle_change("from_branch", "SND");
        form.handle_change("to_branch", "snd");
        assert_eq!(form.error("to_branch"), Some("Branch code is invalid"));

        form.handle_change("to_branch", "SND");
        assert_eq!(form.error("to_branch"), Some(SAME_BRANCH));

        form.handle_change("to_branch", "BKS");
        form.handle_change("medal_quantity", 40_i64);
        let request = migration_request(&validated(form).unwrap());
        assert_eq!(request.to_branch, "BKS");
        assert_eq!(request.medal_quantity, 40);
    }
}
