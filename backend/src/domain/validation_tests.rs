//! Regression coverage for the field rules.
use super::*;
use chrono::{Duration, TimeZone};
use rstest::rstest;

#[rstest]
#[case("Smith-Jones")]
#[case("O'Brien")]
#[case("Maria Lopez")]
fn admitted_names_pass_on_create(#[case] value: &str) {
    assert!(validate_name(ApplicantField::FamilyName, value, ValidationPath::Create).is_ok());
}

#[rstest]
fn name_injection_is_classified_as_security() {
    let violation = validate_name(
        ApplicantField::Name,
        "Robert'); DROP TABLE applicants;--",
        ValidationPath::Create,
    )
    .expect_err("payload must be rejected");
    assert_eq!(violation.kind, ViolationKind::Security);
    assert_eq!(violation.field, "name");
    assert_eq!(violation.message, "Potential SQL injection detected in input data");
}

#[rstest]
fn update_path_uses_generic_security_message() {
    let violation = validate_name(
        ApplicantField::Name,
        "<script>alert(1)</script>",
        ValidationPath::Update,
    )
    .expect_err("payload must be rejected");
    assert_eq!(violation.kind, ViolationKind::Security);
    assert_eq!(violation.message, "Invalid input detected");
}

#[rstest]
#[case(ValidationPath::Create, "Anna", false)]
#[case(ValidationPath::Update, "Anna", true)]
#[case(ValidationPath::Update, "A", false)]
fn name_length_depends_on_path(
    #[case] path: ValidationPath,
    #[case] value: &str,
    #[case] accepted: bool,
) {
    let outcome = validate_name(ApplicantField::Name, value, path);
    assert_eq!(outcome.is_ok(), accepted, "{outcome:?}");
    if let Err(violation) = outcome {
        assert_eq!(violation.kind, ViolationKind::Length);
    }
}

#[rstest]
fn blank_name_is_missing() {
    let violation = validate_name(ApplicantField::FamilyName, "  ", ValidationPath::Create)
        .expect_err("blank");
    assert_eq!(violation.kind, ViolationKind::Missing);
    assert_eq!(violation.message, "Family name is required");
}

#[rstest]
fn digits_in_name_fail_format() {
    let violation = validate_name(ApplicantField::Name, "John Smith 2", ValidationPath::Create)
        .expect_err("digits are not letters");
    assert_eq!(violation.kind, ViolationKind::Format);
}

#[rstest]
#[case("john.smith@example.com", true)]
#[case("John.Smith@Example.COM", true)]
#[case("not-an-email", false)]
#[case("two@@example.com", false)]
fn email_shape(#[case] value: &str, #[case] accepted: bool) {
    assert_eq!(validate_email(value, ValidationPath::Create).is_ok(), accepted);
}

#[rstest]
fn malformed_email_names_the_value() {
    let violation = validate_email("nobody", ValidationPath::Create).expect_err("no at sign");
    assert_eq!(violation.message, "Invalid email format: nobody");
}

#[rstest]
#[case(ValidationPath::Create, "+201234567890", true)]
#[case(ValidationPath::Create, "+20123456789", false)]
#[case(ValidationPath::Create, "01234567890", false)]
#[case(ValidationPath::Update, "+44 (20) 7946 0958", true)]
#[case(ValidationPath::Update, "123456", false)]
#[case(ValidationPath::Update, "+1234567890123456", false)]
fn phone_rules_follow_path(
    #[case] path: ValidationPath,
    #[case] value: &str,
    #[case] accepted: bool,
) {
    assert_eq!(validate_phone(value, path).is_ok(), accepted);
}

#[rstest]
#[case("+201234567890", true)]
#[case("12-34-56", false)]
#[case("(555) 123-4567", true)]
#[case("+1234567890123456", false)]
fn cleaned_phone_length(#[case] value: &str, #[case] within: bool) {
    assert_eq!(phone_length_within_bounds(value), within);
}

#[rstest]
#[case(ValidationPath::Create, "12 Nile Street, Cairo", true)]
#[case(ValidationPath::Create, "Short", false)]
#[case(ValidationPath::Create, "Flat 4-B, #12 Corniche", true)]
#[case(ValidationPath::Update, "Somewhere @ home base", false)]
fn address_rules(#[case] path: ValidationPath, #[case] value: &str, #[case] accepted: bool) {
    assert_eq!(validate_address(value, path).is_ok(), accepted);
}

#[rstest]
fn address_length_caps_differ() {
    let long = "a".repeat(220);
    assert!(validate_address(&long, ValidationPath::Create).is_ok());
    assert!(validate_address(&long, ValidationPath::Update).is_err());
}

#[rstest]
#[case("Egypt", true)]
#[case("Cote d'Ivoire", true)]
#[case("Guinea-Bissau", true)]
#[case("E", false)]
#[case("Country 42", false)]
fn country_shape(#[case] value: &str, #[case] accepted: bool) {
    assert_eq!(validate_country(value, ValidationPath::Create).is_ok(), accepted);
}

#[rstest]
#[case(19, false)]
#[case(20, true)]
#[case(60, true)]
#[case(61, false)]
fn schema_age_bounds(#[case] age: i32, #[case] accepted: bool) {
    let outcome = validate_age(age, AgeBounds::SCHEMA_DEFAULT);
    assert_eq!(outcome.is_ok(), accepted);
    if let Err(violation) = outcome {
        assert_eq!(violation.message, "Age must be between 20 and 60");
    }
}

#[rstest]
fn future_applied_date_is_rejected() {
    let now = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    assert!(validate_applied_date(now, now).is_ok());
    let violation =
        validate_applied_date(now + Duration::seconds(1), now).expect_err("future date");
    assert_eq!(violation.field, "appliedDate");
    assert_eq!(violation.kind, ViolationKind::Range);
}

#[rstest]
fn identical_names_are_rejected_ignoring_case() {
    assert!(validate_distinct_names("Jordan", "jordan ").is_err());
    assert!(validate_distinct_names("Jordan", "Rivers").is_ok());
}

#[rstest]
fn email_normalisation_trims_and_lowercases() {
    assert_eq!(normalize_email("  Test@Example.COM "), "test@example.com");
}
