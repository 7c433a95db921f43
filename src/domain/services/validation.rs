pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;
pub const MIN_DISPLAY_NAME_LENGTH: usize = 2;
pub const MAX_NOTES_LENGTH: usize = 500;
pub const MAX_GUEST_COUNT: i32 = 5;
pub const MAX_EMAIL_LENGTH: usize = 254;

pub const AUDIENCE_MEMBER: &str = "member";
pub const AUDIENCE_GUEST: &str = "guest";

/// Result of validating a single raw field value. Pure and idempotent:
/// the same input always produces the same output.
#[derive(Debug, Clone)]
pub struct FieldValidation<T> {
    pub valid: bool,
    pub errors: Vec<String>,
    pub value: T,
}

impl<T> FieldValidation<T> {
    fn ok(value: T) -> Self {
        Self { valid: true, errors: Vec::new(), value }
    }

    fn fail(value: T, error: impl Into<String>) -> Self {
        Self { valid: false, errors: vec![error.into()], value }
    }
}

pub fn validate_display_name(raw: &str) -> FieldValidation<String> {
    let trimmed = raw.trim().to_string();

    if trimmed.is_empty() {
        return FieldValidation::fail(trimmed, "Display name is required");
    }
    if trimmed.chars().count() < MIN_DISPLAY_NAME_LENGTH {
        return FieldValidation::fail(
            trimmed,
            format!("Display name must be at least {} characters", MIN_DISPLAY_NAME_LENGTH),
        );
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return FieldValidation::fail(
            trimmed,
            format!("Display name must be {} characters or less", MAX_DISPLAY_NAME_LENGTH),
        );
    }

    FieldValidation::ok(trimmed)
}

fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

/// Optional. A missing leading `@` is prepended before checking; after the
/// `@` there must be 2-30 characters from [A-Za-z0-9._].
pub fn validate_instagram_handle(raw: Option<&str>) -> FieldValidation<Option<String>> {
    let trimmed = match raw.map(str::trim) {
        None | Some("") => return FieldValidation::ok(None),
        Some(t) => t,
    };

    let formatted = if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{}", trimmed)
    };

    let body = &formatted[1..];
    if !body.chars().all(is_handle_char) {
        return FieldValidation::fail(
            Some(formatted),
            "Instagram handle must start with @ and contain only letters, numbers, periods, or underscores",
        );
    }
    if body.chars().count() < 2 {
        return FieldValidation::fail(
            Some(formatted),
            "Instagram handle must be at least 2 characters after the @",
        );
    }
    if body.chars().count() > 30 {
        return FieldValidation::fail(
            Some(formatted),
            "Instagram handle must be 30 characters or less after the @",
        );
    }

    FieldValidation::ok(Some(formatted))
}

/// Optional. Shape check only: non-empty local part, exactly one `@`, a dot
/// somewhere in the domain, no whitespace. Normalized to lowercase.
pub fn validate_email(raw: Option<&str>) -> FieldValidation<Option<String>> {
    let trimmed = match raw.map(str::trim) {
        None | Some("") => return FieldValidation::ok(None),
        Some(t) => t,
    };

    let normalized = trimmed.to_lowercase();

    if normalized.len() > MAX_EMAIL_LENGTH {
        return FieldValidation::fail(Some(normalized), "Email address is too long");
    }

    let mut parts = normalized.split('@');
    let shape_ok = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !normalized.chars().any(char::is_whitespace)
        }
        _ => false,
    };

    if !shape_ok {
        return FieldValidation::fail(Some(normalized), "Please enter a valid email address");
    }

    FieldValidation::ok(Some(normalized))
}

/// Required for members: a Discord snowflake, 17-19 ASCII digits.
pub fn validate_discord_id(raw: &str) -> FieldValidation<String> {
    let trimmed = raw.trim().to_string();

    if trimmed.is_empty() {
        return FieldValidation::fail(trimmed, "Discord ID is required for members");
    }
    let digits = trimmed.chars().all(|c| c.is_ascii_digit());
    if !digits || trimmed.len() < 17 || trimmed.len() > 19 {
        return FieldValidation::fail(trimmed, "Discord ID must be 17-19 digits");
    }

    FieldValidation::ok(trimmed)
}

pub fn validate_notes(raw: Option<&str>) -> FieldValidation<Option<String>> {
    let trimmed = match raw.map(str::trim) {
        None | Some("") => return FieldValidation::ok(None),
        Some(t) => t.to_string(),
    };

    if trimmed.chars().count() > MAX_NOTES_LENGTH {
        return FieldValidation::fail(
            Some(trimmed),
            format!("Notes must be {} characters or less", MAX_NOTES_LENGTH),
        );
    }

    FieldValidation::ok(Some(trimmed))
}

pub fn validate_guest_count(count: i32) -> FieldValidation<i32> {
    if count < 0 {
        return FieldValidation::fail(0, "Guest count cannot be negative");
    }
    if count > MAX_GUEST_COUNT {
        return FieldValidation::fail(count, format!("Maximum {} guests allowed", MAX_GUEST_COUNT));
    }

    FieldValidation::ok(count)
}

/// A recipe id is required exactly when the submitter is cooking.
pub fn validate_recipe_selection(recipe_id: Option<&str>, cooking: bool) -> FieldValidation<Option<String>> {
    let trimmed = recipe_id.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    if cooking && trimmed.is_none() {
        return FieldValidation::fail(None, "Please select a recipe if you are cooking");
    }

    FieldValidation::ok(trimmed)
}

/// Borrowed view of a raw submission, decoupled from the transport DTOs.
pub struct SubmissionInput<'a> {
    pub audience_type: &'a str,
    pub display_name: &'a str,
    pub discord_id: Option<&'a str>,
    pub instagram_handle: Option<&'a str>,
    pub email: Option<&'a str>,
    pub cooking: bool,
    pub recipe_id: Option<&'a str>,
    pub guest_count: i32,
    pub note: Option<&'a str>,
}

/// The full set of normalized field values after cross-field validation.
#[derive(Debug, Clone)]
pub struct NormalizedSubmission {
    pub audience_type: String,
    pub display_name: String,
    pub discord_id: Option<String>,
    pub instagram_handle: Option<String>,
    pub email: Option<String>,
    pub cooking: bool,
    pub recipe_id: Option<String>,
    pub guest_count: i32,
    pub note: Option<String>,
}

impl NormalizedSubmission {
    pub fn is_member(&self) -> bool {
        self.audience_type == AUDIENCE_MEMBER
    }
}

/// Cross-field validation of a complete submission. Collects every error
/// rather than stopping at the first.
pub fn validate_submission(input: &SubmissionInput) -> Result<NormalizedSubmission, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let name = validate_display_name(input.display_name);
    let instagram = validate_instagram_handle(input.instagram_handle);
    let email = validate_email(input.email);
    let notes = validate_notes(input.note);
    let guests = validate_guest_count(input.guest_count);
    let recipe = validate_recipe_selection(input.recipe_id, input.cooking);

    for v in [&name.errors, &instagram.errors, &email.errors, &notes.errors, &recipe.errors] {
        errors.extend(v.iter().cloned());
    }
    errors.extend(guests.errors.iter().cloned());

    let mut discord_id = None;
    match input.audience_type {
        AUDIENCE_MEMBER => {
            let v = validate_discord_id(input.discord_id.unwrap_or(""));
            if v.valid {
                discord_id = Some(v.value);
            } else {
                errors.extend(v.errors);
            }
        }
        AUDIENCE_GUEST => {
            if instagram.value.is_none() && email.value.is_none() {
                errors.push("Please provide either an Instagram handle or email address".to_string());
            }
        }
        _ => errors.push("Invalid audience type - must be \"member\" or \"guest\"".to_string()),
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NormalizedSubmission {
        audience_type: input.audience_type.to_string(),
        display_name: name.value,
        discord_id,
        instagram_handle: instagram.value,
        email: email.value,
        cooking: input.cooking,
        recipe_id: recipe.value,
        guest_count: guests.value,
        note: notes.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest_input<'a>() -> SubmissionInput<'a> {
        SubmissionInput {
            audience_type: AUDIENCE_GUEST,
            display_name: "Jane Doe",
            discord_id: None,
            instagram_handle: Some("@jane.doe"),
            email: None,
            cooking: false,
            recipe_id: None,
            guest_count: 0,
            note: None,
        }
    }

    #[test]
    fn test_display_name_bounds() {
        assert!(!validate_display_name("").valid);
        assert!(!validate_display_name("a").valid);
        assert!(validate_display_name("ab").valid);
        assert!(validate_display_name(&"x".repeat(50)).valid);
        assert!(!validate_display_name(&"x".repeat(51)).valid);
    }

    #[test]
    fn test_display_name_trims() {
        let v = validate_display_name("  Jane Doe  ");
        assert!(v.valid);
        assert_eq!(v.value, "Jane Doe");
    }

    #[test]
    fn test_instagram_handle_shapes() {
        let v = validate_instagram_handle(Some("@a_b.c"));
        assert!(v.valid);
        assert_eq!(v.value.as_deref(), Some("@a_b.c"));

        // auto-prepend @
        let v = validate_instagram_handle(Some("jane_doe"));
        assert!(v.valid);
        assert_eq!(v.value.as_deref(), Some("@jane_doe"));

        assert!(!validate_instagram_handle(Some("@a")).valid);
        assert!(!validate_instagram_handle(Some("@has space")).valid);
        assert!(!validate_instagram_handle(Some("@bad-char")).valid);
        assert!(!validate_instagram_handle(Some(&format!("@{}", "a".repeat(31)))).valid);
        assert!(validate_instagram_handle(Some(&format!("@{}", "a".repeat(30)))).valid);

        // optional
        assert!(validate_instagram_handle(None).valid);
        assert!(validate_instagram_handle(Some("  ")).valid);
    }

    #[test]
    fn test_email_shape() {
        let v = validate_email(Some("Jane@Example.COM"));
        assert!(v.valid);
        assert_eq!(v.value.as_deref(), Some("jane@example.com"));

        assert!(!validate_email(Some("not-an-email")).valid);
        assert!(!validate_email(Some("a@b")).valid);
        assert!(!validate_email(Some("a@b.")).valid);
        assert!(!validate_email(Some("@b.com")).valid);
        assert!(!validate_email(Some("a@@b.com")).valid);
        assert!(!validate_email(Some(&format!("{}@example.com", "a".repeat(250)))).valid);
        assert!(validate_email(None).valid);
    }

    #[test]
    fn test_discord_id_snowflake_shape() {
        assert!(validate_discord_id("12345678901234567").valid); // 17
        assert!(validate_discord_id("1234567890123456789").valid); // 19
        assert!(!validate_discord_id("1234567890123456").valid); // 16
        assert!(!validate_discord_id("12345678901234567890").valid); // 20
        assert!(!validate_discord_id("1234567890123456a").valid);
        assert!(!validate_discord_id("").valid);
    }

    #[test]
    fn test_notes_and_guest_count_limits() {
        assert!(validate_notes(None).valid);
        assert!(validate_notes(Some(&"n".repeat(500))).valid);
        assert!(!validate_notes(Some(&"n".repeat(501))).valid);

        assert!(validate_guest_count(0).valid);
        assert!(validate_guest_count(5).valid);
        assert!(!validate_guest_count(6).valid);
        assert!(!validate_guest_count(-1).valid);
    }

    #[test]
    fn test_recipe_required_only_when_cooking() {
        assert!(!validate_recipe_selection(None, true).valid);
        assert!(!validate_recipe_selection(Some("  "), true).valid);
        assert!(validate_recipe_selection(Some("7"), true).valid);
        assert!(validate_recipe_selection(None, false).valid);
    }

    #[test]
    fn test_submission_guest_needs_contact_method() {
        let mut input = guest_input();
        input.instagram_handle = None;
        let errs = validate_submission(&input).unwrap_err();
        assert!(errs.iter().any(|e| e.contains("Instagram handle or email")));

        input.email = Some("jane@example.com");
        assert!(validate_submission(&input).is_ok());
    }

    #[test]
    fn test_submission_member_needs_discord_id() {
        let mut input = guest_input();
        input.audience_type = AUDIENCE_MEMBER;
        input.instagram_handle = None;
        let errs = validate_submission(&input).unwrap_err();
        assert!(errs.iter().any(|e| e.contains("Discord ID")));

        input.discord_id = Some("123456789012345678");
        let normalized = validate_submission(&input).unwrap();
        assert!(normalized.is_member());
        assert_eq!(normalized.discord_id.as_deref(), Some("123456789012345678"));
    }

    #[test]
    fn test_submission_rejects_unknown_audience() {
        let mut input = guest_input();
        input.audience_type = "robot";
        let errs = validate_submission(&input).unwrap_err();
        assert!(errs.iter().any(|e| e.contains("audience type")));
    }

    #[test]
    fn test_submission_is_idempotent() {
        let input = guest_input();
        let a = validate_submission(&input).unwrap();
        let b = validate_submission(&input).unwrap();
        assert_eq!(a.display_name, b.display_name);
        assert_eq!(a.instagram_handle, b.instagram_handle);
    }
}
