//! Classification of database errors by constraint name.

/// Unique constraints that map onto a domain field.
const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[
    ("links_code_key", "code"),
    ("users_username_key", "username"),
    ("api_tokens_token_hash_key", "token_hash"),
];

/// Returns the field a unique violation refers to, or `None` for any other error.
///
/// Unknown constraints fall back to the raw constraint name.
pub fn unique_violation_field(e: &sqlx::Error) -> Option<String> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    let field = match db_err.constraint() {
        Some(constraint) => field_for_constraint(constraint)
            .map(str::to_string)
            .unwrap_or_else(|| constraint.to_string()),
        None => "unknown".to_string(),
    };

    Some(field)
}

fn field_for_constraint(constraint: &str) -> Option<&'static str> {
    UNIQUE_CONSTRAINTS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, field)| *field)
}
