/// Character classes accepted by an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierRules {
    pub allow_dots: bool,
    pub allow_underscores: bool,
    pub allow_uppercase: bool,
}

impl IdentifierRules {
    /// `^[a-z0-9-]+$`
    pub const PROJECT: Self =
        Self { allow_dots: false, allow_underscores: false, allow_uppercase: false };

    /// `^[a-z0-9.-]+$`
    pub const NEW_AGENT: Self =
        Self { allow_dots: true, allow_underscores: false, allow_uppercase: false };

    /// `^[A-Za-z0-9._-]+$`, accepted when reading existing agent files.
    pub const EXISTING_AGENT: Self =
        Self { allow_dots: true, allow_underscores: true, allow_uppercase: true };
}

/// Validates an identifier string.
///
/// Checks:
/// - Non-empty
/// - No path separators (/, \)
/// - Not "." or ".."
/// - Characters are ASCII digits, lowercase letters, or '-', plus whatever `rules` allows
pub fn validate_identifier(id: &str, rules: IdentifierRules) -> bool {
    if id.is_empty() {
        return false;
    }
    if id.contains('/') || id.contains('\\') {
        return false;
    }
    if id == "." || id == ".." {
        return false;
    }
    id.chars().all(|c| {
        c.is_ascii_digit()
            || c.is_ascii_lowercase()
            || c == '-'
            || (rules.allow_uppercase && c.is_ascii_uppercase())
            || (rules.allow_dots && c == '.')
            || (rules.allow_underscores && c == '_')
    })
}
