use crate::shared::validation::SLUG_SEPARATOR_REGEX;

const FALLBACK_SLUG: &str = "category";

/// Lowercase the name, collapse every run of non `[a-z0-9]` characters into a
/// single hyphen and trim hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = SLUG_SEPARATOR_REGEX.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// `base`, then `base-1`, `base-2`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}
