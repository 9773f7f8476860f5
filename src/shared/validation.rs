use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating category slugs
    /// Must be lowercase alphanumeric with single hyphens between segments
    /// - Valid: "organic-foods", "phones", "organic-foods-1"
    /// - Invalid: "-phones", "phones-", "organic--foods", "Phones", "organic_foods"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for theme colours: `#RGB` or `#RRGGBB`
    pub static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap();

    /// Runs of characters that are not allowed inside a slug
    pub static ref SLUG_SEPARATOR_REGEX: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}
