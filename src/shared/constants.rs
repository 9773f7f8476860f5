/// Deepest allowed category level (0 = root, so four levels in total)
pub const MAX_CATEGORY_LEVEL: i32 = 3;

/// Longest meta title accepted, also the cut-off for the name-derived default
pub const MAX_META_TITLE_LENGTH: usize = 60;

/// Default number of featured categories returned
pub const DEFAULT_FEATURED_LIMIT: i64 = 10;

/// Default number of category search hits returned
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Upper bound for any caller-supplied limit
pub const MAX_LIST_LIMIT: i64 = 100;

/// Prefix of the public category page URL
pub const CATEGORY_URL_PREFIX: &str = "/category/";

/// Separator used in the materialized category path
pub const PATH_SEPARATOR: &str = ",";
