//! Rule tables for the keyword classifier.
//!
//! These are configuration data, not code: ordered term lists per category,
//! matched case-insensitively as substrings of lower-cased title and
//! content. Terms are kept in stem form where that safely widens the match
//! (e.g. "recruit" also hits "recruiting" and "recruitment").

/// Direct employment-signal terms
pub const JOB_KEYWORDS: &[&str] = &[
    "jobs",
    "hiring",
    "employment",
    "workforce",
    "careers",
    "job creation",
    "new positions",
    "employees",
    "staffing",
    "recruit",
    "payroll",
    "labor force",
];

/// Construction and capital-investment terms
pub const DEVELOPMENT_KEYWORDS: &[&str] = &[
    "expansion",
    "expand",
    "construction",
    "investment",
    "development",
    "groundbreaking",
    "facility",
    "plant",
    "headquarters",
    "distribution center",
    "manufacturing",
    "relocat",
    "square feet",
    "square-foot",
    "campus",
    "opening",
];

/// Entity-type terms that often accompany job creation
pub const ORGANIZATION_KEYWORDS: &[&str] = &[
    "company",
    "corporation",
    "manufacturer",
    "employer",
    "firm",
    "business",
    "factory",
    "startup",
    "developer",
    "enterprise",
];

/// Domain special case: aviation infrastructure terms
pub const AIRPORT_KEYWORDS: &[&str] = &[
    "airport",
    "airline",
    "terminal",
    "runway",
    "aviation",
    "hangar",
];

/// Development-action verbs paired with the airport special case
pub const ACTION_KEYWORDS: &[&str] = &["new", "plan", "develop", "build"];

/// Currency-amount pattern: `$<number>(.<number>)? (million|billion|m|b)`
pub const CURRENCY_PATTERN: &str = r"(?i)\$\d+(\.\d+)?\s*(million|billion|m|b)\b";
