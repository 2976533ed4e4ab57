use crate::error::Result;
use crate::keywords::{
    ACTION_KEYWORDS, AIRPORT_KEYWORDS, CURRENCY_PATTERN, DEVELOPMENT_KEYWORDS, JOB_KEYWORDS,
    ORGANIZATION_KEYWORDS,
};
use crate::types::{DecisionSource, RelevanceDecision};
use regex::Regex;

/// Deterministic, rule-based relevance scorer over title and content.
///
/// A pure function of its inputs: identical `(title, content)` always
/// yields the identical verdict, independent of call order.
pub struct KeywordClassifier {
    currency: Regex,
}

impl KeywordClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            currency: Regex::new(CURRENCY_PATTERN)?,
        })
    }

    pub fn classify(&self, title: &str, content: &str) -> bool {
        self.matched_rule(title, content).is_some()
    }

    /// Full decision with the matched rule as the explanation
    pub fn decide(&self, title: &str, content: &str) -> RelevanceDecision {
        match self.matched_rule(title, content) {
            Some(rule) => RelevanceDecision {
                relevant: true,
                explanation: format!("Matched: {}", rule),
                source: DecisionSource::Keyword,
            },
            None => RelevanceDecision {
                relevant: false,
                explanation: "No keyword rules matched".to_string(),
                source: DecisionSource::Keyword,
            },
        }
    }

    /// Evaluate the rule table in precedence order; first hit wins
    fn matched_rule(&self, title: &str, content: &str) -> Option<&'static str> {
        let title = title.to_lowercase();
        let content = content.to_lowercase();

        // 1. Any job keyword in the title
        if contains_any(&title, JOB_KEYWORDS) {
            return Some("job keyword in title");
        }
        // 2. Development plus organization keyword in the title
        if contains_any(&title, DEVELOPMENT_KEYWORDS)
            && contains_any(&title, ORGANIZATION_KEYWORDS)
        {
            return Some("development and organization keywords in title");
        }
        // 3. Currency amount in the title
        if self.currency.is_match(&title) {
            return Some("currency amount in title");
        }
        // 4. Three or more distinct job keywords in the content
        if count_distinct(&content, JOB_KEYWORDS) >= 3 {
            return Some("three or more job keywords in content");
        }
        // 5. Two job keywords plus development or organization context
        if count_distinct(&content, JOB_KEYWORDS) >= 2
            && (contains_any(&content, DEVELOPMENT_KEYWORDS)
                || contains_any(&content, ORGANIZATION_KEYWORDS))
        {
            return Some("two job keywords with development or organization context");
        }
        // 6. Two development plus two organization keywords in the content
        if count_distinct(&content, DEVELOPMENT_KEYWORDS) >= 2
            && count_distinct(&content, ORGANIZATION_KEYWORDS) >= 2
        {
            return Some("development and organization keywords in content");
        }
        // 7. Currency amount plus a development keyword in the content
        if self.currency.is_match(&content) && contains_any(&content, DEVELOPMENT_KEYWORDS) {
            return Some("currency amount with development keyword in content");
        }
        // 8. Airport term in the title plus a development action in the content
        if contains_any(&title, AIRPORT_KEYWORDS) && contains_any(&content, ACTION_KEYWORDS) {
            return Some("airport term in title with development action in content");
        }

        None
    }
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

fn count_distinct(text: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| text.contains(*term)).count()
}
