//! Answer synthesis from ranked matches.
//!
//! A fixed list of rules is tried in order; the first that produces text
//! wins. Intent detection is a case-insensitive substring test against small
//! keyword lists.

use serde::Serialize;

use crate::assistant::store::KnowledgeItem;

/// Returned when the store has nothing relevant.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't find an answer to that. \
Please give us a call or send a message through the contact page and we'll get back to you.";

pub const PRICE_KEYWORDS: &[&str] = &["price", "cost", "how much", "charge", "quote", "fee"];
pub const LOCATION_KEYWORDS: &[&str] = &["area", "cover", "where", "location", "postcode", "near"];

pub const KIND_PRICING: &str = "pricing";
pub const KIND_FAQ: &str = "faq";
pub const SERVICE_AREAS_SLUG: &str = "service-areas";

/// Citation for one matched item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub slug: String,
    pub title: String,
    pub kind: String,
}

impl From<&KnowledgeItem> for Source {
    fn from(item: &KnowledgeItem) -> Self {
        Self {
            slug: item.slug.clone(),
            title: item.title.clone(),
            kind: item.kind.clone(),
        }
    }
}

/// Response body of a successful query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedAnswer {
    pub query: String,
    pub answer: String,
    pub sources: Vec<Source>,
}

struct Rule {
    name: &'static str,
    apply: fn(&str, &[KnowledgeItem]) -> Option<String>,
}

const RULES: &[Rule] = &[
    Rule { name: "no_match", apply: no_match },
    Rule { name: "pricing", apply: pricing },
    Rule { name: "service_areas", apply: service_areas },
    Rule { name: "faq", apply: faq },
    Rule { name: "top_match", apply: top_match },
];

fn mentions_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query.contains(k))
}

fn no_match(_query: &str, matches: &[KnowledgeItem]) -> Option<String> {
    matches.is_empty().then(|| FALLBACK_ANSWER.to_string())
}

fn pricing(query: &str, matches: &[KnowledgeItem]) -> Option<String> {
    if !mentions_any(query, PRICE_KEYWORDS) {
        return None;
    }
    let bodies: Vec<&str> = matches
        .iter()
        .filter(|m| m.kind == KIND_PRICING)
        .map(|m| m.body.as_str())
        .collect();
    (!bodies.is_empty()).then(|| bodies.join("\n\n"))
}

fn service_areas(query: &str, matches: &[KnowledgeItem]) -> Option<String> {
    if !mentions_any(query, LOCATION_KEYWORDS) {
        return None;
    }
    matches
        .iter()
        .find(|m| m.slug == SERVICE_AREAS_SLUG)
        .map(|m| m.body.clone())
}

fn faq(_query: &str, matches: &[KnowledgeItem]) -> Option<String> {
    matches
        .iter()
        .find(|m| m.kind == KIND_FAQ)
        .map(|m| m.body.clone())
}

fn top_match(_query: &str, matches: &[KnowledgeItem]) -> Option<String> {
    matches.first().map(|m| m.body.clone())
}

/// Pick the answer text and the name of the rule that produced it.
pub fn compose(query: &str, matches: &[KnowledgeItem]) -> (&'static str, String) {
    let lowered = query.to_lowercase();
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(&lowered, matches).map(|text| (rule.name, text)))
        // top_match always answers when no_match did not
        .unwrap_or(("no_match", FALLBACK_ANSWER.to_string()))
}

/// Build the full response for a query and its matches, along with the
/// name of the rule that answered.
pub fn synthesize(query: &str, matches: &[KnowledgeItem]) -> (&'static str, SynthesizedAnswer) {
    let (rule, answer) = compose(query, matches);
    let answer = SynthesizedAnswer {
        query: query.to_string(),
        answer,
        sources: matches.iter().map(Source::from).collect(),
    };
    (rule, answer)
}
