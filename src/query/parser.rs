use crate::tags;

/// Separator between top-level terms
const TERM_SEPARATOR: &str = ", ";
const OR_OPERATORS: [&str; 2] = ["||", " OR "];
const AND_OPERATORS: [&str; 2] = ["&&", " AND "];

/// One top-level query term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Any of these tags (exact, case-insensitive)
    AnyOf(Vec<String>),
    /// All of these tags (exact, case-insensitive)
    AllOf(Vec<String>),
    /// Case-insensitive substring of any tag
    Partial(String),
}

/// Parsed search string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<Term>,
}

impl Query {
    /// Parse a search string. Every string is a valid query.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let terms = text
            .split(TERM_SEPARATOR)
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(parse_term)
            .collect();
        Self { terms }
    }

    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// True when the query has no terms and therefore selects everything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

fn parse_term(term: &str) -> Term {
    if OR_OPERATORS.iter().any(|op| term.contains(op)) {
        Term::AnyOf(split_group(term, &OR_OPERATORS))
    } else if AND_OPERATORS.iter().any(|op| term.contains(op)) {
        Term::AllOf(split_group(term, &AND_OPERATORS))
    } else {
        Term::Partial(tags::compare_key(term))
    }
}

/// Split on every operator spelling, keeping comparison keys of non-empty parts
fn split_group(term: &str, operators: &[&str]) -> Vec<String> {
    let mut parts = vec![term.to_string()];
    for op in operators {
        parts = parts
            .iter()
            .flat_map(|part| part.split(op).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }
    parts
        .iter()
        .map(|part| tags::compare_key(part))
        .filter(|part| !part.is_empty())
        .collect()
}
