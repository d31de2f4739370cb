//! Query parsing and ranking
//!
//! Queries look like `ssh <pattern>` or `ssh <user>@<pattern>`. A bare `ssh`
//! lists every target.

use sh_core::args::apply_user_to_arguments;
use sh_core::fuzzy;
use sh_core::{MatchCategory, QueryMatch, SshTarget};

const QUERY_PREFIX: &str = "ssh";

/// Relevance given to every target when listing everything
const LIST_ALL_RELEVANCE: f64 = 0.33;

/// A query after prefix and user extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Everything after the prefix, trimmed
    pub raw_pattern: String,
    /// What targets are scored against
    pub pattern: String,
    /// User from a `user@pattern` query
    pub explicit_user: Option<String>,
}

impl ParsedQuery {
    pub fn lists_all(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// Parse a query, or `None` if it does not start with `ssh`
pub fn parse_query(text: &str) -> Option<ParsedQuery> {
    let text = text.trim();
    let prefix = text.get(..QUERY_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(QUERY_PREFIX) {
        return None;
    }

    let raw_pattern = text[QUERY_PREFIX.len()..].trim().to_string();
    let mut pattern = raw_pattern.clone();
    let mut explicit_user = None;

    if let Some((user, host)) = raw_pattern.split_once('@') {
        let host = host.trim();
        if !user.is_empty() && !user.chars().any(char::is_whitespace) && !host.is_empty() {
            explicit_user = Some(user.to_string());
            pattern = host.to_string();
        }
    }

    Some(ParsedQuery {
        raw_pattern,
        pattern,
        explicit_user,
    })
}

/// Best score of `target` against the query
pub fn relevance(target: &SshTarget, query: &ParsedQuery) -> f64 {
    let pattern = query.pattern.as_str();

    let mut best = fuzzy::score(&target.label, pattern)
        .max(fuzzy::score(&target.ssh_arguments.join(" "), pattern))
        .max(fuzzy::score(&target.description, pattern))
        .max(fuzzy::score(&target.dns_name, pattern))
        .max(fuzzy::score(&target.user_name, pattern));

    if target.default_label != target.label {
        best = best.max(fuzzy::score(&target.default_label, pattern));
    }
    if !target.user_name.is_empty() {
        let user_host = format!("{}@{}", target.user_name, target.host_name);
        best = best.max(fuzzy::score(&user_host, &query.raw_pattern));
    }

    best
}

fn subtext(target: &SshTarget) -> String {
    match (target.description.is_empty(), target.dns_name.is_empty()) {
        (_, true) => target.description.clone(),
        (true, false) => format!("DNS: {}", target.dns_name),
        (false, false) => format!("{} (DNS: {})", target.description, target.dns_name),
    }
}

/// Score every target and return the matches, best first
pub fn rank(targets: &[SshTarget], query: &ParsedQuery) -> Vec<QueryMatch> {
    let lists_all = query.lists_all();

    let mut matches: Vec<QueryMatch> = targets
        .iter()
        .filter_map(|target| {
            let relevance = if lists_all {
                LIST_ALL_RELEVANCE
            } else {
                relevance(target, query)
            };
            if relevance <= 0.0 {
                return None;
            }

            let arguments = match &query.explicit_user {
                Some(user) => apply_user_to_arguments(&target.ssh_arguments, user),
                None => target.ssh_arguments.clone(),
            };

            Some(QueryMatch {
                id: target.id.clone(),
                label: target.label.clone(),
                subtext: subtext(target),
                relevance,
                arguments,
                category: if lists_all {
                    MatchCategory::Moderate
                } else {
                    MatchCategory::Normal
                },
            })
        })
        .collect();

    matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    matches
}
