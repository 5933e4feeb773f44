use thiserror::Error;
use uuid::Uuid;

use crate::models::{project::Project, store::Store};

/// Projects whose title or any tag contains `query`, ignoring case.
///
/// A blank query matches everything. Relative order is preserved.
pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.trim().to_lowercase();
    projects
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn list_projects<'a>(store: &'a Store, query: &str) -> Vec<&'a Project> {
    filter_projects(store.projects(), query)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Nothing matches '{0}'")]
    NotFound(String),

    #[error("'{query}' is ambiguous. Candidates: {}", .candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },
}

/// Picks one item by full id, unique id prefix or title.
///
/// Titles are matched case-insensitively, an exact title beating substring hits.
pub(crate) fn resolve<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    query: &str,
    id: impl Fn(&T) -> Uuid,
    title: impl Fn(&T) -> &str,
) -> Result<&'a T, ResolveError> {
    let items: Vec<&T> = items.into_iter().collect();
    let query = query.trim();
    let needle = query.to_lowercase();

    if let Ok(wanted) = Uuid::parse_str(query) {
        if let Some(item) = items.iter().copied().find(|item| id(item) == wanted) {
            return Ok(item);
        }
    }

    let pick = |matches: Vec<&'a T>| -> Option<Result<&'a T, ResolveError>> {
        match matches.len() {
            0 => None,
            1 => Some(Ok(matches[0])),
            _ => Some(Err(ResolveError::Ambiguous {
                query: query.to_string(),
                candidates: matches.iter().map(|item| title(item).to_string()).collect(),
            })),
        }
    };

    if needle.len() >= 4 {
        let by_prefix = items
            .iter()
            .copied()
            .filter(|item| id(item).to_string().starts_with(&needle))
            .collect();
        if let Some(result) = pick(by_prefix) {
            return result;
        }
    }

    let exact = items
        .iter()
        .copied()
        .filter(|item| title(item).to_lowercase() == needle)
        .collect();
    if let Some(result) = pick(exact) {
        return result;
    }

    let fuzzy = items
        .iter()
        .copied()
        .filter(|item| !needle.is_empty() && title(item).to_lowercase().contains(&needle))
        .collect();
    pick(fuzzy).unwrap_or_else(|| Err(ResolveError::NotFound(query.to_string())))
}

pub fn resolve_project<'a>(store: &'a Store, query: &str) -> Result<&'a Project, ResolveError> {
    resolve(store.projects(), query, |p| p.id, |p| p.title.as_str())
}
