//! Group-to-repository routing.
//!
//! A pure lookup table: each managed group maps to the repository whose star
//! set governs it, with one optional default for groups without an explicit
//! route. Immutable after construction.

use crate::domain::value_objects::{GroupId, RepoName};
use std::collections::HashMap;

/// Immutable routing table from groups to governing repositories.
#[derive(Debug, Clone, Default)]
pub struct RepoRouter {
    routes: HashMap<GroupId, RepoName>,
    default: Option<RepoName>,
    /// Default repo first, then routed repos in configuration order,
    /// deduplicated. Drives stable ordering of sync and status output.
    ordered: Vec<RepoName>,
}

impl RepoRouter {
    /// Build a router from a default repo and explicit routes. Route order
    /// is preserved for [`RepoRouter::ordered_repos`].
    pub fn new(default: Option<RepoName>, routes: Vec<(GroupId, RepoName)>) -> Self {
        let mut ordered = Vec::new();
        if let Some(repo) = &default {
            ordered.push(repo.clone());
        }
        for (_, repo) in &routes {
            if !ordered.contains(repo) {
                ordered.push(repo.clone());
            }
        }
        Self {
            routes: routes.into_iter().collect(),
            default,
            ordered,
        }
    }

    /// Repository governing `group`: exact route, else the default, else none.
    pub fn resolve(&self, group: &GroupId) -> Option<&RepoName> {
        self.routes.get(group).or(self.default.as_ref())
    }

    /// The configured default repository, if any.
    pub fn default_repo(&self) -> Option<&RepoName> {
        self.default.as_ref()
    }

    /// Every configured repository in stable order: default first, then
    /// routed repositories in configuration order, without duplicates.
    pub fn ordered_repos(&self) -> &[RepoName] {
        &self.ordered
    }

    /// True when neither a default nor any route is configured.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(s: &str) -> RepoName {
        RepoName::parse(s).unwrap()
    }

    #[test]
    fn exact_route_wins_over_default() {
        let router = RepoRouter::new(
            Some(repo("octo/default")),
            vec![(GroupId::new("g1"), repo("octo/special"))],
        );
        assert_eq!(
            router.resolve(&GroupId::new("g1")),
            Some(&repo("octo/special"))
        );
        assert_eq!(
            router.resolve(&GroupId::new("g2")),
            Some(&repo("octo/default"))
        );
    }

    #[test]
    fn no_default_no_route_resolves_none() {
        let router = RepoRouter::new(None, vec![(GroupId::new("g1"), repo("octo/a"))]);
        assert_eq!(router.resolve(&GroupId::new("other")), None);
    }

    #[test]
    fn ordered_repos_dedup_and_stable() {
        let router = RepoRouter::new(
            Some(repo("octo/default")),
            vec![
                (GroupId::new("g1"), repo("octo/b")),
                (GroupId::new("g2"), repo("octo/default")),
                (GroupId::new("g3"), repo("octo/a")),
                (GroupId::new("g4"), repo("octo/b")),
            ],
        );
        assert_eq!(
            router.ordered_repos(),
            &[repo("octo/default"), repo("octo/b"), repo("octo/a")]
        );
    }

    #[test]
    fn empty_router_is_empty() {
        assert!(RepoRouter::new(None, vec![]).is_empty());
        assert!(!RepoRouter::new(Some(repo("o/r")), vec![]).is_empty());
    }
}
