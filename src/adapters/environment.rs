//! Environment name to destination group resolution

use tracing::debug;

use super::pagination::paginate;
use crate::domain::model::Group;
use crate::domain::{FivetranApi, FivetranResult};

/// Groups matched by an environment filter, in upstream order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    pub group_ids: Vec<String>,
    pub group_names: Vec<String>,
}

impl ResolvedEnvironment {
    pub fn is_empty(&self) -> bool {
        self.group_ids.is_empty()
    }

    pub fn contains(&self, group_id: &str) -> bool {
        self.group_ids.iter().any(|id| id == group_id)
    }
}

/// Match `env` against the account's groups.
///
/// An exact group id wins outright. Otherwise every group whose name contains
/// `env` (case-insensitive) is returned. An empty result means no such
/// environment; callers must not fall back to an unfiltered listing.
pub fn match_groups(groups: &[Group], env: &str) -> ResolvedEnvironment {
    if let Some(group) = groups.iter().find(|g| g.id == env) {
        return ResolvedEnvironment {
            group_ids: vec![group.id.clone()],
            group_names: vec![group.name.clone()],
        };
    }

    let needle = env.to_lowercase();
    groups
        .iter()
        .filter(|g| g.name.to_lowercase().contains(&needle))
        .fold(ResolvedEnvironment::default(), |mut acc, g| {
            acc.group_ids.push(g.id.clone());
            acc.group_names.push(g.name.clone());
            acc
        })
}

/// Fetch all groups and resolve `env` against them.
pub async fn resolve_environment(
    api: &dyn FivetranApi,
    env: &str,
    max_pages: usize,
) -> FivetranResult<ResolvedEnvironment> {
    let groups: Vec<Group> = paginate(api, "groups", &[], max_pages).await?;
    let resolved = match_groups(&groups, env);
    debug!(env, matched = resolved.group_ids.len(), "Resolved environment");
    Ok(resolved)
}
