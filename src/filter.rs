use crate::schema::Resource;
use anyhow::{bail, Result};

/// Resolves which resource types a search covers from include/exclude filters
pub fn resolve_resources(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<Vec<Resource>> {
    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            let mut resources = parse_all(&include_list)?;
            resources.dedup();
            tracing::debug!(?resources, "search limited to");
            Ok(resources)
        }
        (None, Some(exclude_list)) => {
            let excluded = parse_all(&exclude_list)?;
            let resources: Vec<_> = Resource::SEARCH_PRIORITY
                .into_iter()
                .filter(|r| !excluded.contains(r))
                .collect();
            tracing::debug!(?resources, "search after exclusions");
            Ok(resources)
        }
        (None, None) => Ok(Resource::SEARCH_PRIORITY.to_vec()),
    }
}

fn parse_all(names: &[String]) -> Result<Vec<Resource>> {
    let mut resources = Vec::with_capacity(names.len());
    for name in names {
        resources.push(name.trim().parse::<Resource>()?);
    }
    resources.sort();
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_no_filters_is_everything() {
        assert_eq!(resolve_resources(None, None).unwrap().len(), 6);
    }

    #[test]
    fn test_include() {
        let resources = resolve_resources(names(&["films", "people", "films"]), None).unwrap();
        assert_eq!(resources.len(), 2);
        assert!(resources.contains(&Resource::Films));
        assert!(resources.contains(&Resource::People));
    }

    #[test]
    fn test_exclude() {
        let resources = resolve_resources(None, names(&["vehicles", "starships"])).unwrap();
        assert_eq!(
            resources,
            vec![
                Resource::People,
                Resource::Films,
                Resource::Planets,
                Resource::Species
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_and_conflicting() {
        assert!(resolve_resources(names(&["droids"]), None).is_err());
        assert!(resolve_resources(names(&["people"]), names(&["films"])).is_err());
    }
}
