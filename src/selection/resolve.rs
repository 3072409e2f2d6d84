//! Collection filter resolution
//!
//! Collection filters are parsed before the group map is known, so they
//! arrive as placeholders. Before each pass every collection filter is taken
//! out of the list and the union of the requested groups becomes a single
//! membership filter appended at the end. The synthesized filter keeps the
//! requests it was built from, so later passes fold new collection filters
//! into it and pick up a reloaded group map.

use crate::filters::{Criterion, FilterInstance, GroupRequest, Registry};
use crate::library::{GroupEntry, GroupMap};
use std::collections::HashSet;
use std::fmt;

/// A requested group that matched nothing in the group map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionWarning {
    /// Command of the filter that requested the group
    pub filter: String,
    /// The name or `#<ordinal>` that did not resolve
    pub name: String,
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection '{}' not found (in '{}')", self.name, self.filter)
    }
}

/// Look up a group by `#<ordinal>` first, then by name
pub(crate) fn lookup<'a>(groups: &'a GroupMap, name: &str) -> Option<&'a GroupEntry> {
    name.strip_prefix('#')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|ordinal| groups.by_ordinal(ordinal))
        .or_else(|| groups.by_name(name))
}

/// Replace all collection filters with one synthesized membership filter
///
/// Non-collection filters keep their relative order. If collection filters
/// were present but nothing resolved, the synthesized filter has an empty
/// member set and so (unless negated) matches nothing.
pub(crate) fn resolve_groups(
    filters: &[FilterInstance],
    groups: &GroupMap,
    on_warning: &mut dyn FnMut(ResolutionWarning),
) -> Vec<FilterInstance> {
    let mut resolved = Vec::with_capacity(filters.len());
    let mut kept: Vec<GroupRequest> = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut unresolved: Vec<&str> = Vec::new();
    let mut any = false;
    let mut negated = None;

    for filter in filters {
        let Some(requests) = filter.group_requests() else {
            resolved.push(filter.clone());
            continue;
        };
        negated = Some(filter.negated());

        for request in requests {
            if kept.contains(request) {
                continue;
            }
            kept.push(request.clone());
            match request {
                GroupRequest::Any => any = true,
                GroupRequest::Named(name) => match lookup(groups, name) {
                    Some(entry) => {
                        if !names.contains(&entry.name.as_str()) {
                            names.push(&entry.name);
                        }
                    }
                    None => {
                        log::warn!("Collection '{name}' not found");
                        unresolved.push(name);
                        on_warning(ResolutionWarning {
                            filter: filter.command(),
                            name: name.clone(),
                        });
                    }
                },
            }
        }
    }

    let Some(negated) = negated else {
        return resolved;
    };

    let (input, members): (String, HashSet<String>) = if any {
        let members = groups
            .iter()
            .flat_map(|entry| entry.hashes.iter().cloned())
            .collect();
        (GroupRequest::ANY_SENTINEL.to_string(), members)
    } else {
        let members = names
            .iter()
            .filter_map(|name| groups.by_name(name))
            .flat_map(|entry| entry.hashes.iter().cloned())
            .collect();
        let shown = if names.is_empty() { &unresolved } else { &names };
        (shown.join(", "), members)
    };

    log::debug!(
        "Resolved collection filter '{input}' to {} members",
        members.len()
    );
    resolved.push(FilterInstance::new(
        Registry::group_template(),
        input,
        negated,
        Criterion::membership(kept, move |record| members.contains(&record.hash)),
    ));
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Group, NameComparison};
    use crate::testing::{RecordBuilder, fixed_context};

    fn groups() -> GroupMap {
        GroupMap::build(
            vec![
                Group::new("Favorites".into(), vec!["a".into(), "b".into()]),
                Group::new("Practice".into(), vec!["b".into(), "c".into()]),
            ],
            NameComparison::CaseInsensitive,
        )
    }

    fn parse(line: &str) -> FilterInstance {
        Registry::parse_command(line, &fixed_context()).unwrap()
    }

    fn resolve(filters: &[FilterInstance]) -> (Vec<FilterInstance>, Vec<ResolutionWarning>) {
        let mut warnings = Vec::new();
        let resolved = resolve_groups(filters, &groups(), &mut |w| warnings.push(w));
        (resolved, warnings)
    }

    #[test]
    fn test_without_placeholders_list_is_unchanged() {
        let filters = vec![parse("stars 5"), parse("bpm 180")];
        let (resolved, warnings) = resolve(&filters);
        assert_eq!(resolved.len(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_placeholders_become_one_trailing_filter() {
        let filters = vec![
            parse("collection favorites"),
            parse("stars 5"),
            parse("collection #2"),
        ];
        let (resolved, warnings) = resolve(&filters);
        assert!(warnings.is_empty());
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].template().key, "stars");

        let synthesized = &resolved[1];
        assert!(!synthesized.is_placeholder());
        assert!(synthesized.is_group_filter());
        assert_eq!(synthesized.input(), "Favorites, Practice");
        for (hash, expected) in [("a", true), ("b", true), ("c", true), ("d", false)] {
            assert_eq!(synthesized.includes(&RecordBuilder::new(hash).build()), expected);
        }
    }

    #[test]
    fn test_synthesized_filter_folds_into_the_next_pass() {
        let (first, _) = resolve(&[parse("collection favorites")]);
        let mut filters = first;
        filters.push(parse("stars 5"));
        filters.push(parse("collection practice"));

        let (resolved, warnings) = resolve(&filters);
        assert!(warnings.is_empty());
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].template().key, "stars");
        assert_eq!(resolved[1].input(), "Favorites, Practice");
        assert_eq!(resolved[1].group_requests().unwrap().len(), 2);
        assert!(resolved[1].includes(&RecordBuilder::new("c").build()));
    }

    #[test]
    fn test_repeated_requests_are_folded_once() {
        let filters = vec![parse("collection Favorites"), parse("collection favorites, Favorites")];
        let (resolved, warnings) = resolve(&filters);
        assert!(warnings.is_empty());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].input(), "Favorites");
    }

    #[test]
    fn test_unresolved_name_warns_and_matches_nothing() {
        let (resolved, warnings) = resolve(&[parse("collection missing")]);
        assert_eq!(
            warnings,
            vec![ResolutionWarning {
                filter: "collection missing".into(),
                name: "missing".into(),
            }]
        );
        assert_eq!(resolved.len(), 1);
        assert!(!resolved[0].includes(&RecordBuilder::new("a").build()));
    }

    #[test]
    fn test_missing_ordinal_is_unresolved() {
        let (_, warnings) = resolve(&[parse("collection #9")]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].name, "#9");
    }

    #[test]
    fn test_any_sentinel_covers_every_group() {
        let (resolved, _) = resolve(&[parse("collection *")]);
        assert_eq!(resolved[0].input(), "*");
        assert!(resolved[0].includes(&RecordBuilder::new("c").build()));
        assert!(!resolved[0].includes(&RecordBuilder::new("z").build()));
    }

    #[test]
    fn test_negated_membership() {
        let (resolved, _) = resolve(&[parse("!collection Favorites")]);
        assert!(resolved[0].negated());
        assert!(!resolved[0].includes(&RecordBuilder::new("a").build()));
        assert!(resolved[0].includes(&RecordBuilder::new("c").build()));
    }
}
