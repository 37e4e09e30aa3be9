use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use crate::error::{Result, SeedError};
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolves table dependencies and derives insertion order
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on, in foreign key order
    deps: HashMap<&'static str, Vec<&'static str>>,
    /// Map of table name -> tables that depend on it
    reverse_deps: HashMap<&'static str, Vec<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let mut deps: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        let mut reverse_deps: HashMap<&'static str, Vec<&'static str>> = HashMap::new();

        for table in ALL_TABLES {
            let mut table_deps: Vec<&'static str> = Vec::new();
            for fk in table.foreign_keys {
                if !table_deps.contains(&fk.references_table) {
                    table_deps.push(fk.references_table);
                }
            }

            for dep in &table_deps {
                let children = reverse_deps.entry(*dep).or_default();
                if !children.contains(&table.name) {
                    children.push(table.name);
                }
            }
            deps.insert(table.name, table_deps);
        }

        Self { deps, reverse_deps }
    }

    /// Given a set of requested tables, resolve all required parents.
    /// Returns tables in dependency order (parents before children)
    pub fn resolve_includes(&self, requested: &[&str]) -> Result<Vec<&'static TableSchema>> {
        let mut included: HashSet<&'static str> = HashSet::new();
        let mut queue: VecDeque<&'static str> = VecDeque::new();

        for name in requested {
            queue.push_back(lookup(name)?.name);
        }

        while let Some(table_name) = queue.pop_front() {
            if !included.insert(table_name) {
                continue;
            }

            if let Some(table_deps) = self.deps.get(table_name) {
                for dep in table_deps {
                    if !included.contains(dep) {
                        queue.push_back(*dep);
                    }
                }
            }
        }

        self.ordered(&included)
    }

    /// Given a set of tables to exclude, return remaining tables in order.
    /// Tables that depend on an excluded table are dropped as well.
    pub fn resolve_excludes(&self, excluded: &[&str]) -> Result<Vec<&'static TableSchema>> {
        let mut dropped: HashSet<&'static str> = HashSet::new();
        let mut queue: VecDeque<&'static str> = VecDeque::new();

        for name in excluded {
            queue.push_back(lookup(name)?.name);
        }

        while let Some(table_name) = queue.pop_front() {
            if !dropped.insert(table_name) {
                continue;
            }
            if let Some(children) = self.reverse_deps.get(table_name) {
                queue.extend(children.iter().copied());
            }
        }

        let included: HashSet<&'static str> = ALL_TABLES
            .iter()
            .map(|t| t.name)
            .filter(|name| !dropped.contains(name))
            .collect();

        self.ordered(&included)
    }

    /// Return all tables in dependency order
    pub fn all_tables_ordered(&self) -> Result<Vec<&'static TableSchema>> {
        let included: HashSet<&'static str> = ALL_TABLES.iter().map(|t| t.name).collect();
        self.ordered(&included)
    }

    /// Check that every table appears after the parents it shares the list with
    pub fn verify_order(&self, names: &[&str]) -> Result<()> {
        let mut position: HashMap<&str, usize> = HashMap::new();
        for (idx, name) in names.iter().enumerate() {
            lookup(name)?;
            position.insert(*name, idx);
        }

        for (idx, name) in names.iter().enumerate() {
            for dep in self.deps.get(name).into_iter().flatten() {
                if *dep == *name {
                    continue;
                }
                if let Some(&parent_idx) = position.get(dep) {
                    if parent_idx > idx {
                        return Err(SeedError::OrderViolation {
                            child: name.to_string(),
                            parent: dep.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn ordered(&self, included: &HashSet<&'static str>) -> Result<Vec<&'static TableSchema>> {
        let nodes: Vec<&'static str> = ALL_TABLES
            .iter()
            .map(|t| t.name)
            .filter(|name| included.contains(name))
            .collect();

        let order = topological_sort(&nodes, |name| {
            self.deps.get(name).cloned().unwrap_or_default()
        })?;

        Ok(order.into_iter().filter_map(get_table).collect())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup(name: &str) -> Result<&'static TableSchema> {
    get_table(name).ok_or_else(|| SeedError::UnknownTable(name.to_string()))
}

/// Depth-first topological sort over `nodes`.
///
/// Nodes are visited in slice order and dependencies in the order `deps`
/// returns them, so the result is deterministic. Dependencies outside of
/// `nodes` and self references are ignored.
pub fn topological_sort<'a, F>(nodes: &[&'a str], deps: F) -> Result<Vec<&'a str>>
where
    F: Fn(&'a str) -> Vec<&'a str>,
{
    let members: HashSet<&str> = nodes.iter().copied().collect();
    let mut result = Vec::with_capacity(nodes.len());
    let mut visited: HashSet<&str> = HashSet::new();
    let mut temp_visited: HashSet<&str> = HashSet::new();

    for &node in nodes {
        visit(
            node,
            &members,
            &deps,
            &mut visited,
            &mut temp_visited,
            &mut result,
        )?;
    }

    Ok(result)
}

fn visit<'a, F>(
    name: &'a str,
    members: &HashSet<&str>,
    deps: &F,
    visited: &mut HashSet<&'a str>,
    temp_visited: &mut HashSet<&'a str>,
    result: &mut Vec<&'a str>,
) -> Result<()>
where
    F: Fn(&'a str) -> Vec<&'a str>,
{
    if visited.contains(name) {
        return Ok(());
    }
    if temp_visited.contains(name) {
        return Err(SeedError::DependencyCycle(name.to_string()));
    }

    temp_visited.insert(name);

    for dep in deps(name) {
        // Skip self-references
        if dep != name && members.contains(dep) {
            visit(dep, members, deps, visited, temp_visited, result)?;
        }
    }

    temp_visited.remove(name);
    visited.insert(name);
    result.push(name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(names: &[&str], name: &str) -> usize {
        names.iter().position(|&n| n == name).unwrap()
    }

    #[test]
    fn test_all_tables_parents_first() {
        let resolver = DependencyResolver::new();
        let tables = resolver.all_tables_ordered().unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), ALL_TABLES.len());

        for table in &tables {
            for dep in table.dependencies() {
                assert!(
                    position(&names, dep) < position(&names, table.name),
                    "{} must come before {}",
                    dep,
                    table.name
                );
            }
        }

        resolver.verify_order(&names).unwrap();
    }

    #[test]
    fn test_order_is_deterministic() {
        let first: Vec<_> = DependencyResolver::new()
            .all_tables_ordered()
            .unwrap()
            .iter()
            .map(|t| t.name)
            .collect();
        let second: Vec<_> = DependencyResolver::new()
            .all_tables_ordered()
            .unwrap()
            .iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(first, second);
        // Independent tables keep declaration order
        assert_eq!(first[0], "game_info");
    }

    #[test]
    fn test_resolve_chart_info_includes_parents() {
        let resolver = DependencyResolver::new();
        let tables = resolver.resolve_includes(&["chart_info"]).unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();

        assert_eq!(names, vec!["pack", "song", "chart_info"]);
    }

    #[test]
    fn test_resolve_best_score_pulls_in_score_chain() {
        let resolver = DependencyResolver::new();
        let tables = resolver.resolve_includes(&["best_score"]).unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();

        assert!(position(&names, "player") < position(&names, "score"));
        assert!(position(&names, "song") < position(&names, "score"));
        assert!(position(&names, "score") < position(&names, "best_score"));
        assert!(!names.contains(&"recent_score"));
    }

    #[test]
    fn test_resolve_excludes_drops_dependents() {
        let resolver = DependencyResolver::new();
        let tables = resolver.resolve_excludes(&["song"]).unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();

        for gone in [
            "song",
            "chart_info",
            "single",
            "single_purchase_info",
            "score",
            "best_score",
            "recent_score",
            "dl_request",
        ] {
            assert!(!names.contains(&gone), "{} should be excluded", gone);
        }
        assert!(names.contains(&"pack"));
        assert!(names.contains(&"world_song"));
    }

    #[test]
    fn test_unknown_table_error() {
        let resolver = DependencyResolver::new();
        assert!(matches!(
            resolver.resolve_includes(&["nonexistent"]),
            Err(SeedError::UnknownTable(_))
        ));
        assert!(resolver.resolve_excludes(&["nonexistent"]).is_err());
    }

    #[test]
    fn test_verify_order_rejects_child_first() {
        let resolver = DependencyResolver::new();
        let err = resolver.verify_order(&["chart_info", "song"]).unwrap_err();
        match err {
            SeedError::OrderViolation { child, parent } => {
                assert_eq!(child, "chart_info");
                assert_eq!(parent, "song");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Parents missing from the list are not checked
        resolver.verify_order(&["chart_info"]).unwrap();
    }

    #[test]
    fn test_cycle_is_reported() {
        let graph: HashMap<&str, Vec<&str>> =
            HashMap::from([("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["a"])]);
        let result = topological_sort(&["a", "b", "c"], |n| graph[n].clone());
        assert!(matches!(result, Err(SeedError::DependencyCycle(_))));
    }

    #[test]
    fn test_self_reference_is_ignored() {
        let graph: HashMap<&str, Vec<&str>> = HashMap::from([("a", vec!["a"]), ("b", vec!["a"])]);
        let order = topological_sort(&["b", "a"], |n| graph[n].clone()).unwrap();
        assert_eq!(order, vec!["a", "b"]);
    }
}
