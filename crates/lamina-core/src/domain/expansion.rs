//! Dependency expansion of a requested template list.
//!
//! Requested names keep their order and multiplicity (each occurrence becomes
//! its own layer). With a single level, missing prerequisites go ahead of
//! every requested template, ordered by name. Transitively added templates go
//! directly after the last requested template they themselves need.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::error::DomainError;

/// How far `extends` declarations are followed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpansionPolicy {
    /// Only the direct `extends` of requested templates are added.
    #[default]
    SingleLevel,
    /// The full closure is added, prerequisites before dependents.
    Transitive,
}

/// Result of [`expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Final ordered template list.
    pub templates: Vec<String>,
    /// Dependencies that were not requested explicitly, in output order.
    pub added: Vec<String>,
}

impl Expansion {
    /// `true` when expansion changed the requested list.
    pub fn is_expanded(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Expand `requested` using `extends_of` to look up each template's
/// declared dependencies.
pub fn expand<E, F>(
    requested: &[String],
    policy: ExpansionPolicy,
    mut extends_of: F,
) -> Result<Expansion, E>
where
    E: From<DomainError>,
    F: FnMut(&str) -> Result<BTreeSet<String>, E>,
{
    let present: HashSet<&str> = requested.iter().map(String::as_str).collect();

    match policy {
        ExpansionPolicy::SingleLevel => {
            let mut deps = BTreeSet::new();
            let mut seen = HashSet::new();
            for name in requested {
                if seen.insert(name.as_str()) {
                    deps.extend(extends_of(name)?);
                }
            }
            let added: Vec<String> = deps
                .into_iter()
                .filter(|d| !present.contains(d.as_str()))
                .collect();
            let mut templates = added.clone();
            templates.extend(requested.iter().cloned());
            Ok(Expansion { templates, added })
        }
        ExpansionPolicy::Transitive => {
            let mut walk = ClosureWalk {
                present: &present,
                in_progress: Vec::new(),
                graph: HashMap::new(),
                out: Vec::new(),
            };
            for name in requested {
                walk.visit(name, &mut extends_of)?;
            }
            walk.place(requested).map_err(E::from)
        }
    }
}

struct ClosureWalk<'a> {
    present: &'a HashSet<&'a str>,
    in_progress: Vec<String>,
    /// Direct `extends` of every finished template.
    graph: HashMap<String, BTreeSet<String>>,
    /// Added templates in post-order, so prerequisites come first.
    out: Vec<String>,
}

impl ClosureWalk<'_> {
    fn visit<E, F>(&mut self, name: &str, extends_of: &mut F) -> Result<(), E>
    where
        E: From<DomainError>,
        F: FnMut(&str) -> Result<BTreeSet<String>, E>,
    {
        if self.graph.contains_key(name) {
            return Ok(());
        }
        if let Some(pos) = self.in_progress.iter().position(|n| n == name) {
            let mut chain = self.in_progress[pos..].to_vec();
            chain.push(name.to_string());
            return Err(DomainError::DependencyCycle { chain }.into());
        }

        self.in_progress.push(name.to_string());
        let deps = extends_of(name)?;
        for dep in &deps {
            self.visit(dep, extends_of)?;
        }
        self.in_progress.pop();

        self.graph.insert(name.to_string(), deps);
        if !self.present.contains(name) {
            self.out.push(name.to_string());
        }
        Ok(())
    }

    /// Everything `name` needs, directly or not. The graph is acyclic once
    /// every requested name has been visited.
    fn closure<'g>(
        &'g self,
        name: &str,
        memo: &mut HashMap<&'g str, BTreeSet<&'g str>>,
    ) -> BTreeSet<&'g str> {
        let Some((key, deps)) = self.graph.get_key_value(name) else {
            return BTreeSet::new();
        };
        if let Some(known) = memo.get(key.as_str()) {
            return known.clone();
        }
        let mut all = BTreeSet::new();
        for dep in deps {
            all.insert(dep.as_str());
            all.extend(self.closure(dep, memo));
        }
        memo.insert(key.as_str(), all.clone());
        all
    }

    /// Interleave the added templates with the requested list.
    ///
    /// Each added template is inserted right after the last requested
    /// template in its closure, and must still precede the first requested
    /// template that needs it.
    fn place(self, requested: &[String]) -> Result<Expansion, DomainError> {
        let mut memo = HashMap::new();
        let needs: Vec<BTreeSet<&str>> = requested
            .iter()
            .map(|name| self.closure(name, &mut memo))
            .collect();

        let mut slotted: Vec<(usize, &String)> = Vec::with_capacity(self.out.len());
        for dep in &self.out {
            let prerequisites = self.closure(dep, &mut memo);
            let slot = requested
                .iter()
                .rposition(|r| prerequisites.contains(r.as_str()))
                .map_or(0, |i| i + 1);
            let first_dependent = needs.iter().position(|n| n.contains(dep.as_str()));
            if let Some(first) = first_dependent.filter(|&first| first < slot) {
                return Err(DomainError::UnorderableDependency {
                    dependency: dep.clone(),
                    prerequisite: requested[slot - 1].clone(),
                    dependent: requested[first].clone(),
                });
            }
            slotted.push((slot, dep));
        }
        // Stable: prerequisites keep their post-order within a slot.
        slotted.sort_by_key(|(slot, _)| *slot);

        let mut templates = Vec::with_capacity(requested.len() + slotted.len());
        let mut pending = slotted.iter().peekable();
        for (i, name) in requested.iter().enumerate() {
            while let Some((_, dep)) = pending.next_if(|(slot, _)| *slot == i) {
                templates.push((*dep).clone());
            }
            templates.push(name.clone());
        }
        templates.extend(pending.map(|(_, dep)| (*dep).clone()));

        let added = slotted.into_iter().map(|(_, dep)| dep.clone()).collect();
        Ok(Expansion { templates, added })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn graph(edges: &[(&str, &[&str])]) -> HashMap<String, BTreeSet<String>> {
        edges
            .iter()
            .map(|(n, deps)| {
                (
                    n.to_string(),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect()
    }

    fn run(
        g: &HashMap<String, BTreeSet<String>>,
        requested: &[&str],
        policy: ExpansionPolicy,
    ) -> Result<Expansion, DomainError> {
        let requested: Vec<String> = requested.iter().map(|s| s.to_string()).collect();
        expand(&requested, policy, |name| {
            Ok(g.get(name).cloned().unwrap_or_default())
        })
    }

    #[test]
    fn dependency_goes_first() {
        let g = graph(&[("base", &[]), ("docker", &["base"])]);
        let e = run(&g, &["docker"], ExpansionPolicy::SingleLevel).unwrap();
        assert_eq!(e.templates, ["base", "docker"]);
        assert_eq!(e.added, ["base"]);
        assert!(e.is_expanded());
    }

    #[test]
    fn present_dependency_is_not_moved() {
        let g = graph(&[("base", &[]), ("docker", &["base"])]);
        let e = run(&g, &["docker", "base"], ExpansionPolicy::SingleLevel).unwrap();
        assert_eq!(e.templates, ["docker", "base"]);
        assert!(!e.is_expanded());
    }

    #[test]
    fn duplicates_are_kept() {
        let g = graph(&[("base", &[]), ("docker", &["base"])]);
        let e = run(&g, &["docker", "docker"], ExpansionPolicy::SingleLevel).unwrap();
        assert_eq!(e.templates, ["base", "docker", "docker"]);
    }

    #[test]
    fn union_of_dependencies_is_sorted() {
        let g = graph(&[("ci", &["lint", "base"]), ("docker", &["base"])]);
        let e = run(&g, &["docker", "ci"], ExpansionPolicy::SingleLevel).unwrap();
        assert_eq!(e.templates, ["base", "lint", "docker", "ci"]);
    }

    #[test]
    fn single_level_ignores_grandparents() {
        let g = graph(&[("ci", &["docker"]), ("docker", &["base"])]);
        let e = run(&g, &["ci"], ExpansionPolicy::SingleLevel).unwrap();
        assert_eq!(e.templates, ["docker", "ci"]);
    }

    #[test]
    fn transitive_orders_prerequisites_first() {
        let g = graph(&[("ci", &["docker"]), ("docker", &["base"]), ("base", &[])]);
        let e = run(&g, &["ci"], ExpansionPolicy::Transitive).unwrap();
        assert_eq!(e.templates, ["base", "docker", "ci"]);
        assert_eq!(e.added, ["base", "docker"]);
    }

    #[test]
    fn transitive_diamond_inserts_once() {
        let g = graph(&[
            ("app", &["docker", "lint"]),
            ("docker", &["base"]),
            ("lint", &["base"]),
        ]);
        let e = run(&g, &["app"], ExpansionPolicy::Transitive).unwrap();
        assert_eq!(e.templates, ["base", "docker", "lint", "app"]);
    }

    #[test]
    fn transitive_places_dependency_after_requested_prerequisite() {
        let g = graph(&[("ci", &["docker"]), ("docker", &["base"]), ("base", &[])]);
        let e = run(&g, &["base", "ci"], ExpansionPolicy::Transitive).unwrap();
        assert_eq!(e.templates, ["base", "docker", "ci"]);
        assert_eq!(e.added, ["docker"]);
    }

    #[test]
    fn transitive_keeps_unrelated_dependencies_up_front() {
        let g = graph(&[
            ("ci", &["docker", "lint"]),
            ("docker", &["base"]),
            ("lint", &[]),
        ]);
        let e = run(&g, &["base", "ci"], ExpansionPolicy::Transitive).unwrap();
        assert_eq!(e.templates, ["lint", "base", "docker", "ci"]);
    }

    #[test]
    fn transitive_rejects_unsatisfiable_request_order() {
        let g = graph(&[("ci", &["docker"]), ("docker", &["base"]), ("base", &[])]);
        let err = run(&g, &["ci", "base"], ExpansionPolicy::Transitive).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnorderableDependency {
                dependency: "docker".into(),
                prerequisite: "base".into(),
                dependent: "ci".into(),
            }
        );
    }

    #[test]
    fn transitive_detects_cycles() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        let err = run(&g, &["a"], ExpansionPolicy::Transitive).unwrap_err();
        assert_eq!(
            err,
            DomainError::DependencyCycle {
                chain: vec!["a".into(), "b".into(), "a".into()]
            }
        );
    }

    #[test]
    fn lookup_errors_propagate() {
        let requested = vec!["missing".to_string()];
        let result: Result<Expansion, DomainError> =
            expand(&requested, ExpansionPolicy::SingleLevel, |name| {
                Err(DomainError::invalid_template(name, "not found"))
            });
        assert!(matches!(result, Err(DomainError::InvalidTemplate { .. })));
    }
}
