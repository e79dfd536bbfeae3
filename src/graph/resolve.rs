//! Graph validation and plan resolution
//!
//! `GraphBuilder` collects target definitions; `build` validates them
//! (unique names, known references, acyclicity) and freezes the result into
//! an immutable `TargetGraph`. Resolution computes the transitive closure of
//! hard dependencies for a requested set and orders it with a deterministic
//! topological sort: when several targets are simultaneously eligible, the
//! one registered earliest runs first, so plans are reproducible run to run.

use crate::error::{ConfigError, ConfigResult};
use crate::graph::Target;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Collects targets prior to validation
#[derive(Default)]
pub struct GraphBuilder {
    targets: Vec<Target>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder::default()
    }

    /// Register a target. Registration order is the tie-break order used
    /// during resolution.
    pub fn add(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Validate the collected targets and freeze them into a graph
    pub fn build(self) -> ConfigResult<TargetGraph> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (i, target) in self.targets.iter().enumerate() {
            if index.insert(target.name().to_string(), i).is_some() {
                return Err(ConfigError::DuplicateTarget(target.name().to_string()));
            }
        }

        for target in &self.targets {
            let referenced = target
                .dependency_names()
                .iter()
                .chain(target.after_names())
                .chain(target.before_names())
                .chain(target.trigger_names());
            for name in referenced {
                if !index.contains_key(name) {
                    return Err(ConfigError::UnknownReference(
                        name.clone(),
                        target.name().to_string(),
                    ));
                }
            }
        }

        let graph = TargetGraph {
            targets: self.targets,
            index,
        };

        // Feasibility check over the whole graph, soft edges included
        let everything: Vec<usize> = (0..graph.targets.len()).collect();
        graph.plan_indices(&everything, &HashSet::new())?;

        Ok(graph)
    }
}

/// Immutable, validated target graph
pub struct TargetGraph {
    targets: Vec<Target>,
    index: HashMap<String, usize>,
}

impl TargetGraph {
    /// Look up a target by name
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.index.get(name).map(|&i| &self.targets[i])
    }

    /// All targets in registration order
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve requested target names into an execution plan
    pub fn resolve(&self, requested: &[String]) -> ConfigResult<Vec<String>> {
        let indices = self.request_indices(requested)?;
        let plan = self.plan_indices(&indices, &HashSet::new())?;
        Ok(plan.into_iter().map(|i| self.targets[i].name().to_string()).collect())
    }

    pub(crate) fn node(&self, idx: usize) -> &Target {
        &self.targets[idx]
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn request_indices(&self, requested: &[String]) -> ConfigResult<Vec<usize>> {
        requested
            .iter()
            .map(|name| {
                self.index
                    .get(name)
                    .copied()
                    .ok_or_else(|| ConfigError::TargetNotFound(name.clone()))
            })
            .collect()
    }

    /// Compute an ordered plan for `requested`, treating `completed` targets
    /// as already satisfied. The completed set is how the engine re-plans the
    /// tail of a run when a trigger appends new work.
    pub(crate) fn plan_indices(
        &self,
        requested: &[usize],
        completed: &HashSet<usize>,
    ) -> ConfigResult<Vec<usize>> {
        // Transitive closure of hard dependencies
        let mut scheduled: BTreeSet<usize> = BTreeSet::new();
        let mut stack: Vec<usize> = requested
            .iter()
            .copied()
            .filter(|i| !completed.contains(i))
            .collect();
        while let Some(i) = stack.pop() {
            if scheduled.insert(i) {
                for dep in self.targets[i].dependency_names() {
                    let d = self.index[dep];
                    if !completed.contains(&d) {
                        stack.push(d);
                    }
                }
            }
        }

        // Hard and soft edges among scheduled targets. Soft edges whose other
        // endpoint is not scheduled are ignored rather than pulling it in.
        // The set also dedupes a constraint declared from both ends
        // (A.before(B) alongside B.after(A)).
        let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
        for &i in &scheduled {
            let target = &self.targets[i];
            for dep in target.dependency_names() {
                let d = self.index[dep];
                if scheduled.contains(&d) {
                    edges.insert((d, i));
                }
            }
            for name in target.after_names() {
                let j = self.index[name];
                if scheduled.contains(&j) {
                    edges.insert((j, i));
                }
            }
            for name in target.before_names() {
                let j = self.index[name];
                if scheduled.contains(&j) {
                    edges.insert((i, j));
                }
            }
        }

        let mut successors: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut in_degree: HashMap<usize, usize> = scheduled.iter().map(|&i| (i, 0)).collect();
        for &(from, to) in &edges {
            successors.entry(from).or_default().push(to);
            *in_degree.entry(to).or_insert(0) += 1;
        }

        // Kahn's algorithm with a BTreeSet frontier: the smallest eligible
        // registration index always dispatches first.
        let mut ready: BTreeSet<usize> = scheduled
            .iter()
            .copied()
            .filter(|i| in_degree[i] == 0)
            .collect();
        let mut order: Vec<usize> = Vec::with_capacity(scheduled.len());

        while let Some(&i) = ready.iter().next() {
            ready.remove(&i);
            order.push(i);
            if let Some(next) = successors.get(&i) {
                for &j in next {
                    let deg = in_degree.entry(j).or_insert(0);
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(j);
                    }
                }
            }
        }

        if order.len() != scheduled.len() {
            let placed: HashSet<usize> = order.iter().copied().collect();
            let stuck: Vec<&str> = scheduled
                .iter()
                .filter(|i| !placed.contains(i))
                .map(|&i| self.targets[i].name())
                .collect();
            return Err(ConfigError::CircularDependency(stuck.join(", ")));
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(targets: Vec<Target>) -> TargetGraph {
        let mut builder = GraphBuilder::new();
        for t in targets {
            builder = builder.add(t);
        }
        builder.build().expect("graph should be valid")
    }

    fn names(graph: &TargetGraph, requested: &[&str]) -> Vec<String> {
        let requested: Vec<String> = requested.iter().map(|s| s.to_string()).collect();
        graph.resolve(&requested).expect("resolution should succeed")
    }

    #[test]
    fn test_linear_chain_resolves_in_order() {
        let g = graph(vec![
            Target::new("a"),
            Target::new("b").depends_on(["a"]),
            Target::new("c").depends_on(["b"]),
        ]);
        assert_eq!(names(&g, &["c"]), ["a", "b", "c"]);
    }

    #[test]
    fn test_diamond_prefers_registration_order() {
        // a fans out to b and c; both are eligible after a, so the one
        // registered first (b) must come first.
        let g = graph(vec![
            Target::new("a"),
            Target::new("b").depends_on(["a"]),
            Target::new("c").depends_on(["a"]),
            Target::new("d").depends_on(["b", "c"]),
        ]);
        assert_eq!(names(&g, &["d"]), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let g = graph(vec![
            Target::new("clean"),
            Target::new("restore").after(["clean"]),
            Target::new("compile").depends_on(["clean", "restore"]),
            Target::new("publish").depends_on(["compile"]),
        ]);
        let first = names(&g, &["publish"]);
        let second = names(&g, &["publish"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_soft_edge_does_not_pull_in_target() {
        // restore runs after clean *when both are scheduled*; requesting
        // restore alone must not schedule clean.
        let g = graph(vec![
            Target::new("clean"),
            Target::new("restore").after(["clean"]),
        ]);
        assert_eq!(names(&g, &["restore"]), ["restore"]);
    }

    #[test]
    fn test_soft_edge_orders_when_both_scheduled() {
        let g = graph(vec![
            Target::new("test").before(["publish"]),
            Target::new("publish"),
        ]);
        // publish is registered later but also has no ordering reason to run
        // first; the before edge keeps test ahead of it.
        assert_eq!(names(&g, &["publish", "test"]), ["test", "publish"]);
    }

    #[test]
    fn test_before_and_after_both_declared_dedupe() {
        let g = graph(vec![
            Target::new("test").before(["publish"]),
            Target::new("publish").after(["test"]),
        ]);
        assert_eq!(names(&g, &["publish", "test"]), ["test", "publish"]);
    }

    #[test]
    fn test_duplicate_request_is_idempotent() {
        let g = graph(vec![
            Target::new("a"),
            Target::new("b").depends_on(["a"]),
        ]);
        assert_eq!(names(&g, &["b", "b", "a"]), ["a", "b"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = GraphBuilder::new()
            .add(Target::new("a"))
            .add(Target::new("a"))
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateTarget(name)) if name == "a"));
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let result = GraphBuilder::new()
            .add(Target::new("a").depends_on(["ghost"]))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::UnknownReference(name, by)) if name == "ghost" && by == "a"
        ));
    }

    #[test]
    fn test_cycle_rejected_at_build_time() {
        let result = GraphBuilder::new()
            .add(Target::new("a").depends_on(["c"]))
            .add(Target::new("b").depends_on(["a"]))
            .add(Target::new("c").depends_on(["b"]))
            .build();
        match result {
            Err(ConfigError::CircularDependency(participants)) => {
                assert!(participants.contains('a'));
                assert!(participants.contains('b'));
                assert!(participants.contains('c'));
            }
            other => panic!("expected cycle error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_soft_edge_cycle_rejected() {
        let result = GraphBuilder::new()
            .add(Target::new("a").after(["b"]))
            .add(Target::new("b").after(["a"]))
            .build();
        assert!(matches!(result, Err(ConfigError::CircularDependency(_))));
    }

    #[test]
    fn test_unknown_requested_target() {
        let g = graph(vec![Target::new("a")]);
        let result = g.resolve(&["nope".to_string()]);
        assert!(matches!(result, Err(ConfigError::TargetNotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_completed_targets_are_not_replanned() {
        let g = graph(vec![
            Target::new("a"),
            Target::new("b").depends_on(["a"]),
            Target::new("c").depends_on(["b"]),
        ]);
        let completed: HashSet<usize> = [0, 1].into_iter().collect();
        let plan = g.plan_indices(&[2], &completed).unwrap();
        assert_eq!(plan, [2]);
    }
}
