//! Target definitions
//!
//! A target is a named unit of build work: an action plus the declarations
//! that place it in the graph (hard dependencies, soft ordering, triggers)
//! and gate its execution (predicate guard, preconditions).

use crate::error::ExecutionResult;
use crate::runner::BuildContext;
use std::fmt;

/// A target's executable action
pub type Action = Box<dyn Fn(&BuildContext) -> ExecutionResult<()>>;

/// A named runtime condition evaluated against the build context
pub struct Guard {
    description: String,
    predicate: Box<dyn Fn(&BuildContext) -> bool>,
}

impl Guard {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&BuildContext) -> bool + 'static,
    {
        Guard {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Human-readable description, used in skip reasons and error messages
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluate the condition
    pub fn evaluate(&self, ctx: &BuildContext) -> bool {
        (self.predicate)(ctx)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A registered build target
///
/// Built with chained setters and handed to [`crate::graph::GraphBuilder`]:
///
/// ```no_run
/// use gantry::graph::Target;
///
/// let target = Target::new("compile")
///     .usage("Build the solution")
///     .depends_on(["clean", "restore"])
///     .action(|_ctx| Ok(()));
/// ```
pub struct Target {
    name: String,
    usage: Option<String>,
    depends_on: Vec<String>,
    after: Vec<String>,
    before: Vec<String>,
    triggers: Vec<String>,
    only_when: Option<Guard>,
    requires: Vec<Guard>,
    produces: Vec<String>,
    action: Option<Action>,
}

impl Target {
    /// Create a target with the given name and no declarations
    pub fn new(name: impl Into<String>) -> Self {
        Target {
            name: name.into(),
            usage: None,
            depends_on: Vec::new(),
            after: Vec::new(),
            before: Vec::new(),
            triggers: Vec::new(),
            only_when: None,
            requires: Vec::new(),
            produces: Vec::new(),
            action: None,
        }
    }

    /// Short usage description for listings
    pub fn usage(mut self, text: impl Into<String>) -> Self {
        self.usage = Some(text.into());
        self
    }

    /// Hard dependencies: must finalize (succeed or skip) before this target
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(names.into_iter().map(Into::into));
        self
    }

    /// Soft ordering: run after these targets when both are scheduled
    pub fn after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after.extend(names.into_iter().map(Into::into));
        self
    }

    /// Soft ordering: run before these targets when both are scheduled
    pub fn before<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.before.extend(names.into_iter().map(Into::into));
        self
    }

    /// Targets scheduled automatically after this one succeeds
    pub fn triggers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers.extend(names.into_iter().map(Into::into));
        self
    }

    /// Predicate guard: when false, the target is skipped (not an error)
    pub fn only_when<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&BuildContext) -> bool + 'static,
    {
        self.only_when = Some(Guard::new(description, predicate));
        self
    }

    /// Precondition: when false, the whole run fails before any action runs
    pub fn requires<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&BuildContext) -> bool + 'static,
    {
        self.requires.push(Guard::new(description, predicate));
        self
    }

    /// Artifact paths this target produces, relative to the repository root
    pub fn produces<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces.extend(paths.into_iter().map(Into::into));
        self
    }

    /// The target's action
    pub fn action<F>(mut self, f: F) -> Self
    where
        F: Fn(&BuildContext) -> ExecutionResult<()> + 'static,
    {
        self.action = Some(Box::new(f));
        self
    }

    // Accessors used by the resolver, the engine, and listings

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage_text(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn dependency_names(&self) -> &[String] {
        &self.depends_on
    }

    pub fn after_names(&self) -> &[String] {
        &self.after
    }

    pub fn before_names(&self) -> &[String] {
        &self.before
    }

    pub fn trigger_names(&self) -> &[String] {
        &self.triggers
    }

    pub fn guard(&self) -> Option<&Guard> {
        self.only_when.as_ref()
    }

    pub fn preconditions(&self) -> &[Guard] {
        &self.requires
    }

    pub fn produced_paths(&self) -> &[String] {
        &self.produces
    }

    /// Run the target's action, if any. Targets without an action are pure
    /// aggregation points and always succeed.
    pub fn execute(&self, ctx: &BuildContext) -> ExecutionResult<()> {
        match &self.action {
            Some(action) => action(ctx),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field("after", &self.after)
            .field("before", &self.before)
            .field("triggers", &self.triggers)
            .field("has_guard", &self.only_when.is_some())
            .field("preconditions", &self.requires.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_declarations() {
        let target = Target::new("publish")
            .usage("Publish the CLI")
            .depends_on(["compile"])
            .after(["test"])
            .triggers(["pack"])
            .produces(["packages"]);

        assert_eq!(target.name(), "publish");
        assert_eq!(target.dependency_names(), ["compile"]);
        assert_eq!(target.after_names(), ["test"]);
        assert_eq!(target.trigger_names(), ["pack"]);
        assert_eq!(target.produced_paths(), ["packages"]);
        assert!(target.guard().is_none());
    }

    #[test]
    fn test_target_without_action_succeeds() {
        let target = Target::new("noop");
        let ctx = BuildContext::new();
        assert!(target.execute(&ctx).is_ok());
    }

    #[test]
    fn test_guard_evaluates_against_context() {
        let guard = Guard::new("always false", |_| false);
        let ctx = BuildContext::new();
        assert!(!guard.evaluate(&ctx));
        assert_eq!(guard.description(), "always false");
    }
}
