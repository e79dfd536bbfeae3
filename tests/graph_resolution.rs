//! Integration tests for graph construction and plan resolution

use gantry::error::ConfigError;
use gantry::graph::{GraphBuilder, Target};
use gantry::pipeline;

fn resolve(builder: GraphBuilder, requested: &[&str]) -> Vec<String> {
    let graph = builder.build().unwrap();
    let requested: Vec<String> = requested.iter().map(|s| s.to_string()).collect();
    graph.resolve(&requested).unwrap()
}

#[test]
fn test_hard_dependencies_run_first() {
    let builder = GraphBuilder::new()
        .add(Target::new("clean"))
        .add(Target::new("restore").after(["clean"]))
        .add(Target::new("compile").depends_on(["clean", "restore"]));

    assert_eq!(resolve(builder, &["compile"]), ["clean", "restore", "compile"]);
}

#[test]
fn test_registration_order_breaks_ties() {
    // b and c are both eligible once a finishes; declaration order decides.
    let builder = GraphBuilder::new()
        .add(Target::new("a"))
        .add(Target::new("b").depends_on(["a"]))
        .add(Target::new("c").depends_on(["a"]));

    assert_eq!(resolve(builder, &["c", "b"]), ["a", "b", "c"]);
}

#[test]
fn test_repeated_resolution_is_identical() {
    let graph = pipeline::standard_graph().unwrap();
    let requested = vec!["publish".to_string()];
    let first = graph.resolve(&requested).unwrap();
    let second = graph.resolve(&requested).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_soft_ordering_does_not_expand_the_plan() {
    let builder = GraphBuilder::new()
        .add(Target::new("test").before(["publish"]))
        .add(Target::new("publish"));

    assert_eq!(resolve(builder, &["publish"]), ["publish"]);
}

#[test]
fn test_cycle_is_a_configuration_error() {
    let result = GraphBuilder::new()
        .add(Target::new("a").depends_on(["b"]))
        .add(Target::new("b").depends_on(["a"]))
        .build();

    match result {
        Err(ConfigError::CircularDependency(participants)) => {
            assert!(participants.contains('a') || participants.contains('b'));
        }
        _ => panic!("expected a cycle error"),
    }
}

#[test]
fn test_reference_to_missing_target_is_rejected() {
    let result = GraphBuilder::new()
        .add(Target::new("pack").triggers(["ship"]))
        .build();

    assert!(matches!(result, Err(ConfigError::UnknownReference(name, _)) if name == "ship"));
}

#[test]
fn test_standard_pipeline_test_plan() {
    let graph = pipeline::standard_graph().unwrap();
    let plan = graph.resolve(&["test".to_string()]).unwrap();
    assert_eq!(plan, ["clean", "restore", "compile", "test"]);
}

#[test]
fn test_standard_pipeline_publish_plan_omits_test() {
    let graph = pipeline::standard_graph().unwrap();
    let plan = graph.resolve(&["publish".to_string()]).unwrap();
    assert_eq!(plan, ["clean", "restore", "compile", "publish"]);
}

#[test]
fn test_standard_pipeline_orders_test_before_publish() {
    let graph = pipeline::standard_graph().unwrap();
    let plan = graph
        .resolve(&["publish".to_string(), "test".to_string()])
        .unwrap();
    assert_eq!(plan, ["clean", "restore", "compile", "test", "publish"]);
}
