use std::fs;

use pathvector_sim::engine_runner::{EngineRunConfig, EngineRunner, OriginConfig, RouterConfig};
use pathvector_sim::rendering::{render_round, render_snapshot, DotRenderer};
use pathvector_sim::shared::{ConfigError, RunnerError};
use pathvector_sim::simulation_engine::SimulationEngine;
use pathvector_sim::topology::{DemoTopology, TopologyGenerator};

const DEMO_JSON: &str = r#"{
    "name": "demo",
    "rounds": 3,
    "routers": [
        { "id": "A", "neighbors": ["B"], "originates": [ { "prefix": "10.0.0.0/24" } ] },
        { "id": "B", "neighbors": ["C", "D"] },
        { "id": "C", "neighbors": ["D"], "originates": [ { "prefix": "20.0.0.0/24", "med": 5 } ] },
        { "id": "D", "originates": [ { "prefix": "2001:db8::/32", "local_pref": 120 } ] }
    ]
}"#;

fn router(id: &str, neighbors: &[&str]) -> RouterConfig {
    RouterConfig {
        id: id.to_string(),
        neighbors: neighbors.iter().map(|n| n.to_string()).collect(),
        originates: Vec::new(),
    }
}

#[test]
fn test_config_parses_with_defaults() {
    let config = EngineRunConfig::from_json_str(DEMO_JSON).unwrap();

    assert_eq!(config.name, "demo");
    assert_eq!(config.rounds, 3);
    assert_eq!(config.routers.len(), 4);
    assert_eq!(
        config.routers[0].originates[0],
        OriginConfig {
            prefix: "10.0.0.0/24".to_string(),
            local_pref: 100,
            med: 0,
        }
    );
    assert_eq!(config.routers[2].originates[0].med, 5);
    assert_eq!(config.routers[3].originates[0].local_pref, 120);

    let routers = config.build_routers().unwrap();
    assert!(routers.are_connected("D", "B"));
    assert!(routers.are_connected("D", "C"));
}

#[test]
fn test_rounds_default_when_missing() {
    let config = EngineRunConfig::from_json_str(r#"{ "name": "x", "routers": [] }"#).unwrap();
    assert_eq!(config.rounds, 5);
}

#[test]
fn test_config_validation_errors() {
    let unknown = EngineRunConfig::new("bad", 1).with_router(router("A", &["B"]));
    assert!(matches!(
        unknown.validate(),
        Err(ConfigError::UnknownNeighbor { ref neighbor, .. }) if neighbor == "B"
    ));

    let duplicate = EngineRunConfig::new("bad", 1)
        .with_router(router("A", &[]))
        .with_router(router("A", &[]));
    assert!(matches!(duplicate.validate(), Err(ConfigError::DuplicateRouter(_))));

    let self_link = EngineRunConfig::new("bad", 1).with_router(router("A", &["A"]));
    assert!(matches!(self_link.validate(), Err(ConfigError::SelfNeighbor(_))));

    let empty_id = EngineRunConfig::new("bad", 1).with_router(router("", &[]));
    assert!(matches!(empty_id.validate(), Err(ConfigError::EmptyRouterId)));

    let mut bad_prefix = router("A", &[]);
    bad_prefix.originates.push(OriginConfig {
        prefix: "10.0.0.300/24".to_string(),
        local_pref: 100,
        med: 0,
    });
    let bad_prefix = EngineRunConfig::new("bad", 1).with_router(bad_prefix);
    assert!(matches!(bad_prefix.build_routers(), Err(ConfigError::InvalidPrefix { .. })));

    assert!(matches!(
        EngineRunConfig::from_json_str("{ not json"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = EngineRunConfig::from_json_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_config_from_router_set_round_trips() {
    let routers = DemoTopology.generate().unwrap();
    let config = EngineRunConfig::from_router_set("demo", 4, &routers);
    config.validate().unwrap();

    let rebuilt = config.build_routers().unwrap();
    assert_eq!(rebuilt.links(), routers.links());
    assert_eq!(rebuilt.table_snapshot(), routers.table_snapshot());

    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(EngineRunConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_runner_stores_snapshots_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineRunConfig::from_json_str(DEMO_JSON).unwrap();

    let mut observed = Vec::new();
    let runner = EngineRunner::new(config)
        .with_base_dir(dir.path().to_path_buf())
        .with_worker_threads(2);
    let snapshots = runner
        .run_with_observer(|round, routers| observed.push((round, routers.len())))
        .unwrap();

    assert_eq!(snapshots.len(), 3);
    assert_eq!(observed, vec![(1, 4), (2, 4), (3, 4)]);

    let storage = dir.path().join("demo");
    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(storage.join("snapshots.json")).unwrap()).unwrap();
    assert_eq!(stored["rounds"], 3);
    assert_eq!(stored["router_count"], 4);
    assert_eq!(stored["snapshots"].as_array().unwrap().len(), 3);
    assert_eq!(
        stored["snapshots"][2]["tables"]["B"]["2001:db8::/32"]["as_path"],
        serde_json::json!(["D", "D"])
    );
    assert!(stored["generated_at"].is_string());

    let stored_config: EngineRunConfig =
        serde_json::from_str(&fs::read_to_string(storage.join("config.json")).unwrap()).unwrap();
    assert_eq!(stored_config.name, "demo");

    // Same engine, same answer
    let mut routers = stored_config.build_routers().unwrap();
    assert_eq!(SimulationEngine::sequential().run_rounds(&mut routers, 3), snapshots);
}

#[test]
fn test_observer_runs_with_progress_bar() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineRunConfig::from_json_str(DEMO_JSON).unwrap();

    let mut rendered = Vec::new();
    let snapshots = EngineRunner::new(config)
        .with_base_dir(dir.path().to_path_buf())
        .with_progress(true)
        .run_with_observer(|round, routers| rendered.push(render_round(round, routers)))
        .unwrap();

    assert_eq!(rendered.len(), 3);
    for (text, snapshot) in rendered.iter().zip(&snapshots) {
        assert_eq!(*text, render_snapshot(snapshot));
    }
}

#[test]
fn test_runner_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineRunConfig::from_json_str(DEMO_JSON).unwrap();

    EngineRunner::new(config.clone())
        .with_base_dir(dir.path().to_path_buf())
        .run()
        .unwrap();

    let again = EngineRunner::new(config.clone())
        .with_base_dir(dir.path().to_path_buf())
        .run();
    assert!(matches!(again, Err(RunnerError::StorageExists(_))));

    let replaced = EngineRunner::new(config)
        .with_base_dir(dir.path().to_path_buf())
        .with_overwrite(true)
        .run();
    assert!(replaced.is_ok());
}

#[test]
fn test_runner_writes_diagrams() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineRunConfig::from_json_str(DEMO_JSON).unwrap();

    EngineRunner::new(config)
        .with_base_dir(dir.path().to_path_buf())
        .with_write_diagrams(true)
        .run()
        .unwrap();

    let diagrams = dir.path().join("demo").join("diagrams");
    for round in 1..=3 {
        let dot = fs::read_to_string(diagrams.join(format!("round_{}.dot", round))).unwrap();
        assert!(dot.starts_with("digraph G {"));
    }
}

#[test]
fn test_dot_rendering() {
    let mut routers = DemoTopology.generate().unwrap();
    SimulationEngine::sequential().run_rounds(&mut routers, 1);

    let dot = DotRenderer::new("unused").render_round(1, &routers);
    assert!(dot.contains("\"A\" [shape=box, fillcolor=lightblue];"));
    assert!(dot.contains("\"B\" -> \"D\" [dir=both, style=dashed, color=gray];"));
    assert!(!dot.contains("\"D\" -> \"B\" [dir=both"));
    assert!(dot.contains("\"A\" -> \"B\" [label=\"10.0.0.0/24\", color=black];"));
    assert!(dot.contains("\"p_1_10_0_0_0_24\" -> \"A\" [color=green];"));
    assert!(dot.trim_end().ends_with('}'));
}

#[test]
fn test_text_rendering_matches_snapshot_rendering() {
    let mut routers = DemoTopology.generate().unwrap();
    let snapshots = SimulationEngine::sequential().run_rounds(&mut routers, 2);

    let live = render_round(2, &routers);
    assert_eq!(live, render_snapshot(&snapshots[1]));
    assert!(live.contains("Router B Routing Table:\n  10.0.0.0/24 | NextHop=A | LP=100 | MED=0 | ASPath=A A\n"));
}
