use crowdflow::{AgentTemplate, CrowdEngine, EngineConfig, EngineError};
use glam::Vec3;

#[test]
fn fifth_spawn_fails_then_despawn_frees_a_slot() {
    let config = EngineConfig {
        pool_size: 4,
        ..Default::default()
    };
    let mut engine = CrowdEngine::new(config).unwrap();

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(engine.spawn(Vec3::ZERO, AgentTemplate::default()).unwrap());
    }
    assert_eq!(engine.active_count(), 4);

    let err = engine.spawn(Vec3::ZERO, AgentTemplate::default());
    assert_eq!(err, Err(EngineError::PoolExhausted { pool_size: 4 }));

    engine.despawn(ids[0]);
    assert_eq!(engine.active_count(), 3);

    let reused = engine.spawn(Vec3::new(2.0, 0.0, 2.0), AgentTemplate::default()).unwrap();
    assert_eq!(reused, ids[0]);
    assert_eq!(engine.active_count(), 4);
}
