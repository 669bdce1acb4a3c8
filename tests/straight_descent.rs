use crowdflow::{AgentTemplate, CrowdEngine, EngineConfig};
use glam::Vec3;

#[test]
fn agent_descends_straight_toward_an_unobstructed_target() {
    let config = EngineConfig {
        grid_width: 10,
        grid_height: 10,
        cell_size: 1.0,
        grid_origin: Vec3::ZERO,
        pool_size: 1,
        ..Default::default()
    };
    let mut engine = CrowdEngine::new(config).unwrap();
    engine.set_target(Vec3::new(8.5, 0.0, 8.5));

    let template = AgentTemplate {
        speed_max: 5.0,
        flow_weight: 1.0,
        avoid_weight: 0.0,
        cohesion_weight: 0.0,
        ..Default::default()
    };
    let id = engine.spawn(Vec3::new(1.5, 0.0, 1.5), template).unwrap();

    for _ in 0..100 {
        engine.tick(0.1);
    }

    let position = engine.iter_active_agents().find(|(i, _)| *i == id).unwrap().1.position;
    assert!(position.x >= 7.5, "x = {}", position.x);
    assert!(position.z >= 7.5, "z = {}", position.z);
}
