use koi_core::{BoundaryPolicy, FlockSimulation, SteeringParams, Vector2};

fn scenario_params(speed: f64) -> SteeringParams {
    SteeringParams {
        speed,
        wall_detect_radius: 0.1,
        other_detect_radius: 0.2,
        separation: 1.0,
        alignment: 1.0,
        cohesion: 1.0,
        aspect_ratio: 1.0,
        boundary: BoundaryPolicy::Advisory,
    }
}

fn assert_unit_headings(flock: &FlockSimulation, step: usize) {
    for agent in flock.agents() {
        let magnitude = agent.heading().get_magnitude();
        assert!(
            (magnitude - 1.0).abs() <= 1e-6,
            "step {}: agent {} heading magnitude {}",
            step,
            agent.id(),
            magnitude
        );
    }
}

/// Five koi at the pond's natural swim speed stay near the pond for a long
/// run even though positions are never clamped.
#[test]
fn test_five_koi_stay_in_the_pond() {
    let params = scenario_params(0.0001);
    let mut flock = FlockSimulation::with_count(5, 2024);

    for step in 0..1000 {
        flock.update(0.016, &params);
        assert_unit_headings(&flock, step);
        for agent in flock.agents() {
            let Vector2 { x, y } = agent.position();
            assert!(
                (-0.5..=1.5).contains(&x) && (-0.5..=1.5).contains(&y),
                "step {}: agent {} escaped to ({}, {})",
                step,
                agent.id(),
                x,
                y
            );
        }
    }
}

/// At `speed = 0.1` a single step covers more than the whole pond, so the
/// walls cannot contain anyone; the heading invariant must hold regardless.
#[test]
fn test_fast_koi_keep_unit_headings() {
    let params = scenario_params(0.1);
    let mut flock = FlockSimulation::with_count(5, 7);

    for step in 0..1000 {
        flock.update(0.016, &params);
        assert_unit_headings(&flock, step);
        for agent in flock.agents() {
            let p = agent.position();
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }
}

#[test]
fn test_wrap_policy_keeps_everyone_inside() {
    let params = SteeringParams {
        boundary: BoundaryPolicy::Wrap,
        ..scenario_params(0.01)
    };
    let mut flock = FlockSimulation::with_count(12, 5);

    for _ in 0..500 {
        flock.update(0.016, &params);
    }
    for agent in flock.agents() {
        let p = agent.position();
        assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
    }
}

#[test]
fn test_flocking_pulls_neighbours_together() {
    let params = SteeringParams {
        wall_detect_radius: 0.0,
        separation: 0.0,
        ..scenario_params(0.0001)
    };
    let mut flock = FlockSimulation::seeded(0);
    flock.spawn_at(0.45, 0.5, 0.0);
    flock.spawn_at(0.55, 0.5, std::f64::consts::PI / 2.0);

    for _ in 0..200 {
        flock.update(0.016, &params);
    }
    let a = flock.agents()[0].heading();
    let b = flock.agents()[1].heading();
    // Alignment brings the two headings into agreement.
    assert!(a.dot(&b) > 0.99, "headings {:?} and {:?} did not align", a, b);
}
