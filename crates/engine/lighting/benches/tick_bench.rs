use criterion::{criterion_group, criterion_main, Criterion};
use lighting::glam::Vec3;
use lighting::{
    Appearance, DayNightCurve, DayNightKeyframe, FixturePosition, FixtureState, LightingConfig,
    LightingOptions, NearbyLight, Rgb, ScenarioRule, TickOrchestrator, TriggerSpec, WorldSnapshot,
};
use std::f32::consts::TAU;
use std::hint::black_box;

fn ring_of_fixtures(count: usize) -> Vec<FixturePosition> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            FixturePosition::new(
                format!("light.ring_{i}"),
                Vec3::new(angle.cos() * 250.0, angle.sin() * 250.0, 50.0),
            )
        })
        .collect()
}

fn scattered_lights(count: usize) -> Vec<NearbyLight> {
    (0..count)
        .map(|i| {
            let angle = i as f32 * 2.39996;
            let radius = 40.0 + (i % 9) as f32 * 45.0;
            NearbyLight::new(
                Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0),
                "fire",
                Rgb::FIRE_ORANGE,
                256.0,
            )
        })
        .collect()
}

fn bench_tick(c: &mut Criterion) {
    let fixtures = ring_of_fixtures(8);
    let rules = vec![
        ScenarioRule::new("combat", TriggerSpec::InCombat)
            .with_priority(10)
            .then_all(fixtures.iter().map(|f| {
                FixtureState::set(f.id.clone(), Appearance::new(Rgb::new(255, 0, 0), 100))
            })),
        ScenarioRule::new(
            "campfire",
            TriggerSpec::NearObject {
                object_type: "fire".into(),
                radius: 400.0,
            },
        )
        .with_priority(5),
    ];
    let curve = DayNightCurve::new([
        DayNightKeyframe::new(5, Rgb::new(255, 150, 90), 40),
        DayNightKeyframe::new(12, Rgb::new(255, 250, 240), 100),
        DayNightKeyframe::new(19, Rgb::new(255, 120, 60), 50),
        DayNightKeyframe::new(23, Rgb::new(20, 20, 70), 10),
    ]);
    let config = LightingConfig::new(fixtures, curve, rules, LightingOptions::default())
        .expect("valid bench config");

    let mut group = c.benchmark_group("tick");
    for light_count in [0usize, 16, 128] {
        let snapshot = WorldSnapshot {
            hour: 20.5,
            observer_yaw: 0.7,
            nearby_lights: scattered_lights(light_count),
            ..Default::default()
        };
        let mut orchestrator = TickOrchestrator::new();
        group.bench_function(format!("{light_count}_lights"), |b| {
            b.iter(|| orchestrator.tick(black_box(&snapshot), black_box(&config)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
