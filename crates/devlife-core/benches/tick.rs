use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use devlife_core::engine::SimulationEngine;
use devlife_core::service::{
    create_character, default_schedule, recommended_skill_distribution, SkillProfile,
};
use devlife_logic::creation::CreationInput;
use devlife_logic::traits::ids;

fn started_engine() -> SimulationEngine {
    let input = CreationInput {
        name: "Bench".to_string(),
        skills: recommended_skill_distribution(SkillProfile::Balanced),
        traits: vec![ids::FOCUSED.to_string(), ids::WORKAHOLIC.to_string()],
        schedule: default_schedule(),
    };
    let agent = match create_character(&input) {
        Ok(agent) => agent,
        Err(errors) => panic!("bench character rejected: {:?}", errors),
    };
    let mut engine = SimulationEngine::new(agent);
    if let Err(e) = engine.start() {
        panic!("engine did not start: {}", e);
    }
    engine
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("tick", |b| {
        b.iter_batched_ref(
            started_engine,
            |engine| black_box(engine.tick().ok()),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("simulated_day", |b| {
        b.iter_batched_ref(
            started_engine,
            |engine| black_box(engine.run(1440).ok()),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
