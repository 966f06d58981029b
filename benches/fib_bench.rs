use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use purefn::{
    FunctionDefinition, PureFunction,
    engine::{Engine, EngineConfig},
    samples,
};

const N: u64 = 24;
const CUTOFF: u64 = 18;

struct Scenario {
    name: &'static str,
    function: PureFunction,
}

fn build_scenarios(engine: &Engine) -> Vec<Scenario> {
    let build = |definition: FunctionDefinition, caching: bool, threading: bool| {
        engine
            .build_recursive(&definition, caching, threading)
            .unwrap_or_else(|err| panic!("{}", err))
    };
    vec![
        Scenario {
            name: "recursive_lambda",
            function: engine
                .recursive_lambda(&samples::fibonacci())
                .unwrap_or_else(|err| panic!("{}", err)),
        },
        Scenario {
            name: "threading_only",
            function: build(samples::fibonacci_with_cutoff(CUTOFF), false, true),
        },
        Scenario {
            name: "caching_only",
            function: build(samples::fibonacci(), true, false),
        },
        Scenario {
            name: "caching_and_threading",
            function: build(samples::fibonacci_with_cutoff(CUTOFF), true, true),
        },
    ]
}

fn bench_fibonacci(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::default()).unwrap_or_else(|err| panic!("{}", err));
    let mut group = c.benchmark_group("fib");
    group.throughput(Throughput::Elements(1));

    group.bench_function(BenchmarkId::from_parameter("native"), |b| {
        b.iter(|| samples::native_fibonacci(black_box(N)));
    });

    for scenario in build_scenarios(&engine) {
        group.bench_with_input(
            BenchmarkId::from_parameter(scenario.name),
            &scenario.function,
            |b, function| {
                b.iter(|| {
                    // Cold cache per iteration.
                    engine.reset_cache();
                    black_box(function.call(black_box(N)).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fibonacci);
criterion_main!(benches);
