use std::{env, process, time::Instant};

use purefn::{
    compiler::{FunctionDefinition, PureFunction},
    curry::apply2,
    engine::{Engine, EngineConfig},
    samples,
};

const DEFAULT_FIB_TO: u64 = 32;
/// Below this argument the threaded variants stop splitting work.
const PARALLEL_CUTOFF: u64 = 25;

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|arg| arg == "--verbose");
    let dump_tree = args.iter().any(|arg| arg == "--dump-tree");
    if verbose {
        args.retain(|arg| arg != "--verbose");
    }
    if dump_tree {
        args.retain(|arg| arg != "--dump-tree");
    }
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return;
    }

    let mut logger = env_logger::Builder::from_default_env();
    if verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let Some(fib_to) = extract_number(&mut args, "--fib-to") else {
        process::exit(2);
    };
    let Some(threads) = extract_number(&mut args, "--threads") else {
        process::exit(2);
    };
    if args.len() > 1 {
        eprintln!("Error: unexpected argument `{}`", args[1]);
        print_help();
        process::exit(2);
    }

    let mut config = EngineConfig::default();
    if let Some(threads) = threads {
        config = config.with_threads(threads as usize);
    }
    let engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Error: could not start worker pool: {}", err);
            process::exit(1);
        }
    };

    if let Err(message) = run(&engine, fib_to.unwrap_or(DEFAULT_FIB_TO), dump_tree) {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn run(engine: &Engine, fib_to: u64, dump_tree: bool) -> Result<(), String> {
    let add = build(engine, &samples::add(), true, true)?;
    let sum = apply2(add.callable(), 300i32, 43i32).map_err(|e| e.to_string())?;
    println!("add(300)(43) = {}", sum);

    let weird_fib = build(engine, &samples::weird_fib(PARALLEL_CUTOFF), true, true)?;
    let weird = apply2(weird_fib.callable(), 1u64, fib_to).map_err(|e| e.to_string())?;
    println!("weird_fib(1)({}) = {}", fib_to, weird);

    let start = Instant::now();
    let result = samples::native_fibonacci(fib_to);
    report(result, start, "standard recursive function");

    let plain = engine
        .recursive_lambda(&samples::fibonacci())
        .map_err(|e| e.to_string())?;
    time(engine, &plain, fib_to, "recursive lambda")?;

    let threaded = build(engine, &samples::fibonacci_with_cutoff(PARALLEL_CUTOFF), false, true)?;
    time(engine, &threaded, fib_to, "pure function with only multithreading")?;

    let cached = build(engine, &samples::fibonacci(), true, false)?;
    time(engine, &cached, fib_to, "pure function with only caching")?;

    let both = build(engine, &samples::fibonacci_with_cutoff(PARALLEL_CUTOFF), true, true)?;
    time(engine, &both, fib_to, "pure function with multithreading & caching")?;

    let stats = engine.cache_stats();
    println!("cache: {} hit(s), {} miss(es) in the last run", stats.hits, stats.misses);

    if dump_tree {
        let json = serde_json::to_string_pretty(both.tree()).map_err(|e| e.to_string())?;
        println!("{}", json);
    }
    Ok(())
}

fn build(
    engine: &Engine,
    definition: &FunctionDefinition,
    caching: bool,
    threading: bool,
) -> Result<PureFunction, String> {
    engine
        .build_recursive(definition, caching, threading)
        .map_err(|e| e.to_string())
}

fn time(engine: &Engine, function: &PureFunction, n: u64, label: &str) -> Result<(), String> {
    engine.reset_cache();
    let start = Instant::now();
    let value = function.call(n).map_err(|e| e.to_string())?;
    let result = u64::try_from(value).map_err(|e| e.to_string())?;
    report(result, start, label);
    Ok(())
}

fn report(result: u64, start: Instant, label: &str) {
    println!(
        "{} was reached in {} ms, with {}.",
        result,
        start.elapsed().as_millis(),
        label
    );
}

fn extract_number(args: &mut Vec<String>, flag: &str) -> Option<Option<u64>> {
    let mut found = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag {
            if i + 1 >= args.len() {
                eprintln!("Usage: purefn {} <n>", flag);
                return None;
            }
            let value = args.remove(i + 1);
            args.remove(i);
            match value.parse::<u64>() {
                Ok(parsed) => found = Some(parsed),
                Err(_) => {
                    eprintln!("Error: {} expects a non-negative integer.", flag);
                    return None;
                }
            }
            continue;
        }
        i += 1;
    }
    Some(found)
}

fn print_help() {
    println!(
        "\
purefn: memoizing, parallelizing recursive functions

Usage:
  purefn [--fib-to <n>] [--threads <n>] [--dump-tree] [--verbose]

Flags:
  --fib-to <n>    Fibonacci argument used for the timing runs (default: {})
  --threads <n>   Worker threads (default: available parallelism)
  --dump-tree     Print the rewritten tree of the last function as JSON
  --verbose       Log rewrite decisions and cache activity
  -h, --help      Show this help",
        DEFAULT_FIB_TO
    );
}

