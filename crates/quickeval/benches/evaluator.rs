//! Evaluator benchmarks using divan
//!
//! Benchmarks for the per-domain evaluators and the full query path.

use quickeval::eval::{ArithmeticEvaluator, LogicEvaluator, UnitConverter};
use quickeval::types::EngineConfig;
use quickeval::{QueryEngine, QueryEngineConfig};

fn main() {
    divan::main();
}

// === Arithmetic ===

mod arithmetic {
    use super::*;

    #[divan::bench]
    fn simple_addition(bencher: divan::Bencher) {
        let evaluator = ArithmeticEvaluator::new(EngineConfig::default());
        bencher.bench_local(|| evaluator.evaluate(divan::black_box("2 + 3")));
    }

    #[divan::bench]
    fn precedence(bencher: divan::Bencher) {
        let evaluator = ArithmeticEvaluator::new(EngineConfig::default());
        bencher.bench_local(|| evaluator.evaluate(divan::black_box("2 + 3 * 4 - 10 / 5 ^ 2")));
    }

    #[divan::bench]
    fn functions_and_constants(bencher: divan::Bencher) {
        let evaluator = ArithmeticEvaluator::new(EngineConfig::default());
        bencher.bench_local(|| evaluator.evaluate(divan::black_box("sqrt(16) + 2pi * sin(0.5)")));
    }
}

// === Logic ===

mod logic {
    use super::*;

    #[divan::bench]
    fn boolean(bencher: divan::Bencher) {
        let evaluator = LogicEvaluator::new(EngineConfig::default());
        bencher.bench_local(|| evaluator.evaluate(divan::black_box("true and not false or false")));
    }

    #[divan::bench]
    fn bitwise(bencher: divan::Bencher) {
        let evaluator = LogicEvaluator::new(EngineConfig::default());
        bencher.bench_local(|| evaluator.evaluate(divan::black_box("(0xFF & 0x0F) << 2 | 0b1")));
    }

    #[divan::bench]
    fn comparison(bencher: divan::Bencher) {
        let evaluator = LogicEvaluator::new(EngineConfig::default());
        bencher.bench_local(|| evaluator.evaluate(divan::black_box("3.5 >= 2")));
    }
}

// === Units ===

mod units {
    use super::*;

    #[divan::bench]
    fn linear(bencher: divan::Bencher) {
        let converter = UnitConverter::new(EngineConfig::default());
        bencher.bench_local(|| converter.convert(divan::black_box("10 km to miles")));
    }

    #[divan::bench]
    fn temperature(bencher: divan::Bencher) {
        let converter = UnitConverter::new(EngineConfig::default());
        bencher.bench_local(|| converter.convert(divan::black_box("100 celsius to fahrenheit")));
    }
}

// === Query engine ===

mod query {
    use super::*;

    #[divan::bench]
    fn cached(bencher: divan::Bencher) {
        let engine = QueryEngine::new(QueryEngineConfig::default()).unwrap();
        engine.query("10 km to miles");
        bencher.bench_local(|| engine.query(divan::black_box("10 km to miles")));
    }

    #[divan::bench]
    fn uncached(bencher: divan::Bencher) {
        let engine = QueryEngine::new(QueryEngineConfig::default()).unwrap();
        bencher.bench_local(|| engine.evaluate(divan::black_box("days between 2024-01-01 and 2024-01-31")));
    }

    #[divan::bench]
    fn classify(bencher: divan::Bencher) {
        let engine = QueryEngine::new(QueryEngineConfig::default()).unwrap();
        bencher.bench_local(|| engine.module_priority(divan::black_box("100 celsius to fahrenheit")));
    }
}
