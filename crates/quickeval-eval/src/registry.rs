//! Function and constant tables for the arithmetic evaluator
//!
//! Tables are filled once when an evaluator is built and never mutated
//! afterwards.

use crate::error::{EvalError, EvalResult};
use crate::operators::arithmetic::check_finite;
use quickeval_types::AngleUnit;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Implementation of a math function over its evaluated arguments
pub type MathFn = Arc<dyn Fn(&[f64]) -> EvalResult<f64> + Send + Sync>;

/// Golden ratio
pub const PHI: f64 = 1.618_033_988_749_895;

/// Named constants substituted during normalization
pub const CONSTANTS: [(&str, f64); 4] = [
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
    ("phi", PHI),
];

/// Largest input `factorial` accepts before the result overflows `f64`
pub const MAX_FACTORIAL: f64 = 170.0;

/// A named function with a fixed arity
#[derive(Clone)]
pub struct FunctionDefinition {
    pub name: String,
    pub arity: usize,
    implementation: MathFn,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, arity: usize, implementation: MathFn) -> Self {
        Self {
            name: name.into(),
            arity,
            implementation,
        }
    }

    /// Single-argument function that cannot fail
    pub fn unary(name: impl Into<String>, f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::new(name, 1, Arc::new(move |args| Ok(f(args[0]))))
    }

    /// Invoke with exactly `arity` arguments
    pub fn call(&self, args: &[f64]) -> EvalResult<f64> {
        if args.len() < self.arity {
            return Err(EvalError::insufficient_arguments(&self.name));
        }
        (self.implementation)(args)
    }
}

impl fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Registry of math functions keyed by lower-case name
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDefinition>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: FunctionDefinition) {
        self.functions.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The built-in function set, with trigonometry reading and returning
    /// angles in `angle_unit`
    pub fn with_standard_functions(angle_unit: AngleUnit) -> Self {
        let mut registry = Self::new();

        registry.register(FunctionDefinition::unary("sin", move |x| angle_unit.to_radians(x).sin()));
        registry.register(FunctionDefinition::unary("cos", move |x| angle_unit.to_radians(x).cos()));
        registry.register(FunctionDefinition::unary("tan", move |x| angle_unit.to_radians(x).tan()));
        registry.register(FunctionDefinition::unary("asin", move |x| angle_unit.from_radians(x.asin())));
        registry.register(FunctionDefinition::unary("acos", move |x| angle_unit.from_radians(x.acos())));
        registry.register(FunctionDefinition::unary("atan", move |x| angle_unit.from_radians(x.atan())));

        registry.register(FunctionDefinition::unary("sqrt", f64::sqrt));
        registry.register(FunctionDefinition::unary("cbrt", f64::cbrt));
        registry.register(FunctionDefinition::unary("log", f64::log10));
        registry.register(FunctionDefinition::unary("log10", f64::log10));
        registry.register(FunctionDefinition::unary("ln", f64::ln));
        registry.register(FunctionDefinition::unary("log2", f64::log2));
        registry.register(FunctionDefinition::unary("abs", f64::abs));
        registry.register(FunctionDefinition::new(
            "exp",
            1,
            Arc::new(|args| check_finite("exp", args[0].exp(), args)),
        ));
        registry.register(FunctionDefinition::unary("floor", f64::floor));
        registry.register(FunctionDefinition::unary("ceil", f64::ceil));
        registry.register(FunctionDefinition::unary("round", f64::round));

        registry.register(FunctionDefinition::new(
            "factorial",
            1,
            Arc::new(|args| factorial(args[0])),
        ));
        registry.register(FunctionDefinition::new(
            "pow",
            2,
            Arc::new(|args| check_finite("pow", args[0].powf(args[1]), args)),
        ));

        registry
    }
}

/// `n!` for `0 <= n <= 170`; fractional inputs are truncated
pub fn factorial(n: f64) -> EvalResult<f64> {
    if n.is_nan() || n < 0.0 {
        return Err(EvalError::NegativeFactorial);
    }
    if n > MAX_FACTORIAL {
        return Err(EvalError::FactorialOverflow);
    }
    let n = n.trunc() as u32;
    Ok((2..=n).map(f64::from).product())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0), Ok(1.0));
        assert_eq!(factorial(5.0), Ok(120.0));
        assert_eq!(factorial(5.9), Ok(120.0));
        assert_eq!(factorial(-1.0), Err(EvalError::NegativeFactorial));
        assert_eq!(factorial(171.0), Err(EvalError::FactorialOverflow));
        assert!(factorial(170.0).unwrap().is_finite());
    }

    #[test]
    fn test_standard_registry() {
        let registry = FunctionRegistry::with_standard_functions(AngleUnit::Degrees);

        assert_eq!(registry.get("pow").map(|f| f.arity), Some(2));
        assert_eq!(registry.get("sqrt").map(|f| f.arity), Some(1));
        assert!(registry.get("sinh").is_none());

        let sin = registry.get("sin").unwrap();
        assert!((sin.call(&[90.0]).unwrap() - 1.0).abs() < 1e-12);

        let asin = registry.get("asin").unwrap();
        assert!((asin.call(&[1.0]).unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_call_checks_arity() {
        let registry = FunctionRegistry::with_standard_functions(AngleUnit::Radians);
        let pow = registry.get("pow").unwrap();
        assert_eq!(
            pow.call(&[2.0]),
            Err(EvalError::insufficient_arguments("pow"))
        );
        assert_eq!(pow.call(&[2.0, 10.0]), Ok(1024.0));
    }

    #[test]
    fn test_names_sorted() {
        let registry = FunctionRegistry::with_standard_functions(AngleUnit::Radians);
        let names = registry.names();
        assert_eq!(names.first(), Some(&"abs"));
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }
}
