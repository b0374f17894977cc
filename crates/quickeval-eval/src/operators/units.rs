//! Unit conversion
//!
//! Two surface syntaxes are accepted:
//! - `<number> <unit> to|in <unit>` (`10 km to miles`, `5 square meters in sq feet`)
//! - `<number><unit> <unit>` (`5km miles`)
//!
//! Units are looked up in eight dimension tables. A pair converts only when
//! both names resolve in the same table. Linear units scale through the
//! table's base unit; temperatures pivot through Celsius.

use crate::error::{EvalError, EvalResult};
use once_cell::sync::Lazy;
use quickeval_types::{CalculationResult, CalculationType, EngineConfig, format_number};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static EXPLICIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?(?:\d+\.?\d*|\.\d+))\s*([a-z°²/][a-z°²/ ]*?)\s+(?:to|in)\s+([a-z°²/][a-z°²/ ]*)$")
        .expect("valid conversion pattern")
});
static COMPACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?(?:\d+\.?\d*|\.\d+))\s*([a-z°²/]+)\s+([a-z°²/]+)$").expect("valid conversion pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Weight,
    Temperature,
    Volume,
    Area,
    Time,
    Speed,
    Data,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Length,
        Dimension::Weight,
        Dimension::Temperature,
        Dimension::Volume,
        Dimension::Area,
        Dimension::Time,
        Dimension::Speed,
        Dimension::Data,
    ];

    /// Unit rows for this dimension: aliases, size in base units, display symbol
    fn rows(self) -> &'static [(&'static [&'static str], f64, &'static str)] {
        match self {
            Dimension::Length => LENGTH,
            Dimension::Weight => WEIGHT,
            Dimension::Temperature => TEMPERATURE,
            Dimension::Volume => VOLUME,
            Dimension::Area => AREA,
            Dimension::Time => TIME,
            Dimension::Speed => SPEED,
            Dimension::Data => DATA,
        }
    }

    pub const fn is_affine(self) -> bool {
        matches!(self, Dimension::Temperature)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Length => "length",
            Dimension::Weight => "weight",
            Dimension::Temperature => "temperature",
            Dimension::Volume => "volume",
            Dimension::Area => "area",
            Dimension::Time => "time",
            Dimension::Speed => "speed",
            Dimension::Data => "data",
        };
        f.write_str(name)
    }
}

const LENGTH: &[(&[&str], f64, &str)] = &[
    (&["meter", "meters", "metre", "metres", "m"], 1.0, "m"),
    (&["kilometer", "kilometers", "kilometre", "kilometres", "km"], 1000.0, "km"),
    (&["mile", "miles", "mi"], 1609.344, "mi"),
    (&["foot", "feet", "ft"], 0.3048, "ft"),
    (&["inch", "inches", "in"], 0.0254, "in"),
    (&["yard", "yards", "yd"], 0.9144, "yd"),
    (&["centimeter", "centimeters", "centimetre", "centimetres", "cm"], 0.01, "cm"),
    (&["millimeter", "millimeters", "millimetre", "millimetres", "mm"], 0.001, "mm"),
    (&["nautical mile", "nautical miles", "nmi"], 1852.0, "nmi"),
];

const WEIGHT: &[(&[&str], f64, &str)] = &[
    (&["kilogram", "kilograms", "kg"], 1.0, "kg"),
    (&["gram", "grams", "g"], 0.001, "g"),
    (&["pound", "pounds", "lb", "lbs"], 0.45359237, "lb"),
    (&["ounce", "ounces", "oz"], 0.0283495231, "oz"),
    (&["ton", "tons"], 907.18474, "ton"),
    (&["tonne", "tonnes"], 1000.0, "t"),
    (&["stone", "stones", "st"], 6.35029318, "st"),
    (&["milligram", "milligrams", "mg"], 0.000001, "mg"),
];

// Temperatures carry no scale factor; see `to_celsius` / `from_celsius`.
const TEMPERATURE: &[(&[&str], f64, &str)] = &[
    (&["celsius", "c", "°c"], 0.0, "°C"),
    (&["fahrenheit", "f", "°f"], 0.0, "°F"),
    (&["kelvin", "k"], 0.0, "K"),
];

const VOLUME: &[(&[&str], f64, &str)] = &[
    (&["liter", "liters", "litre", "litres", "l"], 1.0, "L"),
    (&["milliliter", "milliliters", "millilitre", "millilitres", "ml"], 0.001, "mL"),
    (&["gallon", "gallons", "gal"], 3.785411784, "gal"),
    (&["quart", "quarts", "qt"], 0.946352946, "qt"),
    (&["cup", "cups"], 0.2365882365, "cup"),
    (&["pint", "pints", "pt"], 0.473176473, "pt"),
    (&["fluid ounce", "fluid ounces", "fl oz", "floz"], 0.0295735296, "fl oz"),
    (&["tablespoon", "tablespoons", "tbsp"], 0.0147867648, "tbsp"),
    (&["teaspoon", "teaspoons", "tsp"], 0.00492892159, "tsp"),
];

const AREA: &[(&[&str], f64, &str)] = &[
    (&["square meter", "square meters", "sq meter", "sq meters", "m²", "m2", "sqm"], 1.0, "m²"),
    (&["square kilometer", "square kilometers", "kilometer²", "km²", "km2"], 1_000_000.0, "km²"),
    (&["acre", "acres"], 4046.8564224, "acre"),
    (&["hectare", "hectares", "ha"], 10_000.0, "ha"),
    (&["square foot", "square feet", "sq foot", "sq feet", "ft²", "ft2", "sqft"], 0.09290304, "ft²"),
    (&["square mile", "square miles", "mi²", "sqmi"], 2_589_988.110336, "mi²"),
];

const TIME: &[(&[&str], f64, &str)] = &[
    (&["second", "seconds", "sec", "secs", "s"], 1.0, "s"),
    (&["millisecond", "milliseconds", "ms"], 0.001, "ms"),
    (&["minute", "minutes", "min", "mins"], 60.0, "min"),
    (&["hour", "hours", "hr", "hrs", "h"], 3600.0, "h"),
    (&["day", "days"], 86_400.0, "day"),
    (&["week", "weeks"], 604_800.0, "week"),
    (&["month", "months"], 2_629_746.0, "month"),
    (&["year", "years", "yr", "yrs"], 31_556_952.0, "year"),
];

const SPEED: &[(&[&str], f64, &str)] = &[
    (&["m/s", "mps", "meter per second", "meters per second"], 1.0, "m/s"),
    (&["km/h", "kmh", "kph", "kilometer per hour", "kilometers per hour"], 0.2777777778, "km/h"),
    (&["mph", "mile per hour", "miles per hour"], 0.44704, "mph"),
    (&["knot", "knots", "kn"], 0.5144444444, "knot"),
];

const DATA: &[(&[&str], f64, &str)] = &[
    (&["byte", "bytes", "b"], 1.0, "B"),
    (&["kilobyte", "kilobytes", "kb", "kib"], 1024.0, "KB"),
    (&["megabyte", "megabytes", "mb", "mib"], 1_048_576.0, "MB"),
    (&["gigabyte", "gigabytes", "gb", "gib"], 1_073_741_824.0, "GB"),
    (&["terabyte", "terabytes", "tb", "tib"], 1_099_511_627_776.0, "TB"),
    (&["petabyte", "petabytes", "pb", "pib"], 1_125_899_906_842_624.0, "PB"),
];

/// How one unit relates to its dimension's base unit
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionInfo {
    pub to_base_unit: f64,
    pub symbol: &'static str,
    pub is_affine: bool,
}

/// All aliases of one dimension, keyed by lower-case name
#[derive(Debug, Clone)]
pub struct UnitTable {
    pub dimension: Dimension,
    units: HashMap<String, ConversionInfo>,
}

impl UnitTable {
    fn build(dimension: Dimension) -> Self {
        let mut units = HashMap::new();
        for (aliases, to_base_unit, symbol) in dimension.rows() {
            let info = ConversionInfo {
                to_base_unit: *to_base_unit,
                symbol,
                is_affine: dimension.is_affine(),
            };
            for alias in *aliases {
                units.insert((*alias).to_string(), info.clone());
            }
        }
        Self { dimension, units }
    }

    pub fn get(&self, unit: &str) -> Option<&ConversionInfo> {
        self.units.get(unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// A parsed `value from to` request
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub value: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    /// Extract value and unit names from either surface syntax
    pub fn parse(expression: &str) -> EvalResult<Self> {
        let normalized = SPACES.replace_all(expression.trim(), " ").to_lowercase();
        let caps = EXPLICIT
            .captures(&normalized)
            .or_else(|| COMPACT.captures(&normalized))
            .ok_or(EvalError::InvalidConversionFormat)?;

        let value = caps[1]
            .parse::<f64>()
            .map_err(|_| EvalError::invalid_number(&caps[1]))?;
        Ok(Self {
            value,
            from: caps[2].trim().to_string(),
            to: caps[3].trim().to_string(),
        })
    }
}

/// Converter over the eight built-in dimension tables
#[derive(Debug, Clone)]
pub struct UnitConverter {
    config: EngineConfig,
    tables: Vec<UnitTable>,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl UnitConverter {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            tables: Dimension::ALL.into_iter().map(UnitTable::build).collect(),
        }
    }

    pub fn tables(&self) -> &[UnitTable] {
        &self.tables
    }

    /// Find a unit in any table
    pub fn lookup(&self, unit: &str) -> Option<(Dimension, &ConversionInfo)> {
        let unit = unit.trim().to_lowercase();
        self.tables
            .iter()
            .find_map(|table| table.get(&unit).map(|info| (table.dimension, info)))
    }

    /// Convert `expression`, reporting failures as an error result
    pub fn convert(&self, expression: &str) -> CalculationResult {
        let input = expression.trim();
        match self.try_convert(input) {
            Ok(result) => result,
            Err(err) => {
                debug!(input, error = %err, "unit conversion failed");
                err.into_result(input)
            }
        }
    }

    fn try_convert(&self, input: &str) -> EvalResult<CalculationResult> {
        if input.is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        let request = ConversionRequest::parse(input)?;
        let (converted, target) = self.convert_value(request.value, &request.from, &request.to)?;
        let formatted = format_number(converted, self.config.precision);

        Ok(
            CalculationResult::success(input, formatted.clone(), CalculationType::UnitConversion)
                .with_subtitle(format!(
                    "{} {} = {} {}",
                    request.value, request.from, formatted, request.to
                ))
                .with_raw_expression(input)
                .with_numeric_value(converted)
                .with_unit(target.symbol),
        )
    }

    /// Convert a raw value, returning it with the target unit's info
    pub fn convert_value(&self, value: f64, from: &str, to: &str) -> EvalResult<(f64, &ConversionInfo)> {
        let from_key = from.trim().to_lowercase();
        let to_key = to.trim().to_lowercase();

        for table in &self.tables {
            if let (Some(source), Some(target)) = (table.get(&from_key), table.get(&to_key)) {
                return Ok((convert_between(value, source, target)?, target));
            }
        }

        match (self.lookup(&from_key), self.lookup(&to_key)) {
            (Some((source_dim, source)), Some((target_dim, target))) => {
                debug!(%source_dim, %target_dim, "units belong to different dimensions");
                if source.is_affine != target.is_affine {
                    Err(EvalError::AffineMix)
                } else {
                    Err(EvalError::incompatible_units(from, to))
                }
            }
            _ => Err(EvalError::unknown_units(from, to)),
        }
    }
}

fn convert_between(value: f64, source: &ConversionInfo, target: &ConversionInfo) -> EvalResult<f64> {
    match (source.is_affine, target.is_affine) {
        (false, false) => Ok(value * source.to_base_unit / target.to_base_unit),
        (true, true) => {
            let celsius = to_celsius(value, source.symbol)?;
            from_celsius(celsius, target.symbol)
        }
        _ => Err(EvalError::AffineMix),
    }
}

fn to_celsius(value: f64, symbol: &str) -> EvalResult<f64> {
    match symbol {
        "°C" => Ok(value),
        "°F" => Ok((value - 32.0) * 5.0 / 9.0),
        "K" => Ok(value - 273.15),
        other => Err(EvalError::unknown_units(other, "°C")),
    }
}

fn from_celsius(celsius: f64, symbol: &str) -> EvalResult<f64> {
    match symbol {
        "°C" => Ok(celsius),
        "°F" => Ok(celsius * 9.0 / 5.0 + 32.0),
        "K" => Ok(celsius + 273.15),
        other => Err(EvalError::unknown_units("°C", other)),
    }
}
