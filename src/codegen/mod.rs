//! Rust source generation for assembled ensembles.

mod emitter;

use std::fmt;
use std::str::FromStr;

pub use emitter::Emitter;

/// Names the generated module defines itself; user-chosen names must avoid them.
pub const RESERVED_NAMES: &[&str] = &["feature_value", "NUM_CLASSES", "NUM_FEATURES", "BASE_SCORE"];

/// Float type of the generated scoring function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    /// XGBoost evaluates splits in single precision.
    #[default]
    F32,
    F64,
}

impl Precision {
    pub fn rust_type(self) -> &'static str {
        match self {
            Precision::F32 => "f32",
            Precision::F64 => "f64",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_type())
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f32" => Ok(Precision::F32),
            "f64" => Ok(Precision::F64),
            other => Err(format!("unknown precision `{other}`, expected `f32` or `f64`")),
        }
    }
}

/// How the caller marks a feature as missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingValues {
    /// `&[T]`; NaN is missing.
    #[default]
    Nan,
    /// `&[Option<T>]`; `None` (or a NaN inside `Some`) is missing.
    Option,
}

impl MissingValues {
    /// Element type of the `features` slice.
    pub fn element_type(self, precision: Precision) -> String {
        match self {
            MissingValues::Nan => precision.rust_type().to_string(),
            MissingValues::Option => format!("Option<{}>", precision.rust_type()),
        }
    }
}

impl fmt::Display for MissingValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValues::Nan => f.write_str("nan"),
            MissingValues::Option => f.write_str("option"),
        }
    }
}

impl FromStr for MissingValues {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nan" => Ok(MissingValues::Nan),
            "option" => Ok(MissingValues::Option),
            other => Err(format!("unknown missing-value mode `{other}`, expected `nan` or `option`")),
        }
    }
}

/// Render `value` as a suffixed literal of `precision`, or a constant path
/// for non-finite values.
pub fn float_literal(value: f64, precision: Precision) -> String {
    let ty = precision.rust_type();
    let (nan, infinite, positive, finite) = match precision {
        Precision::F32 => {
            let v = value as f32;
            (v.is_nan(), v.is_infinite(), v > 0.0, format!("{v:?}"))
        }
        Precision::F64 => (
            value.is_nan(),
            value.is_infinite(),
            value > 0.0,
            format!("{value:?}"),
        ),
    };
    if nan {
        format!("{ty}::NAN")
    } else if infinite && positive {
        format!("{ty}::INFINITY")
    } else if infinite {
        format!("{ty}::NEG_INFINITY")
    } else {
        format!("{finite}{ty}")
    }
}
