//! Preparation of input variables before transforming.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayBase, ArrayD, DataMut, Dimension, Zip};
use tracing::info;

use crate::error::TransformError;

/// Arithmetic combining two variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    /// Division; a zero denominator yields `NaN`.
    Ratio,
}

impl ArithmeticOp {
    fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Ratio => '/',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '/' => Some(Self::Ratio),
            _ => None,
        }
    }

    fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Ratio if b == 0.0 => f64::NAN,
            Self::Ratio => a / b,
        }
    }
}

/// A variable computed from two others, written `target = lhs <op> rhs`.
///
/// Whitespace is ignored. Names consist of ASCII letters, digits and `_`.
///
/// ```
/// use hydronorm::{ArithmeticOp, DerivedVariable};
///
/// let d: DerivedVariable = "trange = tmax - tmin".parse().unwrap();
/// assert_eq!(d.target(), "trange");
/// assert_eq!(d.op(), ArithmeticOp::Subtract);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedVariable {
    target: String,
    lhs: String,
    op: ArithmeticOp,
    rhs: String,
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for DerivedVariable {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TransformError::InvalidDerivation {
            expr: s.to_string(),
            reason: reason.to_string(),
        };

        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (target, expr) = compact
            .split_once('=')
            .ok_or_else(|| invalid("expected `target = lhs <op> rhs`"))?;

        let (pos, op) = expr
            .char_indices()
            .find_map(|(i, c)| ArithmeticOp::from_symbol(c).map(|op| (i, op)))
            .ok_or_else(|| invalid("expected one of the operators +, -, /"))?;
        let (lhs, rhs) = (&expr[..pos], &expr[pos + 1..]);

        for name in [target, lhs, rhs] {
            if !is_name(name) {
                return Err(invalid(&format!("invalid variable name {name:?}")));
            }
        }

        Ok(Self {
            target: target.to_string(),
            lhs: lhs.to_string(),
            op,
            rhs: rhs.to_string(),
        })
    }
}

impl fmt::Display for DerivedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} {} {}",
            self.target,
            self.lhs,
            self.op.symbol(),
            self.rhs
        )
    }
}

impl DerivedVariable {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    pub fn rhs(&self) -> &str {
        &self.rhs
    }

    pub fn op(&self) -> ArithmeticOp {
        self.op
    }

    /// Computes the target from the named variables.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnknownVariable`] if an operand is absent
    /// and [`TransformError::ShapeMismatch`] if the operands differ in shape.
    pub fn evaluate(
        &self,
        variables: &BTreeMap<String, ArrayD<f64>>,
    ) -> Result<ArrayD<f64>, TransformError> {
        let get = |name: &str| {
            variables
                .get(name)
                .ok_or_else(|| TransformError::UnknownVariable {
                    name: name.to_string(),
                })
        };
        let lhs = get(&self.lhs)?;
        let rhs = get(&self.rhs)?;
        if lhs.shape() != rhs.shape() {
            return Err(TransformError::ShapeMismatch {
                shape: rhs.shape().to_vec(),
                expected: format!("{:?} (shape of {})", lhs.shape(), self.lhs),
            });
        }

        let op = self.op;
        Ok(Zip::from(lhs).and(rhs).map_collect(|&a, &b| op.apply(a, b)))
    }

    /// Inserts the target into `variables` unless it is already present.
    ///
    /// Returns `true` if the target was computed.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DerivedVariable::evaluate`].
    pub fn apply(
        &self,
        variables: &mut BTreeMap<String, ArrayD<f64>>,
    ) -> Result<bool, TransformError> {
        if variables.contains_key(&self.target) {
            info!(variable = %self.target, "already present, derivation skipped");
            return Ok(false);
        }
        let values = self.evaluate(variables)?;
        variables.insert(self.target.clone(), values);
        Ok(true)
    }
}

/// Clamps values into `[min, max]` in place and returns how many changed.
///
/// `NaN` values are left untouched.
pub fn constrain_range<S, D>(data: &mut ArrayBase<S, D>, min: f64, max: f64) -> usize
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    let mut below = 0usize;
    let mut above = 0usize;
    data.map_inplace(|v| {
        if *v < min {
            *v = min;
            below += 1;
        } else if *v > max {
            *v = max;
            above += 1;
        }
    });
    if below > 0 {
        info!(n = below, min, "values below range adjusted");
    }
    if above > 0 {
        info!(n = above, max, "values above range adjusted");
    }
    below + above
}
