use anyhow::{bail, Context, Result};

use super::config::Band;

#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64), // Inclusive range: N-M
}

fn parse_bound(s: &str) -> Result<f64> {
    let s = s.trim();
    let value: f64 = s
        .parse()
        .with_context(|| format!("'{}' is not a number", s))?;
    if !value.is_finite() {
        bail!("'{}' is not a finite number", s);
    }
    Ok(value)
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(parse_bound(val)?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(parse_bound(val)?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(parse_bound(val)?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(parse_bound(val)?))
        } else if s.contains('-') && !s.starts_with('-') {
            // Range format: "111-140"
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() == 2 {
                let low = parse_bound(parts[0])?;
                let high = parse_bound(parts[1])?;
                if low > high {
                    bail!("Range bounds out of order: {}", s)
                }
                Ok(RangeOp::Between(low, high))
            } else {
                bail!("Invalid range format: {}", s)
            }
        } else {
            Ok(RangeOp::Equal(parse_bound(s)?))
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// A compiled band table: ordered `(range, score)` pairs plus a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBands {
    bands: Vec<(RangeOp, f64)>,
    otherwise: f64,
}

impl ScoreBands {
    pub fn compile(bands: &[Band], otherwise: f64) -> Result<Self> {
        let bands = bands
            .iter()
            .map(|b| Ok((RangeOp::parse(&b.range)?, b.score)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bands, otherwise })
    }

    /// Score for `value`: the first matching band wins, `otherwise` if none match.
    pub fn score(&self, value: f64) -> f64 {
        self.bands
            .iter()
            .find(|(range, _)| range.matches(value))
            .map(|(_, score)| *score)
            .unwrap_or(self.otherwise)
    }

    /// Highest score any value can receive.
    pub fn max_score(&self) -> f64 {
        self.bands
            .iter()
            .map(|(_, score)| *score)
            .fold(self.otherwise, f64::max)
    }
}
