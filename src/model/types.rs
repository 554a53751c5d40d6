use std::convert::TryFrom;
use std::fmt;

use crate::error::{Error, ErrorKind, Result};

pub type SampleValue = f64;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MetricType {
    Counter,
    Gauge,
    Untyped,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Untyped => "untyped",
        }
    }

    // Counters and untyped metrics never go down except by reset.
    #[inline]
    pub fn is_monotonic(&self) -> bool {
        !matches!(self, MetricType::Gauge)
    }

    #[inline]
    pub fn can_add(&self) -> bool {
        !matches!(self, MetricType::Untyped)
    }

    #[inline]
    pub fn can_sub(&self) -> bool {
        matches!(self, MetricType::Gauge)
    }

    pub(crate) fn wire_tag(&self) -> u64 {
        match self {
            MetricType::Counter => 0,
            MetricType::Gauge => 1,
            MetricType::Untyped => 2,
        }
    }
}

impl TryFrom<u64> for MetricType {
    type Error = Error;

    fn try_from(tag: u64) -> Result<Self> {
        match tag {
            0 => Ok(MetricType::Counter),
            1 => Ok(MetricType::Gauge),
            2 => Ok(MetricType::Untyped),
            _ => Err(Error::with_kind(
                ErrorKind::MalformedRecord,
                format!("unknown metric type tag {}", tag),
            )),
        }
    }
}

impl TryFrom<&str> for MetricType {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s {
            "counter" => Ok(MetricType::Counter),
            "gauge" => Ok(MetricType::Gauge),
            "untyped" => Ok(MetricType::Untyped),
            _ => Err(Error::new("Unexpected metric type literal")),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
