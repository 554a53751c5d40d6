mod kind;
mod metric;

pub use kind::*;
pub use metric::*;

pub type Counter = Metric<CounterKind>;

pub type Gauge = Metric<GaugeKind>;

pub type Untyped = Metric<UntypedKind>;
