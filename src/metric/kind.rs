use crate::model::MetricType;

/// Type-level tag selecting which operations a [`Metric`](super::Metric) handle exposes.
pub trait Kind {
    const TYPE: MetricType;
}

/// Kinds supporting `inc`/`add`.
pub trait Increment: Kind {}

/// Kinds supporting `dec`/`sub`.
pub trait Decrement: Increment {}

#[derive(Debug)]
pub enum CounterKind {}

#[derive(Debug)]
pub enum GaugeKind {}

#[derive(Debug)]
pub enum UntypedKind {}

impl Kind for CounterKind {
    const TYPE: MetricType = MetricType::Counter;
}

impl Kind for GaugeKind {
    const TYPE: MetricType = MetricType::Gauge;
}

impl Kind for UntypedKind {
    const TYPE: MetricType = MetricType::Untyped;
}

impl Increment for CounterKind {}

impl Increment for GaugeKind {}

impl Decrement for GaugeKind {}
