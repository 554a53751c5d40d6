use crate::error::{Error, ErrorKind, Result};

pub type LabelName = String;

pub type LabelValue = String;

/// Label dimensions of a metric family: the dynamic label names declared at
/// creation and the static key/value pairs attached to every instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSet {
    names: Vec<LabelName>,
    statics: Vec<(LabelName, LabelValue)>,
}

impl LabelSet {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| n.as_ref().to_string()).collect(),
            statics: vec![],
        }
    }

    #[inline]
    pub fn names(&self) -> &[LabelName] {
        &self.names
    }

    #[inline]
    pub fn statics(&self) -> &[(LabelName, LabelValue)] {
        &self.statics
    }

    // Duplicated keys are kept as is.
    pub fn add_static<K, V>(&mut self, key: K, value: V)
    where
        K: Into<LabelName>,
        V: Into<LabelValue>,
    {
        self.statics.push((key.into(), value.into()));
    }

    pub(crate) fn check_key(&self, key: &LabelKey) -> Result<()> {
        if key.is_default() || key.len() == self.names.len() {
            return Ok(());
        }
        Err(Error::with_kind(
            ErrorKind::LabelArity,
            format!(
                "expected {} label values, got {}",
                self.names.len(),
                key.len()
            ),
        ))
    }

    /// Static labels first, then the dynamic `name=value` pairs of the key.
    pub fn pairs<'a>(&'a self, key: &'a LabelKey) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.statics
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(
                self.names
                    .iter()
                    .zip(key.values())
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            )
    }
}

/// Positional dynamic label values identifying one instance of a family.
/// The empty key is the implicit "no labels" instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelKey(Vec<LabelValue>);

impl LabelKey {
    pub fn none() -> Self {
        Self(vec![])
    }

    #[inline]
    pub fn values(&self) -> &[LabelValue] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<LabelValue>> for LabelKey {
    fn from(values: Vec<LabelValue>) -> Self {
        Self(values)
    }
}

impl From<&[String]> for LabelKey {
    fn from(values: &[String]) -> Self {
        Self(values.to_vec())
    }
}

impl From<&[&str]> for LabelKey {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<&[&str; N]> for LabelKey {
    fn from(values: &[&str; N]) -> Self {
        Self(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LabelKey {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|v| v.to_string()).collect())
    }
}

// A single bare value is shorthand for a one-dimension key.
impl From<&str> for LabelKey {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for LabelKey {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&LabelKey> for LabelKey {
    fn from(key: &LabelKey) -> Self {
        key.clone()
    }
}
