use crate::{LabelSelector, LabelSelectorRequirement};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
    sync::Arc,
};

#[derive(Clone, Debug, Eq, Default)]
pub struct Labels(Arc<Map>);

pub type Map = BTreeMap<String, String>;

pub type Expressions = Vec<Expression>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

/// Selects resources by their labels, or by any other string map such as
/// annotations.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Selector {
    match_labels: Option<Map>,
    match_expressions: Option<Expressions>,
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidSelector {
    #[error("unknown operator {operator:?} for label {key:?}")]
    UnknownOperator { key: String, operator: String },

    #[error("operator {operator} for label {key:?} requires values")]
    MissingValues { key: String, operator: Operator },

    #[error("operator {operator} for label {key:?} must not have values")]
    UnexpectedValues { key: String, operator: Operator },

    #[error("malformed selector requirement {0:?}")]
    Malformed(String),
}

// === Selector ===

impl Selector {
    pub fn from_expressions(exprs: Expressions) -> Self {
        Self {
            match_labels: None,
            match_expressions: Some(exprs),
        }
    }

    pub fn from_map(map: Map) -> Self {
        Self {
            match_labels: Some(map),
            match_expressions: None,
        }
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        for expr in self.match_expressions.iter().flatten() {
            if !expr.matches(labels.as_ref()) {
                return false;
            }
        }

        if let Some(match_labels) = self.match_labels.as_ref() {
            for (k, v) in match_labels.iter() {
                if labels.0.get(k) != Some(v) {
                    return false;
                }
            }
        }

        true
    }
}

impl TryFrom<&LabelSelector> for Selector {
    type Error = InvalidSelector;

    fn try_from(selector: &LabelSelector) -> Result<Self, Self::Error> {
        let match_expressions = selector
            .match_expressions
            .as_ref()
            .map(|exprs| {
                exprs
                    .iter()
                    .map(Expression::try_from)
                    .collect::<Result<Expressions, _>>()
            })
            .transpose()?;

        Ok(Self {
            match_labels: selector.match_labels.clone(),
            match_expressions,
        })
    }
}

/// Parses the selector syntax accepted by `kubectl --selector`: a
/// comma-separated list of `key=value`, `key==value`, `key!=value`,
/// `key in (a,b)`, `key notin (a,b)`, `key` and `!key` requirements.
///
/// An empty string selects everything.
impl FromStr for Selector {
    type Err = InvalidSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut match_labels = Map::new();
        let mut match_expressions = Expressions::new();
        if s.trim().is_empty() {
            return Ok(Self::default());
        }

        for requirement in split_requirements(s) {
            let requirement = requirement.trim();
            let malformed = || InvalidSelector::Malformed(requirement.to_string());
            let key = |key: &str| {
                let key = key.trim();
                if key.is_empty() || key.contains(char::is_whitespace) {
                    return Err(malformed());
                }
                Ok(key.to_string())
            };

            if let Some(name) = requirement.strip_prefix('!') {
                let expr = Expression::new(key(name)?, Operator::DoesNotExist, None::<String>);
                match_expressions.push(expr);
            } else if let Some((name, value)) = requirement.split_once("!=") {
                let expr = Expression::new(key(name)?, Operator::NotIn, [value.trim()]);
                match_expressions.push(expr);
            } else if let Some((name, value)) = requirement
                .split_once("==")
                .or_else(|| requirement.split_once('='))
            {
                match_labels.insert(key(name)?, value.trim().to_string());
            } else if let Some((name, set)) = requirement.split_once(char::is_whitespace) {
                let set = set.trim_start();
                let (operator, values) = match set.strip_prefix("notin") {
                    Some(values) => (Operator::NotIn, values),
                    None => (Operator::In, set.strip_prefix("in").ok_or_else(malformed)?),
                };
                let values = values
                    .trim()
                    .strip_prefix('(')
                    .and_then(|v| v.strip_suffix(')'))
                    .ok_or_else(malformed)?
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect::<Vec<_>>();
                if values.is_empty() {
                    return Err(InvalidSelector::MissingValues {
                        key: key(name)?,
                        operator,
                    });
                }
                match_expressions.push(Expression::new(key(name)?, operator, values));
            } else {
                let expr = Expression::new(key(requirement)?, Operator::Exists, None::<String>);
                match_expressions.push(expr);
            }
        }

        Ok(Self {
            match_labels: (!match_labels.is_empty()).then_some(match_labels),
            match_expressions: (!match_expressions.is_empty()).then_some(match_expressions),
        })
    }
}

/// Splits on commas outside of parenthesized value sets.
fn split_requirements(s: &str) -> impl Iterator<Item = &str> {
    let mut depth = 0usize;
    let mut start = 0;
    let mut parts = Vec::new();
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts.into_iter()
}

impl std::iter::FromIterator<(String, String)> for Selector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for Selector {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl std::iter::FromIterator<Expression> for Selector {
    fn from_iter<T: IntoIterator<Item = Expression>>(iter: T) -> Self {
        Self::from_expressions(iter.into_iter().collect())
    }
}

// === Labels ===

impl From<Map> for Labels {
    #[inline]
    fn from(labels: Map) -> Self {
        Self(Arc::new(labels))
    }
}

impl From<Option<Map>> for Labels {
    #[inline]
    fn from(labels: Option<Map>) -> Self {
        labels.unwrap_or_default().into()
    }
}

impl AsRef<Map> for Labels {
    #[inline]
    fn as_ref(&self) -> &Map {
        self.0.as_ref()
    }
}

impl<T: AsRef<Map>> std::cmp::PartialEq<T> for Labels {
    #[inline]
    fn eq(&self, t: &T) -> bool {
        self.0.as_ref().eq(t.as_ref())
    }
}

impl std::iter::FromIterator<(String, String)> for Labels {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for Labels {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

// === Expression ===

impl Expression {
    pub fn new(
        key: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, labels: &Map) -> bool {
        match self.operator {
            Operator::In => labels.get(&self.key).is_some_and(|v| self.values.contains(v)),
            Operator::NotIn => !matches!(labels.get(&self.key), Some(v) if self.values.contains(v)),
            Operator::Exists => labels.contains_key(&self.key),
            Operator::DoesNotExist => !labels.contains_key(&self.key),
        }
    }
}

impl TryFrom<&LabelSelectorRequirement> for Expression {
    type Error = InvalidSelector;

    fn try_from(req: &LabelSelectorRequirement) -> Result<Self, Self::Error> {
        let key = req.key.clone();
        let operator = match req.operator.as_str() {
            "In" => Operator::In,
            "NotIn" => Operator::NotIn,
            "Exists" => Operator::Exists,
            "DoesNotExist" => Operator::DoesNotExist,
            other => {
                return Err(InvalidSelector::UnknownOperator {
                    key,
                    operator: other.to_string(),
                })
            }
        };

        let values = req.values.clone().unwrap_or_default();
        match operator {
            Operator::In | Operator::NotIn if values.is_empty() => {
                Err(InvalidSelector::MissingValues { key, operator })
            }
            Operator::Exists | Operator::DoesNotExist if !values.is_empty() => {
                Err(InvalidSelector::UnexpectedValues { key, operator })
            }
            _ => Ok(Self::new(key, operator, values)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "In",
            Self::NotIn => "NotIn",
            Self::Exists => "Exists",
            Self::DoesNotExist => "DoesNotExist",
        })
    }
}
