// File: crates/series-core/src/binding.rs
// Summary: Path-based value extraction over item trees with compiled, cached accessors.
// Notes:
// - Paths look like `Sales`, `Details[2].Value` or `[0]`; an empty path binds the item itself.
// - A path is parsed once into an `Accessor` (a closure over the parsed segments);
//   rows never re-parse the path string.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BindingError, Result};
use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self> {
        let raw = path.trim();
        let invalid = |reason: &str| BindingError::InvalidPath { path: raw.to_string(), reason: reason.to_string() };
        let mut segments = Vec::new();
        if raw.is_empty() {
            return Ok(Self { raw: String::new(), segments });
        }
        for (n, part) in raw.split('.').enumerate() {
            if part.is_empty() {
                return Err(invalid("empty path segment"));
            }
            let (name, mut rest) = match part.find('[') {
                Some(ix) => (&part[..ix], &part[ix..]),
                None => (part, ""),
            };
            if name.is_empty() && n > 0 {
                return Err(invalid("index without property name"));
            }
            if !name.is_empty() {
                if name.contains(']') {
                    return Err(invalid("unbalanced ']'"));
                }
                segments.push(PathSegment::Field(name.to_string()));
            }
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("missing ']'"))?;
                let digits = rest[1..close].trim();
                let index = digits.parse::<usize>().map_err(|_| invalid("index is not a non-negative integer"))?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected text after index"));
                }
            }
        }
        Ok(Self { raw: raw.to_string(), segments })
    }

    pub fn as_str(&self) -> &str { &self.raw }

    pub fn segments(&self) -> &[PathSegment] { &self.segments }

    /// Walk the path; any terminal (scalar or list) is accepted.
    pub fn walk<'a>(&self, item: &'a Value) -> Result<&'a Value> {
        let mut current = item;
        for seg in &self.segments {
            current = match seg {
                PathSegment::Field(name) => current.field(name).ok_or_else(|| BindingError::NotFound(self.raw.clone()))?,
                PathSegment::Index(index) => match current {
                    Value::List(items) => items.get(*index).ok_or_else(|| BindingError::IndexOutOfBounds {
                        path: self.raw.clone(),
                        index: *index,
                        len: items.len(),
                    })?,
                    _ => return Err(BindingError::NotFound(self.raw.clone())),
                },
            };
        }
        Ok(current)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.raw) }
}

type Getter = Arc<dyn for<'a> Fn(&'a Value) -> Result<&'a Value> + Send + Sync>;

fn getter<F>(f: F) -> Getter
where
    F: for<'a> Fn(&'a Value) -> Result<&'a Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compiled accessor for one binding path.
#[derive(Clone)]
pub struct Accessor {
    path: Arc<str>,
    get: Getter,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").field("path", &self.path).finish()
    }
}

impl Accessor {
    pub fn compile(path: &str) -> Result<Self> {
        let parsed = PropertyPath::parse(path)?;
        let raw: Arc<str> = Arc::from(parsed.as_str());
        let single_field = match parsed.segments() {
            [PathSegment::Field(name)] => Some(name.clone()),
            _ => None,
        };
        let get = if parsed.segments().is_empty() {
            getter(|item| Ok(item))
        } else if let Some(name) = single_field {
            let missing = raw.clone();
            getter(move |item| item.field(&name).ok_or_else(|| BindingError::NotFound(missing.to_string())))
        } else {
            getter(move |item| parsed.walk(item))
        };
        Ok(Self { path: raw, get })
    }

    pub fn path(&self) -> &str { &self.path }

    /// Resolve to any value, list terminals included.
    pub fn get<'a>(&self, item: &'a Value) -> Result<&'a Value> { (self.get)(item) }

    /// Resolve to a scalar; list terminals are rejected.
    pub fn scalar<'a>(&self, item: &'a Value) -> Result<&'a Value> {
        let v = self.get(item)?;
        if v.is_list() {
            return Err(BindingError::ListTerminal(self.path.to_string()));
        }
        Ok(v)
    }

    /// Numeric scalar; `Null` yields NaN (a missing value, not an error).
    pub fn number(&self, item: &Value) -> Result<f64> {
        let v = self.scalar(item)?;
        if v.is_null() {
            return Ok(f64::NAN);
        }
        v.as_f64().ok_or_else(|| BindingError::NotNumeric(self.path.to_string()))
    }

    /// List of numeric samples; non-numeric entries become NaN, a scalar becomes a one-element list.
    pub fn samples(&self, item: &Value) -> Result<Vec<f64>> {
        match self.get(item)? {
            Value::List(items) => Ok(items.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect()),
            Value::Null => Ok(Vec::new()),
            other => other.as_f64().map(|n| vec![n]).ok_or_else(|| BindingError::NotNumeric(self.path.to_string())),
        }
    }
}

/// Per-path accessor cache shared by the series of a chart.
#[derive(Debug, Default, Clone)]
pub struct AccessorCache {
    compiled: HashMap<String, Accessor>,
}

impl AccessorCache {
    pub fn new() -> Self { Self::default() }

    pub fn get_or_compile(&mut self, path: &str) -> Result<Accessor> {
        if let Some(acc) = self.compiled.get(path) {
            return Ok(acc.clone());
        }
        let acc = Accessor::compile(path)?;
        self.compiled.insert(path.to_string(), acc.clone());
        Ok(acc)
    }

    pub fn len(&self) -> usize { self.compiled.len() }

    pub fn is_empty(&self) -> bool { self.compiled.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> Value {
        Value::from(json!({
            "Name": "A",
            "Sales": 10.0,
            "Details": [{"Value": 1.0}, {"Value": 2.0}, {"Value": 3.5}],
            "Samples": [3.0, 1.0, 2.0],
            "Empty": null
        }))
    }

    #[test]
    fn parses_fields_and_indexes() {
        let p = PropertyPath::parse("Details[2].Value").unwrap();
        assert_eq!(
            p.segments(),
            &[PathSegment::Field("Details".into()), PathSegment::Index(2), PathSegment::Field("Value".into())]
        );
        assert!(PropertyPath::parse("a..b").is_err());
        assert!(PropertyPath::parse("a[x]").is_err());
        assert!(PropertyPath::parse("a[1").is_err());
    }

    #[test]
    fn resolves_nested_index_path() {
        let acc = Accessor::compile("Details[2].Value").unwrap();
        assert_eq!(acc.number(&item()).unwrap(), 3.5);
    }

    #[test]
    fn missing_and_out_of_bounds_are_errors() {
        let it = item();
        assert!(matches!(Accessor::compile("Nope").unwrap().scalar(&it), Err(BindingError::NotFound(_))));
        assert!(matches!(
            Accessor::compile("Details[9].Value").unwrap().scalar(&it),
            Err(BindingError::IndexOutOfBounds { index: 9, len: 3, .. })
        ));
    }

    #[test]
    fn list_terminal_rejected_for_scalars_but_ok_for_samples() {
        let it = item();
        let acc = Accessor::compile("Samples").unwrap();
        assert!(matches!(acc.scalar(&it), Err(BindingError::ListTerminal(_))));
        assert_eq!(acc.samples(&it).unwrap(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn null_reads_as_nan() {
        let acc = Accessor::compile("Empty").unwrap();
        assert!(acc.number(&item()).unwrap().is_nan());
    }

    #[test]
    fn cache_compiles_once_per_path() {
        let mut cache = AccessorCache::new();
        cache.get_or_compile("Sales").unwrap();
        cache.get_or_compile("Sales").unwrap();
        cache.get_or_compile("Name").unwrap();
        assert_eq!(cache.len(), 2);
    }
}
