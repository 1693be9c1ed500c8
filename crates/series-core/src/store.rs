// File: crates/series-core/src/store.rs
// Summary: Series data store; parallel X/Y/item sequences extracted from a bound item source.
// Notes:
// - Every completed operation leaves `x_values`, each Y column and `items` at the same length.
// - Binding failures never surface to the caller: the store stays in its last valid state
//   and a debug event records why.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::binding::{Accessor, AccessorCache};
use crate::error::{BindingError, Result};
use crate::types::DoubleRange;
use crate::value::{to_serial_date, Value};

/// Raw item reference held by a series.
pub type Item = Arc<Value>;

/// Semantic type of the X values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    String,
    Double,
    DateTime,
    TimeSpan,
    Logarithmic,
}

impl ValueType {
    pub fn is_category(&self) -> bool { matches!(self, ValueType::String) }

    /// Classify from a single non-null sample.
    pub fn sniff(sample: &Value) -> Option<ValueType> {
        match sample {
            Value::Number(_) | Value::Bool(_) => Some(ValueType::Double),
            Value::DateTime(_) => Some(ValueType::DateTime),
            Value::TimeSpan(_) => Some(ValueType::TimeSpan),
            Value::Text(_) => Some(ValueType::String),
            Value::Null | Value::List(_) | Value::Record(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// One number per row.
    #[default]
    Value,
    /// A list of numbers per row (box-and-whisker samples).
    Samples,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnBinding {
    pub path: String,
    #[serde(default)]
    pub kind: ColumnKind,
}

/// Binding paths for one series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesBinding {
    pub x_path: String,
    #[serde(default)]
    pub columns: Vec<ColumnBinding>,
    /// Treat a numeric X domain as logarithmic.
    #[serde(default)]
    pub log_x: bool,
}

impl SeriesBinding {
    pub fn new(x_path: impl Into<String>) -> Self {
        Self { x_path: x_path.into(), columns: Vec::new(), log_x: false }
    }

    pub fn value(mut self, path: impl Into<String>) -> Self {
        self.columns.push(ColumnBinding { path: path.into(), kind: ColumnKind::Value });
        self
    }

    pub fn samples(mut self, path: impl Into<String>) -> Self {
        self.columns.push(ColumnBinding { path: path.into(), kind: ColumnKind::Samples });
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum YColumn {
    Values(Vec<f64>),
    Samples(Vec<Vec<f64>>),
}

impl YColumn {
    fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Value => YColumn::Values(Vec::new()),
            ColumnKind::Samples => YColumn::Samples(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            YColumn::Values(v) => v.len(),
            YColumn::Samples(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn insert(&mut self, index: usize, cell: YCell) {
        match (self, cell) {
            (YColumn::Values(v), YCell::Value(n)) => v.insert(index, n),
            (YColumn::Samples(v), YCell::Samples(s)) => v.insert(index, s),
            (YColumn::Values(v), YCell::Samples(_)) => v.insert(index, f64::NAN),
            (YColumn::Samples(v), YCell::Value(_)) => v.insert(index, Vec::new()),
        }
    }

    fn set(&mut self, index: usize, cell: YCell) {
        match (self, cell) {
            (YColumn::Values(v), YCell::Value(n)) => v[index] = n,
            (YColumn::Samples(v), YCell::Samples(s)) => v[index] = s,
            (YColumn::Values(v), YCell::Samples(_)) => v[index] = f64::NAN,
            (YColumn::Samples(v), YCell::Value(_)) => v[index] = Vec::new(),
        }
    }

    fn remove(&mut self, index: usize) {
        match self {
            YColumn::Values(v) => { v.remove(index); }
            YColumn::Samples(v) => { v.remove(index); }
        }
    }

    fn cell(&self, index: usize) -> YCell {
        match self {
            YColumn::Values(v) => YCell::Value(v[index]),
            YColumn::Samples(v) => YCell::Samples(v[index].clone()),
        }
    }

    fn clear(&mut self) {
        match self {
            YColumn::Values(v) => v.clear(),
            YColumn::Samples(v) => v.clear(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum XCell {
    Number(f64),
    Category(String),
}

#[derive(Clone, Debug)]
enum YCell {
    Value(f64),
    Samples(Vec<f64>),
}

fn same_f64(a: f64, b: f64) -> bool { a == b || (a.is_nan() && b.is_nan()) }

impl PartialEq for YCell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (YCell::Value(a), YCell::Value(b)) => same_f64(*a, *b),
            (YCell::Samples(a), YCell::Samples(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_f64(*x, *y)),
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
struct Row {
    x: XCell,
    ys: Vec<YCell>,
}

impl Row {
    fn same_as(&self, other: &Row) -> bool {
        let x_same = match (&self.x, &other.x) {
            (XCell::Number(a), XCell::Number(b)) => same_f64(*a, *b),
            (a, b) => a == b,
        };
        x_same && self.ys == other.ys
    }
}

#[derive(Clone, Debug)]
struct CompiledBinding {
    x: Accessor,
    columns: Vec<(Accessor, ColumnKind)>,
    log_x: bool,
}

/// Result of a single-row mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationOutcome {
    pub index: usize,
    /// The new row equals the old one; callers may skip redrawing.
    pub repeat: bool,
}

#[derive(Clone, Debug)]
pub struct SeriesDataStore {
    binding: Option<CompiledBinding>,
    x_values: Vec<f64>,
    categories: Vec<String>,
    y_columns: Vec<YColumn>,
    items: Vec<Item>,
    value_type: Option<ValueType>,
    is_linear_data: bool,
    generation: u64,
}

impl Default for SeriesDataStore {
    fn default() -> Self {
        Self {
            binding: None,
            x_values: Vec::new(),
            categories: Vec::new(),
            y_columns: Vec::new(),
            items: Vec::new(),
            value_type: None,
            is_linear_data: true,
            generation: 0,
        }
    }
}

impl SeriesDataStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_binding(binding: &SeriesBinding, cache: &mut AccessorCache) -> Self {
        let mut store = Self::new();
        store.set_binding(binding, cache);
        store
    }

    /// Compile and install binding paths. Clears the current data.
    pub fn set_binding(&mut self, binding: &SeriesBinding, cache: &mut AccessorCache) {
        self.clear();
        self.binding = match compile_binding(binding, cache) {
            Ok(b) => Some(b),
            Err(err) => {
                debug!(%err, x_path = %binding.x_path, "series binding rejected");
                None
            }
        };
        self.y_columns = binding.columns.iter().map(|c| YColumn::empty(c.kind)).collect();
    }

    /// Drop all rows and start a new data generation.
    pub fn clear(&mut self) {
        self.x_values.clear();
        self.categories.clear();
        self.items.clear();
        for col in &mut self.y_columns {
            col.clear();
        }
        self.value_type = None;
        self.is_linear_data = true;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Repopulate from a complete source. Leaves the store empty when the first
    /// item does not resolve every binding path.
    pub fn rebuild<I>(&mut self, source: I)
    where
        I: IntoIterator<Item = Item>,
    {
        self.clear();
        let items: Vec<Item> = source.into_iter().collect();
        let Some(binding) = self.binding.clone() else { return };
        let Some(probe) = items.first() else { return };
        if let Err(err) = probe_paths(&binding, probe) {
            debug!(%err, "binding paths unresolved on first item; series left empty");
            return;
        }
        let Some(value_type) = classify(&binding, &items) else {
            debug!(path = binding.x.path(), "no non-null x value to classify the domain");
            return;
        };
        if value_type == ValueType::TimeSpan {
            warn!(path = binding.x.path(), "time-span x values are not supported; series left empty");
            return;
        }
        self.value_type = Some(value_type);
        self.x_values.reserve(items.len());
        self.items.reserve(items.len());
        for item in items {
            self.append(item);
        }
    }

    /// Append one item at the end. Returns `false` when the row was skipped, which only
    /// happens while the domain is still unclassified.
    pub fn append(&mut self, item: Item) -> bool {
        let index = self.len();
        self.insert(index, item).is_some()
    }

    /// Insert one item at `index` (clamped to the current length).
    pub fn insert(&mut self, index: usize, item: Item) -> Option<MutationOutcome> {
        let row = self.extract_for_mutation(&item)?;
        let index = index.min(self.len());
        match row.x {
            XCell::Number(x) => {
                self.x_values.insert(index, x);
                self.track_linear(index);
            }
            XCell::Category(label) => {
                self.categories.insert(index, label);
                self.x_values.insert(index, index as f64);
                self.reindex_categories(index);
            }
        }
        for (col, cell) in self.y_columns.iter_mut().zip(row.ys) {
            col.insert(index, cell);
        }
        self.items.insert(index, item);
        self.debug_check_lengths();
        Some(MutationOutcome { index, repeat: false })
    }

    /// Replace the row at `index`. `repeat` is set when nothing observable changed.
    pub fn replace(&mut self, index: usize, item: Item) -> Option<MutationOutcome> {
        if index >= self.len() {
            debug!(index, len = self.len(), "replace index out of range ignored");
            return None;
        }
        let row = self.extract_for_mutation(&item)?;
        let old = self.row_at(index);
        let repeat = old.same_as(&row);
        self.items[index] = item;
        if repeat {
            return Some(MutationOutcome { index, repeat });
        }
        match row.x {
            XCell::Number(x) => {
                self.x_values[index] = x;
                self.track_linear(index);
            }
            XCell::Category(label) => self.categories[index] = label,
        }
        for (col, cell) in self.y_columns.iter_mut().zip(row.ys) {
            col.set(index, cell);
        }
        self.debug_check_lengths();
        Some(MutationOutcome { index, repeat })
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.len() {
            debug!(index, len = self.len(), "remove index out of range ignored");
            return false;
        }
        self.x_values.remove(index);
        if self.is_category() {
            self.categories.remove(index);
            self.reindex_categories(index);
        }
        for col in &mut self.y_columns {
            col.remove(index);
        }
        self.items.remove(index);
        if self.items.is_empty() {
            self.value_type = None;
        }
        self.debug_check_lengths();
        true
    }

    /// Move a row, keeping every sequence aligned.
    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        if from >= self.len() || to >= self.len() {
            return false;
        }
        if from == to {
            return true;
        }
        let item = self.items.remove(from);
        let x = self.x_values.remove(from);
        let category = if self.is_category() { Some(self.categories.remove(from)) } else { None };
        let cells: Vec<YCell> = self.y_columns.iter().map(|c| c.cell(from)).collect();
        for col in &mut self.y_columns {
            col.remove(from);
        }
        self.items.insert(to, item);
        self.x_values.insert(to, x);
        for (col, cell) in self.y_columns.iter_mut().zip(cells) {
            col.insert(to, cell);
        }
        match category {
            Some(label) => {
                self.categories.insert(to, label);
                self.reindex_categories(from.min(to));
            }
            None => self.track_linear(to),
        }
        self.debug_check_lengths();
        true
    }

    /// Re-extract a row after one of its item's properties changed in place.
    pub fn refresh_row(&mut self, index: usize) -> Option<MutationOutcome> {
        let item = self.items.get(index)?.clone();
        self.replace(index, item)
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn x_values(&self) -> &[f64] { &self.x_values }

    pub fn categories(&self) -> &[String] { &self.categories }

    pub fn items(&self) -> &[Item] { &self.items }

    pub fn item(&self, index: usize) -> Option<&Item> { self.items.get(index) }

    /// Mutable access to the item at `index`; a shared item is cloned first.
    /// Call `refresh_row` afterwards so the columns pick up the change.
    pub fn item_mut(&mut self, index: usize) -> Option<&mut Value> { self.items.get_mut(index).map(Arc::make_mut) }

    pub fn column_count(&self) -> usize { self.y_columns.len() }

    pub fn column(&self, k: usize) -> Option<&YColumn> { self.y_columns.get(k) }

    /// Values of column `k`, or an empty slice when it is absent or holds samples.
    pub fn y_values(&self, k: usize) -> &[f64] {
        match self.y_columns.get(k) {
            Some(YColumn::Values(v)) => v,
            _ => &[],
        }
    }

    pub fn samples(&self, k: usize) -> &[Vec<f64>] {
        match self.y_columns.get(k) {
            Some(YColumn::Samples(v)) => v,
            _ => &[],
        }
    }

    pub fn value_type(&self) -> Option<ValueType> { self.value_type }

    pub fn is_category(&self) -> bool { self.value_type.map(|t| t.is_category()).unwrap_or(false) }

    /// True while every X strictly increased; sticky-false within a generation.
    pub fn is_linear_data(&self) -> bool { self.is_linear_data }

    pub fn generation(&self) -> u64 { self.generation }

    /// Smallest positive distance between consecutive sorted X values.
    pub fn min_x_delta(&self) -> Option<f64> {
        let mut xs: Vec<f64> = self.x_values.iter().copied().filter(|x| x.is_finite()).collect();
        if xs.len() < 2 {
            return None;
        }
        if !self.is_linear_data {
            xs.sort_by(f64::total_cmp);
        }
        xs.windows(2).map(|w| w[1] - w[0]).filter(|d| *d > 0.0).min_by(f64::total_cmp)
    }

    pub fn x_range(&self) -> DoubleRange {
        let mut r = DoubleRange::empty();
        for &x in &self.x_values {
            r.include(x);
        }
        r
    }

    pub fn y_range(&self, k: usize) -> DoubleRange {
        let mut r = DoubleRange::empty();
        match self.y_columns.get(k) {
            Some(YColumn::Values(v)) => v.iter().for_each(|y| r.include(*y)),
            Some(YColumn::Samples(v)) => v.iter().flatten().for_each(|y| r.include(*y)),
            None => {}
        }
        r
    }

    // ---- helpers ----------------------------------------------------------------

    fn extract_for_mutation(&mut self, item: &Item) -> Option<Row> {
        let binding = self.binding.clone()?;
        if self.value_type.is_none() {
            if let Err(err) = probe_paths(&binding, item) {
                debug!(%err, "binding paths unresolved on first item; row skipped");
                return None;
            }
            let value_type = classify(&binding, std::slice::from_ref(item))?;
            if value_type == ValueType::TimeSpan {
                warn!(path = binding.x.path(), "time-span x values are not supported; row skipped");
                return None;
            }
            self.value_type = Some(value_type);
        }
        let value_type = self.value_type?;
        match extract_row(&binding, value_type, item) {
            Ok(row) => Some(row),
            Err(err) => {
                // keep the item so row indexes stay equal to source indexes
                debug!(%err, "row kept as a gap");
                Some(gap_row(&binding, value_type))
            }
        }
    }

    fn row_at(&self, index: usize) -> Row {
        let x = if self.is_category() {
            XCell::Category(self.categories[index].clone())
        } else {
            XCell::Number(self.x_values[index])
        };
        Row { x, ys: self.y_columns.iter().map(|c| c.cell(index)).collect() }
    }

    fn track_linear(&mut self, index: usize) {
        if !self.is_linear_data {
            return;
        }
        let x = self.x_values[index];
        let before_ok = index == 0 || x > self.x_values[index - 1];
        let after_ok = index + 1 >= self.x_values.len() || self.x_values[index + 1] > x;
        if !(before_ok && after_ok) {
            self.is_linear_data = false;
        }
    }

    fn reindex_categories(&mut self, from: usize) {
        for (i, x) in self.x_values.iter_mut().enumerate().skip(from) {
            *x = i as f64;
        }
    }

    fn debug_check_lengths(&self) {
        debug_assert!(self.y_columns.iter().all(|c| c.len() == self.items.len()));
        debug_assert_eq!(self.x_values.len(), self.items.len());
        debug_assert!(!self.is_category() || self.categories.len() == self.items.len());
    }
}

fn compile_binding(binding: &SeriesBinding, cache: &mut AccessorCache) -> Result<CompiledBinding> {
    let x = cache.get_or_compile(&binding.x_path)?;
    let columns = binding
        .columns
        .iter()
        .map(|c| cache.get_or_compile(&c.path).map(|acc| (acc, c.kind)))
        .collect::<Result<Vec<_>>>()?;
    Ok(CompiledBinding { x, columns, log_x: binding.log_x })
}

fn probe_paths(binding: &CompiledBinding, item: &Value) -> Result<()> {
    binding.x.scalar(item)?;
    for (acc, kind) in &binding.columns {
        match kind {
            ColumnKind::Value => { acc.scalar(item)?; }
            ColumnKind::Samples => { acc.get(item)?; }
        }
    }
    Ok(())
}

fn classify(binding: &CompiledBinding, items: &[Item]) -> Option<ValueType> {
    let sample = items.iter().find_map(|it| binding.x.scalar(it).ok().filter(|v| !v.is_null()))?;
    let sniffed = ValueType::sniff(sample)?;
    Some(match sniffed {
        ValueType::Double if binding.log_x => ValueType::Logarithmic,
        other => other,
    })
}

/// Row with no usable values, held in place of an item whose X cannot be read.
fn gap_row(binding: &CompiledBinding, value_type: ValueType) -> Row {
    let x = if value_type.is_category() { XCell::Category(String::new()) } else { XCell::Number(f64::NAN) };
    let ys = binding
        .columns
        .iter()
        .map(|(_, kind)| match kind {
            ColumnKind::Value => YCell::Value(f64::NAN),
            ColumnKind::Samples => YCell::Samples(Vec::new()),
        })
        .collect();
    Row { x, ys }
}

fn extract_row(binding: &CompiledBinding, value_type: ValueType, item: &Value) -> Result<Row> {
    let raw_x = binding.x.scalar(item)?;
    let x = match value_type {
        ValueType::String => XCell::Category(raw_x.display_text()),
        ValueType::DateTime => match raw_x {
            Value::DateTime(dt) => XCell::Number(to_serial_date(dt)),
            Value::Null => XCell::Number(f64::NAN),
            other => XCell::Number(other.as_f64().ok_or_else(|| BindingError::NotNumeric(binding.x.path().to_string()))?),
        },
        ValueType::Double | ValueType::Logarithmic | ValueType::TimeSpan => {
            if raw_x.is_null() {
                XCell::Number(f64::NAN)
            } else {
                XCell::Number(raw_x.as_f64().ok_or_else(|| BindingError::NotNumeric(binding.x.path().to_string()))?)
            }
        }
    };
    let ys = binding
        .columns
        .iter()
        .map(|(acc, kind)| match kind {
            ColumnKind::Value => YCell::Value(acc.number(item).unwrap_or(f64::NAN)),
            ColumnKind::Samples => YCell::Samples(acc.samples(item).unwrap_or_default()),
        })
        .collect();
    Ok(Row { x, ys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(v: serde_json::Value) -> Item { Arc::new(Value::from(v)) }

    fn numeric_store() -> SeriesDataStore {
        let mut cache = AccessorCache::new();
        SeriesDataStore::with_binding(&SeriesBinding::new("x").value("y"), &mut cache)
    }

    #[test]
    fn rebuild_classifies_numeric_domain() {
        let mut s = numeric_store();
        s.rebuild(vec![item(json!({"x": 1, "y": 2})), item(json!({"x": 2, "y": 4}))]);
        assert_eq!(s.value_type(), Some(ValueType::Double));
        assert_eq!(s.x_values(), &[1.0, 2.0]);
        assert_eq!(s.y_values(0), &[2.0, 4.0]);
        assert!(s.is_linear_data());
    }

    #[test]
    fn rebuild_with_unresolved_probe_leaves_store_empty() {
        let mut s = numeric_store();
        s.rebuild(vec![item(json!({"x": 1, "z": 2})), item(json!({"x": 2, "y": 4}))]);
        assert!(s.is_empty());
        assert_eq!(s.value_type(), None);
    }

    #[test]
    fn category_domain_uses_indexes() {
        let mut cache = AccessorCache::new();
        let mut s = SeriesDataStore::with_binding(&SeriesBinding::new("name").value("v"), &mut cache);
        s.rebuild(vec![item(json!({"name": "a", "v": 1})), item(json!({"name": "b", "v": 2}))]);
        assert_eq!(s.value_type(), Some(ValueType::String));
        s.insert(0, item(json!({"name": "z", "v": 0})));
        assert_eq!(s.categories(), &["z".to_string(), "a".into(), "b".into()]);
        assert_eq!(s.x_values(), &[0.0, 1.0, 2.0]);
        s.remove_at(1);
        assert_eq!(s.x_values(), &[0.0, 1.0]);
    }

    #[test]
    fn datetime_domain_uses_serial_dates() {
        let mut s = numeric_store();
        s.rebuild(vec![item(json!({"x": "1900-01-01T12:00:00", "y": 1}))]);
        assert_eq!(s.value_type(), Some(ValueType::DateTime));
        assert!((s.x_values()[0] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn replace_reports_repeat() {
        let mut s = numeric_store();
        s.rebuild(vec![item(json!({"x": 1, "y": 2}))]);
        let out = s.replace(0, item(json!({"x": 1, "y": 2}))).unwrap();
        assert!(out.repeat);
        let out = s.replace(0, item(json!({"x": 1, "y": 3}))).unwrap();
        assert!(!out.repeat);
        assert_eq!(s.y_values(0), &[3.0]);
    }

    #[test]
    fn missing_y_in_later_rows_is_nan() {
        let mut s = numeric_store();
        s.rebuild(vec![item(json!({"x": 1, "y": 2})), item(json!({"x": 2}))]);
        assert_eq!(s.len(), 2);
        assert!(s.y_values(0)[1].is_nan());
    }

    #[test]
    fn linear_flag_is_sticky() {
        let mut s = numeric_store();
        for x in [1.0, 2.0, 2.0, 3.0] {
            s.append(item(json!({"x": x, "y": 0})));
        }
        assert!(!s.is_linear_data());
        s.remove_at(2);
        assert!(!s.is_linear_data());
    }

    #[test]
    fn unreadable_x_keeps_a_gap_row() {
        let mut s = numeric_store();
        s.rebuild(vec![item(json!({"x": 1, "y": 10})), item(json!({"x": "oops", "y": 20})), item(json!({"x": 3, "y": 30}))]);
        assert_eq!(s.len(), 3);
        assert!(s.x_values()[1].is_nan());
        assert!(s.y_values(0)[1].is_nan());
        s.replace(2, item(json!({"x": 3, "y": 99})));
        assert_eq!(s.y_values(0)[0], 10.0);
        assert_eq!(s.y_values(0)[2], 99.0);
    }

    #[test]
    fn item_mut_then_refresh_reextracts() {
        let mut s = numeric_store();
        let shared = item(json!({"x": 1, "y": 2}));
        s.rebuild(vec![shared.clone()]);
        if let Some(y) = s.item_mut(0).and_then(|v| v.field_mut("y")) {
            *y = Value::from(5.0);
        }
        let out = s.refresh_row(0).unwrap();
        assert!(!out.repeat);
        assert_eq!(s.y_values(0), &[5.0]);
        // the caller's handle is untouched
        assert_eq!(shared.field("y").and_then(Value::as_f64), Some(2.0));
    }

    #[test]
    fn timespan_domain_is_noop() {
        let mut cache = AccessorCache::new();
        let mut s = SeriesDataStore::with_binding(&SeriesBinding::new("t").value("v"), &mut cache);
        let it = Arc::new(Value::record([("t", Value::TimeSpan(chrono::TimeDelta::seconds(5))), ("v", Value::from(1.0))]));
        s.rebuild(vec![it]);
        assert!(s.is_empty());
    }
}
