//! Count tables derived from marker membership.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Session;

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResultRow {
    pub cell_type: String,
    pub roi_name: String,
    pub count: usize,
}

/// Marker counts for every (cell type, ROI) pair, zeros included.
///
/// Cell types keep definition order and ROIs keep creation order, both in
/// memory and when serialized as `{cell_type: {roi_name: count}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryTable {
    rows: Vec<(String, Vec<(String, usize)>)>,
}

impl SummaryTable {
    /// Count for a pair, or None if either key is absent.
    pub fn get(&self, cell_type: &str, roi_name: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|(ct, _)| ct == cell_type)?
            .1
            .iter()
            .find(|(roi, _)| roi == roi_name)
            .map(|(_, count)| *count)
    }

    pub fn cell_types(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(ct, _)| ct.as_str())
    }

    /// `(cell_type, roi_name, count)` in cell-type-major order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.rows.iter().flat_map(|(ct, counts)| {
            counts
                .iter()
                .map(move |(roi, count)| (ct.as_str(), roi.as_str(), *count))
        })
    }

    /// `(roi_name, cell_type, count)` in ROI-major order.
    pub fn by_roi(&self) -> Vec<(&str, &str, usize)> {
        let mut rois: Vec<&str> = Vec::new();
        for (_, roi, _) in self.iter() {
            if !rois.contains(&roi) {
                rois.push(roi);
            }
        }
        rois.iter()
            .flat_map(|roi| {
                self.iter()
                    .filter(move |(_, r, _)| r == roi)
                    .map(|(ct, r, count)| (r, ct, count))
            })
            .collect()
    }

    pub fn total(&self) -> usize {
        self.iter().map(|(_, _, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

struct CountsRef<'a>(&'a [(String, usize)]);

impl Serialize for CountsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(roi, count)| (roi, count)))
    }
}

impl Serialize for SummaryTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.rows
                .iter()
                .map(|(ct, counts)| (ct, CountsRef(counts))),
        )
    }
}

/// Reads a JSON object into a Vec, keeping key order.
struct OrderedMapVisitor<V>(std::marker::PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = Vec<(String, V)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(entries)
    }
}

struct Counts(Vec<(String, usize)>);

impl<'de> Deserialize<'de> for Counts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_map(OrderedMapVisitor(std::marker::PhantomData))
            .map(Counts)
    }
}

impl<'de> Deserialize<'de> for SummaryTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows: Vec<(String, Counts)> =
            deserializer.deserialize_map(OrderedMapVisitor(std::marker::PhantomData))?;
        Ok(Self {
            rows: rows.into_iter().map(|(ct, counts)| (ct, counts.0)).collect(),
        })
    }
}

impl Session {
    /// Non-zero counts sorted by cell type, then ROI.
    pub fn results_table(&self) -> Vec<ResultRow> {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for marker in &self.markers {
            if let Some(roi) = marker.roi_name.as_deref() {
                *counts.entry((marker.cell_type.as_str(), roi)).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .map(|((cell_type, roi_name), count)| ResultRow {
                cell_type: cell_type.to_string(),
                roi_name: roi_name.to_string(),
                count,
            })
            .collect()
    }

    /// Counts for every cell type and closed ROI, zeros included.
    pub fn summary(&self) -> SummaryTable {
        let rows = self
            .cell_types
            .iter()
            .map(|ct| {
                let counts = self
                    .rois
                    .iter()
                    .map(|roi| {
                        let count = self
                            .markers
                            .iter()
                            .filter(|m| {
                                m.cell_type == ct.name
                                    && m.roi_name.as_deref() == Some(roi.name.as_str())
                            })
                            .count();
                        (roi.name.clone(), count)
                    })
                    .collect();
                (ct.name.clone(), counts)
            })
            .collect();
        SummaryTable { rows }
    }
}
