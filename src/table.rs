//! Weight tables.
//!
//! A [`WeightTable`] is an ordered list of `(candidate, weight)` pairs with unique
//! candidates. Order only decides the sequence in which a draw visits candidates;
//! it is never a ranking.
//!
//! Weights are `f64`. Zero is allowed (such a candidate only wins through the
//! all-win or uniform fallbacks of a draw); negative and non-finite weights are
//! rejected with [`SamplerError::InvalidWeight`].

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Result, SamplerError};

/// Ordered candidate → weight mapping.
#[derive(Debug, Clone)]
pub struct WeightTable<K> {
    entries: Vec<(K, f64)>,
    index: HashMap<K, usize>,
    total: f64,
}

impl<K> Default for WeightTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            total: 0.0,
        }
    }
}

impl<K> WeightTable<K> {
    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no candidates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Iterate `(candidate, weight)` pairs in table order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, f64)> + '_ {
        self.entries.iter().map(|(id, w)| (id, *w))
    }

    /// Iterate candidates in table order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.entries.iter().map(|(id, _)| id)
    }

    pub(crate) fn entries(&self) -> &[(K, f64)] {
        &self.entries
    }
}

impl<K: Eq + Hash + Clone> WeightTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` candidates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            total: 0.0,
        }
    }

    /// Insert or overwrite a candidate.
    ///
    /// Overwriting keeps the candidate's original position and returns the old weight.
    /// On error the table is left unchanged.
    pub fn insert(&mut self, id: K, weight: f64) -> Result<Option<f64>> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SamplerError::InvalidWeight { weight });
        }

        match self.index.get(&id) {
            Some(&pos) => {
                let old = self.entries[pos].1;
                let total: f64 = self
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, (_, w))| if i == pos { weight } else { *w })
                    .sum();
                if !total.is_finite() {
                    return Err(SamplerError::InvalidWeight { weight });
                }
                self.entries[pos].1 = weight;
                self.total = total;
                Ok(Some(old))
            }
            None => {
                let total = self.total + weight;
                if !total.is_finite() {
                    return Err(SamplerError::InvalidWeight { weight });
                }
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, weight));
                self.total = total;
                Ok(None)
            }
        }
    }

    /// Build a table from `(candidate, weight)` pairs; later duplicates overwrite earlier ones.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        let pairs = pairs.into_iter();
        let mut table = Self::with_capacity(pairs.size_hint().0);
        for (id, weight) in pairs {
            table.insert(id, weight)?;
        }
        Ok(table)
    }

    /// Build a table from integer ticket counts.
    ///
    /// # Errors
    ///
    /// [`SamplerError::InvalidWeight`] for a count that `f64` cannot hold exactly
    /// (some counts above 2^53), since two such counts could collapse to one weight.
    pub fn from_tickets<I>(tickets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, u64)>,
    {
        let tickets = tickets.into_iter();
        let mut table = Self::with_capacity(tickets.size_hint().0);
        for (id, n) in tickets {
            let weight = n as f64;
            // u64::MAX as f64 is 2^64, which no u64 equals.
            if weight >= u64::MAX as f64 || weight as u64 != n {
                return Err(SamplerError::InvalidWeight { weight });
            }
            table.insert(id, weight)?;
        }
        Ok(table)
    }

    /// Weight of `id`, if present.
    pub fn weight(&self, id: &K) -> Option<f64> {
        self.index.get(id).map(|&pos| self.entries[pos].1)
    }

    /// True if `id` is a candidate.
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }
}

impl<'a, K> IntoIterator for &'a WeightTable<K> {
    type Item = &'a (K, f64);
    type IntoIter = std::slice::Iter<'a, (K, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Project arbitrary records into a [`WeightTable`].
///
/// `id` and `weight` pull the candidate and its weight out of each record. Records are
/// visited in order; a repeated candidate overwrites the earlier weight in place.
///
/// # Errors
///
/// [`SamplerError::InvalidWeight`] if any projected weight is negative or not finite.
pub fn build_weight_table<R, K, W, I, FI, FW>(
    records: I,
    id: FI,
    weight: FW,
) -> Result<WeightTable<K>>
where
    I: IntoIterator<Item = R>,
    K: Eq + Hash + Clone,
    W: Into<f64>,
    FI: Fn(&R) -> K,
    FW: Fn(&R) -> W,
{
    WeightTable::try_from_pairs(records.into_iter().map(|r| (id(&r), weight(&r).into())))
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::WeightTable;
    use serde::de::{Deserialize, Deserializer, Error as _};
    use serde::ser::{Serialize, SerializeSeq, Serializer};
    use std::hash::Hash;

    impl<K: Serialize> Serialize for WeightTable<K> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
            for entry in &self.entries {
                seq.serialize_element(entry)?;
            }
            seq.end()
        }
    }

    impl<'de, K> Deserialize<'de> for WeightTable<K>
    where
        K: Deserialize<'de> + Eq + Hash + Clone,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let pairs = Vec::<(K, f64)>::deserialize(deserializer)?;
            WeightTable::try_from_pairs(pairs).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_total() {
        let mut t = WeightTable::new();
        t.insert("a", 1.0).expect("weight ok");
        t.insert("b", 2.5).expect("weight ok");
        t.insert("c", 0.0).expect("weight ok");

        let ids: Vec<_> = t.ids().copied().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(t.total_weight(), 3.5);
        assert_eq!(t.weight(&"b"), Some(2.5));
        assert!(t.contains(&"c"));
        assert!(!t.contains(&"d"));
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut t = WeightTable::new();
        t.insert(1u32, 4.0).expect("weight ok");
        t.insert(2, 6.0).expect("weight ok");
        let old = t.insert(1, 10.0).expect("weight ok");

        assert_eq!(old, Some(4.0));
        assert_eq!(t.len(), 2);
        let pairs: Vec<_> = t.iter().map(|(id, w)| (*id, w)).collect();
        assert_eq!(pairs, vec![(1, 10.0), (2, 6.0)]);
        assert_eq!(t.total_weight(), 16.0);
    }

    #[test]
    fn rejects_bad_weights() {
        let mut t = WeightTable::new();
        let err = t.insert("x", -1.0).expect_err("negative rejected");
        assert_eq!(err, SamplerError::InvalidWeight { weight: -1.0 });
        let err = t.insert("x", f64::NAN).expect_err("nan rejected");
        assert!(matches!(err, SamplerError::InvalidWeight { weight } if weight.is_nan()));
        assert!(t.insert("x", f64::INFINITY).is_err());
        assert!(t.is_empty());
    }

    #[test]
    fn rejects_overflowing_total() {
        let mut t = WeightTable::new();
        t.insert("a", f64::MAX).expect("weight ok");
        assert!(t.insert("b", f64::MAX).is_err());
        assert_eq!(t.len(), 1);
        assert_eq!(t.total_weight(), f64::MAX);
    }

    #[test]
    fn build_projects_records_in_order() {
        struct Prize {
            id: &'static str,
            w: u32,
        }
        let records = vec![Prize { id: "p1", w: 10 }, Prize { id: "p2", w: 20 }];

        let t = build_weight_table(&records, |r| r.id, |r| r.w).expect("weights ok");

        let pairs: Vec<_> = t.iter().map(|(id, w)| (*id, w)).collect();
        assert_eq!(pairs, vec![("p1", 10.0), ("p2", 20.0)]);
    }

    #[test]
    fn build_last_duplicate_wins() {
        let records = [("a", 1.0), ("b", 2.0), ("a", 7.0)];
        let t = build_weight_table(records, |r| r.0, |r| r.1).expect("weights ok");
        assert_eq!(t.len(), 2);
        assert_eq!(t.weight(&"a"), Some(7.0));
        assert_eq!(t.ids().next(), Some(&"a"));
    }

    #[test]
    fn build_rejects_negative_weight() {
        let records = [("a", 1i32), ("b", -3)];
        let err = build_weight_table(records, |r| r.0, |r| r.1).expect_err("negative rejected");
        assert_eq!(err, SamplerError::InvalidWeight { weight: -3.0 });
    }

    #[test]
    fn from_tickets_converts_counts() {
        let t = WeightTable::from_tickets([("ca1", 3u64), ("ca2", 0)]).expect("counts ok");
        assert_eq!(t.weight(&"ca1"), Some(3.0));
        assert_eq!(t.total_weight(), 3.0);
    }

    #[test]
    fn from_tickets_rejects_counts_f64_cannot_hold() {
        let exact = 1u64 << 53;
        let t = WeightTable::from_tickets([("big", exact)]).expect("2^53 is exact");
        assert_eq!(t.weight(&"big"), Some(exact as f64));

        let err = WeightTable::from_tickets([("a", 1), ("b", exact + 1)]).expect_err("rounds");
        assert!(matches!(err, SamplerError::InvalidWeight { .. }));
        assert!(WeightTable::from_tickets([("max", u64::MAX)]).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_validates() {
        let t = WeightTable::try_from_pairs([("x".to_string(), 5.0), ("y".to_string(), 1.5)])
            .expect("weights ok");
        let json = serde_json::to_string(&t).expect("serialize");
        assert_eq!(json, r#"[["x",5.0],["y",1.5]]"#);

        let back: WeightTable<String> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.weight(&"y".to_string()), Some(1.5));

        let bad = serde_json::from_str::<WeightTable<String>>(r#"[["x",-2.0]]"#);
        assert!(bad.is_err());
    }
}
