//! Takeoff model: takeoffs, listings and materials
//!
//! Takeoffs are stored once in an arena owned by [`TakeoffModel`] and are
//! addressed by [`TakeoffId`]. Listings and materials map identity keys to
//! ids in insertion order, which is the order items appear in the exports.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Build an identity key: `plan|type|name` with all whitespace removed
pub fn identity_key(plan: &str, type_name: &str, name: &str) -> String {
    format!("{}|{}|{}", plan, type_name, name)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Type-based partition of takeoffs for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listing {
    Struct,
    Deck,
    Cxn,
}

impl Listing {
    /// Listing for an exported type: `Decking` and `Cxn` get their own,
    /// everything else is structural
    pub fn for_type(type_name: &str) -> Self {
        match type_name {
            "Decking" => Listing::Deck,
            "Cxn" => Listing::Cxn,
            _ => Listing::Struct,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Listing::Struct => "struct",
            Listing::Deck => "deck",
            Listing::Cxn => "cxn",
        }
    }

    pub fn all() -> &'static [Listing] {
        &[Listing::Struct, Listing::Deck, Listing::Cxn]
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle to a takeoff stored in a [`TakeoffModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TakeoffId(usize);

/// One line-item occurrence of a component on one plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Takeoff {
    pub plan: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    pub raw_name: String,
    pub description: String,
    /// Unit count; absent for cost-only takeoffs
    pub count: Option<i64>,
    /// Square footage; absent for stub and cost-only takeoffs
    pub sf: Option<f64>,
    /// Lineal footage; absent for stub and cost-only takeoffs
    pub lf: Option<f64>,
    pub lengths: Vec<f64>,
    pub weight: f64,
    pub dnl: bool,
    /// Rows the report uses for this takeoff (1 or 2)
    pub row_count: u8,
}

impl Takeoff {
    /// Full takeoff from a geometry summary row
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plan: impl Into<String>,
        type_name: impl Into<String>,
        name: impl Into<String>,
        raw_name: impl Into<String>,
        description: impl Into<String>,
        sf: f64,
        lf: f64,
        count: i64,
    ) -> Self {
        Self {
            plan: plan.into(),
            type_name: type_name.into(),
            name: name.into(),
            raw_name: raw_name.into(),
            description: description.into(),
            count: Some(count),
            sf: Some(sf),
            lf: Some(lf),
            lengths: Vec::new(),
            weight: 0.0,
            dnl: false,
            row_count: 2,
        }
    }

    /// Stub takeoff: carries its own count, never sf or lf
    pub fn stub(
        plan: impl Into<String>,
        type_name: impl Into<String>,
        name: impl Into<String>,
        raw_name: impl Into<String>,
        description: impl Into<String>,
        count: i64,
    ) -> Self {
        Self {
            count: Some(count),
            sf: None,
            lf: None,
            ..Self::new(plan, type_name, name, raw_name, description, 0.0, 0.0, 0)
        }
    }

    /// Takeoff known only from the cost report
    pub fn cost_only(
        plan: impl Into<String>,
        type_name: impl Into<String>,
        name: impl Into<String>,
        raw_name: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            count: None,
            sf: None,
            lf: None,
            weight,
            dnl: true,
            row_count: 1,
            ..Self::new(plan, type_name, name, raw_name, "", 0.0, 0.0, 0)
        }
    }

    /// Mark as do-not-list with a single report row
    pub fn with_dnl(mut self, dnl: bool) -> Self {
        self.dnl = dnl;
        self.row_count = if dnl { 1 } else { 2 };
        self
    }

    pub fn identity_key(&self) -> String {
        identity_key(&self.plan, &self.type_name, &self.name)
    }

    /// Identity key built from the unedited name
    pub fn raw_key(&self) -> String {
        identity_key(&self.plan, &self.type_name, &self.raw_name)
    }

    /// Columns and diagonals carry piece lengths in their description
    pub fn measured_by_description(&self) -> bool {
        self.type_name == "Column" || self.type_name == "Diagonal"
    }

    pub fn add_count(&mut self, count: i64) {
        *self.count.get_or_insert(0) += count;
    }

    pub fn add_lf(&mut self, length: f64) {
        *self.lf.get_or_insert(0.0) += length;
    }
}

/// Insertion-ordered map keyed by identity key or material name
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its original position
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Existing value for `key`, or the one built by `make`
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), make()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Aggregate of all takeoffs sharing a de-stubbed base name
#[derive(Debug, Clone, Default, Serialize)]
pub struct Material {
    pub name: String,
    #[serde(serialize_with = "serialize_keys")]
    pub takeoffs: OrderedMap<TakeoffId>,
    pub lf: f64,
    pub weight: f64,
    pub weight_per_foot: f64,
    pub drop_weight: f64,
    /// Total purchased stock length after multing
    pub stock_length: f64,
}

fn serialize_keys<S: Serializer>(
    takeoffs: &OrderedMap<TakeoffId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(takeoffs.keys())
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attach(&mut self, key: impl Into<String>, takeoff: TakeoffId) {
        self.takeoffs.insert(key, takeoff);
    }

    pub fn add_lf(&mut self, length: f64) {
        self.lf += length;
        self.refresh_weight_per_foot();
    }

    pub fn add_weight(&mut self, weight: f64) {
        self.weight += weight;
        self.refresh_weight_per_foot();
    }

    fn refresh_weight_per_foot(&mut self) {
        if self.lf > 0.0 {
            self.weight_per_foot = self.weight / self.lf;
        }
    }
}

/// Consolidated model built by the geometry pass and enriched by the cost
/// pass and multing
#[derive(Debug, Clone, Default)]
pub struct TakeoffModel {
    takeoffs: Vec<Takeoff>,
    structural: OrderedMap<TakeoffId>,
    deck: OrderedMap<TakeoffId>,
    cxn: OrderedMap<TakeoffId>,
    materials: OrderedMap<Material>,
}

impl TakeoffModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self, listing: Listing) -> &OrderedMap<TakeoffId> {
        match listing {
            Listing::Struct => &self.structural,
            Listing::Deck => &self.deck,
            Listing::Cxn => &self.cxn,
        }
    }

    fn listing_mut(&mut self, listing: Listing) -> &mut OrderedMap<TakeoffId> {
        match listing {
            Listing::Struct => &mut self.structural,
            Listing::Deck => &mut self.deck,
            Listing::Cxn => &mut self.cxn,
        }
    }

    /// Store a takeoff and file it under `key` in a listing
    pub fn add_takeoff(&mut self, listing: Listing, key: impl Into<String>, takeoff: Takeoff) -> TakeoffId {
        let id = TakeoffId(self.takeoffs.len());
        self.takeoffs.push(takeoff);
        self.listing_mut(listing).insert(key, id);
        id
    }

    pub fn takeoff(&self, id: TakeoffId) -> &Takeoff {
        &self.takeoffs[id.0]
    }

    pub fn takeoff_mut(&mut self, id: TakeoffId) -> &mut Takeoff {
        &mut self.takeoffs[id.0]
    }

    /// Id of the takeoff filed under `key` in a listing
    pub fn find(&self, listing: Listing, key: &str) -> Option<TakeoffId> {
        self.listing(listing).get(key).copied()
    }

    pub fn get(&self, listing: Listing, key: &str) -> Option<&Takeoff> {
        self.find(listing, key).map(|id| self.takeoff(id))
    }

    /// Takeoffs of a listing in source order
    pub fn takeoffs_in(&self, listing: Listing) -> impl Iterator<Item = (&str, &Takeoff)> {
        self.listing(listing)
            .iter()
            .map(move |(key, &id)| (key, self.takeoff(id)))
    }

    pub fn materials(&self) -> &OrderedMap<Material> {
        &self.materials
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn material_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.get_mut(name)
    }

    /// The named material, registered empty if absent
    pub fn material_entry(&mut self, name: &str) -> &mut Material {
        self.materials.get_or_insert_with(name, || Material::new(name))
    }

    pub(crate) fn materials_mut(&mut self) -> &mut OrderedMap<Material> {
        &mut self.materials
    }

    /// Every piece length contributed to a material by its takeoffs
    pub fn material_lengths(&self, material: &Material) -> Vec<f64> {
        material
            .takeoffs
            .values()
            .flat_map(|&id| self.takeoff(id).lengths.iter().copied())
            .collect()
    }

    /// Total drop weight across all materials
    pub fn total_drop_weight(&self) -> f64 {
        self.materials.values().map(|m| m.drop_weight).sum()
    }
}

/// Listing as a key → takeoff map for serialization
struct ListingView<'a> {
    model: &'a TakeoffModel,
    listing: Listing,
}

impl Serialize for ListingView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let listing = self.model.listing(self.listing);
        let mut map = serializer.serialize_map(Some(listing.len()))?;
        for (key, takeoff) in self.model.takeoffs_in(self.listing) {
            map.serialize_entry(key, takeoff)?;
        }
        map.end()
    }
}

impl Serialize for TakeoffModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TakeoffModel", 4)?;
        for &listing in Listing::all() {
            state.serialize_field(
                listing.as_str(),
                &ListingView {
                    model: self,
                    listing,
                },
            )?;
        }
        state.serialize_field("materials", &self.materials)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam(plan: &str, name: &str) -> Takeoff {
        Takeoff::new(plan, "Beam", name, name, "", 0.0, 20.0, 2)
    }

    #[test]
    fn test_identity_key_strips_whitespace() {
        assert_eq!(identity_key("P 1", "Beam", "W 12x50"), "P1|Beam|W12x50");
        assert_eq!(identity_key("P1", "Beam", "W\t12x50 "), "P1|Beam|W12x50");
    }

    #[test]
    fn test_listing_for_type() {
        assert_eq!(Listing::for_type("Decking"), Listing::Deck);
        assert_eq!(Listing::for_type("Cxn"), Listing::Cxn);
        assert_eq!(Listing::for_type("Beam"), Listing::Struct);
        assert_eq!(Listing::for_type("decking"), Listing::Struct);
    }

    #[test]
    fn test_ordered_map_keeps_first_position_on_replace() {
        let mut map = OrderedMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        map.insert("b", 3);
        let entries: Vec<_> = map.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        assert_eq!(entries, vec![("b".to_string(), 3), ("a".to_string(), 2)]);
    }

    #[test]
    fn test_material_entry_registers_once() {
        let mut model = TakeoffModel::new();
        model.material_entry("W 12x50").add_lf(10.0);
        model.material_entry("W 12x50").add_lf(5.0);
        assert_eq!(model.materials().len(), 1);
        assert_eq!(model.material("W 12x50").unwrap().lf, 15.0);
    }

    #[test]
    fn test_materials_get_fresh_takeoff_maps() {
        let mut model = TakeoffModel::new();
        let id = model.add_takeoff(Listing::Struct, "P1|Beam|W12x50", beam("P1", "W 12x50"));
        model.material_entry("W 12x50").attach("P1|Beam|W12x50", id);
        model.material_entry("W 10x33");
        assert!(model.material("W 10x33").unwrap().takeoffs.is_empty());
    }

    #[test]
    fn test_weight_per_foot_recomputed() {
        let mut material = Material::new("W 12x50");
        material.add_weight(100.0);
        assert_eq!(material.weight_per_foot, 0.0);
        material.add_lf(40.0);
        material.add_weight(1900.0);
        assert_eq!(material.weight_per_foot, 2000.0 / 40.0);
    }

    #[test]
    fn test_material_lengths_span_takeoffs() {
        let mut model = TakeoffModel::new();
        let a = model.add_takeoff(Listing::Struct, "P1|Beam|W12x50", beam("P1", "W 12x50"));
        let b = model.add_takeoff(Listing::Struct, "P2|Beam|W12x50", beam("P2", "W 12x50"));
        model.takeoff_mut(a).lengths.extend([20.0, 10.0]);
        model.takeoff_mut(b).lengths.push(30.0);
        let material = model.material_entry("W 12x50");
        material.attach("P1|Beam|W12x50", a);
        material.attach("P2|Beam|W12x50", b);

        let material = model.material("W 12x50").unwrap();
        assert_eq!(model.material_lengths(material), vec![20.0, 10.0, 30.0]);
    }

    #[test]
    fn test_cost_only_takeoff_is_dnl_single_row() {
        let tf = Takeoff::cost_only("P1", "Beam", "HSS 6x6x1/4", "HSS6x6x1/4", 310.0);
        assert!(tf.dnl);
        assert_eq!(tf.row_count, 1);
        assert_eq!(tf.count, None);
        assert_eq!(tf.lf, None);
        assert_eq!(tf.weight, 310.0);
    }

    #[test]
    fn test_model_serializes_listings_and_materials() {
        let mut model = TakeoffModel::new();
        let id = model.add_takeoff(Listing::Struct, "P1|Beam|W12x50", beam("P1", "W 12x50"));
        model.material_entry("W 12x50").attach("P1|Beam|W12x50", id);

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["struct"]["P1|Beam|W12x50"]["count"], 2);
        assert_eq!(json["struct"]["P1|Beam|W12x50"]["type"], "Beam");
        assert!(json["deck"].as_object().unwrap().is_empty());
        assert_eq!(json["materials"]["W 12x50"]["takeoffs"][0], "P1|Beam|W12x50");
    }
}
