use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// The kind of utility a bill is for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillType {
    Electricity,
    Water,
}

serde_plain::derive_display_from_serialize!(BillType);
serde_plain::derive_fromstr_from_deserialize!(BillType);

impl BillType {
    /// All bill types in display order.
    pub const ALL: [BillType; 2] = [BillType::Electricity, BillType::Water];

    /// A human readable name, e.g. for invoice line items.
    pub fn label(&self) -> &'static str {
        match self {
            BillType::Electricity => "Electricity",
            BillType::Water => "Water",
        }
    }
}

/// Opaque, unique identifier of a `Bill`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(String);

impl BillId {
    /// Creates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BillId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BillId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BillId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single utility bill. The `amount` is the raw text entered by the user and is never validated;
/// see `Amount::parse_lenient` for how it is read when totals are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    id: BillId,
    #[serde(rename = "type", alias = "category")]
    category: BillType,
    amount: String,
}

impl Bill {
    /// Creates a bill with a fresh id and an empty amount.
    pub fn new(category: BillType) -> Self {
        Self {
            id: BillId::generate(),
            category,
            amount: String::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_amount(category: BillType, amount: impl Into<String>) -> Self {
        Self {
            id: BillId::generate(),
            category,
            amount: amount.into(),
        }
    }

    pub fn id(&self) -> &BillId {
        &self.id
    }

    pub fn category(&self) -> BillType {
        self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// The ordered collection of bills, newest first. No two bills share an id.
///
/// All mutations here are pure in-memory operations; persisting the result is the job of
/// `BillStore`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bills {
    data: Vec<Bill>,
}

impl Bills {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from previously stored bills. Returns `None` if any id is repeated.
    pub fn from_vec(data: Vec<Bill>) -> Option<Self> {
        let mut seen = HashSet::with_capacity(data.len());
        if data.iter().all(|bill| seen.insert(bill.id.clone())) {
            Some(Self { data })
        } else {
            None
        }
    }

    pub fn data(&self) -> &[Bill] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bill> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, id: &BillId) -> Option<&Bill> {
        self.data.iter().find(|bill| &bill.id == id)
    }

    /// Puts a new, empty bill of `category` at the front and returns its id.
    pub fn add(&mut self, category: BillType) -> BillId {
        let mut bill = Bill::new(category);
        // Random ids are not expected to collide, but the invariant must hold regardless.
        while self.get(&bill.id).is_some() {
            bill.id = BillId::generate();
        }
        let id = bill.id.clone();
        self.data.insert(0, bill);
        id
    }

    /// Removes the bill with `id`. Returns `false`, leaving the collection untouched, when there is
    /// no such bill.
    pub fn remove(&mut self, id: &BillId) -> bool {
        let before = self.data.len();
        self.data.retain(|bill| &bill.id != id);
        self.data.len() != before
    }

    /// Replaces the amount text of the bill with `id`, verbatim. Returns `false` when there is no
    /// such bill.
    pub fn set_amount(&mut self, id: &BillId, amount: impl Into<String>) -> bool {
        match self.data.iter_mut().find(|bill| &bill.id == id) {
            Some(bill) => {
                bill.amount = amount.into();
                true
            }
            None => false,
        }
    }

    /// Empties every amount, keeping the bills themselves.
    pub fn clear_amounts(&mut self) {
        for bill in &mut self.data {
            bill.amount.clear();
        }
    }
}

impl<'a> IntoIterator for &'a Bills {
    type Item = &'a Bill;
    type IntoIter = std::slice::Iter<'a, Bill>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_type_serde_names() {
        assert_eq!(BillType::Electricity.to_string(), "ELECTRICITY");
        assert_eq!(BillType::Water.to_string(), "WATER");
        assert_eq!("WATER".parse::<BillType>().unwrap(), BillType::Water);
        assert!("GAS".parse::<BillType>().is_err());
    }

    #[test]
    fn test_add_prepends_with_empty_amount() {
        let mut bills = Bills::new();
        let first = bills.add(BillType::Electricity);
        let second = bills.add(BillType::Water);
        assert_eq!(bills.len(), 2);
        assert_eq!(bills.data()[0].id(), &second);
        assert_eq!(bills.data()[1].id(), &first);
        assert_eq!(bills.data()[0].category(), BillType::Water);
        assert!(bills.iter().all(|bill| bill.amount().is_empty()));
    }

    #[test]
    fn test_ids_stay_unique_across_add_remove_cycles() {
        let mut bills = Bills::new();
        let mut removed = Vec::new();
        for round in 0..50 {
            let id = bills.add(if round % 2 == 0 {
                BillType::Electricity
            } else {
                BillType::Water
            });
            if round % 3 == 0 {
                assert!(bills.remove(&id));
                removed.push(id);
            }
        }
        let ids: HashSet<_> = bills.iter().map(|bill| bill.id().clone()).collect();
        assert_eq!(ids.len(), bills.len());
        assert!(removed.iter().all(|id| !ids.contains(id)));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut bills = Bills::new();
        let id = bills.add(BillType::Water);
        bills.set_amount(&id, "50");
        let before = bills.clone();
        assert!(!bills.remove(&BillId::from("nope")));
        assert_eq!(before, bills);
    }

    #[test]
    fn test_set_amount_is_verbatim() {
        let mut bills = Bills::new();
        let id = bills.add(BillType::Electricity);
        assert!(bills.set_amount(&id, " 12abc "));
        assert_eq!(bills.get(&id).unwrap().amount(), " 12abc ");
        assert!(bills.set_amount(&id, ""));
        assert_eq!(bills.get(&id).unwrap().amount(), "");
    }

    #[test]
    fn test_set_amount_unknown_id_is_noop() {
        let mut bills = Bills::new();
        bills.add(BillType::Electricity);
        let before = bills.clone();
        assert!(!bills.set_amount(&BillId::from("missing"), "100"));
        assert_eq!(before, bills);
    }

    #[test]
    fn test_clear_amounts_is_idempotent() {
        let mut bills = Bills::new();
        let a = bills.add(BillType::Electricity);
        let b = bills.add(BillType::Water);
        bills.set_amount(&a, "100");
        bills.set_amount(&b, "abc");

        bills.clear_amounts();
        let once = bills.clone();
        bills.clear_amounts();
        assert_eq!(once, bills);

        assert_eq!(bills.len(), 2);
        assert_eq!(bills.get(&a).unwrap().category(), BillType::Electricity);
        assert_eq!(bills.get(&b).unwrap().category(), BillType::Water);
        assert!(bills.iter().all(|bill| bill.amount().is_empty()));
    }

    #[test]
    fn test_serialized_field_names() {
        let mut bills = Bills::new();
        let id = bills.add(BillType::Water);
        bills.set_amount(&id, "50");
        let json = serde_json::to_value(&bills).unwrap();
        let expected = serde_json::json!([{ "id": id.as_str(), "type": "WATER", "amount": "50" }]);
        assert_eq!(json, expected);
    }

    #[test]
    fn test_category_alias_accepted() {
        let json = r#"{"id": "x1", "category": "ELECTRICITY", "amount": "10"}"#;
        let bill: Bill = serde_json::from_str(json).unwrap();
        assert_eq!(bill.category(), BillType::Electricity);
        assert_eq!(bill.id().as_str(), "x1");
    }

    #[test]
    fn test_from_vec_rejects_duplicate_ids() {
        let bill = Bill::with_amount(BillType::Water, "1");
        assert!(Bills::from_vec(vec![bill.clone(), bill.clone()]).is_none());
        assert_eq!(Bills::from_vec(vec![bill]).unwrap().len(), 1);
    }
}
