//! Inventory facade: stock records, devices and the product taxonomy.

use std::collections::HashSet;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;

use medstock_core::{DomainError, DomainResult, Entity, ItemId};
use medstock_devices::Device;
use medstock_events::{AlertSink, ObserverSet};
use medstock_products::{Category, CategoryComponent, ProductCategory};

use crate::stock::{StockItem, StockObserver};

/// Owns every stock record, device and the root category for one run.
///
/// No cross-index invariants are kept between the stock list and the tree: a
/// record need not be categorised and a leaf need not be stocked.
#[derive(Debug, Default)]
pub struct Inventory {
    stock: Vec<StockItem>,
    devices: Vec<Device>,
    root: Option<Category>,
    default_observers: ObserverSet<StockItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observers attached to every record passed to [`Inventory::add_stock`].
    pub fn with_default_observer(mut self, observer: StockObserver) -> Self {
        self.default_observers.attach(observer);
        self
    }

    /// Append a record (duplicates allowed).
    pub fn add_stock(&mut self, mut item: StockItem) {
        for observer in self.default_observers.iter() {
            item.add_observer(observer.clone());
        }
        tracing::info!(item = %item.name(), stock = item.stock(), "stock record added");
        self.stock.push(item);
    }

    /// Snapshot of every record, in insertion order.
    pub fn all_stock_items(&self) -> Vec<&StockItem> {
        self.stock.iter().collect()
    }

    pub fn stock_item_mut(&mut self, index: usize) -> Option<&mut StockItem> {
        self.stock.get_mut(index)
    }

    /// Records whose product name contains `pattern`, ignoring case.
    pub fn stock_by_product(&self, pattern: &str) -> Vec<&StockItem> {
        let needle = pattern.to_lowercase();
        self.stock
            .iter()
            .filter(|s| s.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Records whose product sits anywhere under the first category named
    /// `category_name` (pre-order, ignoring case). Empty if there is no such
    /// category.
    pub fn stock_by_category(&self, category_name: &str) -> Vec<&StockItem> {
        let Some(category) = self.find_category(category_name) else {
            return Vec::new();
        };
        let ids: HashSet<ItemId> = category.all_items().into_iter().map(|i| *i.id()).collect();
        self.stock
            .iter()
            .filter(|s| ids.contains(s.product().id()))
            .collect()
    }

    pub fn set_root_category(&mut self, root: impl Into<Category>) {
        self.root = Some(root.into());
    }

    pub fn find_category(&self, name: &str) -> Option<&ProductCategory> {
        self.root.as_ref()?.as_group()?.find(name)
    }

    /// Add `category` under the category named `parent`, or under the root
    /// when `parent` is `None`.
    pub fn add_category(&mut self, parent: Option<&str>, category: Category) -> DomainResult<()> {
        let root = self.root.as_mut().ok_or_else(DomainError::not_found)?;
        match (parent, root) {
            (None, root) => root.add(category),
            (Some(name), Category::Group(group)) => group
                .find_mut(name)
                .ok_or_else(DomainError::not_found)?
                .add(category),
            (Some(_), Category::Product(_)) => Err(DomainError::not_found()),
        }
    }

    /// Pre-order dump of the tree; prints nothing when no root is set.
    pub fn display_category_structure(&self, sink: &dyn AlertSink) {
        if let Some(root) = &self.root {
            root.display("", sink);
        }
    }

    /// Sum of `stock × unit price` over every record.
    pub fn total_stock_value(&self) -> DomainResult<Decimal> {
        self.stock.iter().try_fold(Decimal::ZERO, |total, item| {
            total.checked_add(item.total_value()?).ok_or_else(|| {
                DomainError::invalid_argument("total stock value overflows".to_string())
            })
        })
    }

    /// Records with `stock ≤ threshold`, in insertion order.
    pub fn critical_stock(&self, threshold: i64) -> Vec<&StockItem> {
        self.stock.iter().filter(|s| s.stock() <= threshold).collect()
    }

    /// Records whose expiration date falls before `now + window_days`,
    /// including records that already expired.
    ///
    /// A window past the representable range selects every dated record when
    /// positive and nothing when negative.
    pub fn expiring_within(&self, window_days: i64, now: DateTime<Utc>) -> Vec<&StockItem> {
        let horizon = TimeDelta::try_days(window_days).and_then(|w| now.checked_add_signed(w));
        self.stock
            .iter()
            .filter(|s| match (s.expiration_date(), horizon) {
                (Some(date), Some(horizon)) => date.and_time(NaiveTime::MIN).and_utc() < horizon,
                (Some(_), None) => window_days > 0,
                (None, _) => false,
            })
            .collect()
    }

    pub fn add_device(&mut self, device: Device) {
        tracing::info!(device = %device.name(), "device added");
        self.devices.push(device);
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device_mut(&mut self, index: usize) -> Option<&mut Device> {
        self.devices.get_mut(index)
    }

    /// First device whose name equals `name`, ignoring case.
    pub fn find_device_mut(&mut self, name: &str) -> Option<&mut Device> {
        let wanted = name.to_lowercase();
        self.devices
            .iter_mut()
            .find(|d| d.name().to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use medstock_events::MemorySink;
    use medstock_products::{Consumable, ProductLeaf};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap()
    }

    fn day(offset: i64) -> NaiveDate {
        now().date_naive() + TimeDelta::days(offset)
    }

    fn medicine(name: &str, cents: i64) -> Consumable {
        Consumable::medicine(name, "Painkiller", Decimal::new(cents, 2), "Tablet").unwrap()
    }

    struct Fixture {
        inventory: Inventory,
        paracetamol: Consumable,
        ibuprofen: Consumable,
        saline: Consumable,
    }

    fn fixture() -> Fixture {
        let paracetamol = medicine("Paracetamol", 550);
        let ibuprofen = medicine("Ibuprofen", 875);
        let saline =
            Consumable::serum("Saline Solution", "IV Fluid", Decimal::new(1500, 2), 500.0).unwrap();

        let mut inventory = Inventory::new();
        inventory.add_stock(StockItem::new(paracetamol.clone(), 20, Some(day(60))).unwrap());
        inventory.add_stock(StockItem::new(ibuprofen.clone(), 15, Some(day(10))).unwrap());
        inventory.add_stock(StockItem::new(saline.clone(), 10, None).unwrap());

        let painkillers = ProductCategory::new("Painkillers")
            .unwrap()
            .with(ProductLeaf::new(paracetamol.clone()))
            .with(ProductLeaf::new(ibuprofen.clone()));
        let medicines = ProductCategory::new("Medicines").unwrap().with(painkillers);
        let serums = ProductCategory::new("Serums")
            .unwrap()
            .with(ProductLeaf::new(saline.clone()));
        inventory.set_root_category(
            ProductCategory::new("All Products")
                .unwrap()
                .with(medicines)
                .with(serums),
        );

        Fixture {
            inventory,
            paracetamol,
            ibuprofen,
            saline,
        }
    }

    fn names(items: Vec<&StockItem>) -> Vec<&str> {
        items.into_iter().map(StockItem::name).collect()
    }

    #[test]
    fn all_stock_items_preserves_insertion_order() {
        let f = fixture();
        assert_eq!(
            names(f.inventory.all_stock_items()),
            vec!["Paracetamol", "Ibuprofen", "Saline Solution"]
        );
    }

    #[test]
    fn stock_by_product_is_case_insensitive_substring() {
        let f = fixture();
        assert_eq!(names(f.inventory.stock_by_product("PROFEN")), vec!["Ibuprofen"]);
        assert_eq!(
            names(f.inventory.stock_by_product("o")),
            vec!["Paracetamol", "Ibuprofen", "Saline Solution"]
        );
        assert!(f.inventory.stock_by_product("aspirin").is_empty());
    }

    #[test]
    fn stock_by_category_follows_the_subtree() {
        let f = fixture();
        assert_eq!(
            names(f.inventory.stock_by_category("medicines")),
            vec!["Paracetamol", "Ibuprofen"]
        );
        assert_eq!(
            names(f.inventory.stock_by_category("Serums")),
            vec!["Saline Solution"]
        );
        assert!(f.inventory.stock_by_category("Vaccines").is_empty());
        assert!(Inventory::new().stock_by_category("Medicines").is_empty());
    }

    #[test]
    fn stock_by_category_matches_identity_not_name() {
        let mut f = fixture();
        // Same name, different object: not under "Serums".
        let other_saline =
            Consumable::serum("Saline Solution", "IV Fluid", Decimal::ONE, 250.0).unwrap();
        f.inventory
            .add_stock(StockItem::new(other_saline, 3, None).unwrap());

        let found = f.inventory.stock_by_category("Serums");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].product().id(), f.saline.id());
    }

    #[test]
    fn empty_category_yields_nothing() {
        let mut f = fixture();
        f.inventory
            .add_category(Some("medicines"), Category::group("Antibiotics").unwrap())
            .unwrap();
        assert!(f.inventory.stock_by_category("Antibiotics").is_empty());
    }

    #[test]
    fn add_category_requires_existing_parent() {
        let mut f = fixture();
        let err = f
            .inventory
            .add_category(Some("Nope"), Category::group("X").unwrap())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);

        f.inventory
            .add_category(None, Category::group("Vaccines").unwrap())
            .unwrap();
        assert!(f.inventory.find_category("vaccines").is_some());

        let mut empty = Inventory::new();
        assert!(empty.add_category(None, Category::group("X").unwrap()).is_err());
    }

    #[test]
    fn displays_category_structure() {
        let f = fixture();
        let sink = MemorySink::new();
        f.inventory.display_category_structure(&sink);
        assert_eq!(sink.lines()[0], "Category: All Products");
        assert_eq!(sink.lines().len(), 7);

        let sink = MemorySink::new();
        Inventory::new().display_category_structure(&sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn total_value_sums_records() {
        let f = fixture();
        // 20 × 5.50 + 15 × 8.75 + 10 × 15.00
        assert_eq!(f.inventory.total_stock_value().unwrap(), Decimal::new(39125, 2));
        assert_eq!(Inventory::new().total_stock_value().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn total_value_overflow_is_an_error() {
        let pricey =
            Consumable::medicine("Orphan Drug", "Rare", Decimal::MAX, "Vial").unwrap();
        let mut inventory = Inventory::new();
        inventory.add_stock(StockItem::new(pricey.clone(), 1, None).unwrap());
        assert_eq!(inventory.total_stock_value().unwrap(), Decimal::MAX);

        // Each record fits on its own; the sum does not.
        inventory.add_stock(StockItem::new(pricey, 1, None).unwrap());
        assert!(matches!(
            inventory.total_stock_value(),
            Err(DomainError::InvalidArgument(_))
        ));

        let mut bulk = Inventory::new();
        let huge = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let product = Consumable::medicine("Bulk", "Rare", huge, "Tablet").unwrap();
        bulk.add_stock(StockItem::new(product, 10_000_000_000, None).unwrap());
        assert!(bulk.total_stock_value().is_err());
    }

    #[test]
    fn reports() {
        let mut f = fixture();
        assert_eq!(names(f.inventory.critical_stock(10)), vec!["Saline Solution"]);

        f.inventory
            .stock_item_mut(0)
            .unwrap()
            .set_expiration_date(Some(day(-2)))
            .unwrap();
        assert_eq!(
            names(f.inventory.expiring_within(30, now())),
            vec!["Paracetamol", "Ibuprofen"]
        );
        assert_eq!(names(f.inventory.expiring_within(5, now())), vec!["Paracetamol"]);
        assert_eq!(f.paracetamol.name(), "Paracetamol");
        assert_eq!(f.ibuprofen.name(), "Ibuprofen");
    }

    #[test]
    fn unrepresentable_windows_follow_their_sign() {
        let f = fixture();
        assert_eq!(
            names(f.inventory.expiring_within(i64::MAX, now())),
            vec!["Paracetamol", "Ibuprofen"]
        );
        assert!(f.inventory.expiring_within(i64::MIN, now()).is_empty());
        assert!(f.inventory.expiring_within(-400_000_000, now()).is_empty())
    }

    #[test]
    fn default_observers_are_attached_on_add() {
        let sink = Arc::new(MemorySink::new());
        let critical: StockObserver =
            Arc::new(crate::alerts::CriticalStockObserver::new(10).with_sink(sink.clone()));
        let mut inventory = Inventory::new().with_default_observer(critical);

        inventory.add_stock(StockItem::new(medicine("Aspirin", 100), 12, None).unwrap());
        assert_eq!(inventory.all_stock_items()[0].observer_count(), 1);

        inventory.stock_item_mut(0).unwrap().reduce_stock(3).unwrap();
        assert_eq!(sink.count_containing("Aspirin has only 9 units left"), 1);
    }

    #[test]
    fn device_registry() {
        let mut inventory = Inventory::new();
        inventory.add_device(Device::new("MRI Machine").unwrap().with_sink(Arc::new(MemorySink::new())));
        inventory.add_device(Device::new("X-Ray").unwrap().with_sink(Arc::new(MemorySink::new())));

        assert_eq!(inventory.devices().len(), 2);
        assert!(inventory.find_device_mut("mri machine").unwrap().begin_use());
        assert_eq!(inventory.devices()[0].use_count(), 1);
        assert!(inventory.device_mut(1).is_some());
        assert!(inventory.device_mut(2).is_none());
        assert!(inventory.find_device_mut("CT").is_none());
    }
}
