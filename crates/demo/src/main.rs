//! Replays the composite, state and observer walkthroughs on stdout.

use std::sync::Arc;

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;

use medstock_devices::{Device, MAINTENANCE_THRESHOLD};
use medstock_events::{AlertSink, stdout};
use medstock_inventory::{AlertConfig, Inventory, StockItem};
use medstock_products::{Consumable, ProductCategory, ProductLeaf};

fn main() -> anyhow::Result<()> {
    medstock_observability::init();

    let config = AlertConfig::from_env();
    tracing::info!(?config, "starting demo");

    let out = stdout();
    composite_demo(out.as_ref())?;
    state_demo(out.clone())?;
    observer_demo(&config, out)?;
    Ok(())
}

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn composite_demo(out: &dyn AlertSink) -> anyhow::Result<()> {
    out.emit("--- CATEGORY TREE ---");

    let medicines = ProductCategory::new("Medicines")?
        .with(
            ProductCategory::new("Painkillers")?
                .with(ProductLeaf::new(Consumable::medicine(
                    "Paracetamol",
                    "Painkiller",
                    price(550),
                    "Tablet",
                )?))
                .with(ProductLeaf::new(Consumable::medicine(
                    "Ibuprofen",
                    "Painkiller",
                    price(875),
                    "Capsule",
                )?)),
        )
        .with(
            ProductCategory::new("Antibiotics")?.with(ProductLeaf::new(Consumable::medicine(
                "Amoxicillin",
                "Antibiotic",
                price(1200),
                "Tablet",
            )?)),
        );
    let serums = ProductCategory::new("Serums")?.with(ProductLeaf::new(Consumable::serum(
        "Saline Solution",
        "IV Fluid",
        price(1500),
        500.0,
    )?));
    let vaccines = ProductCategory::new("Vaccines")?.with(ProductLeaf::new(Consumable::vaccine(
        "COVID-19 Vaccine",
        "Vaccine",
        price(2500),
        0.5,
    )?));

    let mut inventory = Inventory::new();
    inventory.set_root_category(
        ProductCategory::new("All Products")?
            .with(medicines)
            .with(serums)
            .with(vaccines),
    );
    inventory.display_category_structure(out);
    out.emit("");
    Ok(())
}

fn state_demo(out: Arc<dyn AlertSink>) -> anyhow::Result<()> {
    out.emit("--- DEVICE LIFECYCLE ---");

    let mut mri = Device::new("MRI Machine")?.with_sink(out.clone());
    out.emit(&format!("Initial state: {mri}"));

    for _ in 0..MAINTENANCE_THRESHOLD {
        mri.begin_use();
        mri.end_use();
    }
    out.emit(&format!("After {MAINTENANCE_THRESHOLD} uses: {mri}"));

    mri.begin_use();
    mri.send_for_maintenance();
    mri.complete_maintenance();
    out.emit(&format!("Final state: {mri}"));
    out.emit("");
    Ok(())
}

fn observer_demo(config: &AlertConfig, out: Arc<dyn AlertSink>) -> anyhow::Result<()> {
    out.emit("--- STOCK ALERTS ---");

    let (critical, expiration) = config.observers(out.clone());
    let mut inventory = Inventory::new()
        .with_default_observer(Arc::new(critical))
        .with_default_observer(Arc::new(expiration));

    let today = Utc::now().date_naive();
    let paracetamol = Consumable::medicine("Paracetamol", "Painkiller", price(550), "Tablet")?;
    let saline = Consumable::serum("Saline Solution", "IV Fluid", price(1500), 500.0)?;
    inventory.add_stock(StockItem::new(paracetamol, 15, Some(today + TimeDelta::days(60)))?);
    inventory.add_stock(StockItem::new(saline, 5, Some(today + TimeDelta::days(20)))?);

    for record in inventory.all_stock_items() {
        out.emit(&format!("  {record}"));
    }

    for quantity in [10, 5] {
        out.emit(&format!("Reducing Paracetamol by {quantity}:"));
        let record = inventory.stock_item_mut(0).context("paracetamol record missing")?;
        record.reduce_stock(quantity)?;
    }

    out.emit("Reducing Saline Solution by 1:");
    inventory
        .stock_item_mut(1)
        .context("saline record missing")?
        .reduce_stock(1)?;

    out.emit(&format!("Total stock value: {}", inventory.total_stock_value()?));
    Ok(())
}
