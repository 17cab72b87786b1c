use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use medstock_core::{Aggregate, AggregateRoot, DomainError, DomainResult, StockItemId};
use medstock_events::{Observer, ObserverSet, execute};
use medstock_products::Consumable;

/// Observer handle for stock records.
pub type StockObserver = Arc<dyn Observer<StockItem>>;

/// Stock record: one consumable, its current quantity and optional expiration date.
///
/// Acts as the subject of the stock monitor. Observers are notified after every
/// successful change to `stock` or `expiration_date`; rejected changes leave the
/// record untouched and notify nobody.
#[derive(Debug, Clone)]
pub struct StockItem {
    id: StockItemId,
    product: Consumable,
    stock: i64,
    expiration_date: Option<NaiveDate>,
    version: u64,
    observers: ObserverSet<StockItem>,
}

impl StockItem {
    pub fn new(
        product: Consumable,
        quantity: i64,
        expiration_date: Option<NaiveDate>,
    ) -> DomainResult<Self> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument(format!(
                "cannot stock '{}' with a negative quantity ({quantity})",
                product.name()
            )));
        }
        Ok(Self {
            id: StockItemId::new(),
            product,
            stock: quantity,
            expiration_date,
            version: 0,
            observers: ObserverSet::new(),
        })
    }

    pub fn product(&self) -> &Consumable {
        &self.product
    }

    pub fn name(&self) -> &str {
        self.product.name()
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn expiration_date(&self) -> Option<NaiveDate> {
        self.expiration_date
    }

    /// `stock × unit price`. Fails if the product does not fit a `Decimal`.
    pub fn total_value(&self) -> DomainResult<Decimal> {
        self.product
            .unit_price()
            .checked_mul(Decimal::from(self.stock))
            .ok_or_else(|| {
                DomainError::invalid_argument(format!(
                    "total value of '{}' overflows: {} units at {}",
                    self.name(),
                    self.stock,
                    self.product.unit_price()
                ))
            })
    }

    /// Attach an observer. Attaching the same handle twice keeps one subscription.
    pub fn add_observer(&mut self, observer: StockObserver) -> bool {
        self.observers.attach(observer)
    }

    /// Detach an observer; no-op if it is not attached.
    pub fn remove_observer(&mut self, observer: &StockObserver) -> bool {
        self.observers.detach(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Invoke every attached observer once with the current state.
    pub fn notify_observers(&self) {
        self.observers.notify(self);
    }

    /// Remove `quantity` units. Fails without side effects if `quantity` is
    /// negative or exceeds the current stock.
    pub fn reduce_stock(&mut self, quantity: i64) -> DomainResult<()> {
        self.run(StockCommand::ReduceStock { quantity })
    }

    /// Add `quantity` units. Fails without side effects if `quantity` is negative.
    pub fn increase_stock(&mut self, quantity: i64) -> DomainResult<()> {
        self.run(StockCommand::IncreaseStock { quantity })
    }

    /// Set or clear the expiration date. Every date is accepted and notifies.
    pub fn set_expiration_date(&mut self, date: Option<NaiveDate>) -> DomainResult<()> {
        self.run(StockCommand::SetExpirationDate { date })
    }

    fn run(&mut self, command: StockCommand) -> DomainResult<()> {
        execute(self, &command)?;
        tracing::debug!(
            item = %self.name(),
            stock = self.stock,
            expires = ?self.expiration_date,
            ?command,
            "stock record changed"
        );
        self.notify_observers();
        Ok(())
    }
}

impl AggregateRoot for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Commands accepted by a stock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    ReduceStock { quantity: i64 },
    IncreaseStock { quantity: i64 },
    SetExpirationDate { date: Option<NaiveDate> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEvent {
    StockReduced { quantity: i64 },
    StockIncreased { quantity: i64 },
    ExpirationDateChanged { date: Option<NaiveDate> },
}

impl Aggregate for StockItem {
    type Command = StockCommand;
    type Event = StockEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockEvent::StockReduced { quantity } => self.stock -= quantity,
            StockEvent::StockIncreased { quantity } => self.stock += quantity,
            StockEvent::ExpirationDateChanged { date } => self.expiration_date = *date,
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::ReduceStock { quantity } => self.handle_reduce(*quantity),
            StockCommand::IncreaseStock { quantity } => self.handle_increase(*quantity),
            StockCommand::SetExpirationDate { date } => {
                Ok(vec![StockEvent::ExpirationDateChanged { date: *date }])
            }
        }
    }
}

impl StockItem {
    fn handle_reduce(&self, quantity: i64) -> Result<Vec<StockEvent>, DomainError> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument(format!(
                "cannot reduce stock of '{}' by {quantity}: quantity must not be negative",
                self.name()
            )));
        }
        if quantity > self.stock {
            return Err(DomainError::invalid_argument(format!(
                "cannot reduce stock of '{}' by {quantity}: only {} available",
                self.name(),
                self.stock
            )));
        }
        Ok(vec![StockEvent::StockReduced { quantity }])
    }

    fn handle_increase(&self, quantity: i64) -> Result<Vec<StockEvent>, DomainError> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument(format!(
                "cannot increase stock of '{}' by {quantity}: quantity must not be negative",
                self.name()
            )));
        }
        if self.stock.checked_add(quantity).is_none() {
            return Err(DomainError::invalid_argument(format!(
                "cannot increase stock of '{}' by {quantity}: quantity too large",
                self.name()
            )));
        }
        Ok(vec![StockEvent::StockIncreased { quantity }])
    }
}

impl core::fmt::Display for StockItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} ({}) - quantity: {}, expires: ",
            self.name(),
            self.product.item_type(),
            self.stock
        )?;
        match self.expiration_date {
            Some(date) => write!(f, "{date}")?,
            None => f.write_str("none")?,
        }
        match self.total_value() {
            Ok(value) => write!(f, ", total value: {value}"),
            Err(_) => f.write_str(", total value: overflow"),
        }
    }
}
