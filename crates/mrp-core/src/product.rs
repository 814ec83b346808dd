use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product classification (§3). Drives BUY/MAKE routing in order generation
/// (§4.7) and which products seed MPS demand (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    Finished,
    SemiFinished,
    Raw,
    Consumable,
    Packaging,
    Resale,
}

impl ProductKind {
    pub fn is_buy(self) -> bool {
        matches!(
            self,
            ProductKind::Raw | ProductKind::Consumable | ProductKind::Packaging | ProductKind::Resale
        )
    }

    pub fn is_make(self) -> bool {
        matches!(self, ProductKind::Finished | ProductKind::SemiFinished)
    }
}

/// Lot-sizing method tag (§4.6). An unsupported tag routes to `BAD_METHOD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotSizingTag {
    LotForLot,
    Eoq,
    SilverMeal,
    WagnerWhitin,
}

/// A product master record (§3). Field names are semantic, not a
/// field-for-field ERP mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub code: String,
    pub description: String,
    pub kind: ProductKind,
    pub unit_volume_m3: Decimal,
    pub lot_sizing_tag: LotSizingTag,
    pub minimum_lot: Decimal,
    pub purchase_multiple: Decimal,
    pub moq: Decimal,
    pub production_lead_time_days: u32,
    pub unit_cost: Decimal,
    pub order_cost: Decimal,
    pub annual_holding_percent: Decimal,
    pub review_interval_days: u32,
    pub manual_safety_stock: Option<Decimal>,
    pub abc_class: Option<char>,
    pub active: bool,
}

impl Product {
    pub fn new(id: impl Into<String>, code: impl Into<String>, kind: ProductKind) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            description: String::new(),
            kind,
            unit_volume_m3: Decimal::ZERO,
            lot_sizing_tag: LotSizingTag::LotForLot,
            minimum_lot: Decimal::ZERO,
            purchase_multiple: Decimal::ZERO,
            moq: Decimal::ZERO,
            production_lead_time_days: 0,
            unit_cost: Decimal::ZERO,
            order_cost: Decimal::ZERO,
            annual_holding_percent: Decimal::ZERO,
            review_interval_days: 7,
            manual_safety_stock: None,
            abc_class: None,
            active: true,
        }
    }

    pub fn with_lot_sizing_tag(mut self, tag: LotSizingTag) -> Self {
        self.lot_sizing_tag = tag;
        self
    }

    pub fn with_minimum_lot(mut self, qty: Decimal) -> Self {
        self.minimum_lot = qty;
        self
    }

    pub fn with_purchase_multiple(mut self, qty: Decimal) -> Self {
        self.purchase_multiple = qty;
        self
    }

    pub fn with_moq(mut self, qty: Decimal) -> Self {
        self.moq = qty;
        self
    }

    pub fn with_production_lead_time_days(mut self, days: u32) -> Self {
        self.production_lead_time_days = days;
        self
    }

    pub fn with_unit_cost(mut self, cost: Decimal) -> Self {
        self.unit_cost = cost;
        self
    }

    pub fn with_order_cost(mut self, cost: Decimal) -> Self {
        self.order_cost = cost;
        self
    }

    pub fn with_annual_holding_percent(mut self, pct: Decimal) -> Self {
        self.annual_holding_percent = pct;
        self
    }

    pub fn with_manual_safety_stock(mut self, ss: Decimal) -> Self {
        self.manual_safety_stock = Some(ss);
        self
    }

    pub fn with_abc_class(mut self, class: char) -> Self {
        self.abc_class = Some(class);
        self
    }

    /// Production lead time expressed in whole weekly periods, rounded up
    /// (§4.11: `leadTimePeriods = ceil(leadTimeDays / 7)`).
    pub fn lead_time_periods(&self) -> u32 {
        (self.production_lead_time_days + 6) / 7
    }

    /// Per-week holding cost `h = unitCost * annualHoldingPct / 100 / 52`.
    pub fn weekly_holding_cost(&self) -> Decimal {
        self.unit_cost * self.annual_holding_percent / Decimal::from(100) / Decimal::from(52)
    }
}

/// Parent -> child BOM relationship (§3). The referenced products are
/// shared; ownership of the line itself belongs to the parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    pub parent_product_id: String,
    pub child_product_id: String,
    pub quantity_per_parent: Decimal,
    pub loss_percent: Decimal,
}

impl BomLine {
    pub fn new(
        parent_product_id: impl Into<String>,
        child_product_id: impl Into<String>,
        quantity_per_parent: Decimal,
    ) -> Self {
        Self {
            parent_product_id: parent_product_id.into(),
            child_product_id: child_product_id.into(),
            quantity_per_parent,
            loss_percent: Decimal::ZERO,
        }
    }

    pub fn with_loss_percent(mut self, loss_percent: Decimal) -> Self {
        self.loss_percent = loss_percent;
        self
    }
}
