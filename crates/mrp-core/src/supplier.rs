use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub default_lead_time_days: Option<u32>,
    pub min_lead_time_days: Option<u32>,
    pub max_lead_time_days: Option<u32>,
}

/// A (product, supplier) sourcing option (§3). Supplier selection in order
/// generation (§4.7) prefers the principal link, else the cheapest one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierLink {
    pub product_id: String,
    pub supplier_id: String,
    pub lead_time_days: Option<u32>,
    pub moq: Decimal,
    pub unit_price: Option<Decimal>,
    pub is_principal: bool,
}

impl SupplierLink {
    pub fn new(product_id: impl Into<String>, supplier_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            supplier_id: supplier_id.into(),
            lead_time_days: None,
            moq: Decimal::ZERO,
            unit_price: None,
            is_principal: false,
        }
    }

    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = Some(days);
        self
    }

    pub fn with_unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn with_moq(mut self, moq: Decimal) -> Self {
        self.moq = moq;
        self
    }

    pub fn as_principal(mut self) -> Self {
        self.is_principal = true;
        self
    }

    /// Effective lead time for this link, falling back to the supplier's
    /// default, else 0 (§4.7 "Lead time = link.leadTime ?? supplier.defaultLeadTime ?? 0").
    pub fn effective_lead_time_days(&self, supplier: Option<&Supplier>) -> u32 {
        self.lead_time_days
            .or_else(|| supplier.and_then(|s| s.default_lead_time_days))
            .unwrap_or(0)
    }
}

/// Picks the supplier link to use for a BUY order: the first principal link,
/// else the link with the lowest positive unit price (§4.7).
pub fn select_supplier_link<'a>(links: &'a [SupplierLink]) -> Option<&'a SupplierLink> {
    if let Some(principal) = links.iter().find(|l| l.is_principal) {
        return Some(principal);
    }
    links
        .iter()
        .filter(|l| l.unit_price.map(|p| p > Decimal::ZERO).unwrap_or(false))
        .min_by(|a, b| a.unit_price.unwrap().cmp(&b.unit_price.unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_principal_link() {
        let links = vec![
            SupplierLink::new("P", "S1").with_unit_price(Decimal::from(1)),
            SupplierLink::new("P", "S2").with_unit_price(Decimal::from(5)).as_principal(),
        ];
        let chosen = select_supplier_link(&links).unwrap();
        assert_eq!(chosen.supplier_id, "S2");
    }

    #[test]
    fn falls_back_to_cheapest() {
        let links = vec![
            SupplierLink::new("P", "S1").with_unit_price(Decimal::from(5)),
            SupplierLink::new("P", "S2").with_unit_price(Decimal::from(2)),
        ];
        let chosen = select_supplier_link(&links).unwrap();
        assert_eq!(chosen.supplier_id, "S2");
    }

    #[test]
    fn ignores_non_positive_prices() {
        let links = vec![SupplierLink::new("P", "S1").with_unit_price(Decimal::ZERO)];
        assert!(select_supplier_link(&links).is_none());
    }
}
