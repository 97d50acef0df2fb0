use std::collections::HashMap;

use crate::errors::Result;
use crate::sale::Sale;
use crate::types::SaleId;

/// persistence collaborator for sale records. `save` always receives the
/// full record, never a partial patch
pub trait SaleRepository {
    /// insert or replace a sale
    fn save(&mut self, sale: &Sale) -> Result<()>;

    fn get(&self, sale_id: SaleId) -> Result<Option<Sale>>;

    /// every sale in the order first stored
    fn all(&self) -> Result<Vec<Sale>>;
}

/// in-memory repository keeping insertion order
#[derive(Debug, Default)]
pub struct MemorySaleRepository {
    order: Vec<SaleId>,
    sales: HashMap<SaleId, Sale>,
}

impl MemorySaleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl SaleRepository for MemorySaleRepository {
    fn save(&mut self, sale: &Sale) -> Result<()> {
        if self.sales.insert(sale.id, sale.clone()).is_none() {
            self.order.push(sale.id);
        }
        Ok(())
    }

    fn get(&self, sale_id: SaleId) -> Result<Option<Sale>> {
        Ok(self.sales.get(&sale_id).cloned())
    }

    fn all(&self) -> Result<Vec<Sale>> {
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.sales.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receivables::test_support::{cash_sale, sale_with_schedule};
    use crate::types::SaleStatus;

    #[test]
    fn test_save_replaces_and_keeps_order() {
        let mut repo = MemorySaleRepository::new();
        let first = sale_with_schedule("Ana", 2, 5);
        let second = cash_sale();

        repo.save(&first).unwrap();
        repo.save(&second).unwrap();

        let mut updated = first.clone();
        updated.status = SaleStatus::Partial;
        repo.save(&updated).unwrap();

        assert_eq!(repo.len(), 2);
        let all = repo.all().unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].status, SaleStatus::Partial);
        assert_eq!(all[1].id, second.id);
        assert_eq!(repo.get(second.id).unwrap(), Some(second));
        assert!(repo.get(uuid::Uuid::new_v4()).unwrap().is_none());
    }
}
