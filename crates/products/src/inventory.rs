//! Individually tracked inventory units and their movement log.

use catalog_core::{DomainError, DomainResult, Dimensions, Entity, EntityMeta, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{InventoryItemId, VariantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    InStock,
    Reserved,
    Sold,
    Shipped,
    Returned,
    Damaged,
    Lost,
    Quarantined,
    InTransit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    New,
    LikeNew,
    Refurbished,
    Used,
    Damaged,
    Returned,
    OpenBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Received,
    Reserved,
    Released,
    Sold,
    Shipped,
    Returned,
    Transferred,
    Adjusted,
    Damaged,
    Lost,
    Quarantined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub movement_type: MovementType,
    pub reference: String,
    pub notes: String,
    pub occurred_at: DateTime<Utc>,
}

/// Input for [`InventoryItem::receive`].
#[derive(Debug, Clone)]
pub struct ReceivedUnit {
    pub variant_id: VariantId,
    pub cost_price: Money,
    pub serial_number: Option<String>,
    pub batch_number: Option<String>,
    pub condition: ItemCondition,
    pub dimensions: Option<Dimensions>,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    meta: EntityMeta<InventoryItemId>,
    variant_id: VariantId,
    serial_number: Option<String>,
    batch_number: Option<String>,
    status: InventoryStatus,
    condition: ItemCondition,
    cost_price: Money,
    dimensions: Option<Dimensions>,
    received_at: DateTime<Utc>,
    sold_at: Option<DateTime<Utc>>,
    shipped_at: Option<DateTime<Utc>>,
    movements: Vec<InventoryMovement>,
}

impl InventoryItem {
    /// Book a unit into stock.
    pub fn receive(unit: ReceivedUnit) -> Self {
        let now = Utc::now();
        let mut item = Self {
            meta: EntityMeta::new_at(InventoryItemId::new(), now),
            variant_id: unit.variant_id,
            serial_number: non_blank(unit.serial_number),
            batch_number: non_blank(unit.batch_number),
            status: InventoryStatus::InStock,
            condition: unit.condition,
            cost_price: unit.cost_price,
            dimensions: unit.dimensions,
            received_at: now,
            sold_at: None,
            shipped_at: None,
            movements: Vec::new(),
        };
        item.log(MovementType::Received, &unit.reference, "", now);
        item
    }

    pub fn variant_id(&self) -> VariantId {
        self.variant_id
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn batch_number(&self) -> Option<&str> {
        self.batch_number.as_deref()
    }

    pub fn status(&self) -> InventoryStatus {
        self.status
    }

    pub fn condition(&self) -> ItemCondition {
        self.condition
    }

    pub fn cost_price(&self) -> &Money {
        &self.cost_price
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn sold_at(&self) -> Option<DateTime<Utc>> {
        self.sold_at
    }

    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    pub fn movements(&self) -> &[InventoryMovement] {
        &self.movements
    }

    pub fn is_available(&self) -> bool {
        self.status == InventoryStatus::InStock
    }

    pub fn reserve(&mut self, reference: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::InStock],
            InventoryStatus::Reserved,
            MovementType::Reserved,
            reference,
            "",
        )
    }

    pub fn release(&mut self, reference: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::Reserved],
            InventoryStatus::InStock,
            MovementType::Released,
            reference,
            "",
        )
    }

    pub fn sell(&mut self, reference: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::InStock, InventoryStatus::Reserved],
            InventoryStatus::Sold,
            MovementType::Sold,
            reference,
            "",
        )?;
        self.sold_at = self.updated_at();
        Ok(())
    }

    pub fn ship(&mut self, reference: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::Sold],
            InventoryStatus::Shipped,
            MovementType::Shipped,
            reference,
            "",
        )?;
        self.shipped_at = self.updated_at();
        Ok(())
    }

    /// Move an available unit between locations.
    pub fn transfer(&mut self, reference: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::InStock],
            InventoryStatus::InTransit,
            MovementType::Transferred,
            reference,
            "dispatched",
        )
    }

    pub fn complete_transfer(&mut self, reference: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::InTransit],
            InventoryStatus::InStock,
            MovementType::Transferred,
            reference,
            "arrived",
        )
    }

    pub fn mark_returned(&mut self, reference: &str, condition: ItemCondition) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::Sold, InventoryStatus::Shipped],
            InventoryStatus::Returned,
            MovementType::Returned,
            reference,
            "",
        )?;
        self.condition = condition;
        Ok(())
    }

    pub fn mark_damaged(&mut self, notes: &str) -> DomainResult<()> {
        self.transition(
            &[
                InventoryStatus::InStock,
                InventoryStatus::Reserved,
                InventoryStatus::Returned,
                InventoryStatus::Quarantined,
                InventoryStatus::InTransit,
            ],
            InventoryStatus::Damaged,
            MovementType::Damaged,
            "",
            notes,
        )?;
        self.condition = ItemCondition::Damaged;
        Ok(())
    }

    pub fn mark_lost(&mut self, notes: &str) -> DomainResult<()> {
        self.transition(
            &[
                InventoryStatus::InStock,
                InventoryStatus::Reserved,
                InventoryStatus::InTransit,
            ],
            InventoryStatus::Lost,
            MovementType::Lost,
            "",
            notes,
        )
    }

    pub fn quarantine(&mut self, notes: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::InStock, InventoryStatus::Returned],
            InventoryStatus::Quarantined,
            MovementType::Quarantined,
            "",
            notes,
        )
    }

    /// Put a returned or quarantined unit back on the shelf.
    pub fn restock(&mut self, notes: &str) -> DomainResult<()> {
        self.transition(
            &[InventoryStatus::Returned, InventoryStatus::Quarantined],
            InventoryStatus::InStock,
            MovementType::Adjusted,
            "",
            notes,
        )
    }

    fn transition(
        &mut self,
        from: &[InventoryStatus],
        to: InventoryStatus,
        movement_type: MovementType,
        reference: &str,
        notes: &str,
    ) -> DomainResult<()> {
        if !from.contains(&self.status) {
            return Err(DomainError::invariant(format!(
                "inventory item {} cannot move from {:?} to {:?}",
                self.id(),
                self.status,
                to
            )));
        }

        let now = Utc::now();
        self.status = to;
        self.meta.mark_updated_at(now);
        self.log(movement_type, reference, notes, now);
        Ok(())
    }

    fn log(&mut self, movement_type: MovementType, reference: &str, notes: &str, at: DateTime<Utc>) {
        self.movements.push(InventoryMovement {
            movement_type,
            reference: reference.trim().to_string(),
            notes: notes.trim().to_string(),
            occurred_at: at,
        });
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn meta(&self) -> &EntityMeta<InventoryItemId> {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn unit() -> InventoryItem {
        InventoryItem::receive(ReceivedUnit {
            variant_id: VariantId::new(),
            cost_price: Money::new(dec!(4.50), "USD").unwrap(),
            serial_number: Some(" SN-001 ".into()),
            batch_number: Some("  ".into()),
            condition: ItemCondition::New,
            dimensions: None,
            reference: "PO-17".into(),
        })
    }

    fn movement_types(item: &InventoryItem) -> Vec<MovementType> {
        item.movements().iter().map(|m| m.movement_type).collect()
    }

    #[test]
    fn received_units_are_in_stock() {
        let item = unit();
        assert!(item.is_available());
        assert_eq!(item.serial_number(), Some("SN-001"));
        assert_eq!(item.batch_number(), None);
        assert_eq!(item.movements()[0].reference, "PO-17");
        assert!(item.updated_at().is_none());
    }

    #[test]
    fn order_flow() {
        let mut item = unit();
        item.reserve("SO-1").unwrap();
        item.sell("SO-1").unwrap();
        item.ship("SHIP-9").unwrap();

        assert_eq!(item.status(), InventoryStatus::Shipped);
        assert!(item.sold_at().is_some());
        assert!(item.shipped_at() >= item.sold_at());
        assert_eq!(
            movement_types(&item),
            vec![
                MovementType::Received,
                MovementType::Reserved,
                MovementType::Sold,
                MovementType::Shipped,
            ]
        );
    }

    #[test]
    fn release_returns_a_reservation_to_stock() {
        let mut item = unit();
        item.reserve("SO-1").unwrap();
        item.release("SO-1").unwrap();
        assert!(item.is_available());
        assert!(item.release("SO-1").is_err());
    }

    #[test]
    fn illegal_transitions_are_invariant_violations() {
        let mut item = unit();
        assert!(matches!(
            item.ship("SHIP-1"),
            Err(DomainError::InvariantViolation(_))
        ));
        assert_eq!(item.movements().len(), 1);

        item.mark_lost("shelf empty").unwrap();
        assert!(item.reserve("SO-2").is_err());
        assert!(item.mark_damaged("n/a").is_err());
    }

    #[test]
    fn returns_can_be_quarantined_then_restocked() {
        let mut item = unit();
        item.sell("SO-1").unwrap();
        item.mark_returned("RMA-3", ItemCondition::OpenBox).unwrap();
        assert_eq!(item.condition(), ItemCondition::OpenBox);

        item.quarantine("inspect seal").unwrap();
        item.restock("passed inspection").unwrap();
        assert!(item.is_available());
        assert_eq!(item.movements().last().unwrap().notes, "passed inspection");
    }

    #[test]
    fn damage_sets_condition() {
        let mut item = unit();
        item.transfer("TR-1").unwrap();
        item.mark_damaged("crushed in transit").unwrap();
        assert_eq!(item.status(), InventoryStatus::Damaged);
        assert_eq!(item.condition(), ItemCondition::Damaged);
    }

    #[test]
    fn transfers_round_trip() {
        let mut item = unit();
        item.transfer("TR-1").unwrap();
        assert!(!item.is_available());
        item.complete_transfer("TR-1").unwrap();
        assert!(item.is_available());
    }
}
