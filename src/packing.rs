//! Packing Boxes
//!
//! Box contents and the quantity bookkeeping done when props are taken out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{LifecycleError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedProp {
    pub prop_id: Uuid,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingBox {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub props: Vec<PackedProp>,
}

impl PackingBox {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            props: Vec::new(),
        }
    }

    /// Pack props, merging with the first entry already in the box
    pub fn pack(mut self, prop_id: Uuid, name: impl Into<String>, quantity: u32) -> Result<Self> {
        if quantity == 0 {
            return Ok(self);
        }
        match self.props.iter_mut().find(|p| p.prop_id == prop_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(quantity)
                    .ok_or(LifecycleError::QuantityOverflow { prop_id })?;
            }
            None => self.props.push(PackedProp {
                prop_id,
                name: name.into(),
                quantity,
            }),
        }
        Ok(self)
    }

    /// Total packed across every entry for the prop
    pub fn quantity_of(&self, prop_id: Uuid) -> u64 {
        self.props
            .iter()
            .filter(|p| p.prop_id == prop_id)
            .map(|p| u64::from(p.quantity))
            .sum()
    }

    pub fn total_items(&self) -> u64 {
        self.props.iter().map(|p| u64::from(p.quantity)).sum()
    }

    /// Remove quantities of props from the box. Stored documents may list a
    /// prop more than once; a removal is taken from its entries in order.
    /// Entries that reach zero are dropped. All-or-nothing: any invalid
    /// removal leaves the box unchanged.
    pub fn remove_props(&self, removals: &[(Uuid, u32)]) -> Result<PackingBox> {
        let mut requested: HashMap<Uuid, u64> = HashMap::new();
        for &(prop_id, qty) in removals {
            let total = requested.entry(prop_id).or_default();
            *total = total
                .checked_add(u64::from(qty))
                .ok_or(LifecycleError::InsufficientQuantity {
                    prop_id,
                    requested: u64::MAX,
                    packed: self.quantity_of(prop_id),
                })?;
        }

        for (&prop_id, &qty) in &requested {
            let packed = self.quantity_of(prop_id);
            if packed == 0 {
                return Err(LifecycleError::PropNotInBox {
                    prop_id,
                    box_id: self.id.clone(),
                });
            }
            if qty > packed {
                return Err(LifecycleError::InsufficientQuantity {
                    prop_id,
                    requested: qty,
                    packed,
                });
            }
        }

        let mut props = Vec::with_capacity(self.props.len());
        for entry in &self.props {
            let available = entry.quantity;
            let taken = match requested.get_mut(&entry.prop_id) {
                Some(left) => {
                    let taken = u32::try_from(*left).map_or(available, |l| l.min(available));
                    *left -= u64::from(taken);
                    taken
                }
                None => 0,
            };
            let remaining = available - taken;
            if remaining > 0 {
                props.push(PackedProp {
                    quantity: remaining,
                    ..entry.clone()
                });
            }
        }

        Ok(PackingBox {
            id: self.id.clone(),
            name: self.name.clone(),
            props,
        })
    }
}
