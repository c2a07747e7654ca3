use std::collections::BTreeMap;

use crate::{
    error::Result,
    order::{Order, OrderId, OrderLine},
    record::SalesTable,
};

/// Sales lines grouped by order id.
///
/// Built in one pass over the input. Groups iterate in ascending order id
/// (see [`OrderId`] for how ids compare); within a group, lines keep their
/// input order until [`Order::new`] sorts them.
#[derive(Debug, Default)]
pub struct OrderGroups {
    extra_columns: Vec<String>,
    groups: BTreeMap<OrderId, Vec<OrderLine>>,
}

impl OrderGroups {
    /// Groups every record of `table`, computing each line's total price.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Overflow`] if a line total cannot be represented.
    pub fn from_table(table: SalesTable) -> Result<Self> {
        let mut groups: BTreeMap<OrderId, Vec<OrderLine>> = BTreeMap::new();
        for record in table.records {
            let (order_id, line) = record.into_line()?;
            groups.entry(order_id).or_default().push(line);
        }
        Ok(Self {
            extra_columns: table.extra_columns,
            groups,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Headers of the source columns carried in [`OrderLine::extra`].
    #[must_use]
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Returns the order ids in iteration order.
    pub fn order_ids(&self) -> impl Iterator<Item = &OrderId> {
        self.groups.keys()
    }

    /// Consumes the groups, yielding one sorted [`Order`] per order id.
    pub fn into_orders(self) -> impl Iterator<Item = Result<Order>> {
        self.groups
            .into_iter()
            .map(|(id, lines)| Order::new(id, lines))
    }
}
