// ==========================================
// 路线客户对账工具 - 库存交叉比对引擎
// ==========================================
// 职责: 将新客户划分为「有库存」与「无库存」两组
// 规则: 去掉工厂前缀后，客户号在库存标识列中做子串匹配
// 红线: 两组严格划分新客户集合（不重不漏）
// ==========================================

use crate::domain::customer::CustomerRecord;
use crate::domain::inventory::{InventoryTable, DEFAULT_CUSTOMER_PREFIX};
use crate::domain::report::InventoryMatch;

/// 每个有库存客户展示的样例条数
pub const DEFAULT_SAMPLE_ITEMS: usize = 3;

pub struct CrossReferencer {
    sample_size: usize,
    customer_prefix: String,
}

impl CrossReferencer {
    /// # 参数
    /// - sample_size: 每个客户保留的样例条数
    /// - customer_prefix: 标识列中客户号前的工厂前缀（匹配前去掉）
    pub fn new(sample_size: usize, customer_prefix: impl Into<String>) -> Self {
        Self {
            sample_size,
            customer_prefix: customer_prefix.into(),
        }
    }

    /// 划分新客户
    ///
    /// # 返回
    /// - (有库存, 无库存)，两组均保持输入顺序
    pub fn partition(
        &self,
        new_customers: &[CustomerRecord],
        inventory: &InventoryTable,
    ) -> (Vec<InventoryMatch>, Vec<CustomerRecord>) {
        let mut with_inventory = Vec::new();
        let mut without_inventory = Vec::new();

        for customer in new_customers {
            let items: Vec<_> = inventory
                .items_for(customer.customer_number, &self.customer_prefix)
                .collect();
            if items.is_empty() {
                without_inventory.push(customer.clone());
                continue;
            }

            tracing::debug!(
                customer = customer.customer_number,
                items = items.len(),
                "客户存在库存"
            );

            with_inventory.push(InventoryMatch {
                customer: customer.clone(),
                item_count: items.len(),
                sample_items: items
                    .into_iter()
                    .take(self.sample_size)
                    .cloned()
                    .collect(),
            });
        }

        (with_inventory, without_inventory)
    }
}

impl Default for CrossReferencer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_ITEMS, DEFAULT_CUSTOMER_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::InventoryRecord;
    use crate::domain::types::SnapshotSource;
    use std::collections::BTreeSet;

    fn customer(id: i64) -> CustomerRecord {
        CustomerRecord {
            customer_number: id,
            account_name: format!("ACCOUNT {}", id),
            address: None,
            city: None,
            zip_code: None,
            route_number: Some(9),
            source: SnapshotSource::RouteCsv,
            row_number: 1,
        }
    }

    fn inventory(refs: &[&str]) -> InventoryTable {
        InventoryTable {
            customer_column: "CustomerNum".to_string(),
            records: refs
                .iter()
                .enumerate()
                .map(|(idx, r)| InventoryRecord {
                    customer_ref: r.to_string(),
                    item_desc: Some(format!("ITEM {}", idx)),
                    reg_invty_qty: None,
                    row_number: idx + 1,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_partition_is_exact() {
        let new_customers = vec![customer(1001), customer(2002), customer(3003)];
        let table = inventory(&["Plant 2502,1001", "Plant 2502,3003", "Plant 2502,1001"]);

        let (with, without) = CrossReferencer::default().partition(&new_customers, &table);

        let with_ids: BTreeSet<i64> = with.iter().map(|m| m.customer.customer_number).collect();
        let without_ids: BTreeSet<i64> = without.iter().map(|c| c.customer_number).collect();

        assert!(with_ids.is_disjoint(&without_ids));
        assert_eq!(with_ids.len() + without_ids.len(), new_customers.len());
        assert_eq!(with_ids, BTreeSet::from([1001, 3003]));
        assert_eq!(without_ids, BTreeSet::from([2002]));
        assert_eq!(with[0].item_count, 2);
    }

    #[test]
    fn test_sample_items_are_capped() {
        let table = inventory(&["1001", "1001", "1001", "1001", "1001"]);
        let (with, _) = CrossReferencer::new(3, DEFAULT_CUSTOMER_PREFIX).partition(&[customer(1001)], &table);

        assert_eq!(with[0].item_count, 5);
        assert_eq!(with[0].sample_items.len(), 3);
        assert_eq!(with[0].sample_items[0].item_desc_or_na(), "ITEM 0");
        assert_eq!(with[0].sample_items[0].qty_or_na(), "N/A");
    }

    #[test]
    fn test_plant_code_digits_do_not_count_as_inventory() {
        let new_customers = vec![customer(25), customer(100)];
        let table = inventory(&["Plant 2502,1001", "Plant 2502,3003"]);

        let (with, without) = CrossReferencer::default().partition(&new_customers, &table);

        // 100 是 "1001" 的子串，仍按松散匹配命中；25 只出现在工厂前缀里
        assert_eq!(with.len(), 1);
        assert_eq!(with[0].customer.customer_number, 100);
        assert_eq!(with[0].item_count, 1);
        assert_eq!(without.len(), 1);
        assert_eq!(without[0].customer_number, 25);
    }

    #[test]
    fn test_empty_inventory_puts_all_without() {
        let (with, without) =
            CrossReferencer::default().partition(&[customer(1), customer(2)], &inventory(&[]));
        assert!(with.is_empty());
        assert_eq!(without.len(), 2);
    }
}
