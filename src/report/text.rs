// ==========================================
// 路线客户对账工具 - 文本报告
// ==========================================
// 输出: 人读文本（stdout）
// ==========================================

use crate::domain::customer::CustomerRecord;
use crate::domain::inventory::NOT_AVAILABLE;
use crate::domain::report::{
    ChangedCustomer, CrossReferenceOutcome, CrossReferenceReport, RouteChangeReport,
    SnapshotComparison, SnapshotSide,
};
use std::io::{self, Write};

/// 按路线对账报告
pub fn write_route_changes<W: Write>(out: &mut W, report: &RouteChangeReport) -> io::Result<()> {
    writeln!(out, "ROUTE-BY-ROUTE CUSTOMER CHANGES:")?;
    writeln!(out)?;

    for route in &report.routes {
        let diff = &route.diff;
        writeln!(out, "🛣️  ROUTE {}:", route.route)?;
        writeln!(
            out,
            "   CSV: {} customers | DB: {} customers",
            diff.csv_count, diff.db_count
        )?;

        if !diff.new_customers.is_empty() {
            writeln!(out, "   ➕ NEW customers ({}):", diff.new_customers.len())?;
            for customer in &diff.new_customers {
                write_customer_line(out, customer)?;
            }
        }

        if !diff.removed_customers.is_empty() {
            writeln!(
                out,
                "   ➖ REMOVED customers ({}):",
                diff.removed_customers.len()
            )?;
            for customer in &diff.removed_customers {
                write_customer_line(out, customer)?;
            }
        }

        if !diff.has_membership_changes() {
            writeln!(out, "   ✅ No changes - all customers match!")?;
        }
        writeln!(out)?;
    }

    let overall = &report.overall;
    writeln!(out, "SUMMARY (routes {}):", join_routes(&report.routes_in_scope))?;
    writeln!(
        out,
        "   CSV: {} | DB: {} | matched: {}",
        overall.csv_count, overall.db_count, overall.matched_count
    )?;
    writeln!(
        out,
        "   ➕ NEW: {} | ➖ REMOVED: {} | ✏️  CHANGED: {}",
        overall.new_customers.len(),
        overall.removed_customers.len(),
        overall.changed_customers.len()
    )?;

    if !overall.changed_customers.is_empty() {
        writeln!(out)?;
        writeln!(out, "✏️  CHANGED customers ({}):", overall.changed_customers.len())?;
        for changed in &overall.changed_customers {
            write_changed_customer(out, changed)?;
        }
    }

    Ok(())
}

/// 库存交叉比对报告（含中止诊断）
pub fn write_cross_reference<W: Write>(
    out: &mut W,
    outcome: &CrossReferenceOutcome,
) -> io::Result<()> {
    match outcome {
        CrossReferenceOutcome::Completed(report) => write_cross_reference_report(out, report),
        CrossReferenceOutcome::Aborted {
            new_customer_total,
            reason,
            diagnostics,
        } => {
            writeln!(
                out,
                "Found {} NEW customers total across all routes",
                new_customer_total
            )?;
            writeln!(out)?;
            writeln!(out, "⚠️  Cross-reference aborted: {}", reason)?;
            for line in diagnostics {
                writeln!(out, "   - {}", line)?;
            }
            Ok(())
        }
    }
}

fn write_cross_reference_report<W: Write>(
    out: &mut W,
    report: &CrossReferenceReport,
) -> io::Result<()> {
    let census = &report.census;

    writeln!(
        out,
        "Found {} NEW customers total across all routes",
        report.new_customer_total
    )?;
    writeln!(out)?;
    writeln!(out, "Loaded CustomerMaster with {} records", census.row_count)?;
    writeln!(
        out,
        "CustomerMaster columns: {}",
        census.columns_preview.join(", ")
    )?;
    writeln!(out, "Using customer column: {}", census.customer_column)?;
    writeln!(
        out,
        "CustomerMaster has {} unique customers",
        census.distinct_customers
    )?;
    writeln!(out)?;

    writeln!(out, "🎯 CROSS-REFERENCE RESULTS:")?;
    writeln!(
        out,
        "✅ NEW customers WITH inventory data: {}",
        report.with_inventory.len()
    )?;
    writeln!(
        out,
        "❌ NEW customers WITHOUT inventory data: {}",
        report.without_inventory.len()
    )?;
    writeln!(out)?;

    if !report.with_inventory.is_empty() {
        writeln!(out, "📦 NEW CUSTOMERS WITH INVENTORY DATA:")?;
        for matched in &report.with_inventory {
            write_customer_detail(out, &matched.customer)?;
            writeln!(
                out,
                "      📦 {} inventory items in CustomerMaster",
                matched.item_count
            )?;
            if !matched.sample_items.is_empty() {
                writeln!(out, "      🏷️  Sample items:")?;
                for item in &matched.sample_items {
                    writeln!(
                        out,
                        "         • {} (Qty: {})",
                        item.item_desc_or_na(),
                        item.qty_or_na()
                    )?;
                }
            }
            writeln!(out)?;
        }
    }

    if !report.without_inventory.is_empty() {
        writeln!(out, "❓ NEW CUSTOMERS WITHOUT INVENTORY DATA:")?;
        for customer in &report.without_inventory {
            write_customer_detail(out, customer)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// 数据库快照比对报告
pub fn write_snapshot_comparison<W: Write>(
    out: &mut W,
    comparison: &SnapshotComparison,
) -> io::Result<()> {
    writeln!(out, "🔍 DATABASE COMPARISON ANALYSIS")?;
    writeln!(out, "=====================================")?;
    writeln!(out, "Backup:  {}", comparison.backup.path)?;
    writeln!(out, "Current: {}", comparison.current.path)?;
    writeln!(out)?;

    writeln!(out, "📊 CUSTOMER COUNTS")?;
    writeln!(
        out,
        "Backup Database Customers: {}",
        comparison.backup.customer_count
    )?;
    writeln!(
        out,
        "Current Database Customers: {}",
        comparison.current.customer_count
    )?;
    writeln!(out, "Difference: {}", comparison.customer_count_delta())?;
    writeln!(out)?;

    writeln!(out, "📦 CUSTOMER ITEMS")?;
    writeln!(
        out,
        "customer_items table exists in backup: {}",
        comparison.backup.customer_item_count.is_some()
    )?;
    writeln!(
        out,
        "customer_items table exists in current: {}",
        comparison.current.customer_item_count.is_some()
    )?;
    match comparison.item_count_delta() {
        Some(delta) => {
            writeln!(
                out,
                "Backup Database Items: {}",
                count_or_na(comparison.backup.customer_item_count)
            )?;
            writeln!(
                out,
                "Current Database Items: {}",
                count_or_na(comparison.current.customer_item_count)
            )?;
            writeln!(out, "Difference: {}", delta)?;
        }
        None => {
            write_tables(out, "backup", &comparison.backup)?;
            write_tables(out, "current", &comparison.current)?;
        }
    }
    writeln!(out)?;

    writeln!(out, "👥 CUSTOMERS ADDED SINCE BACKUP ({})", comparison.added.len())?;
    for customer in &comparison.added {
        write_customer_line(out, customer)?;
    }
    writeln!(
        out,
        "👋 CUSTOMERS REMOVED SINCE BACKUP ({})",
        comparison.removed.len()
    )?;
    for customer in &comparison.removed {
        write_customer_line(out, customer)?;
    }
    writeln!(out)?;

    writeln!(out, "💾 DATABASE FILE SIZES")?;
    writeln!(
        out,
        "Backup Database: {} bytes",
        count_or_na(comparison.backup.file_size_bytes)
    )?;
    writeln!(
        out,
        "Current Database: {} bytes",
        count_or_na(comparison.current.file_size_bytes)
    )?;
    if let Some(delta) = comparison.size_delta() {
        writeln!(out, "Size Difference: {} bytes", delta)?;
    }

    Ok(())
}

fn write_customer_line<W: Write>(out: &mut W, customer: &CustomerRecord) -> io::Result<()> {
    writeln!(
        out,
        "      {}: {} (Route {})",
        customer.customer_number,
        customer.account_name,
        customer.route_label()
    )
}

fn write_customer_detail<W: Write>(out: &mut W, customer: &CustomerRecord) -> io::Result<()> {
    writeln!(
        out,
        "   {}: {} (Route {})",
        customer.customer_number,
        customer.account_name,
        customer.route_label()
    )?;
    writeln!(out, "      📍 {}", customer.location_label())
}

fn write_changed_customer<W: Write>(out: &mut W, changed: &ChangedCustomer) -> io::Result<()> {
    writeln!(out, "   {}: {}", changed.customer_number, changed.account_name)?;
    for difference in &changed.differences {
        writeln!(
            out,
            "      {}: DB '{}' → CSV '{}'",
            difference.field,
            difference.database,
            or_na(&difference.csv)
        )?;
    }
    Ok(())
}

fn write_tables<W: Write>(out: &mut W, label: &str, side: &SnapshotSide) -> io::Result<()> {
    writeln!(out, "Tables in {} database:", label)?;
    for table in &side.tables {
        writeln!(out, "  - {}", table)?;
    }
    Ok(())
}

fn join_routes(routes: &[u32]) -> String {
    routes
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn count_or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}
