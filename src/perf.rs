use rusqlite::Connection;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(200);
static SQL_COUNT: AtomicU64 = AtomicU64::new(0);

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn truncate_sql(sql: &str, max_len: usize) -> String {
    let s = sql.trim().replace('\n', " ");
    if s.chars().count() <= max_len {
        return s;
    }
    let head: String = s.chars().take(max_len).collect();
    format!("{}…", head)
}

/// 安装 SQLite 语句 trace/profile（SQL 计数 + 慢查询日志）
///
/// 开关：
/// - 默认关闭
/// - `ROUTE_RECONCILE_TRACE_SQL=1` 开启
/// - `ROUTE_RECONCILE_SLOW_SQL_MS=50` 配置慢 SQL 阈值（毫秒，默认 200）
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = std::env::var("ROUTE_RECONCILE_TRACE_SQL")
        .map(|v| is_true(&v))
        .unwrap_or(false);

    if !enabled {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    if let Some(ms) = std::env::var("ROUTE_RECONCILE_SLOW_SQL_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        SLOW_SQL_THRESHOLD_MS.store(ms, Ordering::Relaxed);
    }

    conn.trace(Some(sql_trace_callback));
    conn.profile(Some(sql_profile_callback));
}

/// 已执行的 SQL 语句数（仅在开启 trace 时计数）
pub fn sql_statement_count() -> u64 {
    SQL_COUNT.load(Ordering::Relaxed)
}

fn sql_trace_callback(sql: &str) {
    SQL_COUNT.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(target: "route_reconcile::sql", sql = %truncate_sql(sql, 200), "sql");
}

fn sql_profile_callback(sql: &str, elapsed: Duration) {
    let elapsed_ms = elapsed.as_millis() as u64;
    if elapsed_ms >= SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed) {
        tracing::warn!(
            target: "route_reconcile::sql",
            elapsed_ms,
            sql = %truncate_sql(sql, 500),
            "慢 SQL"
        );
    } else {
        tracing::debug!(
            target: "route_reconcile::sql",
            elapsed_ms,
            sql = %truncate_sql(sql, 200),
            "sql done"
        );
    }
}

/// 性能统计 Guard：记录 elapsed_ms + SQL 语句数
///
/// 使用方式：
/// ```ignore
/// let _perf = route_reconcile::perf::PerfGuard::new("route_changes");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    sql_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            sql_start: sql_statement_count(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let sql_count = sql_statement_count().saturating_sub(self.sql_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            sql_count,
            "done"
        );
    }
}
