// ==========================================
// 路线客户对账工具 - JSON 报告
// ==========================================

use serde::Serialize;
use std::io::{self, Write};

/// 序列化为带缩进的 JSON（末尾换行）
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
