//! CSV 输出
//!
//! UTF-8 带 BOM，行尾 CRLF；表头取第一条记录的字段名。

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::calendar::{PeriodKind, ReportingPeriod};
use crate::error::ReportError;
use crate::models::ReportRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `resultAtdCheck_m01_20240221-20240320_20240325-093000.csv`
pub fn output_file_name(kind: PeriodKind, period: &ReportingPeriod, now: NaiveDateTime) -> String {
    format!(
        "resultAtdCheck_m{:02}_{}-{}_{}.csv",
        kind.code(),
        period.start().format("%Y%m%d"),
        period.end().format("%Y%m%d"),
        now.format("%Y%m%d-%H%M%S")
    )
}

/// 生成 CSV 内容
pub fn render_csv(records: &[ReportRecord]) -> Result<Vec<u8>, ReportError> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(&mut buffer);
        if let Some(first) = records.first() {
            writer.write_record(first.headers())?;
        }
        for record in records {
            writer.write_record(record.rendered_values())?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(buffer)
}

/// 写出 CSV 文件，返回文件路径
pub fn write_csv(
    output_dir: &Path,
    file_name: &str,
    records: &[ReportRecord],
) -> Result<PathBuf, ReportError> {
    let path = output_dir.join(file_name);
    let content = render_csv(records)?;
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let mut file = std::fs::File::create(&path).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    file.write_all(&content).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!("✓ 已输出 '{}' ({} 行)", path.display(), records.len());
    Ok(path)
}
