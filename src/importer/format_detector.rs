// ==========================================
// StockWise 库存预测系统 - 格式探测器
// ==========================================
// 职责: 编码/分隔符探测 + 宽容解析,输出 RawTable
// 支持: 标准 CSV / TSV / 带 BOM 的 Excel 导出 / 整行引号包裹格式
// 策略: 显式有序策略表,逐个尝试直到成功
// ==========================================

use crate::domain::sales::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::path::Path;

/// UTF-8 BOM
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 探测样本长度（字符数）
const SAMPLE_CHARS: usize = 2048;

/// POS 导出文件的典型表头关键词（仅用于诊断日志，不影响解析）
const POS_HEADER_KEYWORDS: &[&str] = &[
    "item name",
    "item_name",
    "product name",
    "sku",
    "quantity sold",
    "net sales",
    "gross sales",
];

// ==========================================
// 编码梯队
// ==========================================

/// 按优先级排列的候选编码
///
/// BOM 变体在前（POS 导出常带 BOM），其后严格 UTF-8，
/// 最后两个 Latin 系回退。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8Bom,
    Utf8,
    Windows1252,
    Iso8859_15,
}

const ENCODING_LADDER: [TextEncoding; 4] = [
    TextEncoding::Utf8Bom,
    TextEncoding::Utf8,
    TextEncoding::Windows1252,
    TextEncoding::Iso8859_15,
];

impl TextEncoding {
    fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Bom => "utf-8-bom",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Iso8859_15 => "iso-8859-15",
        }
    }

    /// 严格解码（失败返回 None，不做替换）
    fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Bom => {
                let stripped = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(stripped).ok().map(str::to_string)
            }
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Windows1252 => {
                let (text, had_errors) =
                    encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                if had_errors {
                    None
                } else {
                    Some(text.into_owned())
                }
            }
            TextEncoding::Iso8859_15 => {
                let (text, had_errors) =
                    encoding_rs::ISO_8859_15.decode_without_bom_handling(bytes);
                if had_errors {
                    None
                } else {
                    Some(text.into_owned())
                }
            }
        }
    }
}

// ==========================================
// 分隔符探测（纯函数）
// ==========================================

/// 选取字段分隔符
///
/// 逗号优先，其次制表符，再退到频率嗅探，兜底逗号。
pub fn pick_delimiter(sample: &str) -> u8 {
    if sample.contains(',') {
        b','
    } else if sample.contains('\t') {
        b'\t'
    } else {
        sniff_delimiter(sample).unwrap_or(b',')
    }
}

/// 频率嗅探候选分隔符（逗号/制表符已在上游排除）
fn sniff_delimiter(sample: &str) -> Option<u8> {
    const CANDIDATES: [u8; 3] = [b';', b'|', b':'];

    CANDIDATES
        .iter()
        .map(|&c| (c, sample.bytes().filter(|&b| b == c).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(c, _)| c)
}

/// 样本是否像 POS 导出（仅诊断用途）
pub fn looks_like_pos_export(sample: &str) -> bool {
    let head: String = sample
        .lines()
        .take(3)
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    POS_HEADER_KEYWORDS.iter().any(|kw| head.contains(kw))
}

/// 截取探测样本（前 SAMPLE_CHARS 个字符）
fn sample_of(text: &str) -> &str {
    match text.char_indices().nth(SAMPLE_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ==========================================
// FormatDetector - 格式探测器
// ==========================================

pub struct FormatDetector;

impl FormatDetector {
    pub fn new() -> Self {
        Self
    }

    /// 从文件路径探测并解析
    ///
    /// # 返回
    /// - Ok(RawTable): 第一个成功的 (编码, 分隔符) 组合的解析结果
    /// - Err(ImportError): 文件缺失 / 扩展名不支持 / 所有策略失败
    pub fn detect(&self, file_path: &Path) -> ImportResult<RawTable> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(
                file_path.display().to_string(),
            ));
        }

        if let Some(ext) = file_path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(ext));
            }
        }

        let bytes = std::fs::read(file_path)?;
        self.detect_bytes(&bytes)
    }

    /// 从字节串探测并解析（无扩展名检查）
    pub fn detect_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut attempts: Vec<String> = Vec::new();

        // 阶段 1: 编码梯队 × 分隔符探测 × 宽容解析
        for encoding in ENCODING_LADDER {
            let Some(text) = encoding.decode(bytes) else {
                attempts.push(format!("{}: 解码失败", encoding.label()));
                continue;
            };

            let sample = sample_of(&text);
            if looks_like_pos_export(sample) {
                tracing::debug!("样本命中 POS 导出关键词");
            }

            let delimiter = pick_delimiter(sample);
            match Self::parse_with(&text, delimiter) {
                Ok(table) if table.column_count() > 1 && !table.is_empty() => {
                    tracing::info!(
                        encoding = encoding.label(),
                        delimiter = %(delimiter as char),
                        columns = table.column_count(),
                        rows = table.row_count(),
                        "格式探测成功"
                    );
                    return Ok(table);
                }
                Ok(table) => {
                    attempts.push(format!(
                        "{} + '{}': 解析结果不满足要求（{} 列 {} 行）",
                        encoding.label(),
                        delimiter as char,
                        table.column_count(),
                        table.row_count()
                    ));
                }
                Err(e) => {
                    attempts.push(format!(
                        "{} + '{}': {}",
                        encoding.label(),
                        delimiter as char,
                        e
                    ));
                }
            }
        }

        // 阶段 2: 整行引号包裹的恢复解析
        match self.quoted_rows_recovery(bytes) {
            Some(table) => {
                tracing::info!("整行引号恢复解析成功");
                return Ok(table);
            }
            None => attempts.push("整行引号恢复: 不适用或解析失败".to_string()),
        }

        // 阶段 3: 最终兜底解析（lossy UTF-8 + 逗号，允许单列结果）
        let text = String::from_utf8_lossy(bytes);
        match Self::parse_with(&text, b',') {
            Ok(table) if !table.is_empty() => {
                tracing::warn!("回退到默认设置的兜底解析");
                Ok(table)
            }
            Ok(_) => {
                attempts.push("兜底解析: 表格为空".to_string());
                Err(ImportError::FormatUndetected {
                    attempts: attempts.join("\n"),
                })
            }
            Err(e) => {
                attempts.push(format!("兜底解析: {}", e));
                Err(ImportError::FormatUndetected {
                    attempts: attempts.join("\n"),
                })
            }
        }
    }

    /// 宽容解析一段文本
    ///
    /// # 规则
    /// - 列名标准化: TRIM + 去引号 + 小写
    /// - 跳过畸形行（长度不一致由 flexible 放行，解析错误的行丢弃）
    /// - 跳过全空白行
    /// - 丢弃多列值完全相同的行（表头重复混入数据的常见症状）
    fn parse_with(text: &str, delimiter: u8) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| {
                h.trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .trim()
                    .to_lowercase()
            })
            .collect();

        let mut table = RawTable::new(columns);

        for result in reader.records() {
            // 畸形行: 跳过而非中止
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!("跳过畸形行: {}", e);
                    continue;
                }
            };

            let mut row = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(column) = table.columns.get(col_idx) {
                    row.insert(column.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row.values().all(|v| v.is_empty()) {
                continue;
            }

            // 多列值完全相同 → 疑似表头重复,丢弃
            if table.column_count() > 1 {
                let mut values = row.values();
                if let Some(first) = values.next() {
                    if values.all(|v| v == first) {
                        continue;
                    }
                }
            }

            table.rows.push(row);
        }

        Ok(table)
    }

    /// 恢复解析: 整行被引号包裹的导出
    ///
    /// 形如 `"2025-01-01,Latte,2"` 的行先剥去首尾引号，
    /// 再按逗号重新解析。
    fn quoted_rows_recovery(&self, bytes: &[u8]) -> Option<RawTable> {
        let stripped = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
        let text = std::str::from_utf8(stripped).ok()?;

        let first_line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
        if !(first_line.starts_with('"') && first_line.contains(',')) {
            return None;
        }

        let cleaned: String = text
            .lines()
            .map(|line| {
                let t = line.trim();
                if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
                    &t[1..t.len() - 1]
                } else {
                    t
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self::parse_with(&cleaned, b',')
            .ok()
            .filter(|table| table.column_count() > 1 && !table.is_empty())
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}
