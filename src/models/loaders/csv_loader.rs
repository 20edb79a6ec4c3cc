use tracing::debug;

use crate::models::question::QuestionRecord;

/// 解析题库 CSV 文本为题目记录列表
///
/// 按表头列名取值；类别或题干为空的行、无法解析的行直接丢弃，
/// 不向调用方报错（丢弃数量只进 debug 日志）
pub fn parse_question_bank(raw: &str) -> Vec<QuestionRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<QuestionRecord>() {
        match row {
            Ok(record) if record.is_usable() => records.push(record),
            Ok(_) | Err(_) => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("题库解析: 丢弃 {} 行不完整记录", dropped);
    }
    debug!("题库解析: 共加载 {} 道题目", records.len());

    records
}
