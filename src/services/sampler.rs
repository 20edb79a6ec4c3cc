//! 抽题服务 - 业务能力层
//!
//! 只负责"按类别抽样并打乱"能力，不关心流程
//!
//! 抽样流程：
//! 1. 按 ILO 类别分组，类别顺序跟随期望顺序列表
//! 2. 组内 Fisher-Yates 打乱后取前 min(5, N) 道
//! 3. 按期望类别顺序拼接
//! 4. 对拼接结果再做一次独立的 Fisher-Yates，彻底打散类别顺序

use indexmap::IndexMap;
use rand::Rng;
use tracing::debug;

use crate::models::question::QuestionRecord;

/// 每个类别最多抽取的题目数量
pub const QUESTIONS_PER_ILO: usize = 5;

/// 按类别分组
///
/// 返回的 map 以期望顺序列出类别，组内保持记录在题库中的出现顺序；
/// 类别不在期望列表中的记录被丢弃，题库中没有题目的类别不出现在结果里
pub fn group_by_ilo(
    records: &[QuestionRecord],
    ilo_order: &[String],
) -> IndexMap<String, Vec<QuestionRecord>> {
    let mut grouped: IndexMap<String, Vec<QuestionRecord>> = IndexMap::new();
    for ilo in ilo_order {
        let bucket: Vec<QuestionRecord> =
            records.iter().filter(|r| &r.ilo == ilo).cloned().collect();
        if !bucket.is_empty() {
            grouped.insert(ilo.clone(), bucket);
        }
    }
    grouped
}

/// 构建一次会话的完整题目序列
///
/// 空题库产出空序列，由调用方按加载中/空态处理
pub fn build_sequence<R: Rng>(
    records: &[QuestionRecord],
    ilo_order: &[String],
    rng: &mut R,
) -> Vec<QuestionRecord> {
    let grouped = group_by_ilo(records, ilo_order);

    let mut selected = Vec::new();
    for (ilo, mut bucket) in grouped {
        shuffle(&mut bucket, rng);
        let take = bucket.len().min(QUESTIONS_PER_ILO);
        debug!("类别 {} 抽取 {} 道题目", ilo, take);
        selected.extend(bucket.into_iter().take(take));
    }

    // 第二次独立打乱，破坏类别拼接顺序
    shuffle(&mut selected, rng);
    debug!("题目序列构建完成，共 {} 道", selected.len());

    selected
}

/// Fisher-Yates 原地打乱：i 从末位递减到 1，j 均匀取自 [0, i]
fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
