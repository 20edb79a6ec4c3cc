//! 结果判定服务 - 业务能力层
//!
//! 只负责"统计作答并判定最终 vibe"能力，不关心流程

use chrono::Utc;
use indexmap::IndexMap;
use phf::phf_map;
use rand::Rng;
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::infrastructure::DocumentStore;
use crate::models::response::ResultSummary;

/// 25 个 vibe 代码到备选结果池的固定映射
///
/// 与既有线上数据保持一致，不要改动任何条目
static MINERVA_VIBES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "Civic" => &["Stewardship", "Altruism", "Community"],
    "Legion" => &["Camaraderie", "Valor", "Solidarity"],
    "Liberty" => &["Autonomy", "Empowerment", "Liberation"],
    "North" => &["Vision", "Foresight", "Aspiration"],
    "Tower" => &["Courage", "Perspective", "Resilience"],
    "Lands" => &["Heritage", "Immersion", "Diversity"],
    "Ocean" => &["Voyage", "Depth", "Exploration"],
    "Plaza" => &["Inclusivity", "Exchange", "Openness"],
    "Reserve" => &["Discernment", "Essence", "Prudence"],
    "Vista" => &["Reflection", "Narrative", "Evolution"],
    "Pier" => &["Conviction", "Launch", "Promise"],
    "Cable" => &["Bonds", "Interdependence", "Network"],
    "Chronicle" => &["Veracity", "Documentation", "Accountability"],
    "Pyramid" => &["Identity", "Introspection", "Foundation"],
    "Union" => &["Alliance", "Commitment", "Loyalty"],
    "Field" => &["Cultivation", "Synergy", "Growth"],
    "Gate" => &["Progression", "Threshold", "Ambition"],
    "Labyrinth" => &["Journey", "Discovery", "Persistence"],
    "Laurel" => &["Innovation", "Inquiry", "Curiosity"],
    "Mason" => &["Craftsmanship", "Collaboration", "Education"],
    "Circuit" => &["Cycles", "Interconnectedness", "Flow"],
    "Eureka" => &["Breakthrough", "Revelation", "Ingenuity"],
    "Hunter" => &["Pursuit", "Instinct", "Tenacity"],
    "Mission" => &["Purpose", "Vocation", "Calling"],
    "Octagon" => &["Equilibrium", "Harmony", "Balance"],
};

/// 未知标签的兜底结果
const FALLBACK_VIBE: &str = "unique";

/// 判定结果
#[derive(Debug, Clone)]
pub enum Resolution {
    /// 当前用户没有任何作答文档
    NoResponse,
    /// 有文档但没有任何有效作答
    NoAnswers,
    /// 判定完成
    Summary(ResultSummary),
}

/// 结果判定服务
///
/// 职责：
/// - 按 userId 查询当前用户的作答文档（不依赖文档 id）
/// - 统计有效作答并判定最终 vibe
/// - 把统计结果回写到会话文档上，回写失败只记日志
pub struct ResultResolver<S> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> ResultResolver<S> {
    /// 创建新的结果判定服务
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// 读取当前用户的作答并判定最终 vibe
    pub async fn resolve(&self, user_id: &str) -> Result<Resolution, StoreError> {
        let docs = self.store.query(&self.collection, "userId", user_id).await?;
        let Some((doc_id, doc)) = docs.into_iter().next() else {
            info!("用户 {} 没有作答记录", user_id);
            return Ok(Resolution::NoResponse);
        };

        let tally = tally_answers(&doc);
        if tally.is_empty() {
            info!("用户 {} 的作答记录没有有效答案", user_id);
            return Ok(Resolution::NoAnswers);
        }

        let top = top_category(&tally).to_string();
        let vibe = choose_vibe(&top, &mut rand::thread_rng());
        info!("✓ 判定完成: {} → {}", top, vibe);

        let summary = ResultSummary {
            top_category: top,
            minerva_vibe: vibe,
            category_tally: tally,
            calculated_at: Utc::now(),
        };

        // 回写统计结果；失败不影响已经拿到的值
        let patch = json!({
            "results": &summary,
            "lastUpdated": Utc::now(),
        });
        if let Err(e) = self.store.update(&self.collection, &doc_id, patch).await {
            warn!("⚠️ 统计结果回写失败（忽略）: {}", e);
        }

        Ok(Resolution::Summary(summary))
    }
}

/// 统计有效作答
///
/// 遍历文档中 q 开头的字段，answer 为非空字符串时计数；
/// 统计 key 是作答时记录的分组标签本身，不是 ILO 类别码
pub fn tally_answers(doc: &JsonValue) -> IndexMap<String, u32> {
    let mut tally: IndexMap<String, u32> = IndexMap::new();
    let Some(fields) = doc.as_object() else {
        return tally;
    };

    for (key, value) in fields {
        if !key.starts_with('q') {
            continue;
        }
        let Some(answer) = value.get("answer").and_then(JsonValue::as_str) else {
            continue;
        };
        if answer.is_empty() {
            continue;
        }
        *tally.entry(answer.to_string()).or_insert(0) += 1;
    }

    tally
}

/// 取计数最高的标签
///
/// 从左到右归约，只有严格更大的计数才替换当前结果，
/// 并列时保留先遇到的（按 map 的插入顺序）
pub fn top_category(tally: &IndexMap<String, u32>) -> &str {
    let mut best: Option<(&str, u32)> = None;
    for (label, &count) in tally {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label).unwrap_or_default()
}

/// 从对应结果池中均匀随机选一个 vibe，未知标签回退到 "unique"
pub fn choose_vibe<R: Rng>(top_category: &str, rng: &mut R) -> String {
    let pool: &[&str] = MINERVA_VIBES
        .get(top_category)
        .copied()
        .unwrap_or(&[FALLBACK_VIBE]);
    pool[rng.gen_range(0..pool.len())].to_string()
}
