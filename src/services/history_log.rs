//! 历史记录服务 - 业务能力层
//!
//! 职责：
//! - 维护最近 10 条提交快照（最新的在最前面）
//! - 启动时从状态存储加载，之后每次变更尽力写回
//! - 持久化失败只告警，不打断提交流程
//! - 不关心流程顺序

use std::sync::Arc;

use tracing::{debug, warn};

use crate::infrastructure::{StateStore, HISTORY_KEY};
use crate::models::history::{HistoryItem, HISTORY_CAP};

/// 历史记录服务
pub struct HistoryLog {
    store: Arc<dyn StateStore>,
    items: Vec<HistoryItem>,
}

impl HistoryLog {
    /// 创建历史记录服务，并从状态存储加载已有记录
    ///
    /// 存储读取失败或内容损坏时按空历史处理（只告警）。
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        let items = load_items(store.as_ref());
        debug!("📁 历史记录加载完成，共 {} 条", items.len());

        Self { store, items }
    }

    /// 追加一条快照到最前面，超过容量时丢掉最旧的
    pub fn push(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAP);
        self.persist();
    }

    /// 清空全部历史记录（内存和持久化一起清）
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(e) = self.store.clear(HISTORY_KEY) {
            warn!("⚠️ 历史记录清除失败: {}", e);
        }
    }

    /// 当前的历史记录，最新的在最前面
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 把当前列表写回状态存储，失败只告警
    fn persist(&self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => {
                if let Err(e) = self.store.write(HISTORY_KEY, &json) {
                    warn!("⚠️ 历史记录保存失败: {}", e);
                }
            }
            Err(e) => {
                warn!("⚠️ 历史记录序列化失败: {}", e);
            }
        }
    }
}

/// 从状态存储加载历史记录
fn load_items(store: &dyn StateStore) -> Vec<HistoryItem> {
    match store.read(HISTORY_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<Vec<HistoryItem>>(&json) {
            Ok(mut items) => {
                // 旧版本可能存了超出容量的记录，加载时裁掉
                items.truncate(HISTORY_CAP);
                items
            }
            Err(e) => {
                warn!("⚠️ 历史记录内容损坏，按空历史处理: {}", e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("⚠️ 历史记录读取失败，按空历史处理: {}", e);
            Vec::new()
        }
    }
}
