use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// 数据分组信息
///
/// 服务端以字符串形式返回 `selected` 字段（"true" / "false"）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataGroup {
    pub id: i64,
    pub name: String,
    pub selected: String,
}

impl DataGroup {
    /// 当前分组是否处于激活状态
    pub fn is_selected(&self) -> bool {
        self.selected == "true"
    }
}

/// 远程任务句柄
///
/// 由任务提交响应中的 `taskID` 字段得到，仅用于关联后续的状态轮询。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle(pub String);

impl TaskHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 任务完成后返回的结果字段集合
///
/// 完成标记 `processingDone` 与内部载荷字段 `container` 已在返回前剥除。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskResult(Map<String, Value>);

impl TaskResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 将指定结果字段反序列化为具体类型
    pub fn decode_field<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        match self.0.get(key) {
            Some(value) => serde_json::from_value(value.clone()).map(Some),
            None => Ok(None),
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// 单次任务的轮询统计
#[derive(Debug, Clone, Serialize)]
pub struct PollStats {
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub check_count: u32,
    pub check_interval: Duration,
}

impl PollStats {
    pub fn new(check_interval: Duration) -> Self {
        Self {
            submitted_at: Utc::now(),
            completed_at: None,
            check_count: 0,
            check_interval,
        }
    }

    /// 自提交以来经过的秒数
    pub fn elapsed_secs(&self) -> i64 {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        end.signed_duration_since(self.submitted_at).num_seconds()
    }

    pub fn mark_completed(&mut self) {
        self.completed_at = Some(Utc::now());
    }
}
