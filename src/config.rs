use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Phosphomatics 服务基础URL
    pub base_url: String,
    /// 任务状态轮询间隔（秒）
    pub poll_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://phosphomatics.com".to_string(),
            poll_interval_secs: 1,
        }
    }
}

impl ClientConfig {
    /// 从TOML文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| ClientError::config(format!("解析配置文件失败: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ClientResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::config(format!("序列化配置失败: {}", e)))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config("base_url 不能为空"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config(
                "base_url 必须以 http:// 或 https:// 开头",
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(ClientError::config("轮询间隔必须大于0"));
        }

        Ok(())
    }

    /// 轮询间隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
