use thiserror::Error;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("未提供Phosphomatics API密钥")]
    MissingCredential,

    #[error("API密钥验证失败: {0}")]
    InvalidCredential(String),

    #[error("尚未设置数据集令牌，请先调用 start_new_experiment() 或 set_dataset_token()")]
    NoSession,

    #[error("任务提交失败: {0}")]
    Submission(String),

    #[error("获取数据集令牌失败: {0}")]
    TokenAcquisition(String),

    #[error("网络请求错误: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(String),
}

/// 客户端Result类型别名
pub type ClientResult<T> = Result<T, ClientError>;

/// 错误构造辅助函数
impl ClientError {
    pub fn invalid_credential<T: Into<String>>(msg: T) -> Self {
        Self::InvalidCredential(msg.into())
    }

    pub fn submission<T: Into<String>>(msg: T) -> Self {
        Self::Submission(msg.into())
    }

    pub fn token_acquisition<T: Into<String>>(msg: T) -> Self {
        Self::TokenAcquisition(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }
}
