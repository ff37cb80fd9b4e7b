use crate::error::{ClientError, ClientResult};
use crate::models::{PollStats, TaskHandle, TaskResult};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// 任务提交时指定服务端函数的保留键
pub(crate) const FUNCTION_TARGET_KEY: &str = "apiFunctionTarget";
/// 轮询响应中的完成标记字段
pub(crate) const PROCESSING_DONE_KEY: &str = "processingDone";
/// 完成响应中可能携带的服务端内部载荷字段
pub(crate) const CONTAINER_KEY: &str = "container";
/// 任务句柄字段
pub(crate) const TASK_ID_KEY: &str = "taskID";

/// 每次请求携带的会话凭据
#[derive(Debug, Clone, Copy)]
pub(crate) struct Credentials<'a> {
    pub token: &'a str,
    pub key: &'a str,
}

/// 表单参数：参数名 -> 字符串值
pub(crate) type FormParams = [(&'static str, String)];

/// 远程任务执行器
///
/// 封装所有分析操作共享的「提交-轮询」协议：提交命名任务获得 taskID，
/// 之后以固定间隔轮询 `/checkProcessingStatus`，直到响应携带完成标记。
/// 无超时、无重试，传输层错误按原样向上传播。
#[derive(Debug, Clone)]
pub(crate) struct TaskRunner {
    http: Client,
    base_url: String,
    poll_interval: Duration,
}

impl TaskRunner {
    pub fn new(base_url: String, poll_interval: Duration) -> ClientResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url,
            poll_interval,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// 提交命名任务到通用任务端点 `/apiTask`
    pub async fn submit(
        &self,
        target: &'static str,
        creds: Credentials<'_>,
        params: &FormParams,
    ) -> ClientResult<TaskHandle> {
        let form = request_form(creds, Some(target), params);
        self.post_submission(self.url("/apiTask"), form).await
    }

    /// 将同样形状的任务体提交到指定端点（用于 `/process`）
    pub async fn submit_to(
        &self,
        path: &str,
        creds: Credentials<'_>,
        params: &FormParams,
    ) -> ClientResult<TaskHandle> {
        let form = request_form(creds, None, params);
        self.post_submission(self.url(path), form).await
    }

    async fn post_submission(
        &self,
        url: String,
        form: Vec<(&'static str, String)>,
    ) -> ClientResult<TaskHandle> {
        debug!(%url, "提交远程任务");

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        extract_task_id(&body).map(TaskHandle).ok_or_else(|| {
            ClientError::submission(format!("响应缺少taskID: {}", body_preview(&body)))
        })
    }

    /// 轮询等待任务完成
    ///
    /// `extra` 会合并进每次轮询请求体（个别操作需要随 taskID 一起传递路由提示）。
    pub async fn wait_for_completion(
        &self,
        handle: &TaskHandle,
        creds: Credentials<'_>,
        extra: &FormParams,
    ) -> ClientResult<TaskResult> {
        let url = self.url("/checkProcessingStatus");
        let mut stats = PollStats::new(self.poll_interval);

        loop {
            sleep(self.poll_interval).await;
            stats.check_count += 1;

            let mut form = request_form(creds, None, extra);
            form.push((TASK_ID_KEY, handle.0.clone()));

            let response = self
                .http
                .post(&url)
                .form(&form)
                .send()
                .await?
                .error_for_status()?;

            let body: Value = response.json().await?;
            if let Value::Object(mut fields) = body {
                if fields.remove(PROCESSING_DONE_KEY).is_some() {
                    // container 字段缺失属正常情况
                    fields.remove(CONTAINER_KEY);
                    stats.mark_completed();
                    info!(
                        task_id = %handle,
                        checks = stats.check_count,
                        elapsed_secs = stats.elapsed_secs(),
                        "远程任务完成"
                    );
                    return Ok(TaskResult::new(fields));
                }
            }

            debug!(
                task_id = %handle,
                elapsed_secs = stats.elapsed_secs(),
                "等待远程任务完成"
            );
        }
    }

    /// 提交 + 轮询，所有分析操作的唯一执行入口
    pub async fn run_job(
        &self,
        target: &'static str,
        creds: Credentials<'_>,
        params: &FormParams,
        extra: &FormParams,
    ) -> ClientResult<TaskResult> {
        let handle = self.submit(target, creds, params).await?;
        self.wait_for_completion(&handle, creds, extra).await
    }
}

/// 组装请求体：会话凭据 + API调用标记 + 可选的目标函数名 + 任务参数
pub(crate) fn request_form(
    creds: Credentials<'_>,
    target: Option<&'static str>,
    params: &FormParams,
) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("datasetToken", creds.token.to_string()),
        ("key", creds.key.to_string()),
        ("api", "true".to_string()),
    ];
    if let Some(target) = target {
        form.push((FUNCTION_TARGET_KEY, target.to_string()));
    }
    form.extend(params.iter().cloned());
    form
}

fn extract_task_id(body: &Value) -> Option<String> {
    match body.get(TASK_ID_KEY)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 截取响应体前200字符，用于错误信息
pub(crate) fn body_preview(body: &Value) -> String {
    body.to_string().chars().take(200).collect()
}
