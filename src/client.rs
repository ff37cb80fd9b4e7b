use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::jobs::{
    AnalysisJob, ClusterMap, CorrelationMatrix, DistributionPlot, FeatureAbundancePlot,
    KinaseClusterMap, KinaseQuantitationPlot, KinaseSCurve, KinaseVolcanoPlot, KseaAnalysis,
    LdaPlot, PcaPlot, PhosphorylationNetworks, ProteinListEnrichment, QuantilePlot, SCurve,
    SequenceAnalysis, SubstrateCorrelationPlot, Volcano,
};
use crate::models::{DataGroup, TaskResult};
use crate::task::{Credentials, TaskRunner, body_preview, request_form};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// `/process` 提交与轮询时附带的路由提示
const PROCESS_ROUTING_URL: &str = "/processSampleGroupings";

/// Phosphomatics 实验会话客户端
///
/// 构造时校验API密钥；之后通过 [`start_new_experiment`](Self::start_new_experiment)
/// 或 [`set_dataset_token`](Self::set_dataset_token) 建立会话。未建立会话前，
/// 所有会话绑定操作返回 [`ClientError::NoSession`]，且不会发出任何网络请求。
#[derive(Debug, Clone)]
pub struct Phosphomatics {
    runner: TaskRunner,
    key: String,
    dataset_token: Option<String>,
    data_groups: Option<Vec<DataGroup>>,
}

impl Phosphomatics {
    /// 使用默认配置创建客户端并校验API密钥
    pub async fn connect(key: impl Into<String>) -> ClientResult<Self> {
        Self::connect_with_config(key, ClientConfig::default()).await
    }

    /// 使用指定配置创建客户端并校验API密钥
    pub async fn connect_with_config(
        key: impl Into<String>,
        config: ClientConfig,
    ) -> ClientResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ClientError::MissingCredential);
        }
        config.validate()?;

        let runner = TaskRunner::new(config.base_url.clone(), config.poll_interval())?;

        let url = runner.url("/authenticateAPIKey");
        debug!(%url, "校验API密钥");
        let response = runner
            .http()
            .post(url)
            .form(&[("key", key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let valid = match body.get("valid") {
            Some(Value::String(s)) => s == "true",
            Some(Value::Bool(b)) => *b,
            _ => false,
        };
        if !valid {
            return Err(ClientError::invalid_credential("服务端拒绝了该密钥"));
        }

        Ok(Self {
            runner,
            key,
            dataset_token: None,
            data_groups: None,
        })
    }

    /// 会话守卫：所有会话绑定操作的唯一令牌出口
    ///
    /// 豁免操作（构造校验、`start_new_experiment`、`set_dataset_token`、
    /// `dataset_token` 及配置处理）不经过此函数；其余操作一律经由
    /// `run_job` 或文件上传入口进入，二者首先在此取得令牌。
    fn credentials(&self) -> ClientResult<Credentials<'_>> {
        let token = self.dataset_token.as_deref().ok_or(ClientError::NoSession)?;
        Ok(Credentials {
            token,
            key: &self.key,
        })
    }

    /// 在服务端准备新实验并获取数据集令牌
    pub async fn start_new_experiment(&mut self) -> ClientResult<String> {
        let url = self.runner.url("/getNewDataSetToken");
        debug!(%url, "申请新数据集令牌");
        let response = self
            .runner
            .http()
            .post(url)
            .form(&[("key", self.key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let token = body
            .get("datasetToken")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClientError::token_acquisition(format!(
                    "响应缺少datasetToken: {}",
                    body_preview(&body)
                ))
            })?
            .to_string();

        info!("已建立新实验会话");
        self.dataset_token = Some(token.clone());
        Ok(token)
    }

    /// 绑定一个已有分析的数据集令牌
    pub fn set_dataset_token(&mut self, token: impl Into<String>) {
        self.dataset_token = Some(token.into());
    }

    /// 当前会话的数据集令牌
    pub fn dataset_token(&self) -> Option<&str> {
        self.dataset_token.as_deref()
    }

    /// `process()` 完成后缓存的数据分组列表
    pub fn cached_data_groups(&self) -> Option<&[DataGroup]> {
        self.data_groups.as_deref()
    }

    /// 上传位点与定量数据文件（须为Phosphomatics兼容格式）
    pub async fn upload_experimental_data(&self, path: impl AsRef<Path>) -> ClientResult<()> {
        self.upload_file("/uploadExperimentalData", path.as_ref())
            .await
    }

    /// 上传参数文件
    pub async fn upload_parameter_set(&self, path: impl AsRef<Path>) -> ClientResult<()> {
        self.upload_file("/uploadParameterSet", path.as_ref()).await
    }

    /// 单次multipart上传，不轮询、不解析响应体，只关心传输成败
    async fn upload_file(&self, endpoint: &str, path: &Path) -> ClientResult<()> {
        let creds = self.credentials()?;

        let file_data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        info!(%endpoint, file = %file_name, size = file_data.len(), "上传文件");

        let part = Part::bytes(file_data)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let mut form = Form::new().part("file", part);
        for (name, value) in request_form(creds, None, &[]) {
            form = form.text(name, value);
        }

        self.runner
            .http()
            .post(self.runner.url(endpoint))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// 对已上传的数据运行初始处理
    ///
    /// 须在上传实验数据与参数文件之后调用。任务完成后会刷新数据分组缓存。
    pub async fn process(&mut self) -> ClientResult<()> {
        let creds = self.credentials()?;
        let routing = [("url", PROCESS_ROUTING_URL.to_string())];

        let handle = self.runner.submit_to("/process", creds, &routing).await?;
        self.runner
            .wait_for_completion(&handle, creds, &routing)
            .await?;

        let groups = self.get_user_data_groups().await?;
        self.data_groups = Some(groups);
        Ok(())
    }

    /// 获取已创建的全部数据分组
    pub async fn get_user_data_groups(&self) -> ClientResult<Vec<DataGroup>> {
        let creds = self.credentials()?;
        let result = self
            .runner
            .run_job("getUserDataGroups", creds, &[], &[])
            .await?;
        Ok(result.decode_field("userDataGroups")?.unwrap_or_default())
    }

    /// 获取当前激活的数据分组；没有激活分组时返回 `None`
    pub async fn get_active_data_group(&self) -> ClientResult<Option<DataGroup>> {
        let groups = self.get_user_data_groups().await?;
        Ok(groups.into_iter().find(DataGroup::is_selected))
    }

    /// 切换激活的数据分组
    pub async fn set_selected_group(&self, id: i64) -> ClientResult<()> {
        let creds = self.credentials()?;
        let params = [("groupid", id.to_string())];
        self.runner
            .run_job("setSelectedGroup", creds, &params, &[])
            .await?;
        Ok(())
    }

    /// 执行分析任务（提交 + 轮询直至完成）
    pub async fn run<J: AnalysisJob>(&self, job: J) -> ClientResult<TaskResult> {
        let creds = self.credentials()?;
        self.runner
            .run_job(J::TARGET, creds, &job.params(), &[])
            .await
    }

    /// 以自定义函数名与参数执行任务，供任务表未覆盖的服务端函数使用
    pub async fn run_custom(
        &self,
        target: &'static str,
        params: Vec<(&'static str, String)>,
    ) -> ClientResult<TaskResult> {
        let creds = self.credentials()?;
        self.runner.run_job(target, creds, &params, &[]).await
    }
}

/// 按任务表生成各分析操作的便捷方法，每个方法只是 [`Phosphomatics::run`] 的别名
macro_rules! job_methods {
    ($( $(#[$meta:meta])* $method:ident => $job:ty ),+ $(,)?) => {
        impl Phosphomatics {
            $(
                $(#[$meta])*
                pub async fn $method(&self, job: $job) -> ClientResult<TaskResult> {
                    self.run(job).await
                }
            )+
        }
    };
}

job_methods! {
    make_distribution_plot => DistributionPlot,
    make_correlation_matrix => CorrelationMatrix,
    make_quantile_plot => QuantilePlot,
    make_cluster_map => ClusterMap,
    make_pca_plot => PcaPlot,
    make_lda_plot => LdaPlot,
    make_volcano => Volcano,
    make_s_curve => SCurve,
    do_ksea_analysis => KseaAnalysis,
    make_phosphorylation_networks => PhosphorylationNetworks,
    get_enrichment_for_protein_list => ProteinListEnrichment,
    get_sequence_analysis => SequenceAnalysis,
    make_kinase_cluster_map => KinaseClusterMap,
    make_kinase_volcano_plot => KinaseVolcanoPlot,
    make_kinase_s_curve => KinaseSCurve,
    get_kinase_quantitation_plot => KinaseQuantitationPlot,
    make_substrate_correlation_plot => SubstrateCorrelationPlot,
    make_feature_abundance_plot => FeatureAbundancePlot,
}
