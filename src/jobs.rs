//! 分析任务参数表
//!
//! 每个插图/统计操作由「服务端函数名 + 参数集合」完整描述。所有参数均为可选，
//! 未设置的参数不会出现在请求体中（即服务端默认的"无过滤"行为）。

/// 可通过通用任务端点提交的分析任务
pub trait AnalysisJob {
    /// 服务端函数标识
    const TARGET: &'static str;

    /// 转换为表单参数
    fn params(&self) -> Vec<(&'static str, String)>;
}

macro_rules! analysis_jobs {
    ($(
        $(#[$meta:meta])*
        $name:ident => $target:literal { $( $field:ident : $wire:literal ),* $(,)? }
    ),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default)]
            pub struct $name {
                $( pub $field: Option<String>, )*
            }

            impl AnalysisJob for $name {
                const TARGET: &'static str = $target;

                fn params(&self) -> Vec<(&'static str, String)> {
                    let mut params = Vec::new();
                    $(
                        if let Some(value) = &self.$field {
                            params.push(($wire, value.clone()));
                        }
                    )*
                    params
                }
            }
        )+
    };
}

// 个别函数名带有拼写错误（doKSEAAnslysis、getSequenceAnslysis），
// 线上接口即为此拼写，不可修正。
analysis_jobs! {
    /// 样本强度分布图
    DistributionPlot => "makeDistributionPlot" { sample: "sample" },

    /// 样本间相关性矩阵
    CorrelationMatrix => "makeCorrelationMatrix" {
        method: "method",
        transform: "transform",
        container: "container",
    },

    QuantilePlot => "makeQuantilePlot" {
        container: "container",
        sample: "sample",
    },

    /// 磷酸化位点聚类热图
    ClusterMap => "makeClusterMap" {
        fc: "fc",
        pval: "pval",
        pval_type: "pvalType",
        num_clusters: "numClusters",
        transformation: "transformation",
        metric: "metric",
        method: "method",
        container: "container",
        target_clusters: "targetClusters",
    },

    PcaPlot => "makePCAPlot" {
        pval: "pval",
        pval_type: "pvalType",
        fc: "fc",
        transformation: "transformation",
        container: "container",
    },

    LdaPlot => "makeLDAPlot" {
        pval: "pval",
        pval_type: "pvalType",
        fc: "fc",
        transformation: "transformation",
        container: "container",
    },

    /// 火山图（差异表达）
    Volcano => "makeVolcano" {
        fc: "fc",
        pval: "pval",
        pval_type: "pvalType",
        group1: "group1",
        group2: "group2",
        container: "container",
    },

    SCurve => "makeSCurve" {
        group1: "group1",
        group2: "group2",
        container: "container",
    },

    /// 激酶底物富集分析（KSEA）
    KseaAnalysis => "doKSEAAnslysis" {
        group1: "group1",
        group2: "group2",
        networkin: "networkin",
        networkin_threshold: "networkinThreshold",
        m_threshold: "mThreshold",
        p_threshold: "pThreshold",
        container: "container",
    },

    PhosphorylationNetworks => "makePhosphorylationNetworks" {
        group1: "group1",
        group2: "group2",
        specificity: "specificity",
        container: "container",
    },

    /// 蛋白列表功能富集
    ProteinListEnrichment => "getEnrichmentForProteinList" {
        container: "container",
    },

    SequenceAnalysis => "getSequenceAnslysis" {
        display_type: "displayType",
        palette: "palette",
        show_n: "showN",
        container: "container",
    },

    KinaseClusterMap => "makeKinaseClusterMap" {
        num_clusters: "numClusters",
        transformation: "transformation",
        palette: "palette",
        metric: "metric",
        method: "method",
        specificity: "specificity",
        container: "container",
        target_clusters: "targetClusters",
    },

    KinaseVolcanoPlot => "makeKinaseVolcanoPlot" {
        fc: "fc",
        pval: "pval",
        pval_type: "pvalType",
        group1: "group1",
        group2: "group2",
        container: "container",
        specificity: "specificity",
    },

    KinaseSCurve => "makeKinaseSCurve" {
        group1: "group1",
        group2: "group2",
        specificity: "specificity",
        container: "container",
    },

    /// 选定激酶的定量图
    KinaseQuantitationPlot => "getQuantitationPlotForSelectedKinase" {
        specificity: "specificity",
        kinase_upid: "kinaseUPID",
        plot_type: "plotType",
        container: "container",
    },

    SubstrateCorrelationPlot => "makeSubstrateCorrelationPlot" {
        substrate_upid: "substrateUPID",
        position: "position",
        residue: "residue",
        top_n: "topN",
        method: "method",
        plot_type: "plotType",
        container: "container",
    },

    FeatureAbundancePlot => "makeFeatureAbundancePlot" {
        substrate_upid: "substrateUPID",
        position: "position",
        residue: "residue",
        plot_type: "plotType",
        container: "container",
    },
}
