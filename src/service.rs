/// WiFi 扫描结果到位置估计的衔接层
///
/// 支持的功能：
/// - BSSID 规范化与 SSID 过滤
/// - 通过 `ApLocationSource` 查询已知 AP 位置
/// - 后台任务持续消费扫描批次并输出融合位置

use crate::algorithms::{FusedLocation, PositionEstimate};
use crate::config::FusionConfig;
use crate::error::FusionError;
use crate::resolver::Resolver;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

static BSSID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2})(?:[:-]([0-9A-Fa-f]{2})){5}$").expect("BSSID pattern is valid")
});

/// 单条扫描结果
#[derive(Clone, Debug)]
pub struct ScanObservation {
    /// AP 硬件地址
    pub bssid: String,
    /// 网络名称
    pub ssid: String,
    /// 信号强度 (dBm)
    pub signal_dbm: i16,
}

impl ScanObservation {
    pub fn new(bssid: impl Into<String>, ssid: impl Into<String>, signal_dbm: i16) -> Self {
        ScanObservation {
            bssid: bssid.into(),
            ssid: ssid.into(),
            signal_dbm,
        }
    }
}

/// 已知 AP 的记录位置
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    /// 覆盖半径（米）
    pub accuracy: f64,
}

impl ApRecord {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        ApRecord {
            latitude,
            longitude,
            altitude: None,
            accuracy,
        }
    }
}

/// AP 位置来源，按规范化后的 BSSID 查询
pub trait ApLocationSource {
    fn lookup(&self, bssid: &str) -> Option<ApRecord>;
}

impl ApLocationSource for HashMap<String, ApRecord> {
    fn lookup(&self, bssid: &str) -> Option<ApRecord> {
        self.get(bssid).copied()
    }
}

/// 规范化 BSSID 为小写冒号分隔格式，格式不对时返回 None
pub fn normalize_bssid(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !BSSID_PATTERN.is_match(trimmed) {
        return None;
    }
    Some(trimmed.to_ascii_lowercase().replace('-', ":"))
}

/// 扫描处理器
pub struct ScanProcessor<S> {
    source: S,
    resolver: Resolver,
    ignore_ssid: Option<Regex>,
}

impl<S: ApLocationSource> ScanProcessor<S> {
    pub fn new(source: S, config: FusionConfig) -> Result<Self, FusionError> {
        let ignore_ssid = config.ignore_ssid_regex()?;
        Ok(ScanProcessor {
            source,
            resolver: Resolver::new(config)?,
            ignore_ssid,
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// 将一次扫描转换为位置估计快照
    ///
    /// 跳过被忽略的 SSID、非法 BSSID 以及位置未知的 AP
    pub fn snapshot(&self, scan: &[ScanObservation]) -> Vec<PositionEstimate> {
        let mut estimates = Vec::with_capacity(scan.len());

        for observation in scan {
            if let Some(pattern) = &self.ignore_ssid {
                if pattern.is_match(&observation.ssid) {
                    debug!(ssid = %observation.ssid, "ignoring opted-out SSID");
                    continue;
                }
            }
            let Some(bssid) = normalize_bssid(&observation.bssid) else {
                debug!(bssid = %observation.bssid, "ignoring malformed BSSID");
                continue;
            };
            let Some(record) = self.source.lookup(&bssid) else {
                continue;
            };

            let mut estimate = PositionEstimate::new(
                bssid,
                record.latitude,
                record.longitude,
                record.accuracy,
                observation.signal_dbm,
            );
            estimate.altitude = record.altitude;
            estimates.push(estimate);
        }

        estimates
    }

    /// 处理一次扫描
    pub fn process(&self, scan: &[ScanObservation]) -> Result<Option<FusedLocation>, FusionError> {
        let estimates = self.snapshot(scan);
        if estimates.is_empty() {
            debug!(scanned = scan.len(), "no APs with known locations");
            return Ok(None);
        }
        self.resolver.resolve(&estimates)
    }
}

/// 启动后台扫描处理任务
///
/// 从 `scans` 接收扫描批次，每得到一个融合位置就发送到 `fixes`。
/// 输入通道关闭或输出接收端被丢弃时任务结束，返回已上报的位置数。
pub fn spawn_scan_worker<S>(
    processor: ScanProcessor<S>,
    mut scans: mpsc::Receiver<Vec<ScanObservation>>,
    fixes: mpsc::Sender<FusedLocation>,
) -> JoinHandle<usize>
where
    S: ApLocationSource + Send + 'static,
{
    tokio::spawn(async move {
        let mut reported = 0;

        while let Some(scan) = scans.recv().await {
            let outcome = processor.process(&scan);
            match outcome {
                Ok(Some(fix)) => {
                    if fixes.send(fix).await.is_err() {
                        debug!("fix receiver dropped, stopping scan worker");
                        break;
                    }
                    reported += 1;
                }
                Ok(None) => debug!(scanned = scan.len(), "scan produced no location"),
                Err(e) => warn!(error = %e, "discarding scan with invalid data"),
            }
        }

        reported
    })
}
