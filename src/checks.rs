use crate::client::{ApiSource, ClientError};
use crate::icinga::{CheckResult, Severity};
use crate::restapiv1::{self, Alert, AlertLevel, AlertPayload, TopologyNode, Volume, VolumeStatus};
use log::debug;
use std::str::FromStr;

/// Comma separated, as given on the command line.
pub const DEFAULT_ONLINE_STATES: &str = "ONLINE,AVAIL";

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CheckType {
    Disks,
    Volumes,
    Alerts,
}

impl CheckType {
    pub const NAMES: &'static [&'static str] = &["disks", "volumes", "alerts"];
}

impl FromStr for CheckType {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "disks" => Ok(CheckType::Disks),
            "volumes" => Ok(CheckType::Volumes),
            "alerts" => Ok(CheckType::Alerts),
            other => Err(format!("unknown check type: {}", other)),
        }
    }
}

/// Disk states that count as online.
#[derive(Clone, Debug)]
pub struct DiskPolicy {
    online_states: Vec<String>,
}

impl DiskPolicy {
    pub fn new<I, S>(online_states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DiskPolicy {
            online_states: online_states.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, status: &str) -> bool {
        self.online_states.iter().any(|state| state == status)
    }
}

impl Default for DiskPolicy {
    fn default() -> Self {
        DiskPolicy::new(DEFAULT_ONLINE_STATES.split(','))
    }
}

pub fn check_volumes(volumes: &[Volume]) -> CheckResult {
    match volumes.iter().find(|volume| volume.status != "HEALTHY") {
        Some(volume) => {
            CheckResult::critical(format!("Volume \"{}\" is {}", volume.name, volume.status))
        }
        None => CheckResult::ok("All volumes are healthy"),
    }
}

/// Walks sub-volume, vdev, disk in order and returns the first disk the
/// policy does not accept.
pub fn find_offline_disk<'a>(
    status: &'a [TopologyNode],
    policy: &DiskPolicy,
) -> Option<&'a TopologyNode> {
    status
        .iter()
        .flat_map(|subvolume| subvolume.children.iter())
        .flat_map(|vdev| vdev.children.iter())
        .find(|disk| !policy.accepts(&disk.status))
}

pub fn check_disks<A: ApiSource>(api: &A, policy: &DiskPolicy) -> Result<CheckResult, ClientError> {
    let volumes: Vec<Volume> = api.fetch(restapiv1::VOLUMES)?;
    debug!("inspecting disks of {} volumes", volumes.len());

    for volume in &volumes {
        let status: VolumeStatus = api.fetch(&restapiv1::volume_status(&volume.name))?;
        if let Some(disk) = find_offline_disk(&status, policy) {
            return Ok(CheckResult::critical(format!(
                "Disk {} is {}",
                disk.name, disk.status
            )));
        }
    }
    Ok(CheckResult::ok("All disks are online"))
}

pub fn check_alerts(alerts: &[Alert]) -> CheckResult {
    if alerts.is_empty() {
        return CheckResult::ok("No alerts");
    }
    match alerts.iter().find(|alert| !alert.dismissed) {
        Some(alert) => {
            let severity = match alert.level {
                AlertLevel::Critical => Severity::Critical,
                AlertLevel::Warning => Severity::Warning,
                AlertLevel::Ok => Severity::Ok,
                AlertLevel::Other(_) => Severity::Unknown,
            };
            CheckResult::new(severity, alert.message.clone())
        }
        None => CheckResult::ok("No unacknowledged alerts"),
    }
}

pub fn run<A: ApiSource>(
    api: &A,
    check: CheckType,
    policy: &DiskPolicy,
) -> Result<CheckResult, ClientError> {
    debug!("running {:?} check", check);
    match check {
        CheckType::Disks => check_disks(api, policy),
        CheckType::Volumes => {
            let volumes: Vec<Volume> = api.fetch(restapiv1::VOLUMES)?;
            debug!("inspecting {} volumes", volumes.len());
            Ok(check_volumes(&volumes))
        }
        CheckType::Alerts => {
            let alerts = api.fetch::<AlertPayload>(restapiv1::ALERTS)?.into_alerts();
            debug!("inspecting {} alerts", alerts.len());
            Ok(check_alerts(&alerts))
        }
    }
}
