use serde::Deserialize;

pub const VOLUMES: &str = "storage/volume";
pub const ALERTS: &str = "system/alert";

pub fn volume_status(volume: &str) -> String {
    format!("{}/{}/status", VOLUMES, volume)
}

#[derive(PartialEq, Debug, Deserialize)]
pub struct Volume {
    pub name: String,
    #[serde(default)]
    pub status: String,
}

/// One node of a volume's status tree. The top level holds sub-volumes, their
/// children are vdevs and the vdevs' children are disks.
#[derive(PartialEq, Debug, Deserialize)]
pub struct TopologyNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub children: Vec<TopologyNode>,
}

pub type VolumeStatus = Vec<TopologyNode>;

#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(from = "String")]
pub enum AlertLevel {
    Critical,
    Warning,
    Ok,
    Other(String),
}

impl From<String> for AlertLevel {
    fn from(level: String) -> Self {
        match level.as_str() {
            "CRIT" | "CRITICAL" => AlertLevel::Critical,
            "WARN" | "WARNING" => AlertLevel::Warning,
            "OK" => AlertLevel::Ok,
            _ => AlertLevel::Other(level),
        }
    }
}

impl Default for AlertLevel {
    fn default() -> Self {
        AlertLevel::Other(String::new())
    }
}

#[derive(PartialEq, Debug, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub level: AlertLevel,
    #[serde(default)]
    pub dismissed: bool,
}

/// The alert resource answers either with a bare list or with the list wrapped
/// in an `objects` key.
#[derive(PartialEq, Debug, Deserialize)]
#[serde(untagged)]
pub enum AlertPayload {
    Bare(Vec<Alert>),
    Wrapped { objects: Vec<Alert> },
}

impl AlertPayload {
    pub fn into_alerts(self) -> Vec<Alert> {
        match self {
            AlertPayload::Bare(alerts) => alerts,
            AlertPayload::Wrapped { objects } => objects,
        }
    }
}
