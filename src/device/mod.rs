use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const MOBILE_PREFIX: &str = "/m";
pub const DESKTOP_PREFIX: &str = "/d";

static MOBILE_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)android|iphone|ipad|ipod|blackberry|iemobile|opera mini|mobile|crios")
        .expect("mobile user-agent pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn prefix(self) -> &'static str {
        match self {
            DeviceClass::Mobile => MOBILE_PREFIX,
            DeviceClass::Desktop => DESKTOP_PREFIX,
        }
    }

    /// Device class implied by a path prefix, if the path carries one.
    pub fn from_path(path: &str) -> Option<Self> {
        if strip_segment(path, MOBILE_PREFIX).is_some() {
            Some(DeviceClass::Mobile)
        } else if strip_segment(path, DESKTOP_PREFIX).is_some() {
            Some(DeviceClass::Desktop)
        } else {
            None
        }
    }
}

/// Classify a raw user-agent string. Empty or unknown agents are desktop.
pub fn classify(user_agent: &str) -> DeviceClass {
    if MOBILE_UA.is_match(user_agent) {
        DeviceClass::Mobile
    } else {
        DeviceClass::Desktop
    }
}

// `/m` only counts as a prefix when it is a whole segment, so `/mines` is left alone.
fn strip_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Path without any device prefix. Always starts with `/`.
pub fn strip_device_prefix(path: &str) -> &str {
    let rest = strip_segment(path, MOBILE_PREFIX)
        .or_else(|| strip_segment(path, DESKTOP_PREFIX))
        .unwrap_or(path);
    if rest.is_empty() { "/" } else { rest }
}

/// Strip any device prefix from `path` and apply the one for `device`.
pub fn rewrite(path: &str, device: DeviceClass) -> String {
    let rest = strip_device_prefix(path);
    let prefix = device.prefix();
    if rest == "/" {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, rest)
    }
}
