//! Static keyword tables used to select firmware by application domain and
//! by industry vertical.
//!
//! Tags are matched exactly (case-sensitive). The keywords themselves are
//! lowercase and are compared case-insensitively by the filter engine.

pub type KeywordTable = &'static [(&'static str, &'static [&'static str])];

pub const DOMAIN_KEYWORDS: KeywordTable = &[
    (
        "wifi",
        &[
            "router",
            "access point",
            "ap",
            "wireless",
            "wifi",
            "wi-fi",
            "wlan",
            "wr",
            "wap",
            "802.11",
            "wrt",
            "wnr",
            "wgr",
            "wdr",
            "archer",
            "linksys",
            "netgear",
            "asus",
            "tp-link",
            "d-link",
        ],
    ),
    (
        "iot",
        &[
            "iot",
            "internet of things",
            "smart device",
            "connected device",
            "sensor",
            "actuator",
            "smart home",
            "smart building",
        ],
    ),
    (
        "camera",
        &[
            "camera",
            "ip camera",
            "webcam",
            "surveillance",
            "cctv",
            "security camera",
            "dvr",
            "nvr",
            "video recorder",
        ],
    ),
    (
        "storage",
        &[
            "storage",
            "nas",
            "network attached storage",
            "san",
            "raid",
            "disk",
            "drive",
            "backup",
        ],
    ),
    (
        "printer",
        &[
            "printer",
            "scanner",
            "mfp",
            "multifunction",
            "copier",
            "fax",
            "all-in-one",
        ],
    ),
    (
        "voip",
        &[
            "voip",
            "voice",
            "ip phone",
            "sip",
            "telephony",
            "pbx",
            "call",
            "conference",
        ],
    ),
    (
        "modem",
        &[
            "modem",
            "dsl",
            "adsl",
            "vdsl",
            "cable modem",
            "docsis",
            "fiber",
            "gpon",
            "ont",
        ],
    ),
];

pub const INDUSTRY_KEYWORDS: KeywordTable = &[
    (
        "healthcare",
        &["medical", "health", "hospital", "patient", "clinic", "diagnostic"],
    ),
    (
        "industrial",
        &[
            "industrial",
            "factory",
            "manufacturing",
            "automation",
            "plc",
            "scada",
            "iot",
        ],
    ),
    (
        "automotive",
        &["car", "vehicle", "automotive", "telematics", "obd"],
    ),
    (
        "smart_home",
        &[
            "smart home",
            "home automation",
            "thermostat",
            "doorbell",
            "camera",
            "security",
        ],
    ),
    (
        "networking",
        &["router", "switch", "gateway", "firewall", "vpn", "network"],
    ),
    (
        "enterprise",
        &["enterprise", "business", "corporate", "office"],
    ),
    ("education", &["education", "school", "university", "campus"]),
    (
        "retail",
        &["pos", "point of sale", "retail", "kiosk", "payment"],
    ),
    (
        "telecom",
        &[
            "telecom",
            "telecommunication",
            "cellular",
            "mobile",
            "base station",
        ],
    ),
];

/// Number of keywords shown per tag by the listing modes.
pub const LISTING_PREVIEW: usize = 3;

pub fn lookup(table: KeywordTable, tag: &str) -> &'static [&'static str] {
    table
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

pub fn domain_keywords(tag: &str) -> &'static [&'static str] {
    lookup(DOMAIN_KEYWORDS, tag)
}

pub fn industry_keywords(tag: &str) -> &'static [&'static str] {
    lookup(INDUSTRY_KEYWORDS, tag)
}

pub fn tags(table: KeywordTable) -> impl Iterator<Item = &'static str> {
    table.iter().map(|(name, _)| *name)
}

/// One line per tag: `- <tag>: <first keywords>...`.
pub fn listing_lines(table: KeywordTable) -> Vec<String> {
    table
        .iter()
        .map(|(name, keywords)| {
            let preview: Vec<&str> = keywords.iter().take(LISTING_PREVIEW).copied().collect();
            format!("- {name}: {}...", preview.join(", "))
        })
        .collect()
}
