/// Server states ConoHa reports that we have a display label for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceStatus {
    Shutoff,
    Active,
    Resize,
    Reboot,
    VerifyResize,
}

impl InstanceStatus {
    pub const ALL: [InstanceStatus; 5] = [
        InstanceStatus::Shutoff,
        InstanceStatus::Active,
        InstanceStatus::Resize,
        InstanceStatus::Reboot,
        InstanceStatus::VerifyResize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Shutoff => "SHUTOFF",
            InstanceStatus::Active => "ACTIVE",
            InstanceStatus::Resize => "RESIZE",
            InstanceStatus::Reboot => "REBOOT",
            InstanceStatus::VerifyResize => "VERIFY_RESIZE",
        }
    }

    /// Exact match on the provider code.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SHUTOFF" => Some(InstanceStatus::Shutoff),
            "ACTIVE" => Some(InstanceStatus::Active),
            "RESIZE" => Some(InstanceStatus::Resize),
            "REBOOT" => Some(InstanceStatus::Reboot),
            "VERIFY_RESIZE" => Some(InstanceStatus::VerifyResize),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InstanceStatus::Shutoff => "シャットダウンしてるよ",
            InstanceStatus::Active => "起動してるよ",
            InstanceStatus::Resize => "リサイズ中",
            InstanceStatus::Reboot => "再起動中",
            InstanceStatus::VerifyResize => "リサイズ承認待ち",
        }
    }
}

/// Chat label for a raw provider status. Unknown statuses get an empty label.
pub fn display_label(raw: &str) -> &'static str {
    InstanceStatus::parse(raw)
        .map(|s| s.label())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_have_labels() {
        for (raw, label) in [
            ("SHUTOFF", "シャットダウンしてるよ"),
            ("ACTIVE", "起動してるよ"),
            ("RESIZE", "リサイズ中"),
            ("REBOOT", "再起動中"),
            ("VERIFY_RESIZE", "リサイズ承認待ち"),
        ] {
            assert_eq!(display_label(raw), label);
        }
    }

    #[test]
    fn parse_roundtrip() {
        for s in InstanceStatus::ALL {
            assert_eq!(InstanceStatus::parse(s.as_str()), Some(s));
            assert!(!s.label().is_empty());
        }
    }

    #[test]
    fn unknown_statuses_get_empty_label() {
        for raw in ["", "BUILD", "ERROR", "HARD_REBOOT", "active", " ACTIVE", "ACTIVE\n"] {
            assert_eq!(display_label(raw), "", "{:?}", raw);
        }
    }
}
