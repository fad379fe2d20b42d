use serde::{Deserialize, Serialize};

/// Qualitative traffic density of a route stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Moderate,
    Heavy,
    Severe,
    /// Reported by the traffic API, or any label we do not recognise
    #[serde(other)]
    Unknown,
}

impl CongestionLevel {
    /// Display color used by the map overlay
    pub fn color(self) -> &'static str {
        match self {
            CongestionLevel::Low => "#22c55e",
            CongestionLevel::Moderate => "#eab308",
            CongestionLevel::Heavy => "#f97316",
            CongestionLevel::Severe => "#ef4444",
            CongestionLevel::Unknown => "#94a3b8",
        }
    }

    /// Whether the label carries information worth drawing
    pub fn is_usable(self) -> bool {
        self != CongestionLevel::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CongestionLevel::Low => "low",
            CongestionLevel::Moderate => "moderate",
            CongestionLevel::Heavy => "heavy",
            CongestionLevel::Severe => "severe",
            CongestionLevel::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_unknown_labels() {
        let labels: Vec<CongestionLevel> =
            serde_json::from_str(r#"["low","moderate","heavy","severe","unknown","gridlock"]"#)
                .unwrap();
        assert_eq!(
            labels,
            vec![
                CongestionLevel::Low,
                CongestionLevel::Moderate,
                CongestionLevel::Heavy,
                CongestionLevel::Severe,
                CongestionLevel::Unknown,
                CongestionLevel::Unknown,
            ]
        );
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&CongestionLevel::Severe).unwrap();
        assert_eq!(json, r#""severe""#);
        assert_eq!(CongestionLevel::Severe.as_str(), "severe");
    }

    #[test]
    fn only_unknown_is_unusable() {
        assert!(CongestionLevel::Low.is_usable());
        assert!(CongestionLevel::Severe.is_usable());
        assert!(!CongestionLevel::Unknown.is_usable());
    }
}
