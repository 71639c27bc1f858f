/*!
 * Error records produced by review passes.
 */

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Classification attached to every finding.
///
/// The labels are the Korean category names the collaborator is instructed
/// to use; they are also what exports and summaries print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ErrorCategory {
    /// 오탈자
    #[default]
    Typo,
    /// 조사 오류
    Particle,
    /// 외래어 표기 오류
    LoanwordTransliteration,
    /// 맞춤법 오류
    Spelling,
    /// 띄어쓰기 오류
    Spacing,
    /// 구두점 오류
    Punctuation,
    /// 표기 혼용
    MixedNotation,
    /// 연번 오류
    Numbering,
    /// 영문 오탈자
    EnglishTypo,
    /// 어색한 표현
    AwkwardExpression,
    /// 중복 표현
    Redundancy,
}

impl ErrorCategory {
    /// All categories in their canonical order
    pub const ALL: [ErrorCategory; 11] = [
        Self::Typo,
        Self::Particle,
        Self::LoanwordTransliteration,
        Self::Spelling,
        Self::Spacing,
        Self::Punctuation,
        Self::MixedNotation,
        Self::Numbering,
        Self::EnglishTypo,
        Self::AwkwardExpression,
        Self::Redundancy,
    ];

    /// Korean display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Typo => "오탈자",
            Self::Particle => "조사 오류",
            Self::LoanwordTransliteration => "외래어 표기 오류",
            Self::Spelling => "맞춤법 오류",
            Self::Spacing => "띄어쓰기 오류",
            Self::Punctuation => "구두점 오류",
            Self::MixedNotation => "표기 혼용",
            Self::Numbering => "연번 오류",
            Self::EnglishTypo => "영문 오탈자",
            Self::AwkwardExpression => "어색한 표현",
            Self::Redundancy => "중복 표현",
        }
    }

    /// Look up a category by its exact label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label.trim())
    }

    /// Map a reported label to a category, falling back to `Typo`
    pub fn coerce(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ErrorCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown error category: {}", s))
    }
}

impl Serialize for ErrorCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ErrorCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::coerce(&label))
    }
}

/// A single finding after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Opaque identifier
    pub id: String,
    /// Page the finding refers to
    pub page: u32,
    /// Human-readable locator within the page
    pub location: String,
    /// Current text, optionally with the erroneous span emphasized
    pub current_content: String,
    /// Suggested replacement, optionally with the corrected span emphasized
    pub suggested_fix: String,
    /// Category of the finding
    pub error_type: ErrorCategory,
}

/// A candidate finding as emitted by the collaborator, before validation.
///
/// Every field is optional because the collaborator's JSON is not trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCandidate {
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub current_content: Option<String>,
    #[serde(default)]
    pub suggested_fix: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
}

// Pages sometimes come back as strings ("3") or whole floats (3.0).
// Fractional values are not pages.
fn lenient_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl ErrorRecord {
    /// Convert a raw candidate into a record.
    ///
    /// Returns `None` when `currentContent`, `suggestedFix` or `errorType` is
    /// missing or blank. Unknown categories are coerced to `Typo`.
    pub fn from_candidate(candidate: RawCandidate, id: String) -> Option<Self> {
        let current_content = non_empty(candidate.current_content)?;
        let suggested_fix = non_empty(candidate.suggested_fix)?;
        let error_type = ErrorCategory::coerce(&non_empty(candidate.error_type)?);

        Some(Self {
            id,
            page: candidate.page.unwrap_or(0),
            location: candidate.location.unwrap_or_default(),
            current_content,
            suggested_fix,
            error_type,
        })
    }
}

/// Build the identifier for the `index`-th candidate of a pass
pub fn record_id(pass: u8, index: usize) -> String {
    format!("review-{}-error-{}-{}", pass, index, uuid::Uuid::new_v4().simple())
}
