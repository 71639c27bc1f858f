/*!
 * Instruction profiles for the three review passes.
 *
 * Each pass sends the whole document with its own focus. The profiles are a
 * fixed lookup table from `PassIndex` to `PassProfile`.
 */

use crate::errors::ReviewError;

/// Number of review passes per session
pub const PASS_COUNT: usize = 3;

/// Identifies one of the review passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PassIndex {
    First,
    Second,
    Third,
}

impl PassIndex {
    /// All passes in execution order
    pub const ALL: [PassIndex; PASS_COUNT] = [Self::First, Self::Second, Self::Third];

    /// 1-based pass number
    pub fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// Profile used for this pass
    pub fn profile(&self) -> &'static PassProfile {
        &PROFILES[usize::from(self.number() - 1)]
    }
}

impl TryFrom<i64> for PassIndex {
    type Error = ReviewError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            other => Err(ReviewError::InvalidPassIndex(other)),
        }
    }
}

/// Configuration of a single pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassProfile {
    /// Which pass this profile belongs to
    pub pass: PassIndex,
    /// System instructions sent with the request
    pub instructions: &'static str,
    /// User prompt; `{pass}` and `{document}` are substituted
    pub user_prompt_template: &'static str,
    /// Short status line for progress reporting
    pub progress_message: &'static str,
}

impl PassProfile {
    /// Render the user prompt for the given document text
    pub fn render_user_prompt(&self, document: &str) -> String {
        self.user_prompt_template
            .replace("{pass}", &self.pass.number().to_string())
            .replace("{document}", document)
    }

    /// Full system prompt: shared rules followed by this pass's focus
    pub fn system_prompt(&self) -> String {
        format!("{}\n\n{}\n\n{}", BASE_INSTRUCTIONS, self.instructions, OUTPUT_FORMAT)
    }
}

const BASE_INSTRUCTIONS: &str = r#"당신은 꼼꼼하고 철저한 문서관리자입니다.
한국어 문서를 검토하여 다음 오류를 찾으세요:

1. 오탈자 - 잘못 입력된 글자
2. 조사 오류 - 을/를, 이/가, 은/는, 와/과 등의 잘못된 사용
3. 외래어 표기 오류 - 외래어 표기법에 맞지 않는 표기
4. 맞춤법 오류 - 한글 맞춤법에 맞지 않는 표기
5. 띄어쓰기 오류 - 잘못된 띄어쓰기
6. 구두점 오류 - 쉼표, 마침표 등의 잘못된 사용
7. 표기 혼용 - 같은 단어의 다른 표기 혼용 (예: 웹사이트/웹 사이트)
8. 연번 오류 - 번호 순서 오류
9. 영문 오탈자 - 영어 단어의 철자 오류
10. 어색한 표현 - 문맥상 어색하거나 부자연스러운 표현
11. 중복 표현 - 의미가 중복되는 표현

중요:
- 오류가 있는 부분은 **강조** 형식으로 표시해주세요.
- 확실한 오류만 보고하고, 불확실한 경우는 제외하세요.
- 문서의 스타일이나 개인 취향에 관한 사항은 지적하지 마세요."#;

const OUTPUT_FORMAT: &str = r#"반드시 아래 JSON 형식으로만 응답하세요. 다른 텍스트는 포함하지 마세요:
{"errors":[{"page":페이지번호,"location":"오류 위치 설명","currentContent":"현재 **잘못된부분** 포함 내용","suggestedFix":"수정된 **올바른부분** 포함 내용","errorType":"오류유형"}]}

오류가 없으면 {"errors":[]} 를 반환하세요."#;

static PROFILES: [PassProfile; PASS_COUNT] = [
    PassProfile {
        pass: PassIndex::First,
        instructions: "이번 검토의 중점: 조사 오류(을/를, 이/가, 은/는, 와/과)와 조사 앞 받침에 따른 형태를 문장 단위로 확인하세요.",
        user_prompt_template: "다음 문서를 검토해주세요. 이것은 {pass}차 검토입니다.\n\n문서 내용:\n{document}",
        progress_message: "1차 검토: 조사 오류 분석 중...",
    },
    PassProfile {
        pass: PassIndex::Second,
        instructions: "이번 검토의 중점: 오탈자, 맞춤법, 띄어쓰기, 외래어 표기와 영문 철자를 단어 단위로 확인하세요.",
        user_prompt_template: "다음 문서를 검토해주세요. 이것은 {pass}차 검토입니다.\n이전 검토에서 놓친 오류가 있을 수 있으니 더욱 꼼꼼히 검토해주세요.\n\n문서 내용:\n{document}",
        progress_message: "2차 검토: 오탈자 및 맞춤법 분석 중...",
    },
    PassProfile {
        pass: PassIndex::Third,
        instructions: "이번 검토의 중점: 문서 전체의 표기 혼용, 연번 순서, 구두점, 어색하거나 중복된 표현을 최종 점검하세요.",
        user_prompt_template: "다음 문서를 검토해주세요. 이것은 {pass}차 검토입니다.\n이전 검토에서 놓친 오류가 있을 수 있으니 더욱 꼼꼼히 검토해주세요.\n\n문서 내용:\n{document}",
        progress_message: "3차 검토: 최종 점검 중...",
    },
];
