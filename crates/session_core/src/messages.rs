//! User-facing text shown by the session runtime

pub const COUNTDOWN_PREFIX: &str = "남은 시간";
pub const COUNTDOWN_EXPIRED_LABEL: &str = "남은 시간: 00:00 (종료 권장)";

pub const LOADING_MESSAGE: &str = "AI가 생각 중입니다...";

pub const APPLICATION_ERROR_PREFIX: &str = "오류";
pub const TRANSPORT_ERROR_PREFIX: &str = "통신 오류";
pub const DEFAULT_TRANSPORT_ERROR: &str = "AI 응답을 가져오는 데 실패했습니다.";

pub const SUBMISSION_MESSAGE: &str =
    "결과물 제출양식을 다운로드 하신 후 구글 드라이브에 업로드 해 주시면 됩니다.";

pub const ACKNOWLEDGE_LABEL: &str = "확인 (학습으로 돌아가기)";
pub const CONFIRM_LABEL: &str = "예";
pub const BACK_LABEL: &str = "학습으로 돌아가기";

/// Waiting message naming the session budget
pub fn waiting_message(budget_seconds: u64) -> String {
    let (minutes, seconds) = (budget_seconds / 60, budget_seconds % 60);
    // 분 takes the particle 이, 초 takes 가.
    let budget = match (minutes, seconds) {
        (0, s) => format!("{s}초가"),
        (m, 0) => format!("{m}분이"),
        (m, s) => format!("{m}분 {s}초가"),
    };
    format!(
        "아직 과업수행시간이 {budget} 지나지 않았습니다. 동료 AI와 학습을 추가적으로 진행해주시기 바랍니다."
    )
}

pub fn application_error(message: &str) -> String {
    format!("{APPLICATION_ERROR_PREFIX}: {message}")
}

pub fn transport_error(message: &str) -> String {
    format!("{TRANSPORT_ERROR_PREFIX}: {message}")
}
