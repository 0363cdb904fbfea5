/// 사용자가 입력한 문자열을 0 이상 `max` 이하의 실수로 변환한다.
///
/// 비어 있거나 숫자로 해석할 수 없는 입력은 0.0으로 처리하며, 어떤 문자열에
/// 대해서도 실패하지 않는다. `max`가 음수나 NaN이면 0으로 본다.
pub fn validate(text: &str, max: f64) -> f64 {
    let max = if max >= 0.0 { max } else { 0.0 };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if !v.is_nan() => v.max(0.0).min(max),
        _ => 0.0,
    }
}

/// 상한 없이 0 이상으로만 제한한다. 고랑 길이처럼 위쪽 한계가 없는 값에 쓴다.
pub fn validate_unbounded(text: &str) -> f64 {
    validate(text, f64::INFINITY)
}
