//! 계산 결과를 화면 표시용 문자열로 만든다.

use crate::engine::{CalculationResult, Preview};
use crate::i18n::{keys, Translator};
use crate::tariff::TierTable;

/// 금액을 소수점 없이 천 단위 구분 기호와 함께 표시한다. 예: `$1,167,247`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// 미리보기 한 줄.
pub fn render_preview(tr: &Translator, preview: &Preview) -> String {
    let mut line = format!("{} {:.1}%", tr.t(keys::PREVIEW_PERCENTAGE), preview.percentage);
    if preview.exceeds_limit {
        line.push(' ');
        line.push_str(tr.t(keys::PREVIEW_OVER_LIMIT));
    }
    line
}

/// 결과 카드들을 줄 단위로 만든다.
pub fn render_result(tr: &Translator, result: &CalculationResult) -> Vec<String> {
    vec![
        tr.t(keys::RESULT_HEADING).to_string(),
        format!("{} {:.2}%", tr.t(keys::RESULT_PERCENTAGE), result.percentage),
        format!("{} {}", tr.t(keys::RESULT_LEVEL), result.tier_key),
        format!(
            "{} {}",
            tr.t(keys::RESULT_VALUE_PER_HECTARE),
            format_currency(result.value_per_hectare)
        ),
        format!(
            "{} {} [{}]",
            tr.t(keys::RESULT_CLASSIFICATION),
            tr.band(result.band),
            result.band_color
        ),
        format!("{} {:.2}", tr.t(keys::RESULT_FURROWS), result.furrows),
    ]
}

pub fn render_table(tr: &Translator, table: &TierTable) -> Vec<String> {
    let mut lines = vec![
        tr.t(keys::TABLE_HEADING).to_string(),
        tr.t(keys::TABLE_COLUMNS).to_string(),
    ];
    lines.extend(
        table
            .entries()
            .iter()
            .map(|e| format!("{:>11}    {:>14}", e.key, format_currency(e.value_per_hectare))),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Band;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(58362.0), "$58,362");
        assert_eq!(format_currency(1167247.0), "$1,167,247");
        assert_eq!(format_currency(-1234.4), "-$1,234");
    }

    #[test]
    fn result_lines_in_spanish() {
        let tr = Translator::new("es");
        let result = CalculationResult {
            percentage: 16.0,
            tier_key: 17,
            value_per_hectare: 265283.0,
            furrows: 13.3333,
            band: Band::Medium,
            band_color: Band::Medium.color_hex(),
        };
        let lines = render_result(&tr, &result);
        assert_eq!(lines[1], "Porcentaje total: 16.00%");
        assert_eq!(lines[2], "Nivel 17");
        assert_eq!(lines[3], "Valor por hectárea: $265,283");
        assert_eq!(lines[4], "Clasificación: Medio [#F59E0B]");
        assert_eq!(lines[5], "Surcos necesarios: 13.33");
    }
}
