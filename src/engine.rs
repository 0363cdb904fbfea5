//! 잡초 피복률 합산, 단가 구간 조회, 필요 고랑 수 계산을 담당하는 엔진.

use thiserror::Error;
use tracing::debug;

use crate::config::{BandLimits, TariffConfig};
use crate::tariff::{TariffError, TierTable};
use crate::validation::{validate, validate_unbounded};

/// 각 잡초 비율의 입력 상한(%).
pub const MAX_FIELD_PERCENTAGE: f64 = 100.0;

/// 계산 입력. 다섯 가지 잡초 비율(%)과 고랑 길이(m).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalculationInput {
    pub guinea: f64,
    pub caminadora: f64,
    pub bledo: f64,
    pub enredadera: f64,
    pub marihuano: f64,
    /// 고랑 길이 [m]
    pub furrow_length: f64,
}

/// 사용자가 입력한 그대로의 문자열 입력.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawInput {
    pub guinea: String,
    pub caminadora: String,
    pub bledo: String,
    pub enredadera: String,
    pub marihuano: String,
    pub furrow_length: String,
}

impl RawInput {
    /// 각 칸을 검증해 계산 입력으로 바꾼다.
    ///
    /// 비율은 [0, 100]으로 제한한다. 고랑 길이 칸이 비어 있으면 `default_furrow_length`를 쓴다.
    pub fn validate(&self, default_furrow_length: f64) -> CalculationInput {
        let pct = |s: &str| validate(s, MAX_FIELD_PERCENTAGE);
        let furrow_length = if self.furrow_length.trim().is_empty() {
            default_furrow_length
        } else {
            validate_unbounded(&self.furrow_length)
        };
        CalculationInput {
            guinea: pct(&self.guinea),
            caminadora: pct(&self.caminadora),
            bledo: pct(&self.bledo),
            enredadera: pct(&self.enredadera),
            marihuano: pct(&self.marihuano),
            furrow_length,
        }
    }
}

/// 피복률 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Low,
    Medium,
    High,
}

impl Band {
    /// 표시용 색상(hex).
    pub fn color_hex(&self) -> &'static str {
        match self {
            Band::Low => "#059669",
            Band::Medium => "#F59E0B",
            Band::High => "#DC2626",
        }
    }
}

/// 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    /// 합산 피복률(%)
    pub percentage: f64,
    /// 구간 키
    pub tier_key: u32,
    /// 헥타르당 금액
    pub value_per_hectare: f64,
    /// 필요 고랑 수
    pub furrows: f64,
    pub band: Band,
    pub band_color: &'static str,
}

/// 입력 중 실시간으로 보여줄 미리보기 값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    pub percentage: f64,
    /// 진행 막대 값 (100에서 자름)
    pub progress: f64,
    /// 100%를 넘었는지 여부
    pub exceeds_limit: bool,
}

/// 계산 실패 사유.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalcError {
    #[error("percentage exceeds 100% ({percentage:.2}%)")]
    ExceedsLimit { percentage: f64 },
    #[error("percentage out of range ({percentage:.2}%)")]
    OutOfRange { percentage: f64 },
    #[error("unexpected calculation failure: {0}")]
    Unexpected(String),
}

/// 기니그라스는 0보다 크면 두 배, 카미나도라는 항상 0.82배로 보정한다.
pub fn adjust(guinea: f64, caminadora: f64) -> (f64, f64) {
    let guinea = if guinea > 0.0 { guinea * 2.0 } else { guinea };
    (guinea, caminadora * 0.82)
}

/// 다섯 값을 합산한다.
pub fn aggregate(guinea: f64, caminadora: f64, bledo: f64, enredadera: f64, marihuano: f64) -> f64 {
    guinea + caminadora + bledo + enredadera + marihuano
}

/// 보정 후 합산 비율.
pub fn adjusted_percentage(input: &CalculationInput) -> f64 {
    let (guinea, caminadora) = adjust(input.guinea, input.caminadora);
    aggregate(
        guinea,
        caminadora,
        input.bledo,
        input.enredadera,
        input.marihuano,
    )
}

/// 합산 비율을 분류한다. 경계값은 낮은 쪽 구간에 포함된다.
pub fn classification_band(percentage: f64, limits: &BandLimits) -> Band {
    if percentage <= limits.low_max {
        Band::Low
    } else if percentage <= limits.medium_max {
        Band::Medium
    } else {
        Band::High
    }
}

/// 계산 엔진. 단가표와 고정 상수를 묶어 가진다.
#[derive(Debug, Clone)]
pub struct Engine {
    table: TierTable,
    base_value: f64,
    furrow_width_m: f64,
    square_meters_per_hectare: f64,
    max_percentage: f64,
    bands: BandLimits,
}

impl Default for Engine {
    fn default() -> Self {
        let tariff = TariffConfig::default();
        Self {
            table: TierTable::reference(),
            base_value: tariff.base_value,
            furrow_width_m: tariff.furrow_width_m,
            square_meters_per_hectare: tariff.square_meters_per_hectare,
            max_percentage: tariff.max_percentage,
            bands: tariff.bands,
        }
    }
}

impl Engine {
    /// 설정으로부터 엔진을 만든다. 단가표나 상수 검증에 실패하면 오류.
    pub fn from_tariff(tariff: &TariffConfig) -> Result<Self, TariffError> {
        for (name, value) in [
            ("base_value", tariff.base_value),
            ("furrow_width_m", tariff.furrow_width_m),
            ("square_meters_per_hectare", tariff.square_meters_per_hectare),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TariffError::InvalidConstant { name, value });
            }
        }
        for (name, value) in [
            ("max_percentage", tariff.max_percentage),
            ("bands.low_max", tariff.bands.low_max),
            ("bands.medium_max", tariff.bands.medium_max),
        ] {
            if !value.is_finite() {
                return Err(TariffError::InvalidConstant { name, value });
            }
        }
        if tariff.bands.low_max > tariff.bands.medium_max {
            return Err(TariffError::BandOrder {
                low_max: tariff.bands.low_max,
                medium_max: tariff.bands.medium_max,
            });
        }
        Ok(Self {
            table: TierTable::new(tariff.tiers.clone())?,
            base_value: tariff.base_value,
            furrow_width_m: tariff.furrow_width_m,
            square_meters_per_hectare: tariff.square_meters_per_hectare,
            max_percentage: tariff.max_percentage,
            bands: tariff.bands,
        })
    }

    pub fn table(&self) -> &TierTable {
        &self.table
    }

    /// 헥타르당 금액과 고랑 길이로 필요한 고랑 수를 구한다.
    ///
    /// 어느 한쪽이라도 0 이하이면 0을 돌려준다.
    pub fn furrows_needed(&self, value_per_hectare: f64, furrow_length: f64) -> f64 {
        if value_per_hectare <= 0.0 || furrow_length <= 0.0 {
            return 0.0;
        }
        let value_per_m2 = value_per_hectare / self.square_meters_per_hectare;
        if value_per_m2 == 0.0 {
            return 0.0;
        }
        let area_to_pay_m2 = self.base_value / value_per_m2;
        area_to_pay_m2 / (self.furrow_width_m * furrow_length)
    }

    pub fn classification_band(&self, percentage: f64) -> Band {
        classification_band(percentage, &self.bands)
    }

    /// 입력 중 보여줄 합산 비율만 빠르게 계산한다.
    pub fn preview(&self, input: &CalculationInput) -> Preview {
        let percentage = adjusted_percentage(input);
        Preview {
            percentage,
            progress: percentage.min(100.0),
            exceeds_limit: percentage > 100.0,
        }
    }

    /// 전체 계산을 수행한다. 부수 효과가 없으므로 같은 입력이면 항상 같은 결과를 낸다.
    pub fn run(&self, input: &CalculationInput) -> Result<CalculationResult, CalcError> {
        let percentage = adjusted_percentage(input);
        if percentage > self.max_percentage {
            debug!(percentage, limit = self.max_percentage, "aggregate above limit");
            return Err(CalcError::ExceedsLimit { percentage });
        }

        let tier = self
            .table
            .lookup(percentage)
            .ok_or(CalcError::OutOfRange { percentage })?;

        let furrows = self.furrows_needed(tier.value_per_hectare, input.furrow_length);
        let band = self.classification_band(percentage);
        debug!(percentage, tier = tier.key, furrows, ?band, "calculation finished");

        Ok(CalculationResult {
            percentage,
            tier_key: tier.key,
            value_per_hectare: tier.value_per_hectare,
            furrows,
            band,
            band_color: band.color_hex(),
        })
    }
}
