use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::tariff::{self, TierEntry};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 피복률 분류 구간의 상한값(%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandLimits {
    /// 이 값 이하면 Low
    pub low_max: f64,
    /// 이 값 이하면 Medium, 초과하면 High
    pub medium_max: f64,
}

impl Default for BandLimits {
    fn default() -> Self {
        Self {
            low_max: 14.0,
            medium_max: 25.0,
        }
    }
}

/// 계산 엔진이 사용하는 고정 상수와 단가표.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// 지불 기준 총액 [금액]
    pub base_value: f64,
    /// 고랑 폭 [m]
    pub furrow_width_m: f64,
    /// 1 ha 당 m²
    pub square_meters_per_hectare: f64,
    /// 허용 최대 합계 비율(%)
    pub max_percentage: f64,
    pub bands: BandLimits,
    pub tiers: Vec<TierEntry>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            base_value: 58362.0,
            furrow_width_m: 1.65,
            square_meters_per_hectare: 10_000.0,
            max_percentage: 100.01,
            bands: BandLimits::default(),
            tiers: tariff::reference_entries(),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드 (auto/es/en)
    pub language: String,
    /// 재계산 디바운스 지연 [ms]
    pub debounce_ms: u64,
    /// 고랑 길이 칸이 비었을 때 쓰는 값 [m]
    pub default_furrow_length_m: f64,
    pub tariff: TariffConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            debounce_ms: 300,
            default_furrow_length_m: 100.0,
            tariff: TariffConfig::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성해 저장한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let cfg = load_from(path)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        info!(path = %path.display(), "wrote default configuration");
        Ok(cfg)
    }
}

/// 주어진 경로의 TOML 설정을 읽는다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
