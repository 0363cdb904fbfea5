//! 잡초 피복률 기반 고랑 계산기. 계산 핵심은 라이브러리로 두고 CLI 폼은 얇게 유지한다.

pub mod app;
pub mod config;
pub mod engine;
pub mod i18n;
pub mod logging;
pub mod report;
pub mod scheduler;
pub mod tariff;
pub mod ui_cli;
pub mod validation;

pub use engine::{CalcError, CalculationInput, CalculationResult, Engine, Preview, RawInput};
pub use validation::validate;
