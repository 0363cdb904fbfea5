use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;
use tracing::{debug, warn};

use crate::engine::{Band, CalcError};

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const FORM_TITLE: &str = "form.title";
    pub const FORM_HELP: &str = "form.help";
    pub const FORM_PROMPT: &str = "form.prompt";
    pub const FORM_UNKNOWN_COMMAND: &str = "form.unknown_command";
    pub const FORM_RESET_DONE: &str = "form.reset_done";

    pub const FIELD_GUINEA: &str = "field.guinea";
    pub const FIELD_CAMINADORA: &str = "field.caminadora";
    pub const FIELD_BLEDO: &str = "field.bledo";
    pub const FIELD_ENREDADERA: &str = "field.enredadera";
    pub const FIELD_MARIHUANO: &str = "field.marihuano";
    pub const FIELD_FURROW_LENGTH: &str = "field.furrow_length";

    pub const PREVIEW_PERCENTAGE: &str = "preview.percentage";
    pub const PREVIEW_OVER_LIMIT: &str = "preview.over_limit";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_PERCENTAGE: &str = "result.percentage";
    pub const RESULT_LEVEL: &str = "result.level";
    pub const RESULT_VALUE_PER_HECTARE: &str = "result.value_per_hectare";
    pub const RESULT_CLASSIFICATION: &str = "result.classification";
    pub const RESULT_FURROWS: &str = "result.furrows";

    pub const BAND_LOW: &str = "band.low";
    pub const BAND_MEDIUM: &str = "band.medium";
    pub const BAND_HIGH: &str = "band.high";

    pub const ERROR_EXCEEDS_LIMIT: &str = "error.exceeds_limit";
    pub const ERROR_OUT_OF_RANGE: &str = "error.out_of_range";
    pub const ERROR_UNEXPECTED: &str = "error.unexpected";

    pub const TABLE_HEADING: &str = "table.heading";
    pub const TABLE_COLUMNS: &str = "table.columns";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Es,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Es
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(es/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 es로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&Path>) -> Self {
        let overrides = pack_dir.and_then(|dir| load_overrides(dir, lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 언어팩에 있으면 그것을, 없으면 내장 문자열을 쓴다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| es(key)),
            Language::Es => es(key),
        }
    }

    pub fn band(&self, band: Band) -> &str {
        match band {
            Band::Low => self.t(keys::BAND_LOW),
            Band::Medium => self.t(keys::BAND_MEDIUM),
            Band::High => self.t(keys::BAND_HIGH),
        }
    }

    /// 계산 오류를 사용자 메시지로 바꾼다.
    pub fn calc_error(&self, err: &CalcError) -> String {
        match err {
            CalcError::ExceedsLimit { .. } => self.t(keys::ERROR_EXCEEDS_LIMIT).to_string(),
            CalcError::OutOfRange { .. } => self.t(keys::ERROR_OUT_OF_RANGE).to_string(),
            CalcError::Unexpected(msg) => format!("{} {msg}", self.t(keys::ERROR_UNEXPECTED)),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> String {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "es".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("es") => Some("es".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "es" => Some("es".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let path = dir.join(format!("{lang}.toml"));
    let content = fs::read_to_string(&path).ok()?;
    let map = parse_toml_to_map(&content);
    match &map {
        Some(m) => debug!(path = %path.display(), entries = m.len(), "loaded language pack"),
        None => warn!(path = %path.display(), "language pack is empty or invalid, ignoring"),
    }
    map
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn es(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Hasta luego.",
        FORM_TITLE => "\n=== Calculadora Palazón ===",
        FORM_HELP => {
            "Comandos: <campo> <valor> | mostrar | reiniciar | tabla | ayuda | salir\n\
             Campos: guinea caminadora bledo enredadera marihuano largo"
        }
        FORM_PROMPT => "> ",
        FORM_UNKNOWN_COMMAND => "Comando no reconocido. Escriba 'ayuda'.",
        FORM_RESET_DONE => "Valores reiniciados.",
        FIELD_GUINEA => "Guinea (%)",
        FIELD_CAMINADORA => "Caminadora (%)",
        FIELD_BLEDO => "Bledo (%)",
        FIELD_ENREDADERA => "Enredadera (%)",
        FIELD_MARIHUANO => "Marihuano (%)",
        FIELD_FURROW_LENGTH => "Largo del surco (m)",
        PREVIEW_PERCENTAGE => "Porcentaje total:",
        PREVIEW_OVER_LIMIT => "(supera 100%)",
        RESULT_HEADING => "--- Resultados ---",
        RESULT_PERCENTAGE => "Porcentaje total:",
        RESULT_LEVEL => "Nivel",
        RESULT_VALUE_PER_HECTARE => "Valor por hectárea:",
        RESULT_CLASSIFICATION => "Clasificación:",
        RESULT_FURROWS => "Surcos necesarios:",
        BAND_LOW => "Bajo",
        BAND_MEDIUM => "Medio",
        BAND_HIGH => "Alto",
        ERROR_EXCEEDS_LIMIT => "El porcentaje supera el 100%",
        ERROR_OUT_OF_RANGE => "Porcentaje fuera de rango",
        ERROR_UNEXPECTED => "Error inesperado:",
        TABLE_HEADING => "--- Niveles de complejidad ---",
        TABLE_COLUMNS => "Nivel (< %)    Valor por hectárea",
        _ => "[traducción faltante]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Goodbye.",
        FORM_TITLE => "\n=== Palazón Calculator ===",
        FORM_HELP => {
            "Commands: <field> <value> | show | reset | table | help | quit\n\
             Fields: guinea caminadora bledo enredadera marihuano largo"
        }
        FORM_PROMPT => "> ",
        FORM_UNKNOWN_COMMAND => "Unknown command. Type 'help'.",
        FORM_RESET_DONE => "Values reset.",
        FIELD_GUINEA => "Guinea grass (%)",
        FIELD_CAMINADORA => "Itchgrass (%)",
        FIELD_BLEDO => "Pigweed (%)",
        FIELD_ENREDADERA => "Vine (%)",
        FIELD_MARIHUANO => "Marihuano (%)",
        FIELD_FURROW_LENGTH => "Furrow length (m)",
        PREVIEW_PERCENTAGE => "Total percentage:",
        PREVIEW_OVER_LIMIT => "(over 100%)",
        RESULT_HEADING => "--- Results ---",
        RESULT_PERCENTAGE => "Total percentage:",
        RESULT_LEVEL => "Level",
        RESULT_VALUE_PER_HECTARE => "Value per hectare:",
        RESULT_CLASSIFICATION => "Classification:",
        RESULT_FURROWS => "Furrows needed:",
        BAND_LOW => "Low",
        BAND_MEDIUM => "Medium",
        BAND_HIGH => "High",
        ERROR_EXCEEDS_LIMIT => "Percentage exceeds 100%",
        ERROR_OUT_OF_RANGE => "Percentage out of range",
        ERROR_UNEXPECTED => "Unexpected error:",
        TABLE_HEADING => "--- Complexity levels ---",
        TABLE_COLUMNS => "Level (< %)    Value per hectare",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_labels_per_language() {
        let es = Translator::new("es");
        let en = Translator::new("en-US");
        assert_eq!(es.band(Band::Low), "Bajo");
        assert_eq!(en.band(Band::Low), "Low");
        assert_eq!(en.band(Band::High), "High");
    }

    #[test]
    fn unknown_code_falls_back_to_spanish() {
        assert_eq!(Translator::new("fr").language(), Language::Es);
        assert_eq!(Translator::new("fr").language().as_code(), "es");
        assert_eq!(Translator::new("en-GB").language().as_code(), "en");
    }

    #[test]
    fn cli_flag_wins_over_config() {
        assert_eq!(resolve_language(Some("en"), Some("es")), "en");
        assert_eq!(resolve_language(Some("auto"), Some("es-MX")), "es");
    }

    #[test]
    fn pack_overrides_builtin_strings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("en.toml"),
            "[band]\nlow = \"Light\"\n",
        )
        .unwrap();
        let tr = Translator::new_with_pack("en", Some(dir.path()));
        assert_eq!(tr.band(Band::Low), "Light");
        assert_eq!(tr.band(Band::Medium), "Medium");
    }

    #[test]
    fn calc_errors_are_localized() {
        let tr = Translator::new("es");
        let msg = tr.calc_error(&CalcError::ExceedsLimit { percentage: 100.02 });
        assert_eq!(msg, "El porcentaje supera el 100%");
    }
}
