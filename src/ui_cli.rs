use std::io::{self, Write};

use crate::app::AppError;
use crate::engine::{CalculationInput, RawInput};
use crate::i18n::{keys, Translator};
use crate::report;
use crate::scheduler::CalcUpdate;

/// 폼의 입력 칸.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Guinea,
    Caminadora,
    Bledo,
    Enredadera,
    Marihuano,
    FurrowLength,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Guinea,
        Field::Caminadora,
        Field::Bledo,
        Field::Enredadera,
        Field::Marihuano,
        Field::FurrowLength,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "guinea" => Some(Field::Guinea),
            "caminadora" => Some(Field::Caminadora),
            "bledo" => Some(Field::Bledo),
            "enredadera" => Some(Field::Enredadera),
            "marihuano" => Some(Field::Marihuano),
            "largo" | "length" => Some(Field::FurrowLength),
            _ => None,
        }
    }

    fn label_key(&self) -> &'static str {
        match self {
            Field::Guinea => keys::FIELD_GUINEA,
            Field::Caminadora => keys::FIELD_CAMINADORA,
            Field::Bledo => keys::FIELD_BLEDO,
            Field::Enredadera => keys::FIELD_ENREDADERA,
            Field::Marihuano => keys::FIELD_MARIHUANO,
            Field::FurrowLength => keys::FIELD_FURROW_LENGTH,
        }
    }

    /// 고랑 길이를 제외한 칸은 입력할 때마다 미리보기를 갱신한다.
    pub fn affects_preview(&self) -> bool {
        !matches!(self, Field::FurrowLength)
    }
}

/// 폼 세션에서 한 줄로 입력하는 명령.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    Set(Field, String),
    Show,
    Reset,
    Table,
    Help,
    Quit,
    Unknown(String),
}

/// 입력 줄을 명령으로 해석한다. 빈 줄이면 `None`.
pub fn parse_command(line: &str) -> Option<FormCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };
    let cmd = match head.to_lowercase().as_str() {
        "mostrar" | "show" => FormCommand::Show,
        "reiniciar" | "reset" => FormCommand::Reset,
        "tabla" | "table" => FormCommand::Table,
        "ayuda" | "help" | "?" => FormCommand::Help,
        "salir" | "quit" | "exit" => FormCommand::Quit,
        _ => match Field::parse(head) {
            Some(field) => FormCommand::Set(field, rest.to_string()),
            None => FormCommand::Unknown(head.to_string()),
        },
    };
    Some(cmd)
}

/// 폼의 현재 입력 상태.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    raw: RawInput,
    default_furrow_length: f64,
}

impl FormState {
    pub fn new(default_furrow_length: f64) -> Self {
        Self {
            raw: RawInput::default(),
            default_furrow_length,
        }
    }

    pub fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Guinea => &mut self.raw.guinea,
            Field::Caminadora => &mut self.raw.caminadora,
            Field::Bledo => &mut self.raw.bledo,
            Field::Enredadera => &mut self.raw.enredadera,
            Field::Marihuano => &mut self.raw.marihuano,
            Field::FurrowLength => &mut self.raw.furrow_length,
        };
        *slot = value.to_string();
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Guinea => &self.raw.guinea,
            Field::Caminadora => &self.raw.caminadora,
            Field::Bledo => &self.raw.bledo,
            Field::Enredadera => &self.raw.enredadera,
            Field::Marihuano => &self.raw.marihuano,
            Field::FurrowLength => &self.raw.furrow_length,
        }
    }

    /// 비율 칸은 비우고 고랑 길이는 기본값으로 되돌린다.
    pub fn reset(&mut self) {
        self.raw = RawInput::default();
    }

    pub fn input(&self) -> CalculationInput {
        self.raw.validate(self.default_furrow_length)
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn print_fields(tr: &Translator, state: &FormState) {
    let input = state.input();
    for field in Field::ALL {
        let shown = if field == Field::FurrowLength {
            input.furrow_length
        } else {
            crate::validation::validate(state.get(field), crate::engine::MAX_FIELD_PERCENTAGE)
        };
        println!("{:<22} {shown}", tr.t(field.label_key()));
    }
}

/// 결과 큐에서 받은 메시지를 출력한다.
pub fn print_update(tr: &Translator, update: &CalcUpdate) {
    match update {
        CalcUpdate::Finished { result, .. } => print_lines(&report::render_result(tr, result)),
        CalcUpdate::Failed { error, .. } => {
            println!("{}: {}", tr.t(keys::ERROR_PREFIX), tr.calc_error(error))
        }
    }
}

pub fn prompt(tr: &Translator) -> Result<(), AppError> {
    print!("{}", tr.t(keys::FORM_PROMPT));
    io::stdout().flush().map_err(AppError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_assignments() {
        assert_eq!(
            parse_command("guinea 5"),
            Some(FormCommand::Set(Field::Guinea, "5".into()))
        );
        assert_eq!(
            parse_command("  LARGO   250 "),
            Some(FormCommand::Set(Field::FurrowLength, "250".into()))
        );
        assert_eq!(
            parse_command("bledo"),
            Some(FormCommand::Set(Field::Bledo, String::new()))
        );
    }

    #[test]
    fn parses_keywords_in_both_languages() {
        assert_eq!(parse_command("salir"), Some(FormCommand::Quit));
        assert_eq!(parse_command("quit"), Some(FormCommand::Quit));
        assert_eq!(parse_command("reiniciar"), Some(FormCommand::Reset));
        assert_eq!(parse_command("tabla"), Some(FormCommand::Table));
        assert_eq!(parse_command(""), None);
        assert_eq!(
            parse_command("foo 1"),
            Some(FormCommand::Unknown("foo".into()))
        );
    }

    #[test]
    fn reset_restores_default_length() {
        let mut state = FormState::new(100.0);
        state.set(Field::Guinea, "5");
        state.set(Field::FurrowLength, "40");
        assert_eq!(state.input().guinea, 5.0);
        assert_eq!(state.input().furrow_length, 40.0);
        state.reset();
        assert_eq!(state.input(), CalculationInput {
            furrow_length: 100.0,
            ..Default::default()
        });
    }
}
