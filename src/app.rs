use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::config::{Config, ConfigError};
use crate::engine::{CalcError, Engine, RawInput};
use crate::i18n::{keys, Translator};
use crate::report;
use crate::scheduler::{CalcWorker, Debouncer};
use crate::tariff::TariffError;
use crate::ui_cli::{self, FormCommand, FormState};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("tariff table error: {0}")]
    Tariff(#[from] TariffError),
    #[error("{0}")]
    Calc(#[from] CalcError),
}

/// 설정의 단가표로 엔진을 만든다.
pub fn build_engine(config: &Config) -> Result<Engine, AppError> {
    Ok(Engine::from_tariff(&config.tariff)?)
}

/// 입력 칸을 한 번에 받아 계산하고 결과를 출력한다.
pub fn run_once(config: &Config, tr: &Translator, raw: &RawInput) -> Result<(), AppError> {
    let engine = build_engine(config)?;
    let input = raw.validate(config.default_furrow_length_m);
    debug!(?input, "one-shot calculation");
    match engine.run(&input) {
        Ok(result) => {
            ui_cli::print_lines(&report::render_result(tr, &result));
            Ok(())
        }
        Err(err) => {
            eprintln!("{}: {}", tr.t(keys::ERROR_PREFIX), tr.calc_error(&err));
            Err(err.into())
        }
    }
}

pub fn print_table(config: &Config, tr: &Translator) -> Result<(), AppError> {
    let engine = build_engine(config)?;
    ui_cli::print_lines(&report::render_table(tr, engine.table()));
    Ok(())
}

/// 대화형 폼 세션을 실행한다.
///
/// 입력이 바뀔 때마다 미리보기를 즉시 출력하고, 전체 계산은 디바운스 후 워커에서
/// 수행한다. 결과 큐는 이 루프만 소비한다.
pub async fn run_form(config: &Config, tr: &Translator) -> Result<(), AppError> {
    let engine = Arc::new(build_engine(config)?);
    let (worker, mut updates) = CalcWorker::new(Arc::clone(&engine));
    let mut debouncer = Debouncer::new(worker, config.debounce());
    let mut state = FormState::new(config.default_furrow_length_m);

    println!("{}", tr.t(keys::FORM_TITLE));
    println!("{}", tr.t(keys::FORM_HELP));
    ui_cli::prompt(tr)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(cmd) = ui_cli::parse_command(&line) else {
                    ui_cli::prompt(tr)?;
                    continue;
                };
                match cmd {
                    FormCommand::Set(field, value) => {
                        state.set(field, &value);
                        let input = state.input();
                        if field.affects_preview() {
                            let preview = engine.preview(&input);
                            println!("{}", report::render_preview(tr, &preview));
                        }
                        debouncer.trigger(input);
                    }
                    FormCommand::Show => {
                        ui_cli::print_fields(tr, &state);
                        let preview = engine.preview(&state.input());
                        println!("{}", report::render_preview(tr, &preview));
                    }
                    FormCommand::Reset => {
                        debouncer.cancel();
                        state.reset();
                        println!("{}", tr.t(keys::FORM_RESET_DONE));
                    }
                    FormCommand::Table => {
                        let table = engine.table();
                        ui_cli::print_lines(&report::render_table(tr, table));
                    }
                    FormCommand::Help => println!("{}", tr.t(keys::FORM_HELP)),
                    FormCommand::Quit => break,
                    FormCommand::Unknown(word) => {
                        println!("{} ({word})", tr.t(keys::FORM_UNKNOWN_COMMAND));
                    }
                }
                ui_cli::prompt(tr)?;
            }
            Some(update) = updates.recv() => {
                println!();
                ui_cli::print_update(tr, &update);
                ui_cli::prompt(tr)?;
            }
        }
    }

    println!("{}", tr.t(keys::APP_EXIT));
    Ok(())
}
