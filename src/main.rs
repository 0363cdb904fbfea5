use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use palazon_calculator::{
    app::{self, AppError},
    config,
    engine::RawInput,
    i18n::{self, keys, Translator},
    logging,
};
use tracing::debug;

/// 잡초 피복률로 단가 구간과 필요 고랑 수를 계산한다.
#[derive(Debug, Parser)]
#[command(name = "palazon", version, about)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 표시 언어 (auto, es, en)
    #[arg(long, short = 'L', global = true)]
    lang: Option<String>,

    /// 언어팩 디렉터리
    #[arg(long, global = true, default_value = "locales")]
    locales: PathBuf,

    /// 로그 상세도 (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 대화형 입력 폼 (기본값)
    Form,
    /// 한 번 계산하고 종료
    Calc(CalcArgs),
    /// 단가표 출력
    Table,
}

/// 각 값은 입력 그대로 받아 검증한다. 숫자가 아니면 0으로 취급한다.
#[derive(Debug, Args)]
struct CalcArgs {
    #[arg(long, default_value = "")]
    guinea: String,
    #[arg(long, default_value = "")]
    caminadora: String,
    #[arg(long, default_value = "")]
    bledo: String,
    #[arg(long, default_value = "")]
    enredadera: String,
    #[arg(long, default_value = "")]
    marihuano: String,
    /// 고랑 길이 [m]. 생략하면 설정의 기본값
    #[arg(long, default_value = "")]
    largo: String,
}

impl From<CalcArgs> for RawInput {
    fn from(a: CalcArgs) -> Self {
        RawInput {
            guinea: a.guinea,
            caminadora: a.caminadora,
            bledo: a.bledo,
            enredadera: a.enredadera,
            marihuano: a.marihuano,
            furrow_length: a.largo,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let cfg = match config::load_or_default(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{}: {err}", Translator::new("es").t(keys::ERROR_PREFIX));
            return ExitCode::FAILURE;
        }
    };
    let lang = i18n::resolve_language(cli.lang.as_deref(), Some(cfg.language.as_str()));
    let tr = Translator::new_with_pack(&lang, Some(cli.locales.as_path()));
    debug!(lang = tr.language().as_code(), "resolved language");

    let outcome = match cli.command.unwrap_or(Command::Form) {
        Command::Form => app::run_form(&cfg, &tr).await,
        Command::Calc(args) => app::run_once(&cfg, &tr, &args.into()),
        Command::Table => app::print_table(&cfg, &tr),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        // 계산 오류는 이미 사용자에게 출력됨
        Err(AppError::Calc(_)) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}
