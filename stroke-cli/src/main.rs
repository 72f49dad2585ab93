//! 卒中预测命令行客户端

mod input;
mod view;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use stroke_admin::{init_logging, AppConfig, ConfigManager, LogLevel};
use stroke_core::PredictionOutcome;
use stroke_form::{FieldRule, FieldSpec, FormValidator};
use stroke_integration::HttpPredictionClient;
use stroke_workflow::PredictionController;
use tracing::{debug, error, info};

use crate::view::TerminalView;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "stroke-cli", version)]
#[command(about = "Collects patient health metrics and requests a stroke probability prediction")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别（覆盖配置与 RUST_LOG）
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// 预测服务地址（覆盖 API_URL）
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the form and request a prediction
    Predict(PredictArgs),
    /// Validate the form without submitting it
    Validate(FormArgs),
    /// Print the form schema as JSON
    Schema,
    /// Check that the prediction service is reachable
    Ping,
}

#[derive(Args, Debug)]
struct FormArgs {
    /// Form field as key=value (repeatable)
    #[arg(short = 'f', long = "field")]
    fields: Vec<String>,

    /// JSON file with form fields
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Prompt for each field in the terminal
    #[arg(long, default_value_t = false)]
    interactive: bool,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

const EXIT_FAILED_PREDICTION: u8 = 1;
const EXIT_INVALID_FORM: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let override_level = cli
        .log_level
        .as_deref()
        .map(str::parse::<LogLevel>)
        .transpose()?;

    let config =
        ConfigManager::with_overrides(cli.config.as_deref(), None, cli.api_url.as_deref())?.into_config();

    init_logging(&config.logging, override_level)?;
    match cli.config.as_deref() {
        Some(path) => info!("Configuration loaded from: {}", path),
        None => info!("Configuration loaded from defaults and environment"),
    }
    info!("Prediction service: {}", config.api.base_url);

    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(FormValidator::new().schema())?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate(form) => run_validate(&form),
        Command::Ping => run_ping(&config).await,
        Command::Predict(args) => run_predict(&config, args).await,
    }
}

fn run_validate(form: &FormArgs) -> Result<ExitCode> {
    let fields = input::collect_fields(form.input.as_deref(), &form.fields)?;
    let result = FormValidator::new().validate(&fields);

    print!("{}", result.get_detailed_report());
    if result.is_valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INVALID_FORM))
    }
}

async fn run_ping(config: &AppConfig) -> Result<ExitCode> {
    let client = HttpPredictionClient::new(config.api.clone())?;

    if client.check_connection().await? {
        println!("Prediction service at {} is reachable", config.api.base_url);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Prediction service at {} is not healthy", config.api.base_url);
        Ok(ExitCode::from(EXIT_FAILED_PREDICTION))
    }
}

async fn run_predict(config: &AppConfig, args: PredictArgs) -> Result<ExitCode> {
    let client = HttpPredictionClient::new(config.api.clone())?;
    let mut controller = PredictionController::with_listener(client, TerminalView::new(args.json));

    if args.interactive {
        return run_interactive(&mut controller, args.json).await;
    }

    let fields = input::collect_fields(args.form.input.as_deref(), &args.form.fields)?;
    for (key, value) in &fields {
        // 字段错误在提交时统一报告
        if let Err(message) = controller.update_field(key, value) {
            debug!("Field {} rejected: {}", key, message);
        }
    }

    match controller.submit().await {
        Ok(outcome) => print_outcome(&outcome, args.json),
        Err(e) if e.is_validation() => {
            eprintln!("{}", e);
            Ok(ExitCode::from(EXIT_INVALID_FORM))
        }
        Err(e) => {
            error!("Prediction aborted: {}", e);
            Err(e.into())
        }
    }
}

async fn run_interactive(
    controller: &mut PredictionController<HttpPredictionClient, TerminalView>,
    json: bool,
) -> Result<ExitCode> {
    let fields = controller.validator().schema().fields.clone();
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        for spec in &fields {
            loop {
                print!("{} {}: ", spec.label, input_hint(spec));
                std::io::stdout().flush()?;

                let line = match lines.next() {
                    Some(line) => line?,
                    None => return Ok(ExitCode::SUCCESS),
                };
                match controller.update_field(spec.key, line.trim()) {
                    Ok(()) => break,
                    Err(message) => println!("  {}", message),
                }
            }
        }

        let outcome = controller.submit().await?;
        let code = print_outcome(&outcome, json)?;

        print!("Submit another prediction? [y/N]: ");
        std::io::stdout().flush()?;
        let again = match lines.next() {
            Some(line) => line?.trim().eq_ignore_ascii_case("y"),
            None => false,
        };
        if !again {
            return Ok(code);
        }

        controller.reset()?;
        controller.clear_form()?;
    }
}

fn input_hint(spec: &FieldSpec) -> String {
    match &spec.rule {
        FieldRule::Text { default: Some(default), .. } => format!("(optional, default {})", default),
        FieldRule::Text { .. } => String::new(),
        FieldRule::Number { min, max } => format!("({}-{})", min, max),
        FieldRule::Choice { options } => format!("[{}]", options.join("/")),
        FieldRule::Flag => "[0/1]".to_string(),
    }
}

fn print_outcome(outcome: &PredictionOutcome, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.to_view_payload())?);
    } else if outcome.is_ok() {
        println!("Stroke probability: {}", outcome.display_text());
    } else {
        println!("{}", outcome.display_text());
    }

    if outcome.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILED_PREDICTION))
    }
}
