use clap::Parser;
use ibs_sg5302::utils::{logger, validation::Validate};
use ibs_sg5302::{
    CliConfig, ConversionOutcome, Converter, IbsReader, LocalStorage, Sg5302Transformer,
    SystemClock, TomlConfig,
};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 載入配置：預設值 < TOML 檔案 < 環境變數 < 命令列
    let mut config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };

    // std::env::vars() 遇到非 UTF-8 變數會 panic，略過這些變數
    let env_vars = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));

    if let Err(e) = config
        .apply_env_overrides(env_vars)
        .and_then(|_| config.validate())
    {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let output_directory = match cli
        .output_directory
        .clone()
        .or_else(|| config.output_directory().map(|p| p.to_path_buf()))
    {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("❌ Could not determine current working directory: {}", e);
                std::process::exit(1);
            }
        },
    };

    let transformer = Sg5302Transformer::new(LocalStorage::new(), SystemClock)
        .with_field_labels(config.fields.clone());
    let converter = Converter::new_with_monitoring(
        IbsReader::new(),
        transformer,
        config.report_parameters(),
        cli.monitor,
    )
    .with_label(config.label());

    match converter.run(&cli.ibs_file, &output_directory) {
        Ok(ConversionOutcome::Written(files)) => {
            for file in files {
                println!("SG5302 file wrote to: {}", file.display());
            }
        }
        Ok(ConversionOutcome::NoData) => {
            println!("ERROR: No data found in IBS report. Could not create SG5302 report");
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
