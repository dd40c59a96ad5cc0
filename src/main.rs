/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::path::PathBuf;

use stock_metrics::config::Config;
use stock_metrics::data::{write_metrics_csv, CsvPriceSource, PriceSource};
use stock_metrics::pipeline::MetricsEngine;
use stock_metrics::utils::logging;

const USAGE: &str = "사용법: stock_metrics [metrics] [--config <path>]";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut command = "metrics".to_string();
    let mut config_path = PathBuf::from("config.json");

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path\n{}", USAGE))?;
                config_path = PathBuf::from(path);
            }
            "help" | "--help" | "-h" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other if !other.starts_with('-') => command = other.to_string(),
            other => anyhow::bail!("unknown option '{}'\n{}", other, USAGE),
        }
    }

    // 설정 로드
    let config = Config::load_from(&config_path)?;

    // 로깅 초기화
    logging::init(&config.logging)?;
    log::info!("stock_metrics v{} 시작", stock_metrics::VERSION);

    match command.as_str() {
        "metrics" => run_metrics(config).await?,
        other => anyhow::bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}

async fn run_metrics(config: Config) -> Result<(), anyhow::Error> {
    let source = CsvPriceSource::new(config.stock_prices_path());
    let engine = MetricsEngine::new(config.metrics.clone())?;

    log::info!("가격 데이터 로드 중: {}", source.path().display());
    let table = source.load_prices()?;

    let run = if config.metrics.parallel {
        engine.run_table_concurrent(&table).await?
    } else {
        engine.run_table(&table)?
    };

    write_metrics_csv(&config.metrics_path(), &run.records, &config.metrics.labels())?;

    println!("\n{}", run.summary());
    Ok(())
}
