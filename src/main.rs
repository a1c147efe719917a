use clap::Parser;

use codejudge::Judge;
use codejudge::config::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = CliArgs::parse();
    let config = cli.to_config();
    let submission = cli.read_submission()?;

    log::info!(
        "Judging {} submission against {} test cases (timeout {} ms, {})",
        submission.language,
        submission.test_cases.len(),
        config.timeout.as_millis(),
        config
            .remote
            .as_ref()
            .map_or("local only".to_string(), |r| format!("judge server {}", r.url))
    );

    let judge = Judge::new(&config);
    let result = judge
        .execute_code(&submission.code, &submission.language, &submission.test_cases)
        .await;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");

    Ok(())
}
