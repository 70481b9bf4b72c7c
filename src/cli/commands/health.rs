use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

fn server_url(url: Option<String>) -> String {
    url.or_else(|| std::env::var("MM_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string())
}

pub async fn handle(url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = server_url(url);
    let endpoint = format!("{}/health", base.trim_end_matches('/'));

    let response = match reqwest::get(&endpoint).await {
        Ok(response) => response,
        Err(e) => {
            output_error(&output_format, &format!("{} is unreachable: {}", base, e), None)?;
            std::process::exit(1);
        }
    };

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(&output_format, &format!("{} is healthy", base), Some(body))
    } else {
        output_error(
            &output_format,
            &format!("{} reported {} ({})", base, status, body),
            None,
        )?;
        std::process::exit(1);
    }
}
