//! The `eduboost predict` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use eduboost_core::legacy::LegacyPredictRequest;
use eduboost_core::Engine;

use super::common::Format;

pub fn execute(input: Option<PathBuf>, json: Option<String>, format: String) -> Result<()> {
    let format = Format::parse_plain(&format)?;

    let content = match (input, json) {
        (_, Some(inline)) => inline,
        (Some(path), None) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            buf
        }
        (Some(path), None) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("pass a request with --input <file> or --json '<request>'"),
    };

    let request: LegacyPredictRequest =
        serde_json::from_str(&content).context("invalid prediction request")?;
    let prediction = Engine::builtin()?.legacy_predict(&request)?;

    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    let verdict = if prediction.prediction == 1 {
        "AT RISK"
    } else {
        "not at risk"
    };
    println!(
        "Prediction: {verdict} (risk {:.3}, {} level, confidence {:.3})",
        prediction.risk_score, prediction.risk_level, prediction.confidence
    );
    let factors = &prediction.factors_analysis;
    println!(
        "Factors: academic {}, behavioral {}, engagement {}",
        factors.academic_risk, factors.behavioral_risk, factors.engagement_risk
    );
    for r in &prediction.recommendations {
        println!("  - {r}");
    }
    Ok(())
}
