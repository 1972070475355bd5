use crate::infra::load_aggregator;
use chrono::Local;
use clap::Args;
use esg_score::config::AppConfig;
use esg_score::error::AppError;
use esg_score::telemetry;
use esg_score::records::DisclosureImporter;
use esg_score::scoring::{
    EsgCategory, RiskLevel, ScoreBreakdown, TopicContribution, UnknownCategoryPolicy,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// SASB industry of the reporting company (e.g. 半導體業)
    #[arg(long)]
    pub(crate) industry: String,
    /// Analysed disclosures as a JSON array or CSV export
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Override the SASB weight table location
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
    /// Print one line per scored topic
    #[arg(long)]
    pub(crate) breakdown: bool,
    /// Count unrecognised categories toward Total and score empty ones as E
    #[arg(long)]
    pub(crate) legacy_unknown_category: bool,
    /// Emit the breakdown as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WeightsArgs {
    /// Show the topic weights of a single industry
    #[arg(long)]
    pub(crate) industry: Option<String>,
    /// Override the SASB weight table location
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
}

pub(crate) fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        industry,
        records,
        weights,
        breakdown,
        legacy_unknown_category,
        json,
    } = args;

    let mut config = cli_config(weights)?;
    if legacy_unknown_category {
        config.scoring.unknown_category = UnknownCategoryPolicy::Legacy;
    }

    let aggregator = load_aggregator(&config.scoring)?;
    let disclosures = DisclosureImporter::from_path(&records)?;
    let result = aggregator.breakdown(&industry, &disclosures);

    if json {
        println!("{}", breakdown_json(&result)?);
        return Ok(());
    }

    println!("ESG greenwashing score");
    println!(
        "Industry: {} | {} disclosures from {} | scored {}",
        industry,
        disclosures.len(),
        records.display(),
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!("Unknown categories: {}", aggregator.policy());
    render_scores(&result);

    if breakdown {
        render_breakdown(&result);
    }

    Ok(())
}

pub(crate) fn run_weights_report(args: WeightsArgs) -> Result<(), AppError> {
    let config = cli_config(args.weights)?;
    let aggregator = load_aggregator(&config.scoring)?;
    let table = aggregator.weights();

    let Some(industry) = args.industry else {
        println!("SASB weight table: {} topics", table.topic_count());
        for industry in table.industries() {
            println!("- {}", industry);
        }
        return Ok(());
    };

    let weights = table.industry_weights(&industry);
    if weights.is_empty() {
        return Err(AppError::UnknownIndustry(industry));
    }

    println!("SASB topic weights for {}", industry);
    for entry in &weights {
        println!(
            "- {} [{}]: {:.1}",
            entry.topic,
            entry.dimension.as_deref().unwrap_or("-"),
            entry.weight
        );
    }

    Ok(())
}

/// Loads config, applies the weights override and installs telemetry.
fn cli_config(weights: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = weights {
        config.scoring.weights_path = path;
    }
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn breakdown_json(result: &ScoreBreakdown) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn render_scores(result: &ScoreBreakdown) {
    let levels = result.scores.risk_levels();
    println!("\nScores");
    for category in EsgCategory::ordered() {
        let score = result.scores.category(category);
        println!(
            "- {} ({}): {:.1} | {} risk",
            category.label(),
            category.code(),
            score,
            RiskLevel::from_percentage(score)
        );
    }
    println!(
        "- Total greenwashing score: {:.1} | {} risk",
        result.scores.total, levels.total
    );

    let ignored = result.ignored_count();
    if ignored > 0 {
        println!("{} disclosure(s) had no recognised category", ignored);
    }
}

fn render_breakdown(result: &ScoreBreakdown) {
    for category in EsgCategory::ordered() {
        let mut topics = result.topics_for(category).peekable();
        if topics.peek().is_none() {
            continue;
        }
        println!("\n{} topics", category.label());
        for topic in topics {
            println!("{}", topic_line(topic));
        }
    }

    let ignored: Vec<_> = result.topics.iter().filter(|t| t.is_ignored()).collect();
    if !ignored.is_empty() {
        println!("\nIgnored");
        for topic in ignored {
            println!("- {}", topic.topic);
        }
    }
}

fn topic_line(topic: &TopicContribution) -> String {
    let mut line = format!(
        "- {}: {:.1}/4 x{:.1} = {:.1}/{:.1} | {} risk",
        topic.topic,
        topic.net_score,
        topic.weight,
        topic.weighted_score,
        topic.max_possible,
        topic.risk_level
    );
    if let Some(flag) = topic.msci_flag {
        line.push_str(&format!(" | MSCI {}", flag.label()));
    }
    if let Some(page) = topic.page_number.as_deref() {
        line.push_str(&format!(" | p.{}", page));
    }
    line
}
