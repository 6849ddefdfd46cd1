use accident_risk::config::AppConfig;
use accident_risk::error::AppError;
use accident_risk::scoring::{
    assess_path, AssessmentError, ModelArtifact, PredictResponse, RiskAssessment,
    RiskAssessmentService,
};
use clap::Args;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Road type code (1 Residential, 2 Suburban, 3 Rural, 6 Urban)
    #[arg(long)]
    pub(crate) road_type: u8,
    /// Weather conditions (Fine, Rain, Snow, Fog)
    #[arg(long)]
    pub(crate) weather: String,
    /// Posted speed limit in mph (20-70 in steps of 10)
    #[arg(long)]
    pub(crate) speed_limit: u8,
    /// Time of day (Morning, Afternoon, Evening, Night)
    #[arg(long)]
    pub(crate) time_of_day: String,
    /// Junction detail (T Junction, Crossroads, Roundabout, Not at junction)
    #[arg(long)]
    pub(crate) junction: String,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the HTTP response payload instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file whose headers are the request field names
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

fn load_service(model: Option<PathBuf>) -> Result<RiskAssessmentService, AppError> {
    let config = AppConfig::load()?;
    let path = model.unwrap_or(config.model.artifact_path);
    let artifact = ModelArtifact::from_path(&path)?;
    Ok(RiskAssessmentService::new(artifact, config.scoring))
}

pub(crate) fn request_from_args(args: &AssessArgs) -> Map<String, Value> {
    let payload = json!({
        "road_type": args.road_type,
        "weather_conditions": args.weather,
        "speed_limit": args.speed_limit,
        "time_of_day": args.time_of_day,
        "junction_detail": args.junction,
    });

    match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let raw = request_from_args(&args);
    let service = load_service(args.model)?;
    let assessment = service.assess_object(&raw)?;

    if args.json {
        let payload = PredictResponse {
            prediction: assessment.prediction_view(),
            input_data: Value::Object(raw),
        };
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        println!("{rendered}");
    } else {
        render_assessment(&raw, &assessment);
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = load_service(args.model)?;
    let rows = assess_path(&service, &args.input)?;

    println!("Batch risk assessment ({} locations)", rows.len());
    let mut high_risk = 0;
    for row in &rows {
        match &row.outcome {
            Ok(assessment) => {
                if assessment.risk_level == accident_risk::scoring::RiskLevel::HighRisk {
                    high_risk += 1;
                }
                let view = assessment.prediction_view();
                println!(
                    "- line {}: {} ({}, raw {}) | {} factor(s)",
                    row.line,
                    view.risk_level,
                    view.probability,
                    view.raw_probability,
                    view.risk_factors.len()
                );
            }
            Err(AssessmentError::Invalid(details)) => {
                println!("- line {}: invalid input ({details})", row.line);
            }
            Err(err) => {
                println!("- line {}: failed ({err})", row.line);
            }
        }
    }
    println!("{high_risk} of {} locations classified as high risk", rows.len());

    Ok(())
}

fn render_assessment(raw: &Map<String, Value>, assessment: &RiskAssessment) {
    let view = assessment.prediction_view();

    println!("Road accident risk assessment");
    for (field, value) in raw {
        println!("- {field}: {value}");
    }

    println!("\nRisk level: {}", view.risk_level);
    println!(
        "Probability: {} (model raw {}, rule score {:.1})",
        view.probability, view.raw_probability, assessment.base_risk_score
    );

    if view.risk_factors.is_empty() {
        println!("\nRisk factors: none");
    } else {
        println!("\nRisk factors");
        for factor in &view.risk_factors {
            println!("- {factor}");
        }
    }

    println!("\nRecommendations");
    for recommendation in &view.recommendations {
        println!("- {recommendation}");
    }
}
