use crate::infra::load_service;
use clap::Args;
use credit_coach::config::AppConfig;
use credit_coach::error::AppError;
use credit_coach::simulator::{
    ApplicantInput, ApprovalModel, Explanation, SimulationError, SimulationOutcome,
    SimulatorService,
};
use credit_coach::telemetry::{self, LogTarget};
use std::fmt::Write as _;
use std::path::PathBuf;

const PREDICTION_FAILED: &str = "Prediction failed. Please try again later.";
const EXPLANATION_FAILED: &str = "Explanation unavailable for this profile.";

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Years with the current employer (0-50)
    #[arg(long)]
    pub(crate) employed_years: u32,
    /// Annual income (0-2,000,000)
    #[arg(long)]
    pub(crate) annual_income: f64,
    /// Applicant age (18-70)
    #[arg(long)]
    pub(crate) age: u8,
    /// Income type label, e.g. "Working" or "Pensioner"
    #[arg(long)]
    pub(crate) income_type: String,
    /// Education label, e.g. "Higher education"
    #[arg(long)]
    pub(crate) education: String,
    /// Marital status label, e.g. "Single / not married"
    #[arg(long)]
    pub(crate) marital_status: String,
    /// Also print per-feature contributions
    #[arg(long)]
    pub(crate) explain: bool,
    /// Directory holding model.json, scaler.json, encoders.json and training.csv
    #[arg(long)]
    pub(crate) artifacts: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CategoriesArgs {
    /// Directory holding the artifact bundle
    #[arg(long)]
    pub(crate) artifacts: Option<PathBuf>,
}

fn cli_config(artifacts: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = artifacts {
        config.simulator.artifact_dir = dir;
    }
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;
    Ok(config)
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        employed_years,
        annual_income,
        age,
        income_type,
        education,
        marital_status,
        explain,
        artifacts,
    } = args;

    let config = cli_config(artifacts)?;
    let service = load_service(&config.simulator)?;
    let input = ApplicantInput {
        employed_years,
        annual_income,
        age,
        income_type,
        education,
        marital_status,
    };

    print!("{}", render_simulation(&service, &input, explain)?);
    Ok(())
}

pub(crate) fn run_categories(args: CategoriesArgs) -> Result<(), AppError> {
    let config = cli_config(args.artifacts)?;
    let service = load_service(&config.simulator)?;
    let categories = service.categories();

    println!("Accepted labels");
    for (name, labels) in [
        ("Income type", &categories.income_type),
        ("Education", &categories.education),
        ("Marital status", &categories.marital_status),
    ] {
        println!("- {name}: {}", labels.join(" | "));
    }
    Ok(())
}

/// Builds the terminal report. Bad input is an error; collaborator failures
/// degrade to a generic line and coaching tips are still shown.
pub(crate) fn render_simulation<M>(
    service: &SimulatorService<M>,
    input: &ApplicantInput,
    explain: bool,
) -> Result<String, AppError>
where
    M: ApprovalModel + 'static,
{
    let profile = service.profile_from_input(input)?;
    let mut out = String::new();

    let _ = writeln!(out, "Credit approval simulation");
    let _ = writeln!(
        out,
        "- {} years employed | income {:.0} | age {}",
        input.employed_years, input.annual_income, input.age
    );
    let _ = writeln!(
        out,
        "- {} | {} | {}",
        input.income_type, input.education, input.marital_status
    );

    let suggestions = match service.simulate(input) {
        Ok(outcome) => {
            write_outcome(&mut out, &outcome);
            outcome.suggestions
        }
        Err(err) if err.is_client_error() => return Err(err.into()),
        Err(_) => {
            let _ = writeln!(out, "{PREDICTION_FAILED}");
            service.coach(&profile)
        }
    };

    let _ = writeln!(out, "\nCoaching tips");
    for (index, tip) in suggestions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, tip);
    }

    if explain {
        let _ = writeln!(out, "\nFeature contributions");
        match service.explain(input) {
            Ok(explanation) => write_explanation(&mut out, &explanation),
            Err(SimulationError::Explanation(_)) | Err(SimulationError::Prediction(_)) => {
                let _ = writeln!(out, "  {EXPLANATION_FAILED}");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(out)
}

fn write_outcome(out: &mut String, outcome: &SimulationOutcome) {
    let gauge = &outcome.gauge;
    let _ = writeln!(
        out,
        "\nApproval probability: {:.1}% ({:+.1} vs {:.0}% reference)",
        gauge.value_pct, gauge.delta_pct, gauge.reference_pct
    );
    let _ = writeln!(out, "Credit health: {}", outcome.tier.label());
    let _ = writeln!(out, "  {}", outcome.guidance);
}

fn write_explanation(out: &mut String, explanation: &Explanation) {
    for attribution in &explanation.attributions {
        let _ = writeln!(
            out,
            "  {:<16} {:+.4}",
            attribution.feature, attribution.weight
        );
    }
    let _ = writeln!(
        out,
        "  local surrogate {:.3} vs model {:.3}",
        explanation.local_prediction, explanation.model_prediction
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_coach::config::SimulatorConfig;
    use credit_coach::simulator::{
        ArtifactBundle, FeatureVector, LimeConfig, LimeExplainer, PredictionError,
    };
    use std::path::Path;
    use std::sync::Arc;

    fn artifact_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../artifacts")
    }

    fn shipped_service() -> SimulatorService<credit_coach::simulator::LogisticApprovalModel> {
        load_service(&SimulatorConfig {
            artifact_dir: artifact_dir(),
            lime_samples: 300,
            lime_seed: 7,
        })
        .expect("shipped artifacts load")
    }

    struct Offline;

    impl ApprovalModel for Offline {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, PredictionError> {
            Err(PredictionError::Unavailable("model host offline".to_string()))
        }
    }

    fn input() -> ApplicantInput {
        ApplicantInput {
            employed_years: 1,
            annual_income: 150_000.0,
            age: 24,
            income_type: "Working".to_string(),
            education: "Secondary / secondary special".to_string(),
            marital_status: "Married".to_string(),
        }
    }

    #[test]
    fn renders_probability_tier_and_numbered_tips() {
        let report = render_simulation(&shipped_service(), &input(), false).expect("renders");

        assert!(report.contains("Approval probability:"));
        assert!(report.contains("Credit health:"));
        assert!(report.contains("  1. "));
        assert!(report.contains("  3. "));
        assert!(!report.contains("Feature contributions"));
    }

    #[test]
    fn explanation_table_lists_every_feature() {
        let report = render_simulation(&shipped_service(), &input(), true).expect("renders");

        for feature in credit_coach::simulator::FEATURE_NAMES {
            assert!(report.contains(feature), "missing {feature}");
        }
    }

    #[test]
    fn model_failure_prints_generic_line_and_keeps_tips() {
        let bundle = ArtifactBundle::load(&artifact_dir()).expect("shipped artifacts load");
        let explainer = LimeExplainer::new(&bundle.training, LimeConfig::default());
        let service = SimulatorService::new(
            bundle.encoders,
            bundle.scaler,
            Arc::new(Offline),
            Arc::new(explainer),
        );

        let report = render_simulation(&service, &input(), true).expect("renders");

        assert!(report.contains(PREDICTION_FAILED));
        assert!(report.contains(EXPLANATION_FAILED));
        assert!(!report.contains("model host offline"));
        assert!(report.contains("  1. "));
    }

    #[test]
    fn unknown_label_is_an_error() {
        let mut input = input();
        input.education = "Doctorate".to_string();

        let err = render_simulation(&shipped_service(), &input, false).expect_err("rejected");

        assert!(err.to_string().contains("Doctorate"));
    }
}
