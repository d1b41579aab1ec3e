use chrono::NaiveDate;
use rand::Rng;
use sales_predict::history::{HistoryRecord, ProductDescriptor};
use sales_predict::model::{ForestModel, ModelArtifact, RegressionTree};
use sales_predict::predictor::SalesPredictor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Sales Predict: Basic Prediction Example");
    println!("=======================================\n");

    // Build a small synthetic artifact; a real deployment loads one
    // from JSON with ModelArtifact::from_path.
    println!("Building sample artifact...");
    let artifact = create_sample_artifact()?;
    println!(
        "Artifact {}: {} features\n",
        artifact.model_version,
        artifact.feature_count()
    );

    let predictor = SalesPredictor::new(artifact);

    // Thirty days of noisy history
    println!("Generating sample history...");
    let history = create_sample_history(30);
    println!("Sample history created: {} records\n", history.len());

    let product = ProductDescriptor {
        category: "Electronics".to_string(),
        // A misspelling on purpose; fuzzy matching resolves it
        subcategory: "Fones".to_string(),
        city: "Dhaka".to_string(),
        region: "Central".to_string(),
    };

    println!("Predicting sales for 2024-01-31...");
    let result = predictor.predict(&history, &product, "2024-01-31")?;

    println!(
        "Prediction: {:.2} (interval {:.2} ..= {:.2})",
        result.prediction, result.lower_bound, result.upper_bound
    );
    println!(
        "Accuracy proxy: {} = {:.2}",
        result.historical_accuracy.metric, result.historical_accuracy.value
    );

    println!("\nFull response payload:");
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

/// A forest of three shallow trees over the trained feature schema. The
/// reference token of each attribute was dropped during training, so
/// "Electronics" legitimately has no dummy column.
fn create_sample_artifact() -> Result<ModelArtifact, Box<dyn std::error::Error>> {
    let feature_list: Vec<String> = [
        "year",
        "month",
        "day",
        "weekday",
        "is_weekend",
        "sales_lag_1",
        "sales_lag_7",
        "sales_lag_30",
        "sales_roll_7",
        "sales_roll_30",
        "Category_Furniture",
        "Category_Office Supplies",
        "Subcategory_Phones",
        "Subcategory_Chairs",
        "City_Dhaka",
        "City_Chattogram",
        "Region_Central",
        "Region_North",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect();

    // Each tree splits on the 7-day rolling mean (feature 8) and emits a
    // log1p-scale estimate at its leaves.
    let leaves = [(4.55, 4.75), (4.60, 4.80), (4.50, 4.72)];
    let mut trees = Vec::new();
    for (low, high) in leaves {
        trees.push(RegressionTree::new(
            vec![8, -1, -1],
            vec![100.0, 0.0, 0.0],
            vec![1, -1, -1],
            vec![2, -1, -1],
            vec![0.0, low, high],
        )?);
    }

    Ok(ModelArtifact::new(
        "v1.0".to_string(),
        feature_list,
        ForestModel::new(trees)?,
    )?)
}

fn create_sample_history(days: u64) -> Vec<HistoryRecord> {
    let mut rng = rand::thread_rng();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    (0..days)
        .map(|offset| {
            let date = start + chrono::Duration::days(offset as i64);
            let jitter: f64 = rng.gen_range(-10.0..10.0);
            HistoryRecord {
                date: date.format("%Y-%m-%d").to_string(),
                sales: 110.0 + jitter,
            }
        })
        .collect()
}
