use sales_predict::history::{HistoryLoader, ProductDescriptor};
use sales_predict::model::{ForestModel, ModelArtifact, RegressionTree};
use sales_predict::predictor::SalesPredictor;
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Sales Predict: CSV History Example");
    println!("==================================\n");

    // Write a small history file; in practice this is an export from
    // the inventory system.
    let path = std::env::temp_dir().join("sales_history_example.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "Orderdate,Sales")?;
    for (offset, sales) in [100.0, 104.0, 98.0, 110.0, 107.0, 112.0, 109.0]
        .iter()
        .enumerate()
    {
        writeln!(file, "2024-02-{:02},{}", offset + 1, sales)?;
    }

    println!("Loading history from {:?}...", path);
    let history = HistoryLoader::from_csv(&path)?;
    println!("Loaded {} records\n", history.len());

    let predictor = SalesPredictor::new(create_stump_artifact()?);
    let product = ProductDescriptor {
        category: "Furniture".to_string(),
        subcategory: "Chairs".to_string(),
        city: "Chattogram".to_string(),
        region: "North".to_string(),
    };

    let result = predictor.predict(&history, &product, "2024-02-08")?;
    println!(
        "Prediction for 2024-02-08: {:.2} ({:.2} ..= {:.2})",
        result.prediction, result.lower_bound, result.upper_bound
    );

    std::fs::remove_file(&path)?;
    Ok(())
}

/// A two-stump forest so the ensemble interval path runs
fn create_stump_artifact() -> Result<ModelArtifact, Box<dyn std::error::Error>> {
    let feature_list: Vec<String> = [
        "year",
        "month",
        "day",
        "weekday",
        "is_weekend",
        "sales_lag_1",
        "sales_roll_7",
        "Category_Furniture",
        "Subcategory_Chairs",
        "City_Chattogram",
        "Region_North",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect();

    let trees = vec![
        RegressionTree::new(vec![-1], vec![0.0], vec![-1], vec![-1], vec![4.65])?,
        RegressionTree::new(vec![-1], vec![0.0], vec![-1], vec![-1], vec![4.72])?,
    ];

    Ok(ModelArtifact::new(
        "v1.0".to_string(),
        feature_list,
        ForestModel::new(trees)?,
    )?)
}
