use clap::Parser;
use krishi_mitra::core::crop_scoring::recommend_crops;
use krishi_mitra::domain::model::SoilSample;
use krishi_mitra::utils::logger;

#[derive(Parser)]
#[command(name = "krishi-recommend")]
#[command(about = "Score a soil sample offline and print the top crop recommendations as JSON")]
struct Args {
    /// Nitrogen (ppm)
    #[arg(short = 'n', long)]
    nitrogen: f64,

    /// Phosphorus (ppm)
    #[arg(short = 'p', long)]
    phosphorus: f64,

    /// Potassium (ppm)
    #[arg(short = 'k', long)]
    potassium: f64,

    /// Soil pH
    #[arg(long)]
    ph: f64,

    /// Annual rainfall (mm)
    #[arg(short = 'r', long)]
    rainfall: f64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let soil = SoilSample {
        nitrogen: args.nitrogen,
        phosphorus: args.phosphorus,
        potassium: args.potassium,
        ph: args.ph,
        rainfall: args.rainfall,
    };

    if let Err(e) = soil.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    let recommendations = recommend_crops(&soil);
    tracing::debug!("🌾 {} crop(s) scored above the threshold", recommendations.len());
    if recommendations.is_empty() {
        tracing::warn!("⚠️ No crop scored above the threshold for this sample");
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&recommendations)?
    } else {
        serde_json::to_string(&recommendations)?
    };
    println!("{}", output);
    Ok(())
}
