//! Gapminder Dash CLI
//!
//! Command-line interface for the dashboard:
//! - Inspect the dataset options of a running server
//! - Fetch chart data from a running server
//! - Render chart data offline from a CSV file
//! - Generate a default config file

use clap::{Parser, Subcommand, ValueEnum};
use gapminder_dash::chart::{render, ChartDescription, ChartOptions, MissingPolicy, Selection};
use gapminder_dash::dataset::TidyTable;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gapminder-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explore GDP per capita from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dashboard server URL
    #[arg(long, default_value = "http://localhost:8050", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingArg {
    Zero,
    Gap,
}

impl From<MissingArg> for MissingPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Zero => MissingPolicy::Zero,
            MissingArg::Gap => MissingPolicy::Gap,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show countries and year bounds of the served dataset
    Options,

    /// Fetch a chart from the server
    Chart {
        /// Country to plot (repeat for several)
        #[arg(short, long = "country")]
        countries: Vec<String>,
        /// First year (default: earliest in dataset)
        #[arg(short, long)]
        start: Option<i32>,
        /// Last year (default: latest in dataset)
        #[arg(short, long)]
        end: Option<i32>,
    },

    /// Show server status
    Status,

    /// Render a chart offline from a CSV file
    Render {
        /// Path to the wide CSV file
        path: PathBuf,
        /// Country to plot (repeat for several)
        #[arg(short, long = "country")]
        countries: Vec<String>,
        /// First year (default: earliest in file)
        #[arg(short, long)]
        start: Option<i32>,
        /// Last year (default: latest in file)
        #[arg(short, long)]
        end: Option<i32>,
        /// How years without a value are plotted
        #[arg(long, value_enum, default_value_t = MissingArg::Zero)]
        missing: MissingArg,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Options => {
            let options = fetch_options(&client, &cli.api_url).await?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
                OutputFormat::Csv => {
                    let countries = options["countries"]
                        .as_array()
                        .into_iter()
                        .flatten()
                        .filter_map(|c| c.as_str());
                    write_countries_csv(countries, std::io::stdout().lock())?;
                }
                OutputFormat::Table => {
                    let countries = options["countries"].as_array().cloned().unwrap_or_default();
                    println!(
                        "Years: {} - {}",
                        options["year_min"].as_i64().map(|y| y.to_string()).unwrap_or("-".into()),
                        options["year_max"].as_i64().map(|y| y.to_string()).unwrap_or("-".into())
                    );
                    println!("Countries: {}", countries.len());
                    println!();
                    for country in countries {
                        println!("  {}", country.as_str().unwrap_or("-"));
                    }
                }
            }
        }

        Commands::Chart {
            countries,
            start,
            end,
        } => {
            // Fill open bounds from the served dataset
            let (start, end) = match (start, end) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    let options = fetch_options(&client, &cli.api_url).await?;
                    let min = options["year_min"].as_i64().map(|y| y as i32);
                    let max = options["year_max"].as_i64().map(|y| y as i32);
                    match (start.or(min), end.or(max)) {
                        (Some(s), Some(e)) => (s, e),
                        _ => {
                            eprintln!("The dataset has no years; pass --start and --end");
                            std::process::exit(1);
                        }
                    }
                }
            };

            let selection = Selection::new(countries, (start, end));

            let response = client
                .post(format!("{}/api/v1/chart", cli.api_url))
                .json(&selection)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Chart request failed ({}): {}", status, text);
                std::process::exit(1);
            }

            let chart: ChartDescription = response.json().await?;
            print_chart(&chart, cli.format)?;
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Gapminder Dash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("Server status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!();
                    println!("Dataset:");
                    println!("  Records: {}", health["records"].as_u64().unwrap_or(0));
                    println!("  Countries: {}", health["countries"].as_u64().unwrap_or(0));
                    if let Some(years) = health["years"].as_array() {
                        if let [min, max] = years.as_slice() {
                            println!("  Years: {} - {}", min, max);
                        }
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("Server returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to the dashboard at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin gapminder-dash");
                    std::process::exit(1);
                }
            }
        }

        Commands::Render {
            path,
            countries,
            start,
            end,
            missing,
        } => {
            let table = TidyTable::load(&path)?;
            let bounds = table.year_bounds();

            let start = start.or(bounds.map(|(min, _)| min));
            let end = end.or(bounds.map(|(_, max)| max));
            let (Some(start), Some(end)) = (start, end) else {
                eprintln!("{:?} has no year columns; pass --start and --end", path);
                std::process::exit(1);
            };

            let options = ChartOptions {
                missing_values: missing.into(),
                ..Default::default()
            };
            let chart = render(&Selection::new(countries, (start, end)), &table, &options);
            print_chart(&chart, cli.format)?;
        }

        Commands::Config { output } => {
            let config = gapminder_dash::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

async fn fetch_options(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let response = client
        .get(format!("{}/api/v1/options", api_url))
        .send()
        .await?;

    if !response.status().is_success() {
        eprintln!("Failed to fetch options: {}", response.status());
        std::process::exit(1);
    }

    Ok(response.json().await?)
}

fn print_chart(
    chart: &ChartDescription,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(chart)?),
        OutputFormat::Csv => write_chart_csv(chart, std::io::stdout().lock())?,
        OutputFormat::Table => print_table(chart),
    }
    Ok(())
}

/// Years across all series, ascending
fn chart_years(chart: &ChartDescription) -> BTreeSet<i32> {
    chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.year))
        .collect()
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_table(chart: &ChartDescription) {
    println!("{}", chart.title);
    println!();

    if chart.is_empty() {
        println!("No data for the selected countries and years");
        return;
    }

    // Header
    print!("{:<6}", chart.x_axis_label);
    for series in &chart.series {
        print!(" | {:>12}", series.name);
    }
    println!();

    // Separator
    println!("{}", "-".repeat(6 + chart.series.len() * 15));

    // Data rows
    for year in chart_years(chart) {
        print!("{:<6}", year);
        for series in &chart.series {
            let val = series
                .value_at(year)
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string());
            print!(" | {:>12}", val);
        }
        println!();
    }
}

fn write_chart_csv<W: std::io::Write>(chart: &ChartDescription, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["year".to_string()];
    header.extend(chart.series.iter().map(|s| s.name.clone()));
    wtr.write_record(&header)?;

    for year in chart_years(chart) {
        let mut row = vec![year.to_string()];
        row.extend(chart.series.iter().map(|series| {
            series
                .value_at(year)
                .map(|v| format!("{:.2}", v))
                .unwrap_or_default()
        }));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_countries_csv<'a, I, W>(countries: I, writer: W) -> csv::Result<()>
where
    I: IntoIterator<Item = &'a str>,
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["country"])?;
    for country in countries {
        wtr.write_record([country])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapminder_dash::chart::{ChartPoint, ChartSeries};

    fn series(name: &str, points: &[(i32, Option<f64>)]) -> ChartSeries {
        ChartSeries {
            name: name.to_string(),
            color: "#636efa".to_string(),
            points: points
                .iter()
                .map(|&(year, value)| ChartPoint { year, value })
                .collect(),
        }
    }

    #[test]
    fn test_chart_csv_quotes_awkward_names() {
        let chart = ChartDescription {
            title: "t".to_string(),
            x_axis_label: "Year".to_string(),
            y_axis_label: "GDP per Capita".to_string(),
            height: 550,
            series: vec![
                series("Korea, Rep.", &[(2000, Some(1.0)), (2001, Some(2.5))]),
                series("Line\rBreak \"X\"", &[(2001, None)]),
            ],
        };

        let mut out = Vec::new();
        write_chart_csv(&chart, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "year,\"Korea, Rep.\",\"Line\rBreak \"\"X\"\"\"\n2000,1.00,\n2001,2.50,\n"
        );

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[1], "Korea, Rep.");
        assert_eq!(&headers[2], "Line\rBreak \"X\"");
    }

    #[test]
    fn test_countries_csv() {
        let mut out = Vec::new();
        write_countries_csv(["USA", "Congo, Dem. Rep."], &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "country\nUSA\n\"Congo, Dem. Rep.\"\n"
        );
    }
}
