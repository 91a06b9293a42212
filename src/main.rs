//! Volleyball head-to-head CLI
//!
//! Builds two-sided game tables from per-team schedule logs.

use clap::{Parser, Subcommand};
use volleyball::{Config, Result};

#[derive(Parser)]
#[command(name = "volleyball")]
#[command(about = "Build head-to-head volleyball game records from team schedule logs", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the head-to-head table
    Build {
        /// Schedules directory (overrides config)
        #[arg(long)]
        dir: Option<String>,
        /// Output file for csv/json formats (overrides config)
        #[arg(long)]
        out: Option<String>,
        /// Drop games with missing rolling stats
        #[arg(long)]
        drop_missing: bool,
        /// Fill missing rolling stats with zero
        #[arg(long)]
        fill_missing: bool,
        /// Output format
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },
    /// List the schedule logs found in a directory
    Logs {
        /// Schedules directory (overrides config)
        #[arg(long)]
        dir: Option<String>,
    },
    /// Write a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Build {
            dir,
            out,
            drop_missing,
            fill_missing,
            format,
        } => commands::build(&config, dir, out, drop_missing, fill_missing, format),
        Commands::Logs { dir } => commands::logs(&config, dir),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use volleyball::data::stats::{Metric, Window};
    use volleyball::data::LogStore;
    use volleyball::table::output;
    use volleyball::{build_with_report, BuildReport, HeadToHeadTable};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Put team schedule CSVs under {}/", config.data.schedules_dir);
        println!("  2. Run 'volleyball logs' to check what was found");
        println!("  3. Run 'volleyball build' to write {}", config.data.output_path);

        Ok(())
    }

    pub fn build(
        config: &Config,
        dir: Option<String>,
        out: Option<String>,
        drop_missing: bool,
        fill_missing: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let dir = dir.unwrap_or_else(|| config.data.schedules_dir.clone());
        // CLI policy flags replace the configured policy
        let (drop_missing, fill_missing) = if drop_missing || fill_missing {
            (drop_missing, fill_missing)
        } else {
            (config.build.drop_missing, config.build.fill_missing)
        };

        let (table, _logs, report) = build_with_report(&dir, drop_missing, fill_missing)?;
        print_report(&dir, &report);

        match format {
            OutputFormat::Table => print_table(&table),
            OutputFormat::Csv | OutputFormat::Json => {
                let path = out.unwrap_or_else(|| config.data.output_path.clone());
                let json = matches!(format, OutputFormat::Json);
                output::save(&table, &path, json)?;
                println!("\nWrote {} games to {}", table.len(), path);
            }
        }

        Ok(())
    }

    pub fn logs(config: &Config, dir: Option<String>) -> Result<()> {
        let dir = dir.unwrap_or_else(|| config.data.schedules_dir.clone());
        let (logs, report) = LogStore::new(&dir).load()?;

        println!("Schedule Logs");
        println!("───────────────────────────────");
        println!("  Path:     {}", dir);
        println!("  Files:    {}", report.files);
        println!("  Loaded:   {}", report.loaded);
        println!("  Rows:     {}", report.rows);

        if !logs.is_empty() {
            println!();
            println!("{:<40} {:<24} {:>6} {:>5}", "File", "Team", "Season", "Rows");
            for (name, log) in &logs {
                let season = log
                    .id
                    .season
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<40} {:<24} {:>6} {:>5}", name, log.team(), season, log.len());
                if !log.missing_stat_columns.is_empty() {
                    println!("    missing {} stat columns", log.missing_stat_columns.len());
                }
            }
        }

        if !report.skipped.is_empty() {
            println!("\nSkipped:");
            for skipped in &report.skipped {
                println!("  {} ({})", skipped.path.display(), skipped.reason);
            }
        }

        Ok(())
    }

    fn print_report(dir: &str, report: &BuildReport) {
        println!("Head-to-Head Build");
        println!("───────────────────────────────");
        println!("  Path:      {}", dir);
        println!("  Logs:      {} ({} skipped)", report.load.loaded, report.load.skipped.len());
        println!("  Rows:      {}", report.load.rows);
        println!("  Games:     {}", report.matching.groups);
        println!("  Accepted:  {}", report.matching.accepted);
        for (kind, count) in &report.matching.rejected {
            println!("  Rejected:  {} ({})", count, kind);
        }
        println!("  Policy:    {}", report.policy);
        if report.matching.dropped_missing > 0 {
            println!("  Dropped:   {} (missing stats)", report.matching.dropped_missing);
        }
    }

    fn print_table(table: &HeadToHeadTable) {
        const PREVIEW: usize = 20;

        println!(
            "\n{:<12} {:<24} {:<24} {:>6} {:>8} {:>8}",
            "Date", "Team 1", "Team 2", "Winner", "T1 hit%", "T2 hit%"
        );
        println!("{}", "─".repeat(88));

        let fmt_stat = |v: Option<f64>| v.map(|x| format!("{:.3}", x)).unwrap_or_else(|| "-".to_string());
        for row in table.rows.iter().take(PREVIEW) {
            let winner = if row.result == 0 { "t1" } else { "t2" };
            println!(
                "{:<12} {:<24} {:<24} {:>6} {:>8} {:>8}",
                row.date.to_string(),
                row.t1,
                row.t2,
                winner,
                fmt_stat(row.t1_stats.get(Metric::HitPct, Window::Season)),
                fmt_stat(row.t2_stats.get(Metric::HitPct, Window::Season)),
            );
        }
        if table.len() > PREVIEW {
            println!("... {} more games", table.len() - PREVIEW);
        }
        println!("\n{} games, {} teams", table.len(), table.team_codes.len());
    }
}
