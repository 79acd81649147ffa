use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand, ValueEnum};

const CRATE: &str = "dispatch_core";

#[derive(Parser)]
#[command(name = "xtask", about = "Task runner for the dispatch workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dispatch_core test suite
    Test {
        /// Only run tests whose name contains this filter
        #[arg(long, env = "XTASK_TEST_FILTER")]
        filter: Option<String>,
    },
    /// Run the Criterion benchmarks
    Bench,
    /// Run the ignored load tests
    LoadTest,
    /// Run a CI job
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Benchmarks only
    Bench,
    /// Check, then bench
    All,
}

/// One labelled `cargo` invocation.
struct Step {
    label: &'static str,
    args: Vec<String>,
}

impl Step {
    fn new(label: &'static str, args: &[&str]) -> Self {
        Self {
            label,
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn run(&self) -> Result<(), ExitCode> {
        eprintln!("\n=== {} ===\n+ cargo {}", self.label, self.args.join(" "));
        match Command::new("cargo").args(&self.args).status() {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ExitCode::from(status.code().unwrap_or(1) as u8)),
            Err(err) => {
                eprintln!("failed to launch cargo: {err}");
                Err(ExitCode::FAILURE)
            }
        }
    }
}

fn test_step(filter: Option<&str>) -> Step {
    let mut step = Step::new("Test dispatch_core", &["test", "-p", CRATE]);
    step.args.extend(filter.map(str::to_string));
    step
}

fn bench_step() -> Step {
    Step::new(
        "Benchmarks",
        &["bench", "-p", CRATE, "--bench", "performance"],
    )
}

fn check_steps() -> Vec<Step> {
    vec![
        Step::new("Formatting", &["fmt", "--all", "--", "--check"]),
        Step::new(
            "Clippy",
            &["clippy", "--all-targets", "--all-features", "--", "-D", "warnings"],
        ),
        test_step(None),
        Step::new(
            "Library without test helpers",
            &["test", "-p", CRATE, "--no-default-features", "--lib"],
        ),
    ]
}

fn plan(command: Commands) -> Vec<Step> {
    match command {
        Commands::Test { filter } => vec![test_step(filter.as_deref())],
        Commands::Bench => vec![bench_step()],
        Commands::LoadTest => vec![Step::new(
            "Load tests",
            &[
                "test",
                "-p",
                CRATE,
                "--test",
                "load_tests",
                "--",
                "--ignored",
                "--nocapture",
            ],
        )],
        Commands::Ci { job } => match job {
            CiJob::Check => check_steps(),
            CiJob::Bench => vec![bench_step()],
            CiJob::All => {
                let mut steps = check_steps();
                steps.push(bench_step());
                steps
            }
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    for step in plan(cli.command) {
        if let Err(code) = step.run() {
            return code;
        }
    }
    ExitCode::SUCCESS
}
