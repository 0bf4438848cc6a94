use std::process;
use tracing::{error, info};
use trackplan::cli::{
    Args, ConfigDiscovery, DefaultPlannerConfig, ExecutionMode, PlanInvocation, TaskLoader,
};
use trackplan::planner::{Planner, PlannerConfig, advisor};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("trackplan=info")
        .init();

    let args = Args::parse();

    let result = match args.mode() {
        ExecutionMode::Plan(invocation) => run_plan(invocation).await,
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Planning failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run_plan(invocation: PlanInvocation) -> Result<(), Box<dyn std::error::Error>> {
    // Discover and load configuration
    let defaults = if let Some(ref config_override) = invocation.config_override {
        info!("Loading configuration override from: {:?}", config_override);
        DefaultPlannerConfig::from_toml_file(config_override)?
    } else {
        ConfigDiscovery::discover_config()?
    };

    let task_file = TaskLoader::load_task_file(&invocation.input)?;
    let config = resolve_config(defaults.planner.clone(), task_file.scheduler.clone(), &invocation);

    if invocation.verbose {
        println!(
            "Loaded {} tasks from {:?}",
            task_file.tasks.len(),
            invocation.input
        );
    }

    // Optionally rewrite the task set for better parallelism before planning
    let mut tasks = task_file.tasks;
    let mut improvements = Vec::new();
    if invocation.optimize {
        let outcome = advisor::optimize(tasks, &defaults.advisor)?;
        for improvement in &outcome.improvements {
            info!("{}", improvement);
        }
        tasks = outcome.tasks;
        improvements = outcome.improvements;
    }

    let planner = Planner::new(config)?.with_thresholds(defaults.advisor.clone());
    let mut plan = planner.plan(tasks)?;
    plan.suggestions.extend(improvements);

    if invocation.dry_run {
        println!("Dry run: {} - plan not printed", plan.summary());
        return Ok(());
    }

    let output = if invocation.pretty {
        plan.to_json_string_pretty()?
    } else {
        plan.to_json_string()?
    };
    println!("{}", output);

    if invocation.verbose {
        eprintln!(
            "{} | estimated duration {:.1}s | {} suggestion(s)",
            plan.summary(),
            plan.estimated_duration,
            plan.suggestions.len()
        );
    }

    Ok(())
}

/// Layer the capacity configuration: CLI flags over the document's embedded
/// scheduler config over the discovered defaults.
fn resolve_config(
    discovered: PlannerConfig,
    embedded: Option<PlannerConfig>,
    invocation: &PlanInvocation,
) -> PlannerConfig {
    let mut config = embedded.unwrap_or(discovered);

    if let Some(capacity) = invocation.capacity {
        config.total_capacity = capacity;
    }
    if let Some(team_size) = invocation.team_size {
        config.team_size = team_size;
    }
    if let Some(reserve) = invocation.reserve {
        config.reserve = reserve;
    }
    if let Some(time_per_point) = invocation.time_per_point {
        config.time_per_point = time_per_point;
    }

    config
}
