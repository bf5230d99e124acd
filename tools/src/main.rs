//! triad-runner: headless runner for the triad token economy.
//!
//! Usage:
//!   triad-runner --seed 12345 --steps 50 --balance 1000 --cost-rate 5
//!   triad-runner --config session.json --stimulus 0.4
//!   triad-runner --seed 12345 --ipc-mode

use anyhow::Result;
use triad_core::{
    config::SimConfig,
    engine::SimEngine,
    event::SimEvent,
    rng::NormalStimulus,
    snapshot::{BehaviourSnapshot, LedgerSnapshot},
    types::Stimulus,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Run { steps: u64 },
    Reset { balance: f64 },
    Quote { stimulus: Stimulus },
    SetCostRate { rate: f64 },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    step_count: u64,
    ledger: LedgerSnapshot,
    behaviour: BehaviourSnapshot,
    /// Events since the previous response.
    events: Vec<SimEvent>,
}

/// Knobs the IPC client can turn between runs.
struct Session {
    engine: SimEngine,
    sampler: NormalStimulus,
    stimulus: Stimulus,
    action_cost_rate: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = build_config(&args)?;
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    if !ipc_mode {
        println!("Triad token economy: triad-runner");
        println!("  seed:       {}", config.seed);
        println!("  steps:      {}", config.steps);
        println!("  balance:    {}", config.initial_balance);
        println!("  cost rate:  {}", config.action_cost_rate);
        println!("  spread:     {}", config.stimulus_spread);
        println!();
    }

    let mut session = Session {
        engine: SimEngine::from_config(&config)?,
        sampler: NormalStimulus::new(config.seed, config.stimulus_mean, config.stimulus_spread),
        stimulus: config.stimulus,
        action_cost_rate: config.action_cost_rate,
    };

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        let report = session
            .engine
            .run(config.steps, config.action_cost_rate, &mut session.sampler)?;
        log::info!("drew {} stimuli", report.stimuli.len());
        print_summary(&session)?;
    }

    Ok(())
}

/// Config file first (if any), then individual flags on top.
fn build_config(args: &[String]) -> Result<SimConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    config.seed = parse_arg(args, "--seed", config.seed);
    config.steps = parse_arg(args, "--steps", config.steps);
    config.initial_balance = parse_arg(args, "--balance", config.initial_balance);
    config.action_cost_rate = parse_arg(args, "--cost-rate", config.action_cost_rate);
    config.stimulus = parse_arg(args, "--stimulus", config.stimulus);
    config.stimulus_spread = parse_arg(args, "--spread", config.stimulus_spread);

    config.validate()?;
    Ok(config)
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(session, cmd) {
            Ok(()) => {
                let state = build_ui_state(session);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(session: &mut Session, cmd: IpcCommand) -> triad_core::SimResult<()> {
    match cmd {
        IpcCommand::GetState | IpcCommand::Quit => {}
        IpcCommand::Run { steps } => {
            session
                .engine
                .run(steps, session.action_cost_rate, &mut session.sampler)?;
        }
        IpcCommand::Reset { balance } => session.engine.reset(balance)?,
        IpcCommand::Quote { stimulus } => session.stimulus = stimulus,
        IpcCommand::SetCostRate { rate } => {
            triad_core::error::check_cost_rate(rate)?;
            session.action_cost_rate = rate;
        }
    }
    Ok(())
}

fn build_ui_state(session: &mut Session) -> UiState {
    let events = session.engine.drain_events();
    UiState {
        step_count: session.engine.step_count(),
        ledger: LedgerSnapshot::capture(&session.engine),
        behaviour: BehaviourSnapshot::capture(
            &session.engine,
            session.stimulus,
            session.action_cost_rate,
        ),
        events,
    }
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn print_summary(session: &Session) -> Result<()> {
    let ledger = LedgerSnapshot::capture(&session.engine);
    let behaviour =
        BehaviourSnapshot::capture(&session.engine, session.stimulus, session.action_cost_rate);

    println!("=== TOKEN LEDGER ===");
    println!("  steps run:      {}", ledger.step_count);
    for agent in &ledger.agents {
        println!(
            "  {:<6} (bias {:+.0}) | {:>9.2} MAYA | {:>+9.2} | {} actions",
            agent.name.name(),
            agent.bias,
            agent.balance,
            agent.delta,
            agent.history.len()
        );
    }

    println!();
    println!("=== BEHAVIOUR @ stimulus {:.2} ===", behaviour.stimulus);
    for q in &behaviour.quotes {
        println!(
            "  {:<6} | response {:>+7.4} | cost {:>7.2} | can act: {}",
            q.agent.name(),
            q.response,
            q.cost,
            q.can_act
        );
    }
    match behaviour.consensus {
        Some(c) => println!("  triad consensus: {c:.3}"),
        None => println!("  triad consensus: (none)"),
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Parse `flag`'s value, falling back to `default` if absent or malformed.
fn parse_arg<T>(args: &[String], flag: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match flag_value(args, flag) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring malformed {flag} value {raw:?}; using {default}");
            default
        }),
    }
}
