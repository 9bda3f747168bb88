//! dash-runner: headless runner for the 4DX executive dashboard.
//!
//! Usage:
//!   dash-runner --user CEO --password password123 --period monthly --months 2024-05,2024-06
//!   dash-runner --source file --rows-dir ./data/sample --select L-100
//!   dash-runner --source graph --watch 3          (token from GRAPH_ACCESS_TOKEN)
//!   dash-runner --ipc-mode                        (line-delimited JSON on stdin/stdout)

use anyhow::Result;
use fourdx_core::{
    auth::DirectoryAuthenticator,
    config::DashboardConfig,
    dashboard::{Dashboard, DashboardView, RefreshTrigger},
    metric::Measure,
    period::{MonthKey, PeriodSelection},
    session::SessionContext,
    source::{DataSource, GraphDataSource, StaticDataSource},
    store::DashStore,
};
use std::env;
use std::io::{self, BufRead, Write};

const POLL_SECS: u64 = 60;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetView,
    SetPeriod { selection: PeriodSelection },
    ToggleMonth { month: MonthKey },
    Refresh,
    Tick,
    Select { lag_id: String },
    CloseDetail,
    Disconnect,
    SignOut,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let watch = parse_arg(&args, "--watch", 0u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let sign_out = args.iter().any(|a| a == "--sign-out");
    let db = arg_str(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_str(&args, "--data-dir").unwrap_or("./data");
    let source_kind = arg_str(&args, "--source").unwrap_or("mock");

    let config = DashboardConfig::load(data_dir)?;
    let store = DashStore::open(db)?;
    store.migrate()?;

    let mut session = SessionContext::load(&store)?;
    if sign_out {
        session.sign_out(&store)?;
        println!("Signed out.");
        return Ok(());
    }
    if let Some(user) = arg_str(&args, "--user") {
        let password = arg_str(&args, "--password").unwrap_or_default();
        let auth = DirectoryAuthenticator::new(config.directory.clone());
        session.sign_in(&store, &auth, user, password)?;
    }
    if session.user().is_none() {
        anyhow::bail!("Not signed in. Pass --user and --password.");
    }

    let source = build_source(source_kind, &args, &config)?;
    let mut dashboard = Dashboard::open(&session, config, source, store, seed)?;
    dashboard.set_period(period_from_args(&args)?)?;
    dashboard.refresh(RefreshTrigger::Manual, chrono::Utc::now())?;

    if ipc_mode {
        return run_ipc_loop(&mut dashboard, &mut session);
    }

    let view = dashboard.render()?;
    println!("4DX Executive Dashboard - dash-runner");
    println!("  seed:      {seed}");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!("  source:    {source_kind}");
    println!();
    print_summary(&view);

    if let Some(lag_id) = arg_str(&args, "--select") {
        print_detail(&mut dashboard, lag_id);
    }

    for _ in 0..watch {
        // tick() decides whether the refresh interval has elapsed.
        std::thread::sleep(std::time::Duration::from_secs(POLL_SECS));
        dashboard.tick(chrono::Utc::now())?;
        let view = dashboard.render()?;
        println!(
            "[{}] path={:?} health={}",
            chrono::Utc::now().format("%H:%M:%S"),
            view.path,
            view.health
                .as_ref()
                .map(|h| format!("{}% ({})", h.score, h.status.label()))
                .unwrap_or_else(|| "n/a".into())
        );
    }

    Ok(())
}

fn build_source(
    kind: &str,
    args: &[String],
    config: &DashboardConfig,
) -> Result<Box<dyn DataSource>> {
    let source: Box<dyn DataSource> = match kind {
        "mock" => Box::new(StaticDataSource::disconnected()),
        "file" => {
            let dir = arg_str(args, "--rows-dir").unwrap_or("./data/sample");
            Box::new(StaticDataSource::from_dir(dir)?)
        }
        "graph" => {
            let mut graph = GraphDataSource::new(config.sharepoint.clone())?;
            match env::var("GRAPH_ACCESS_TOKEN") {
                Ok(token) if !token.is_empty() => graph.sign_in(token),
                _ => log::warn!(
                    "GRAPH_ACCESS_TOKEN not set; SharePoint stays disconnected. \
                     Acquire a token for client {} from {} with scopes [{}]",
                    config.sharepoint.client_id,
                    config.sharepoint.authority(),
                    config.sharepoint.scopes.join(", ")
                ),
            }
            Box::new(graph)
        }
        other => anyhow::bail!("Unknown source '{other}' (expected mock, file or graph)"),
    };
    Ok(source)
}

fn period_from_args(args: &[String]) -> Result<PeriodSelection> {
    let list = |flag: &str| -> Vec<String> {
        arg_str(args, flag)
            .map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_default()
    };
    let selection = match arg_str(args, "--period").unwrap_or("monthly") {
        "monthly" => {
            let months = list("--months");
            if months.is_empty() {
                PeriodSelection::default()
            } else {
                PeriodSelection::monthly(months)?
            }
        }
        "quarterly" => PeriodSelection::quarterly(list("--quarters"))?,
        "cumulative" => PeriodSelection::cumulative(
            arg_str(args, "--start").unwrap_or("2024-01"),
            arg_str(args, "--end").unwrap_or("2024-06"),
        )?,
        other => anyhow::bail!("Unknown period '{other}' (expected monthly, quarterly or cumulative)"),
    };
    Ok(selection)
}

fn run_ipc_loop(dashboard: &mut Dashboard, session: &mut SessionContext) -> Result<()> {
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

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::SignOut => {
                session.sign_out(dashboard.store())?;
                writeln!(stdout, "{}", serde_json::json!({ "signed_out": true }))?;
                stdout.flush()?;
                break;
            }
            IpcCommand::GetView => {}
            IpcCommand::SetPeriod { selection } => dashboard.set_period(selection)?,
            IpcCommand::ToggleMonth { month } => dashboard.toggle_month(month)?,
            IpcCommand::Refresh => {
                dashboard.refresh(RefreshTrigger::Manual, chrono::Utc::now())?;
            }
            IpcCommand::Tick => {
                dashboard.tick(chrono::Utc::now())?;
            }
            IpcCommand::Select { lag_id } => {
                if dashboard.select_lag(&lag_id).is_none() {
                    log::warn!("Unknown LAG id: {lag_id}");
                }
            }
            IpcCommand::CloseDetail => dashboard.close_detail(),
            IpcCommand::Disconnect => dashboard.disconnect_source()?,
        }

        let view = dashboard.render()?;
        writeln!(stdout, "{}", serde_json::to_string(&view)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(view: &DashboardView) {
    println!("=== DASHBOARD ===");
    println!("  user:        {} ({:?})", view.user.username, view.user.role);
    println!("  period:      {}", view.period_label);
    println!(
        "  scale:       {} period(s), multiplier {:.2}",
        view.scale.period_count, view.scale.base_multiplier
    );
    println!("  data path:   {:?}", view.path);
    println!("  source:      {:?}", view.status);

    println!();
    println!("=== OVERVIEW ===");
    for (label, card) in [
        ("WIG", &view.overview.wig),
        ("LAG", &view.overview.lag),
        ("LEAD", &view.overview.lead),
        ("Activity", &view.overview.activity),
    ] {
        println!(
            "  {label:<9} {:>8.0} / {:<8.0} trend {:+.0}%",
            card.value, card.target, card.trend
        );
    }

    println!();
    println!("=== LAG MEASURES ===");
    for lag in &view.lags {
        let rate = lag
            .achievement_rate()
            .map(|r| format!("{r:.0}%"))
            .unwrap_or_else(|| "n/a".into());
        println!(
            "  [{}] {} | {}/{} ({rate}){} | trend {:+.0}% | {} lead(s)",
            lag.id,
            lag.name,
            lag.value,
            lag.target,
            if lag.is_over_target() { " over target" } else { "" },
            lag.trend,
            lag.leads.len()
        );
    }
    if !view.dropped_leads.is_empty() {
        println!("  ({} lead(s) reference no LAG)", view.dropped_leads.len());
    }

    println!();
    match &view.health {
        Some(h) => println!(
            "=== {} HEALTH: {}% ({}) ===",
            h.subject.to_uppercase(),
            h.score,
            h.status.label()
        ),
        None => println!("=== HEALTH: no LAG measures ==="),
    }

    if let Some(departments) = &view.departments {
        println!();
        println!("=== EXECUTIVE SUMMARY ===");
        for d in departments {
            match d.score {
                Some(s) => println!("  {:<12} {s}%", d.department),
                None => println!("  {:<12} n/a", d.department),
            }
        }
    }

    if !view.chart.is_empty() {
        println!();
        println!("=== TRENDS ===");
        for p in &view.chart {
            println!(
                "  {} | WIG {:.0} | LAG {:.0} | LEAD {:.0} | Activity {:.0}",
                p.label, p.wig, p.lag, p.lead, p.activity
            );
        }
    }
}

fn print_detail(dashboard: &mut Dashboard, lag_id: &str) {
    println!();
    match dashboard.select_lag(lag_id) {
        Some(lag) => {
            println!("=== LEAD MEASURES FOR: {} ===", lag.name);
            for lead in &lag.leads {
                println!(
                    "  [{}] {} | {}/{} ({:.0}%) | trend {:+.0}%",
                    lead.id,
                    lead.name,
                    lead.value,
                    lead.target,
                    lead.achievement_rate().unwrap_or(0.0),
                    lead.trend
                );
            }
        }
        None => println!("No LAG measure with id '{lag_id}'."),
    }
    dashboard.close_detail();
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn arg_str<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
