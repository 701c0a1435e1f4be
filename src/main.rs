use anyhow::{bail, Context, Result};
use chordmap::{logging, BindingEvent, BindingResolver, ConcurrencyMode, KeyCombination, ResolverConfig};
use log::LevelFilter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// 付属のリプレイツール
///
/// 標準入力の各行を押下状態（正規形のコード列）として解決し、イベントを出力する。
/// 空行は「何も押されていない」状態。
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    match &options.debug_log {
        Some(path) => logging::Logger::new(options.log_level)
            .without_stderr()
            .with_file_output(path)
            .install(),
        None => logging::init(options.log_level),
    }
    .context("failed to install logger")?;

    let mut config: ResolverConfig<String> = ResolverConfig::load_json(&options.config)
        .with_context(|| format!("failed to load {}", options.config.display()))?;
    if let Some(mode) = options.mode {
        config = config.with_mode(mode);
    }
    log::info!(
        "loaded {} bindings (mode: {})",
        config.bindings.len(),
        config.mode
    );

    let mut resolver = BindingResolver::new(config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let pressed = match KeyCombination::parse(&line) {
            Ok(pressed) => pressed,
            Err(err) => {
                log::warn!("skipping sample {:?}: {}", line, err);
                continue;
            }
        };
        for event in resolver.update(&pressed) {
            print_event(&mut out, &event)?;
        }
    }

    for event in resolver.release_all() {
        print_event(&mut out, &event)?;
    }
    Ok(())
}

fn print_event(out: &mut impl Write, event: &BindingEvent<String>) -> Result<()> {
    let sign = if event.is_activation() { '+' } else { '-' };
    writeln!(out, "{} {} (#{})", sign, event.action(), event.binding())?;
    Ok(())
}

struct Options {
    config: PathBuf,
    mode: Option<ConcurrencyMode>,
    debug_log: Option<PathBuf>,
    log_level: LevelFilter,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut config: Option<PathBuf> = None;
    let mut mode = None;
    let mut debug_log = None;
    let mut log_level = LevelFilter::Warn;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mode" => {
                let Some(value) = iter.next() else {
                    bail!("--mode requires a value (none, unique, all)");
                };
                mode = Some(value.parse::<ConcurrencyMode>()?);
            }
            "--debug-log" => {
                let Some(value) = iter.next() else {
                    bail!("--debug-log requires a path");
                };
                debug_log = Some(PathBuf::from(value));
                log_level = LevelFilter::Debug;
            }
            "-v" | "--verbose" => log_level = LevelFilter::Debug,
            other if other.starts_with('-') => bail!("unknown option: {other}"),
            other => config = Some(PathBuf::from(other)),
        }
    }

    let Some(config) = config else {
        bail!("usage: chordmap <bindings.json> [--mode none|unique|all] [--debug-log PATH] [-v]");
    };
    Ok(Options {
        config,
        mode,
        debug_log,
        log_level,
    })
}
