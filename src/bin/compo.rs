use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "compo", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an expression and print its serialized tree.
    Parse(ParseArgs),
    /// Evaluate expressions against the built-in library and print JSON results.
    Eval(EvalArgs),
    /// Read a serialized tree and print it back as expression text.
    Decode(DecodeArgs),
}

#[derive(clap::Args, Debug)]
struct ParseArgs {
    /// Expression text, e.g. `@add(1, 2)`.
    expr: String,

    /// Print single-line JSON.
    #[arg(long)]
    compact: bool,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct EvalArgs {
    /// One or more expressions.
    #[arg(required = true)]
    exprs: Vec<String>,

    /// JSON document exposed to expressions as `data()`.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluate the expressions in parallel.
    #[arg(long)]
    parallel: bool,
}

#[derive(clap::Args, Debug)]
struct DecodeArgs {
    /// Serialized tree JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Parse(args) => cmd_parse(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Decode(args) => cmd_decode(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<compo::EngineConfig> {
    let Some(path) = path else {
        return Ok(compo::EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    compo::EngineConfig::from_json_str(&text)
        .with_context(|| format!("load config '{}'", path.display()))
}

fn read_data(path: &Path) -> anyhow::Result<compo::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read data '{}'", path.display()))?;
    let json: serde_json::Value =
        serde_json::from_str(&text).with_context(|| "parse data JSON")?;
    Ok(compo::Value::from_json(json)?)
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if args.compact {
        config.serializer.pretty = false;
    }
    let engine = compo::Engine::with_config(compo::Registry::new(), config);
    let node = engine.parse(&args.expr)?;
    println!("{}", engine.encode(&node)?);
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if args.parallel {
        config.eval.parallel = true;
    }

    let mut registry = compo::Registry::with_std();
    if let Some(path) = &args.data {
        let data = read_data(path)?;
        registry.register("data", move || data.clone());
    }
    let engine = compo::Engine::with_config(registry, config);

    let results = engine.eval_batch(args.exprs.as_slice())?;
    let mut failed = 0usize;
    for (expr, result) in args.exprs.iter().zip(results) {
        match result {
            Ok(value) => println!("{}", value.to_json()),
            Err(err) => {
                failed += 1;
                eprintln!("{expr}: {err}");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} expression(s) failed", args.exprs.len());
    }
    Ok(())
}

fn cmd_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read tree '{}'", args.in_path.display()))?;
    let node = compo::AstSerializer::new()
        .deserialize(&text)
        .with_context(|| format!("decode tree '{}'", args.in_path.display()))?;
    println!("{}", node.to_expression());
    Ok(())
}
