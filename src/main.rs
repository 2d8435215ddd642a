use clap::{Parser, Subcommand};
use colored::Colorize;
use ipv6_plan::config::{Config, OutputFormat};
use ipv6_plan::models::{
    generate_link_local, generate_unique_local, mac_to_link_local, random_in_prefix, Address,
    Network,
};
use ipv6_plan::output;
use ipv6_plan::processing::{
    collapse, divide_by_prefix, divide_into_subnets, is_compressed_format, is_expanded_format,
    recommend_allocation, summarize, supernet_to_prefix, validate_address, validate_network,
};
use ipv6_plan::{parse_named_counts, parse_networks};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use serde::Serialize;
use std::error::Error;
use std::str::FromStr;

/// IPv6 address and subnet planning
#[derive(Parser)]
#[command(name = "ipv6-plan", version, about, long_about = None)]
struct Cli {
    /// Output format, overrides IPV6_PLAN_FORMAT
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Most networks to list, 0 for all; overrides IPV6_PLAN_LIST_LIMIT
    #[arg(short, long, global = true)]
    limit: Option<usize>,

    /// Mask host bits in network arguments instead of rejecting them
    #[arg(long, global = true)]
    loose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the range, size and netmask of a network
    Info { network: String },
    /// Divide a network into COUNT equal subnets
    Divide { network: String, count: usize },
    /// Split a network into every subnet of length PREFIX
    Split { network: String, prefix: u8 },
    /// Widen a network to length PREFIX
    Supernet { network: String, prefix: u8 },
    /// Check whether a network contains an address
    Contains { network: String, address: String },
    /// Check whether two networks overlap
    Overlaps { network: String, other: String },
    /// Smallest single network covering all given networks
    Summarize {
        #[arg(required = true)]
        networks: Vec<String>,
    },
    /// Merge networks into the minimal equivalent set
    Collapse {
        #[arg(required = true)]
        networks: Vec<String>,
    },
    /// Allocate blocks of a network to named consumers, e.g. Sales=2
    Allocate {
        network: String,
        #[arg(required = true)]
        requests: Vec<String>,
    },
    /// Show every form of an address and its type
    Address { address: String },
    /// Validate an address or, if it contains '/', a network
    Validate { text: String },
    /// Generate an address
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },
}

#[derive(Subcommand)]
enum GenerateKind {
    /// fe80::/64 address, random unless an interface ID is given
    LinkLocal { interface_id: Option<String> },
    /// fd00::/8 unique local address, random fields unless given
    Ula {
        #[arg(long)]
        global_id: Option<String>,
        #[arg(long)]
        subnet_id: Option<String>,
        #[arg(long)]
        interface_id: Option<String>,
    },
    /// EUI-64 link-local address from a MAC address
    Mac { mac: String },
    /// Random address inside a prefix (a bare address means its /64),
    /// 2001:db8::/64 when none is given
    Random { prefix: Option<String> },
}

#[derive(Serialize)]
struct Check<'a> {
    network: &'a str,
    candidate: &'a str,
    result: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&Config::default());
            fail(&e);
        }
    };
    init_logging(&config);
    log::info!("#Start main()");
    let config = config.with_overrides(cli.format, cli.limit);
    log::debug!("config: {config:?}");

    match run(&cli, &config) {
        Ok(text) => {
            print!("{text}");
            Ok(())
        }
        Err(e) => fail(e.as_ref()),
    }
}

fn fail(e: &dyn Error) -> ! {
    log::error!("{e}");
    eprintln!("{}", output::render_error(e));
    std::process::exit(1);
}

/// log4rs from the configured YAML file, or warnings to stderr without it.
fn init_logging(config: &Config) {
    let Err(e) = log4rs::init_file(&config.log_config, Default::default()) else {
        return;
    };
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let fallback = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(
            Root::builder()
                .appender("stderr")
                .build(log::LevelFilter::Warn),
        );
    if let Ok(fallback) = fallback {
        if log4rs::init_config(fallback).is_ok() {
            log::warn!("{} not loaded: {e}", config.log_config.display());
        }
    }
}

fn network(text: &str, cli: &Cli) -> ipv6_plan::Result<Network> {
    Network::from_text(text, !cli.loose)
}

fn run(cli: &Cli, config: &Config) -> Result<String, Box<dyn Error>> {
    let text = match &cli.command {
        Commands::Info { network: n } => {
            let info = network(n, cli)?.info();
            match config.format {
                OutputFormat::Text => output::render_subnet_info(&info),
                OutputFormat::Csv => output::subnet_rows(&[info.network], None),
                OutputFormat::Json => output::to_json(&info)? + "\n",
            }
        }
        Commands::Divide { network: n, count } => {
            let parent = network(n, cli)?;
            let subnets = divide_into_subnets(&parent, *count)?;
            networks(&format!("{parent} in {count}"), &subnets, config)?
        }
        Commands::Split { network: n, prefix } => {
            let parent = network(n, cli)?;
            let subnets = divide_by_prefix(&parent, *prefix)?;
            networks(&format!("{parent} as /{prefix}"), &subnets, config)?
        }
        Commands::Supernet { network: n, prefix } => {
            let wider = supernet_to_prefix(&network(n, cli)?, *prefix)?;
            networks("Supernet", &[wider], config)?
        }
        Commands::Contains { network: n, address } => {
            let result = network(n, cli)?.contains_text(address);
            check(n, address, result, config)?
        }
        Commands::Overlaps { network: n, other } => {
            let result = network(n, cli)?.overlaps_text(other);
            check(n, other, result, config)?
        }
        Commands::Summarize { networks: list } => {
            let parsed = parse_networks(list, !cli.loose)?;
            let cover = summarize(&parsed).ok_or("nothing to summarize")?;
            networks("Summary", &[cover], config)?
        }
        Commands::Collapse { networks: list } => {
            let collapsed = collapse(&parse_networks(list, !cli.loose)?);
            networks("Collapsed", &collapsed, config)?
        }
        Commands::Allocate {
            network: n,
            requests,
        } => {
            let plan = recommend_allocation(&network(n, cli)?, parse_named_counts(requests)?)?;
            match config.format {
                OutputFormat::Text => output::render_allocation(&plan, config.list_limit),
                OutputFormat::Csv => output::allocation_rows(&plan),
                OutputFormat::Json => output::to_json(&plan)? + "\n",
            }
        }
        Commands::Address { address } => address_report(&Address::from_str(address)?, config)?,
        Commands::Validate { text } => validate(text, config)?,
        Commands::Generate { kind } => {
            let address = match kind {
                GenerateKind::LinkLocal { interface_id } => {
                    generate_link_local(interface_id.as_deref())?
                }
                GenerateKind::Ula {
                    global_id,
                    subnet_id,
                    interface_id,
                } => generate_unique_local(
                    global_id.as_deref(),
                    subnet_id.as_deref(),
                    interface_id.as_deref(),
                )?,
                GenerateKind::Mac { mac } => mac_to_link_local(mac)?,
                GenerateKind::Random { prefix } => random_in_prefix(prefix.as_deref())?,
            };
            address_report(&address, config)?
        }
    };
    Ok(text)
}

fn networks(title: &str, list: &[Network], config: &Config) -> Result<String, Box<dyn Error>> {
    Ok(match config.format {
        OutputFormat::Text => output::render_networks(title, list, config.list_limit),
        OutputFormat::Csv => output::subnet_rows(list, config.list_limit),
        OutputFormat::Json => {
            let shown = config.list_limit.unwrap_or(list.len()).min(list.len());
            if shown < list.len() {
                log::warn!("JSON listing truncated to {shown} of {}", list.len());
            }
            output::to_json(&list[..shown])? + "\n"
        }
    })
}

fn address_report(address: &Address, config: &Config) -> Result<String, Box<dyn Error>> {
    let info = address.info();
    Ok(match config.format {
        OutputFormat::Text => output::render_address_info(&info),
        OutputFormat::Csv => output::address_row(&info),
        OutputFormat::Json => output::to_json(&info)? + "\n",
    })
}

fn check(
    network: &str,
    candidate: &str,
    result: bool,
    config: &Config,
) -> Result<String, Box<dyn Error>> {
    Ok(match config.format {
        OutputFormat::Text => format!("{result}\n"),
        OutputFormat::Csv => format!(
            "\"network\",\"candidate\",\"result\"\n{},{},{}\n",
            output::format_field(network, 0),
            output::format_field(candidate, 0),
            output::format_field(result, 0)
        ),
        OutputFormat::Json => {
            output::to_json(&Check {
                network,
                candidate,
                result,
            })? + "\n"
        }
    })
}

fn validate(text: &str, config: &Config) -> Result<String, Box<dyn Error>> {
    if text.contains('/') {
        let parsed = validate_network(text)?;
        return networks("Valid network", &[parsed], config);
    }
    let address = validate_address(text, true)?;
    if config.format != OutputFormat::Text {
        return address_report(&address, config);
    }
    let form = if is_expanded_format(text) {
        "expanded"
    } else if is_compressed_format(text) {
        "compressed"
    } else {
        "uncompressed"
    };
    Ok(format!(
        "{} {} ({form}, canonical {})\n",
        "valid".green(),
        text,
        address
    ))
}
