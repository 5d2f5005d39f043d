//! Command-line interface printing the chain profile of a Genix network.

use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgMatches, Command};

use genix_spv::chain::COIN;
use genix_spv::{ChainProfile, Config, LevelFilter, Network};

fn main() {
    let matches = Command::new("genix-spv")
        .version(genix_spv::VERSION)
        .about("Genix SPV chain profiles and difficulty anchors")
        .arg(
            Arg::new("network")
                .short('n')
                .long("network")
                .value_name("NETWORK")
                .help("Network to inspect")
                .value_parser(["mainnet", "testnet", "regtest"])
                .default_value("mainnet"),
        )
        .arg(
            Arg::new("start-height")
                .short('s')
                .long("start-height")
                .value_name("HEIGHT")
                .help("Height partial sync should start from")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .help("Also write logs to this directory"),
        )
        .get_matches();

    let config = match config_from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let _logging_guard = match genix_spv::init_logging(config.logging_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn config_from_matches(matches: &ArgMatches) -> genix_spv::ConfigResult<Config> {
    let network_name = matches.get_one::<String>("network").map(String::as_str).unwrap_or("mainnet");
    let network: Network = network_name.parse()?;

    let level_name = matches.get_one::<String>("log-level").map(String::as_str).unwrap_or("info");
    let level: LevelFilter = level_name
        .parse()
        .map_err(|_| genix_spv::ConfigError::Invalid(format!("invalid log level {level_name}")))?;

    let mut config = Config::new(network).with_log_level(level);
    if let Some(height) = matches.get_one::<u32>("start-height") {
        config = config.with_start_height(*height);
    }
    if let Some(dir) = matches.get_one::<String>("log-dir") {
        config = config.with_log_dir(PathBuf::from(dir));
    }

    config.validate()?;
    Ok(config)
}

fn run(config: &Config) -> genix_spv::error::Result<()> {
    let profile = config.profile()?;
    print_profile(&profile);

    match config.sync_start()? {
        Some(checkpoint) => println!(
            "Partial sync anchor: height {} ({}), time {}",
            checkpoint.height, checkpoint.hash, checkpoint.timestamp
        ),
        None => println!("Partial sync anchor: none, sync from genesis"),
    }

    Ok(())
}

fn print_profile(profile: &ChainProfile) {
    println!("Network:            {}", profile.network);
    println!("Magic:              {:#010x}", profile.magic);
    println!("Standard port:      {}", profile.standard_port);
    println!("Services:           {:#x}", profile.services);
    println!("Difficulty policy:  {:?}", profile.difficulty_policy);

    println!("DNS seeds:");
    for (seed, port) in profile.seed_endpoints() {
        println!("  {}:{}", seed, port);
    }

    println!("Checkpoints:");
    if profile.checkpoints.is_empty() {
        println!("  (none)");
    }
    for checkpoint in &profile.checkpoints {
        println!(
            "  {:>8}  {}  time {}  bits {:#010x}",
            checkpoint.height, checkpoint.hash, checkpoint.timestamp, checkpoint.target
        );
    }

    let burn = &profile.burn_addresses;
    println!("Burn addresses:");
    println!("  issue asset:        {}", burn.issue_asset);
    println!("  reissue asset:      {}", burn.reissue_asset);
    println!("  issue sub-asset:    {}", burn.issue_sub_asset);
    println!("  issue unique asset: {}", burn.issue_unique_asset);
    println!("  global:             {}", burn.global);

    let amounts = &profile.burn_amounts;
    println!("Burn amounts:");
    println!("  issue asset:        {}", format_coins(amounts.issue_asset));
    println!("  reissue asset:      {}", format_coins(amounts.reissue_asset));
    println!("  issue sub-asset:    {}", format_coins(amounts.issue_sub_asset));
    println!("  issue unique asset: {}", format_coins(amounts.issue_unique_asset));
}

fn format_coins(amount: u64) -> String {
    format!("{}.{:08}", amount / COIN, amount % COIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coins() {
        assert_eq!(format_coins(500 * COIN), "500.00000000");
        assert_eq!(format_coins(5 * COIN + 1), "5.00000001");
        assert_eq!(format_coins(0), "0.00000000");
    }
}
