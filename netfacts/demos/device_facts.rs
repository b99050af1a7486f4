//! Collect every fact a driver offers from one device.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example device_facts -- --host 192.168.88.1 --user admin --password secret --platform routeros
//! cargo run --example device_facts -- --host 10.0.0.1 --user admin --key ~/.ssh/id_ed25519 --platform ios
//! ```
//!
//! Exits with status 2 when the device is unreachable and 3 when the
//! credentials are rejected.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use netfacts::{DriverBuilder, NetworkDriver, Platform};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_connection_failure() => {
            eprintln!("Connection failed: {e}");
            ExitCode::from(2)
        }
        Err(e) if e.is_authentication_failure() => {
            eprintln!("Authentication failed: {e}");
            ExitCode::from(3)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), netfacts::Error> {
    let platform: Platform = args.platform.parse()?;

    let mut builder = DriverBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .platform(platform)
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    }

    let mut driver = builder.build()?;

    println!("Connecting to {}:{} ({platform})...", args.host, args.port);
    driver.connect().await?;

    section("Interfaces");
    for interface in driver.interfaces().await? {
        println!("{interface}");
    }

    section("ARP table");
    for entry in driver.arp_table().await? {
        println!("{:<16} {}", entry.ip_address, entry.mac_address);
    }

    section("MAC address table");
    for entry in driver.mac_address_table().await? {
        println!("{} {:<10} {}", entry.mac_address, entry.entry_type, entry.port);
    }

    section("VLANs");
    for vlan in driver.vlans().await? {
        println!("{:<5} {:<24} {}", vlan.id, vlan.name, vlan.status);
    }

    section("Neighbors");
    for neighbor in driver.neighbors().await? {
        let address = neighbor
            .ip_address
            .map_or_else(|| "-".to_string(), |ip| ip.to_string());
        println!(
            "{:<12} -> {} {} ({})",
            neighbor.local_interface, neighbor.name, neighbor.neighbor_interface, address
        );
    }

    section("LACP groups");
    for group in driver.lacp_groups().await? {
        println!(
            "{} {} {} [{}]",
            group.name,
            group.mode,
            group.state,
            group.members.join(", ")
        );
    }

    if let Some(target) = &args.ping {
        section("Ping");
        let reachable = driver.ping(target).await?;
        println!("{target}: {}", if reachable { "reachable" } else { "unreachable" });
    }

    driver.close().await?;
    Ok(())
}

fn section(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(50));
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    platform: String,
    ping: Option<String>,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut platform = "ios".to_string();
        let mut ping = None;
        let mut timeout = 30u64;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--platform" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        platform = args[i].clone();
                    }
                }
                "--ping" => {
                    i += 1;
                    if i < args.len() {
                        ping = Some(args[i].clone());
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            platform,
            ping,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"netfacts device_facts example

USAGE:
    cargo run --example device_facts -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>          Target host [default: localhost]
    -p, --port <PORT>          SSH port [default: 22]
    -u, --user <USER>          Username [default: $USER]
    -P, --password <PASS>      Password for authentication
    -k, --key <PATH>           Path to SSH private key
    -o, --platform <NAME>      ios | routeros [default: ios]
        --ping <TARGET>        Also ping TARGET from the device
    -t, --timeout <SECS>       Connection and command timeout [default: 30]
    --help                     Print this help message
"#
        );
    }
}
