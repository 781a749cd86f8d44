//! Discover command implementation.

use std::net::Ipv4Addr;
use std::time::Duration;

use lanscout_core::{discover, DiscoverOptions, ProtocolFamily};

use crate::cli::DiscoverArgs;
use crate::error::CliError;
use crate::output::{get_formatter, OutputFormatter};

/// Run one discovery round for the given family.
pub fn run_discover(
    family: ProtocolFamily,
    args: DiscoverArgs,
    json: bool,
    verbose: bool,
) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let interface = args
        .interface
        .as_deref()
        .map(parse_interface)
        .transpose()?;

    if !args.timeout.is_finite() || args.timeout <= 0.0 {
        return Err(CliError::InvalidArgument(format!(
            "timeout must be positive, got {}",
            args.timeout
        )));
    }

    let options = DiscoverOptions {
        interface,
        timeout: Duration::from_secs_f64(args.timeout),
    };

    if !json {
        println!(
            "Searching for {} services for {:.1} second(s)...",
            family, args.timeout
        );
    }

    let services = discover(family, &options)?;

    println!("{}", formatter.format_services(&services, verbose));

    if services.is_empty() {
        return Err(CliError::NoServicesFound);
    }

    Ok(())
}

fn parse_interface(value: &str) -> Result<Ipv4Addr, CliError> {
    value
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("invalid interface address: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interface_accepts_ipv4() {
        assert_eq!(
            parse_interface("192.168.1.5").unwrap(),
            Ipv4Addr::new(192, 168, 1, 5)
        );
    }

    #[test]
    fn test_parse_interface_rejects_garbage() {
        assert!(parse_interface("not-an-address").is_err());
        assert!(parse_interface("fe80::1").is_err());
    }
}
