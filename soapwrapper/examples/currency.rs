//! Conversion de devises via un service SOAP public
//!
//! Usage: cargo run --example currency -- USD EUR 1000
//!
//! Les logs suivent `host.logger` de la configuration (`RUST_LOG` reste
//! prioritaire) et les services déclarés sous `services:` sont chargés.

use soapconfig::Config;
use soapwrapper::{SoapValue, Wrapper};
use tracing_subscriber::{EnvFilter, prelude::*};

const CURRENCY_WSDL: &str = "http://currencyconverter.kowabunga.net/converter.asmx?WSDL";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_config("")?;
    init_logging(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (from, to, amount) = match args.as_slice() {
        [from, to, amount] => (from.as_str(), to.as_str(), amount.as_str()),
        _ => ("USD", "EUR", "1000"),
    };

    let mut wrapper = Wrapper::from_config(&config)?;
    if !wrapper.contains("Currency") {
        wrapper.add(|service| {
            service.name("Currency").wsdl(CURRENCY_WSDL).trace(true);
        })?;
    }

    wrapper.get("Currency", |service| {
        println!("Operations: {:?}", service.functions());
    })?;

    let result = wrapper.call(
        "Currency.GetConversionAmount",
        SoapValue::map([
            ("CurrencyFrom", from),
            ("CurrencyTo", to),
            ("RateDate", "2014-06-05"),
            ("Amount", amount),
        ]),
    )?;

    match result.scalar_text() {
        Some(value) => println!("{} {} = {} {}", amount, from, value, to),
        None => println!("Unexpected response: {:?}", result),
    }

    if let Some(service) = wrapper.service("Currency") {
        if let Some(request) = service.last_request() {
            println!("--- request ---\n{}", request);
        }
    }

    Ok(())
}

/// Filtre depuis `host.logger.min_level`, console selon `enable_console`
fn init_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.get_log_level_filter()?.into())
        .from_env_lossy();
    let console = config
        .get_log_enable_console()?
        .then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .init();
    Ok(())
}
