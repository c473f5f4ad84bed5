use crate::util::scripts::Network;
use anyhow::{anyhow, bail, Result};
use ckb_sdk::{Address, AddressPayload, HumanCapacity};
use ckb_types::packed::Script;
use std::str::FromStr;

pub fn parse_address(address: &str) -> Result<Address> {
    Address::from_str(address).map_err(|e| anyhow!("failed to covert address {}: {}", address, e))
}

/// The lock script of `address`, which must belong to `network`.
pub fn build_lockscript_from_address(address: &str, network: Network) -> Result<Script> {
    let address = parse_address(address)?;
    if address.network() != network.address_network() {
        bail!(
            "address {} is not a {:?} address",
            address,
            network.address_network()
        );
    }
    Ok(address.payload().into())
}

pub fn encode_address(lockscript: Script, network: Network) -> String {
    Address::new(
        network.address_network(),
        AddressPayload::from(lockscript),
        true,
    )
    .to_string()
}

pub fn parse_capacity(capacity: &str) -> Result<u64> {
    Ok(HumanCapacity::from_str(capacity)
        .map_err(|e| anyhow!("invalid capacity {}: {}", capacity, e))?
        .0)
}

pub fn format_capacity(capacity: u64) -> String {
    HumanCapacity(capacity).to_string()
}

/// Parses a decimal token amount like `12.5` into base units.
pub fn parse_token_amount(amount: &str, decimals: u32) -> Result<u128> {
    let amount = amount.trim();
    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, ""),
    };
    if integer.is_empty() && fraction.is_empty() {
        bail!("invalid token amount: {:?}", amount);
    }
    if !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        bail!("invalid token amount: {}", amount);
    }
    if fraction.len() > decimals as usize {
        bail!(
            "token amount {} has more than {} decimal places",
            amount,
            decimals
        );
    }
    let integer: u128 = if integer.is_empty() {
        0
    } else {
        integer.parse()?
    };
    let fraction_units: u128 = if fraction.is_empty() {
        0
    } else {
        fraction.parse::<u128>()? * 10u128.pow(decimals - fraction.len() as u32)
    };
    integer
        .checked_mul(10u128.pow(decimals))
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or_else(|| anyhow!("token amount {} overflows", amount))
}

pub fn format_token_amount(amount: u128, decimals: u32) -> String {
    let unit = 10u128.pow(decimals);
    let fraction = format!("{:0width$}", amount % unit, width = decimals as usize);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}", amount / unit)
    } else {
        format!("{}.{}", amount / unit, fraction)
    }
}
