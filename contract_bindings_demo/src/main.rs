mod config;
mod ethers_client;

use std::collections::HashMap;

use anyhow::Context;
use contract_bindings::{
    config::BindingsConfig,
    contracts::{counter::CounterContract, hello_world::HelloWorldContract},
    ethers_client::{load_abi_from_artifact, EthersChainClient},
    registry::{ContractName, DeploymentRegistry},
    resolver::AddressResolver,
};

use crate::config::DemoConfig;
use crate::ethers_client::get_writer_ethers_client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DemoConfig::load();
    let bindings_config = BindingsConfig::load();

    let registry = DeploymentRegistry::from_file(&config.deployments_path)
        .with_context(|| format!("loading {}", config.deployments_path))?;
    println!("Known chains: {:?}", registry.supported_chains());

    let mut abis = HashMap::new();
    for name in ContractName::ALL {
        let path = format!("{}/{}.json", config.abi_dir, name);
        abis.insert(
            name,
            load_abi_from_artifact(&path).with_context(|| format!("loading {path}"))?,
        );
    }

    let resolver = AddressResolver::new(
        registry,
        bindings_config.overrides,
        bindings_config.default_chain_id,
    );

    println!(
        "Active chain: {} (fallback chain: {})",
        config.chain_id,
        resolver.default_chain_id()
    );

    let signer = get_writer_ethers_client(0, &config)?;
    let client = EthersChainClient::new(signer, abis);

    let counter = CounterContract::new(&resolver, config.chain_id);
    let hello = HelloWorldContract::new(&resolver, config.chain_id);

    match counter.address() {
        Some(address) => println!("Counter deployed at {address:?}"),
        None => println!("Counter: missing address"),
    }
    match hello.address() {
        Some(address) => println!("HelloWorld deployed at {address:?}"),
        None => println!("HelloWorld: missing address"),
    }

    let greeting = hello.refresh(&client).await;
    match (hello.greeting(), greeting.error) {
        (Some(g), _) => println!("HelloWorld.greet() = {g}"),
        (None, Some(e)) => println!("HelloWorld read failed: {e}"),
        (None, None) => println!("HelloWorld: no greeting available"),
    }

    counter.refresh(&client).await;
    println!(
        "Counter.x = {}",
        counter.current_value().unwrap_or_default()
    );

    println!("Submitting inc()...");
    let tx_hash = counter.increment(&client).await?;
    println!("Submitted: {tx_hash:?}");

    match counter.wait_for_confirmation(&client).await? {
        Some(confirmation) => println!("Confirmed in block {}", confirmation.block_number),
        None => println!("No pending transaction to confirm"),
    }
    println!(
        "Counter.x = {}",
        counter.current_value().unwrap_or_default()
    );

    println!("Submitting incBy(5)...");
    let tx_hash = counter.increment_by(&client, 5).await?;
    println!("Submitted: {tx_hash:?}");

    if let Some(confirmation) = counter.wait_for_confirmation(&client).await? {
        println!("Confirmed in block {}", confirmation.block_number);
    }
    println!(
        "Counter.x = {}",
        counter.current_value().unwrap_or_default()
    );

    // a non-positive amount is rejected before it reaches the chain
    if let Err(e) = counter.increment_by(&client, 0).await {
        println!("incBy(0) rejected locally: {e}");
    }

    Ok(())
}
