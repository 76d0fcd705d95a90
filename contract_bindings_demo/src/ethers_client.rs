use std::{env, sync::Arc};

use anyhow::{anyhow, Context};
use dotenv::dotenv;
use ethers::{
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{coins_bip39::English, MnemonicBuilder, Signer, Wallet},
};

use crate::config::DemoConfig;

pub type EtherSigner = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

/// Build a signing client for the demo wallet at the given account index.
/// The seed phrase comes from the `MNEMONIC` environment variable.
pub fn get_writer_ethers_client(id: u32, config: &DemoConfig) -> anyhow::Result<Arc<EtherSigner>> {
    dotenv().ok();

    let seed = env::var("MNEMONIC")
        .map_err(|_| anyhow!("MNEMONIC is not set; export the wallet seed phrase"))?;

    let wallet = MnemonicBuilder::<English>::default()
        .phrase(&*seed)
        .index(id)?
        .build()
        .context("deriving wallet from MNEMONIC")?
        .with_chain_id(config.chain_id);

    let provider = Provider::<Http>::try_from(&config.rpc_url)
        .with_context(|| format!("invalid RPC url: {}", config.rpc_url))?;

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}
