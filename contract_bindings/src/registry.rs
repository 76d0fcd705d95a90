use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use ethers::types::Address;

/// The closed set of contracts this application knows about. Fixed at build
/// time; deployment records referring to anything else are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractName {
    Counter,
    HelloWorld,
}

impl ContractName {
    pub const ALL: [ContractName; 2] = [ContractName::Counter, ContractName::HelloWorld];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractName::Counter => "Counter",
            ContractName::HelloWorld => "HelloWorld",
        }
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Counter" => Ok(ContractName::Counter),
            "HelloWorld" => Ok(ContractName::HelloWorld),
            other => Err(format!("unknown contract name: {other}")),
        }
    }
}

/// Deployed addresses per chain, as written by the deployment pipeline's
/// sync step. Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DeploymentRegistry {
    deployments: HashMap<u64, HashMap<ContractName, Address>>,
}

impl DeploymentRegistry {
    pub fn new(deployments: HashMap<u64, HashMap<ContractName, Address>>) -> Self {
        Self { deployments }
    }

    /// Parse the pipeline's deployment table:
    /// `{ "<chainId>": { "<ContractName>": "0x..." } }`.
    ///
    /// Entries for contracts outside the known set are skipped, as are
    /// chain keys that are not numeric. A malformed address is an error.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let raw: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)?;

        let mut deployments = HashMap::new();
        for (chain_key, contracts) in raw {
            let Ok(chain_id) = chain_key.parse::<u64>() else {
                continue;
            };

            let mut per_chain = HashMap::new();
            for (name, address) in contracts {
                let Ok(name) = name.parse::<ContractName>() else {
                    continue;
                };
                let address = address
                    .parse::<Address>()
                    .map_err(|e| anyhow!("bad address for {name} on chain {chain_id}: {e}"))?;
                per_chain.insert(name, address);
            }

            if !per_chain.is_empty() {
                deployments.insert(chain_id, per_chain);
            }
        }

        Ok(Self { deployments })
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn address_of(&self, chain_id: u64, name: ContractName) -> Option<Address> {
        self.deployments.get(&chain_id)?.get(&name).copied()
    }

    pub fn supported_chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self.deployments.keys().copied().collect();
        chains.sort_unstable();
        chains
    }
}
