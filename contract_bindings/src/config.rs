use std::collections::HashMap;
use std::env;

use ethers::types::Address;

use crate::registry::ContractName;

const CHAIN_ID_ENV_VAR: &str = "CHAIN_ID";
const COUNTER_ADDRESS_ENV_VAR: &str = "COUNTER_ADDRESS";
const HELLO_WORLD_ADDRESS_ENV_VAR: &str = "HELLO_WORLD_ADDRESS";

pub const DEFAULT_CHAIN_ID: u64 = 31337;

const OVERRIDE_ENV_VARS: [(ContractName, &str); 2] = [
    (ContractName::Counter, COUNTER_ADDRESS_ENV_VAR),
    (ContractName::HelloWorld, HELLO_WORLD_ADDRESS_ENV_VAR),
];

/// Per-contract address overrides sourced from the environment. An override,
/// when set, wins over the deployment table on every chain.
#[derive(Debug, Clone, Default)]
pub struct AddressOverrides {
    overrides: HashMap<ContractName, Address>,
}

impl AddressOverrides {
    pub fn new(overrides: HashMap<ContractName, Address>) -> Self {
        Self { overrides }
    }

    /// Read overrides from the environment. Unset, empty and malformed
    /// values all count as "no override"; absence is valid.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut overrides = HashMap::new();
        for (name, var) in OVERRIDE_ENV_VARS {
            let Ok(value) = env::var(var) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            if let Ok(address) = value.parse::<Address>() {
                overrides.insert(name, address);
            }
        }

        Self { overrides }
    }

    pub fn set(&mut self, name: ContractName, address: Address) {
        self.overrides.insert(name, address);
    }

    pub fn get(&self, name: ContractName) -> Option<Address> {
        self.overrides.get(&name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Startup configuration for the binding layer: the fallback chain plus any
/// environment-provided address overrides.
#[derive(Debug, Clone)]
pub struct BindingsConfig {
    pub default_chain_id: u64,
    pub overrides: AddressOverrides,
}

impl BindingsConfig {
    /// load from env, else defaults
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        let default_chain_id = env::var(CHAIN_ID_ENV_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CHAIN_ID);

        Self {
            default_chain_id,
            overrides: AddressOverrides::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // env vars are process-wide; everything touching them lives in one test
    #[test]
    fn overrides_from_env() {
        env::remove_var(COUNTER_ADDRESS_ENV_VAR);
        env::set_var(
            HELLO_WORLD_ADDRESS_ENV_VAR,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        );

        let overrides = AddressOverrides::from_env();
        assert_eq!(overrides.get(ContractName::Counter), None);
        assert_eq!(
            overrides.get(ContractName::HelloWorld),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap())
        );

        // empty and malformed values count as unset
        env::set_var(HELLO_WORLD_ADDRESS_ENV_VAR, "");
        env::set_var(COUNTER_ADDRESS_ENV_VAR, "0xnope");
        let overrides = AddressOverrides::from_env();
        assert!(overrides.is_empty());

        env::remove_var(HELLO_WORLD_ADDRESS_ENV_VAR);
        env::remove_var(COUNTER_ADDRESS_ENV_VAR);
    }
}
