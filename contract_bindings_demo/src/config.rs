use std::error::Error;

const RPC_URL_ENV_VAR: &str = "RPC_URL";
const CHAIN_ID_ENV_VAR: &str = "CHAIN_ID";
const DEPLOYMENTS_PATH_ENV_VAR: &str = "DEPLOYMENTS_PATH";
const ABI_DIR_ENV_VAR: &str = "ABI_DIR";

const DEFAULT_RPC_URL: &str = "http://localhost:8545";
const DEFAULT_CHAIN_ID: u64 = 31337;
const DEFAULT_DEPLOYMENTS_PATH: &str = "./artifacts/deployments.json";
const DEFAULT_ABI_DIR: &str = "./artifacts/abis";

pub struct DemoConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub deployments_path: String,
    pub abi_dir: String,
}

impl DemoConfig {
    /// load from env, else local
    pub fn load() -> Self {
        match Self::try_from_env() {
            Ok(c) => {
                println!("Loaded config from env");
                c
            }
            Err(e) => {
                println!("Failed to load config from env: {}", e);
                println!("Loading local config");
                Self::local()
            }
        }
    }

    fn local() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            deployments_path: DEFAULT_DEPLOYMENTS_PATH.to_string(),
            abi_dir: DEFAULT_ABI_DIR.to_string(),
        }
    }

    fn try_from_env() -> Result<Self, Box<dyn Error>> {
        dotenv::dotenv().ok();

        let rpc_url = std::env::var(RPC_URL_ENV_VAR)?;
        let chain_id = std::env::var(CHAIN_ID_ENV_VAR)?.parse()?;
        let deployments_path = std::env::var(DEPLOYMENTS_PATH_ENV_VAR)?;
        let abi_dir = std::env::var(ABI_DIR_ENV_VAR)?;

        Ok(Self {
            rpc_url,
            chain_id,
            deployments_path,
            abi_dir,
        })
    }
}
