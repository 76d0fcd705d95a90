use ethers::types::Address;

use crate::config::AddressOverrides;
use crate::registry::{ContractName, DeploymentRegistry};

/// Maps (contract, chain) to the best-known deployed address.
///
/// Precedence: environment override, then the deployment table entry for the
/// requested chain, then the default chain's entry. Resolution is pure and
/// synchronous; absence is `None`, never an error, so callers must branch on
/// presence before issuing any call.
pub struct AddressResolver {
    registry: DeploymentRegistry,
    overrides: AddressOverrides,
    default_chain_id: u64,
}

impl AddressResolver {
    pub fn new(
        registry: DeploymentRegistry,
        overrides: AddressOverrides,
        default_chain_id: u64,
    ) -> Self {
        Self {
            registry,
            overrides,
            default_chain_id,
        }
    }

    pub fn resolve(&self, name: ContractName, chain_id: u64) -> Option<Address> {
        self.overrides
            .get(name)
            .or_else(|| self.registry.address_of(chain_id, name))
            .or_else(|| self.registry.address_of(self.default_chain_id, name))
    }

    pub fn default_chain_id(&self) -> u64 {
        self.default_chain_id
    }
}
