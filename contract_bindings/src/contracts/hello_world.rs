use ethers::abi::Token;
use ethers::types::Address;

use crate::client::{ChainClient, ContractCall};
use crate::read::{ReadBinding, ReadResult};
use crate::registry::ContractName;
use crate::resolver::AddressResolver;

const GREET_FUNCTION: &str = "greet";

/// Read-only binding for the HelloWorld contract.
pub struct HelloWorldContract {
    address: Option<Address>,
    greeting: ReadBinding,
}

impl HelloWorldContract {
    pub fn new(resolver: &AddressResolver, chain_id: u64) -> Self {
        let address = resolver.resolve(ContractName::HelloWorld, chain_id);
        let greeting = ReadBinding::new(address.map(|address| {
            ContractCall::new(
                ContractName::HelloWorld,
                address,
                chain_id,
                GREET_FUNCTION,
                vec![],
            )
        }));
        Self { address, greeting }
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn state(&self) -> ReadResult {
        self.greeting.snapshot()
    }

    /// The greeting text, once a read has succeeded.
    pub fn greeting(&self) -> Option<String> {
        match self.greeting.snapshot().value {
            Some(Token::String(s)) => Some(s),
            _ => None,
        }
    }

    pub async fn refresh<C: ChainClient + ?Sized>(&self, client: &C) -> ReadResult {
        self.greeting.refetch(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_utils::MockChainClient;
    use crate::config::AddressOverrides;
    use crate::registry::DeploymentRegistry;

    const HELLO_WORLD: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

    fn resolver_with_hello_world() -> AddressResolver {
        let registry = DeploymentRegistry::from_json_str(&format!(
            r#"{{ "31337": {{ "HelloWorld": "{HELLO_WORLD}" }} }}"#
        ))
        .unwrap();
        AddressResolver::new(registry, AddressOverrides::default(), 31337)
    }

    #[tokio::test]
    async fn refresh_fetches_the_greeting() {
        let client = MockChainClient::new();
        client.queue_read(Ok(Token::String("Hello, World".to_owned())));

        let hello = HelloWorldContract::new(&resolver_with_hello_world(), 31337);

        assert_eq!(hello.address(), Some(HELLO_WORLD.parse().unwrap()));
        assert_eq!(hello.greeting(), None);

        hello.refresh(&client).await;

        assert_eq!(hello.greeting(), Some("Hello, World".to_owned()));
        assert_eq!(client.last_read_call().unwrap().function, "greet");
    }

    #[tokio::test]
    async fn unresolved_address_issues_no_read() {
        let client = MockChainClient::new();
        let resolver = AddressResolver::new(
            DeploymentRegistry::default(),
            AddressOverrides::default(),
            31337,
        );

        let hello = HelloWorldContract::new(&resolver, 1);

        assert_eq!(hello.address(), None);
        hello.refresh(&client).await;

        assert_eq!(client.read_count(), 0);
        assert_eq!(hello.greeting(), None);
    }
}
