/// Chain id to human-readable label for the networks this tool is commonly
/// pointed at.
pub const NETWORKS: &[(u64, &str)] = &[
    (1, "Ethereum Mainnet"),
    (11_155_111, "Sepolia Testnet"),
    (10, "Optimism"),
    (137, "Polygon"),
    (42_161, "Arbitrum One"),
    (8453, "Base"),
];

pub fn network_name(networks: &[(u64, &str)], chain_id: u64) -> String {
    networks
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("Unknown (chain ID {chain_id})"))
}
