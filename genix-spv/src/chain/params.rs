//! Per-network chain profiles.
//!
//! Every supported network has exactly one [`ChainProfile`]. A profile is built in one piece
//! from compiled-in data and its checkpoint table is checked before [`profile_for`] hands it
//! out, so callers never see a half-built or invalid profile. Select it once per session and
//! share it by reference or `Arc`.

use bitcoin_hashes::Hash as _;
use genix_network::{Network, UnknownNetwork};
use hex_lit::hex;

use crate::chain::checkpoints::{CheckPoint, check_checkpoint_table};
use crate::error::{ConfigError, ConfigResult};
use crate::storage::AncestorStore;
use crate::types::{BlockHash, HeaderRef};
use crate::validation::{DifficultyAnchorResolver, TargetVerifier};

/// Base units in one coin.
pub const COIN: u64 = 100_000_000;

/// How a network checks the encoded difficulty of new headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifficultyPolicy {
    /// Locate the previous transition boundary and delegate to the target primitive.
    StandardPow,
    /// Accept every header. Only for non-production networks.
    AlwaysAccept,
}

/// Addresses whose outputs are provably unspendable, used to pay asset fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnAddresses {
    pub issue_asset: &'static str,
    pub reissue_asset: &'static str,
    pub issue_sub_asset: &'static str,
    pub issue_unique_asset: &'static str,
    pub global: &'static str,
}

/// Fee, in base units, that must be sent to the matching burn address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnAmounts {
    pub issue_asset: u64,
    pub reissue_asset: u64,
    pub issue_sub_asset: u64,
    pub issue_unique_asset: u64,
}

/// Identity, discovery data, checkpoints and difficulty policy of one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainProfile {
    pub network: Network,
    /// DNS seeds, queried in order. Empty or local-only for isolated networks.
    pub dns_seeds: &'static [&'static str],
    pub standard_port: u16,
    /// Wire magic number prefixing every P2P message.
    pub magic: u32,
    /// Service flags advertised in the version handshake.
    pub services: u64,
    pub difficulty_policy: DifficultyPolicy,
    /// Sorted by height, lowest first.
    pub checkpoints: Vec<CheckPoint>,
    pub burn_addresses: BurnAddresses,
    pub burn_amounts: BurnAmounts,
}

const MAGIC: u32 = 0x493b4ecf;

const MAINNET_DNS_SEEDS: &[&str] =
    &["australiacash.org.", "seed1.genix.cx.", "seed2.genix.cx.", "seed3.genix.cx."];

const TESTNET_DNS_SEEDS: &[&str] =
    &["tn.seed1.genix.cx.", "tn.seed2.genix.cx.", "tn.seed3.genix.cx.", "australiacash.org."];

const REGTEST_DNS_SEEDS: &[&str] = &["127.0.0.1"];

const MAINNET_BURN_ADDRESSES: BurnAddresses = BurnAddresses {
    issue_asset: "RXissueAssetXXXXXXXXXXXXXXXXXhhZGt",
    reissue_asset: "RXReissueAssetXXXXXXXXXXXXXXVEFAWu",
    issue_sub_asset: "RXissueSubAssetXXXXXXXXXXXXXWcwhwL",
    issue_unique_asset: "RXissueUniqueAssetXXXXXXXXXXWEAe58",
    global: "RXBurnXXXXXXXXXXXXXXXXXXXXXXWUo9FV",
};

const TESTNET_BURN_ADDRESSES: BurnAddresses = BurnAddresses {
    issue_asset: "n1issueAssetXXXXXXXXXXXXXXXXWdnemQ",
    reissue_asset: "n1ReissueAssetXXXXXXXXXXXXXXWG9NLd",
    issue_sub_asset: "n1issueSubAssetXXXXXXXXXXXXXbNiH6v",
    issue_unique_asset: "n1issueUniqueAssetXXXXXXXXXXS4695i",
    global: "n1BurnXXXXXXXXXXXXXXXXXXXXXXU1qejP",
};

// Same on every network
const ASSET_BURN_AMOUNTS: BurnAmounts = BurnAmounts {
    issue_asset: 500 * COIN,
    reissue_asset: 100 * COIN,
    issue_sub_asset: 100 * COIN,
    issue_unique_asset: 5 * COIN,
};

// Checkpoints double as partial-sync start points. Any checkpoint followed by a newer one
// must sit on a transition boundary. Hashes are written in internal byte order.

fn mainnet_checkpoints() -> Vec<CheckPoint> {
    vec![
        // 000000000029aec185b7462e1661e726bef920b41f1b728a1879c5d7527aae6d
        CheckPoint::new(
            58382,
            BlockHash::from_byte_array(hex!(
                "6dae7a52d7c579188a721b1fb420f9be26e761162e46b785c1ae290000000000"
            )),
            1561717114,
            0x1c065b71,
        ),
    ]
}

fn testnet_checkpoints() -> Vec<CheckPoint> {
    vec![
        // 000006874678aa53f78b7676ced0f443cd22ae8917199b5ec14d0b7b7df7b93d
        CheckPoint::new(
            0,
            BlockHash::from_byte_array(hex!(
                "3db9f77d7b0b4dc15e9b191789ae22cd43f4d0ce76768bf753aa784687060000"
            )),
            1549043100,
            0x1e0ffff0,
        ),
    ]
}

impl ChainProfile {
    pub fn mainnet() -> Self {
        Self {
            network: Network::Mainnet,
            dns_seeds: MAINNET_DNS_SEEDS,
            standard_port: 43649,
            magic: MAGIC,
            services: 0,
            difficulty_policy: DifficultyPolicy::StandardPow,
            checkpoints: mainnet_checkpoints(),
            burn_addresses: MAINNET_BURN_ADDRESSES,
            burn_amounts: ASSET_BURN_AMOUNTS,
        }
    }

    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            dns_seeds: TESTNET_DNS_SEEDS,
            standard_port: 32538,
            magic: MAGIC,
            services: 0,
            difficulty_policy: DifficultyPolicy::AlwaysAccept,
            checkpoints: testnet_checkpoints(),
            burn_addresses: TESTNET_BURN_ADDRESSES,
            burn_amounts: ASSET_BURN_AMOUNTS,
        }
    }

    /// Local regression network. No anchors are known for it.
    pub fn regtest() -> Self {
        Self {
            network: Network::Regtest,
            dns_seeds: REGTEST_DNS_SEEDS,
            standard_port: 32538,
            magic: MAGIC,
            services: 0,
            difficulty_policy: DifficultyPolicy::AlwaysAccept,
            checkpoints: Vec::new(),
            // regtest shares the testnet address prefixes
            burn_addresses: TESTNET_BURN_ADDRESSES,
            burn_amounts: ASSET_BURN_AMOUNTS,
        }
    }

    /// Checks the checkpoint table, reporting which network it belongs to.
    pub fn validate(&self) -> ConfigResult<()> {
        check_checkpoint_table(&self.checkpoints).map_err(|source| {
            ConfigError::InvalidCheckpoints {
                network: self.network,
                source,
            }
        })
    }

    /// Each DNS seed paired with the standard port.
    pub fn seed_endpoints(&self) -> impl Iterator<Item = (&'static str, u16)> + '_ {
        self.dns_seeds.iter().map(move |seed| (*seed, self.standard_port))
    }

    /// Newest checkpoint, if the network has any.
    pub fn last_checkpoint(&self) -> Option<&CheckPoint> {
        self.checkpoints.last()
    }

    pub fn difficulty_resolver(&self) -> DifficultyAnchorResolver {
        DifficultyAnchorResolver::new(self.difficulty_policy)
    }

    /// Shorthand for [`DifficultyAnchorResolver::verify`] under this profile's policy.
    pub fn verify_difficulty<S, V>(&self, header: &HeaderRef, ancestors: &S, verifier: &V) -> bool
    where
        S: AncestorStore + ?Sized,
        V: TargetVerifier + ?Sized,
    {
        self.difficulty_resolver().verify(header, ancestors, verifier)
    }
}

/// Look up the profile of a network.
///
/// Every call builds an identical, fully checked profile.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownNetwork`] for networks without a profile and
/// [`ConfigError::InvalidCheckpoints`] if the checkpoint table is malformed.
pub fn profile_for(network: Network) -> ConfigResult<ChainProfile> {
    let profile = match network {
        Network::Mainnet => ChainProfile::mainnet(),
        Network::Testnet => ChainProfile::testnet(),
        Network::Regtest => ChainProfile::regtest(),
        other => return Err(UnknownNetwork(other.to_string()).into()),
    };
    profile.validate()?;
    tracing::info!(
        "Selected {} chain profile with {} checkpoints",
        profile.network,
        profile.checkpoints.len()
    );
    Ok(profile)
}

/// Look up a profile by network name, e.g. from a CLI flag or config file.
pub fn profile_for_name(name: &str) -> ConfigResult<ChainProfile> {
    profile_for(name.parse::<Network>()?)
}
