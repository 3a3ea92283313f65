// SPDX-License-Identifier: CC0-1.0

//! Network-identifying constants.
//!
//! Identifies which network a set of consensus parameters belongs to: the
//! multi-algorithm chain's main/testnet/regtest message-start bytes, default
//! ports and Base58 address prefixes.

use core::fmt;

/// The cryptocurrency network to act on.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Network {
    /// Mainnet, the "real" blockchain.
    Main,
    /// Testnet, a separate chain used for testing.
    Test,
    /// Regtest, a local chain for integration tests with configurable
    /// consensus rules.
    Regtest,
}

impl Network {
    /// The 4-byte message-start magic used to tag P2P messages for this
    /// network. Framing/dispatch of the messages themselves is out of
    /// scope for this core; only the byte value is exposed.
    pub fn magic(self) -> [u8; 4] {
        match self {
            Network::Main => [0xaf, 0x45, 0x76, 0xee],
            Network::Test => [0x01, 0xf5, 0x55, 0xa4],
            Network::Regtest => [0xfa, 0xbf, 0xb5, 0xda],
        }
    }

    /// The default P2P listening port.
    pub fn default_port(self) -> u16 {
        match self {
            Network::Main => 10888,
            Network::Test => 20888,
            Network::Regtest => 18444,
        }
    }

    /// Base58 version byte for P2PKH addresses.
    pub fn pubkey_address_prefix(self) -> u8 {
        match self {
            Network::Main => 50,
            Network::Test => 88,
            Network::Regtest => 111,
        }
    }

    /// Base58 version byte for P2SH addresses.
    pub fn script_address_prefix(self) -> u8 {
        match self {
            Network::Main => 9,
            Network::Test => 188,
            Network::Regtest => 196,
        }
    }

    /// Base58 version byte for WIF private keys.
    pub fn secret_key_prefix(self) -> u8 {
        match self {
            Network::Main => 178,
            Network::Test | Network::Regtest => 239,
        }
    }

    /// BIP32 extended public key version bytes.
    pub fn ext_public_key_prefix(self) -> [u8; 4] {
        match self {
            Network::Main => [0x04, 0x88, 0xB2, 0x1E],
            Network::Test | Network::Regtest => [0x04, 0x35, 0x87, 0xCF],
        }
    }

    /// BIP32 extended private key version bytes.
    pub fn ext_secret_key_prefix(self) -> [u8; 4] {
        match self {
            Network::Main => [0x04, 0x88, 0xAD, 0xE4],
            Network::Test | Network::Regtest => [0x04, 0x35, 0x83, 0x94],
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        };
        f.write_str(s)
    }
}

/// Error returned when a string does not name a known network.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ParseNetworkError(());

impl fmt::Display for ParseNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown network (expected one of: main, test, regtest)")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseNetworkError {}

impl core::str::FromStr for Network {
    type Err = ParseNetworkError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            _ => Err(ParseNetworkError(())),
        }
    }
}
