// Tangle Bundle Library: ternary bundle construction & hashing
// Written in 2021 by
//     Tangle Bundle contributors
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

use ternary_sponge::SpongeKind;

/// Parameters of bundle finalization.
///
/// By default finalization hashes with Kerl and retries until a secure
/// bundle hash is found, without any bound on the number of attempts.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct FinalizeConfig {
    /// Maximal number of bundle hashes to compute before giving up; `None`
    /// retries forever
    pub max_attempts: Option<u64>,

    /// Sponge used to hash bundle essences
    pub sponge: SpongeKind,
}

impl FinalizeConfig {
    /// Default configuration with a bound on the number of hash attempts
    #[inline]
    pub fn with_max_attempts(max_attempts: u64) -> FinalizeConfig {
        FinalizeConfig {
            max_attempts: Some(max_attempts),
            ..FinalizeConfig::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = FinalizeConfig::default();
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.sponge, SpongeKind::Kerl);
        assert_eq!(
            FinalizeConfig::with_max_attempts(16),
            FinalizeConfig {
                max_attempts: Some(16),
                sponge: SpongeKind::Kerl
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config() {
        let config: FinalizeConfig =
            serde_json::from_str(r#"{"sponge": "curl-p-27"}"#).unwrap();
        assert_eq!(config.sponge, SpongeKind::CurlP27);
        assert_eq!(config.max_attempts, None);

        let config: FinalizeConfig =
            serde_json::from_str(r#"{"max_attempts": 3}"#).unwrap();
        assert_eq!(config, FinalizeConfig::with_max_attempts(3));
    }
}
