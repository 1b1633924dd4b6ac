//! PvP leaderboard brackets

use crate::impl_code_conversions;

/// Leaderboard bracket accepted by the pvp leaderboard resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PvpBracket {
    TwoVsTwo,
    ThreeVsThree,
    FiveVsFive,
    #[default]
    Rbg,
}

impl_code_conversions!(exact PvpBracket {
    TwoVsTwo => "2v2",
    ThreeVsThree => "3v3",
    FiveVsFive => "5v5",
    Rbg => "rbg",
});

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_default_is_rated_battleground() {
        assert_eq!(PvpBracket::default(), PvpBracket::Rbg);
        assert_eq!(PvpBracket::default().as_str(), "rbg");
    }

    #[test]
    fn test_membership_is_closed() {
        assert_eq!(PvpBracket::from_str("3v3").unwrap(), PvpBracket::ThreeVsThree);
        assert!(PvpBracket::from_str("4v4").is_err());
        assert!(PvpBracket::from_str("RBG").is_err());
    }
}
