//! Operation catalog
//!
//! Every game-data resource the client can fetch is described by an
//! [`OperationDescriptor`]: its path template, its declared parameters (type,
//! default and where the bound value goes in the outbound request) and, for
//! operations with a detail list, the set of field names the service accepts.

use armory_domain::{impl_code_conversions, PvpBracket};

/// Identifier of a registered operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationId {
    CharInfo,
    GuildInfo,
    GameAchievementInfo,
    GameAuctionData,
    GameBossList,
    GameBossInfo,
    GameChallengeRealmLeaderboard,
    GameChallengeRegionLeaderboard,
    GameItemInfo,
    GameItemSet,
    GameMountList,
    GamePvpLeaderboards,
    GameQuestInfo,
    GameRealmStatus,
    GameRecipeInfo,
    GameSpellInfo,
    GameZoneList,
    GameZoneInfo,
    GameBattlegroupsList,
    GameRacesList,
    GameClassesList,
    GameAchievementsList,
    GameItemclassList,
    GameTalentsList,
    PetList,
    PetAbility,
    PetSpecies,
    PetStats,
    PetTypesList,
    GuildRewardsList,
    GuildPerksList,
    GuildAchievementsList,
}

impl_code_conversions!(exact OperationId {
    CharInfo => "char_info",
    GuildInfo => "guild_info",
    GameAchievementInfo => "game_achievement_info",
    GameAuctionData => "game_auction_data",
    GameBossList => "game_boss_list",
    GameBossInfo => "game_boss_info",
    GameChallengeRealmLeaderboard => "game_challenge_realm_leaderboard",
    GameChallengeRegionLeaderboard => "game_challenge_region_leaderboard",
    GameItemInfo => "game_item_info",
    GameItemSet => "game_item_set",
    GameMountList => "game_mount_list",
    GamePvpLeaderboards => "game_pvp_leaderboards",
    GameQuestInfo => "game_quest_info",
    GameRealmStatus => "game_realm_status",
    GameRecipeInfo => "game_recipe_info",
    GameSpellInfo => "game_spell_info",
    GameZoneList => "game_zone_list",
    GameZoneInfo => "game_zone_info",
    GameBattlegroupsList => "game_battlegroups_list",
    GameRacesList => "game_races_list",
    GameClassesList => "game_classes_list",
    GameAchievementsList => "game_achievements_list",
    GameItemclassList => "game_itemclass_list",
    GameTalentsList => "game_talents_list",
    PetList => "pet_list",
    PetAbility => "pet_ability",
    PetSpecies => "pet_species",
    PetStats => "pet_stats",
    PetTypesList => "pet_types_list",
    GuildRewardsList => "guild_rewards_list",
    GuildPerksList => "guild_perks_list",
    GuildAchievementsList => "guild_achievements_list",
});

/// Detail fields accepted by the character resource
pub const CHARACTER_FIELDS: &[&str] = &[
    "achievements",
    "appearance",
    "feed",
    "guild",
    "hunterPets",
    "items",
    "mounts",
    "pets",
    "petSlots",
    "professions",
    "progression",
    "pvp",
    "quests",
    "reputation",
    "statistics",
    "stats",
    "talents",
    "titles",
    "audit",
];

/// Detail fields accepted by the guild resource
pub const GUILD_FIELDS: &[&str] = &["members", "achievements", "news", "challenge"];

/// Declared type of an operation parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer identifier or count; never coerced from other JSON types.
    Integer,
    Text,
    TextList,
    Bracket,
}

impl ParamKind {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::Text => "a string",
            Self::TextList => "a list of strings",
            Self::Bracket => "a pvp bracket",
        }
    }
}

/// A validated parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Integer(i64),
    Text(String),
    TextList(Vec<String>),
    Bracket(PvpBracket),
}

impl ArgValue {
    /// Render a scalar value as a path segment or query value.
    ///
    /// Lists are comma-joined.
    pub fn render(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::TextList(items) => items.join(","),
            Self::Bracket(bracket) => bracket.as_str().to_string(),
        }
    }

    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::TextList(items) => Some(items),
            _ => None,
        }
    }
}

/// Where a bound parameter goes in the outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Substituted for `{name}` in the path template.
    Path,
    /// Sent as a query parameter under the given key.
    Query(&'static str),
    /// Filtered against the operation's allowed fields, sent as `fields`.
    Fields,
    /// Comma-joined under the given key; omitted when empty.
    JoinedQuery(&'static str),
    /// Consumed locally as the auction snapshot watermark.
    Watermark,
}

/// Declaration of one operation parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// `None` means the parameter is required.
    pub default: Option<ArgValue>,
    pub placement: Placement,
}

impl ParamSpec {
    /// Required parameter substituted into the path
    pub const fn path(name: &'static str, kind: ParamKind) -> Self {
        Self { name, kind, default: None, placement: Placement::Path }
    }

    /// Optional detail list filtered against the allowed fields
    pub const fn fields(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::TextList,
            default: Some(ArgValue::TextList(Vec::new())),
            placement: Placement::Fields,
        }
    }

    /// Optional integer sent under `key`
    pub const fn query_int(name: &'static str, key: &'static str, default: i64) -> Self {
        Self {
            name,
            kind: ParamKind::Integer,
            default: Some(ArgValue::Integer(default)),
            placement: Placement::Query(key),
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: ArgValue) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn placed(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// How an operation turns its primary response into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// One GET; the body is the result.
    #[default]
    Single,
    /// The body is a snapshot manifest; newer snapshots are fetched.
    AuctionSnapshots,
}

/// Static description of a registered operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub id: OperationId,
    pub path_template: &'static str,
    pub params: Vec<ParamSpec>,
    pub allowed_fields: &'static [&'static str],
    pub execution: Execution,
}

impl OperationDescriptor {
    pub fn new(id: OperationId, path_template: &'static str) -> Self {
        Self { id, path_template, params: Vec::new(), allowed_fields: &[], execution: Execution::Single }
    }

    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    #[must_use]
    pub fn with_allowed_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.allowed_fields = fields;
        self
    }

    #[must_use]
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn name(&self) -> &'static str {
        self.id.as_str()
    }

    /// Index of the parameter called `name`, in declared order
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|spec| spec.name == name)
    }
}

fn list(id: OperationId, path: &'static str) -> OperationDescriptor {
    OperationDescriptor::new(id, path)
}

fn by_id(id: OperationId, path: &'static str, param: &'static str) -> OperationDescriptor {
    OperationDescriptor::new(id, path).param(ParamSpec::path(param, ParamKind::Integer))
}

/// Descriptors for every game-data operation
pub fn standard_catalog() -> Vec<OperationDescriptor> {
    use OperationId as Op;

    vec![
        OperationDescriptor::new(Op::CharInfo, "/character/{realm}/{charname}")
            .param(ParamSpec::path("realm", ParamKind::Text))
            .param(ParamSpec::path("charname", ParamKind::Text))
            .param(ParamSpec::fields("details"))
            .with_allowed_fields(CHARACTER_FIELDS),
        OperationDescriptor::new(Op::GuildInfo, "/guild/{realm}/{guild_name}")
            .param(ParamSpec::path("realm", ParamKind::Text))
            .param(ParamSpec::path("guild_name", ParamKind::Text))
            .param(ParamSpec::fields("details"))
            .with_allowed_fields(GUILD_FIELDS),
        by_id(Op::GameAchievementInfo, "/achievement/{achievement_id}", "achievement_id"),
        OperationDescriptor::new(Op::GameAuctionData, "/auction/data/{realm}")
            .param(ParamSpec::path("realm", ParamKind::Text))
            .param(
                ParamSpec::path("last_modified", ParamKind::Integer)
                    .with_default(ArgValue::Integer(0))
                    .placed(Placement::Watermark),
            )
            .with_execution(Execution::AuctionSnapshots),
        list(Op::GameBossList, "/boss/"),
        by_id(Op::GameBossInfo, "/boss/{boss_id}", "boss_id"),
        OperationDescriptor::new(Op::GameChallengeRealmLeaderboard, "/challenge/{realm}")
            .param(ParamSpec::path("realm", ParamKind::Text)),
        list(Op::GameChallengeRegionLeaderboard, "/challenge/region"),
        by_id(Op::GameItemInfo, "/item/{item_id}", "item_id"),
        by_id(Op::GameItemSet, "/item/set/{itemset_id}", "itemset_id"),
        list(Op::GameMountList, "/mount/"),
        OperationDescriptor::new(Op::GamePvpLeaderboards, "/leaderboard/{bracket}").param(
            ParamSpec::path("bracket", ParamKind::Bracket)
                .with_default(ArgValue::Bracket(PvpBracket::default())),
        ),
        by_id(Op::GameQuestInfo, "/quest/{quest_id}", "quest_id"),
        OperationDescriptor::new(Op::GameRealmStatus, "/realm/status").param(
            ParamSpec::path("realms", ParamKind::TextList)
                .with_default(ArgValue::TextList(Vec::new()))
                .placed(Placement::JoinedQuery("realms")),
        ),
        by_id(Op::GameRecipeInfo, "/recipe/{recipe_id}", "recipe_id"),
        by_id(Op::GameSpellInfo, "/spell/{spell_id}", "spell_id"),
        list(Op::GameZoneList, "/zone/"),
        by_id(Op::GameZoneInfo, "/zone/{zone_id}", "zone_id"),
        list(Op::GameBattlegroupsList, "/data/battlegroups/"),
        list(Op::GameRacesList, "/data/character/races"),
        list(Op::GameClassesList, "/data/character/classes"),
        list(Op::GameAchievementsList, "/data/character/achievements"),
        list(Op::GameItemclassList, "/data/item/classes"),
        list(Op::GameTalentsList, "/data/talents"),
        list(Op::PetList, "/pet/"),
        by_id(Op::PetAbility, "/pet/ability/{ability_id}", "ability_id"),
        by_id(Op::PetSpecies, "/pet/species/{species_id}", "species_id"),
        by_id(Op::PetStats, "/pet/stats/{species_id}", "species_id")
            .param(ParamSpec::query_int("level", "level", 1))
            .param(ParamSpec::query_int("breed_id", "breedId", 3))
            .param(ParamSpec::query_int("quality_id", "qualityId", 1)),
        list(Op::PetTypesList, "/data/pet/types"),
        list(Op::GuildRewardsList, "/data/guild/rewards"),
        list(Op::GuildPerksList, "/data/guild/perks"),
        list(Op::GuildAchievementsList, "/data/guild/achievements"),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use super::*;

    fn template_params(template: &str) -> Vec<&str> {
        template
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .collect()
    }

    #[test]
    fn test_catalog_covers_every_operation_once() {
        let catalog = standard_catalog();
        let ids: HashSet<_> = catalog.iter().map(|d| d.id).collect();

        assert_eq!(catalog.len(), OperationId::ALL.len());
        assert_eq!(ids.len(), OperationId::ALL.len());
    }

    #[test]
    fn test_path_placeholders_match_path_params() {
        for descriptor in standard_catalog() {
            let mut declared: Vec<_> = descriptor
                .params
                .iter()
                .filter(|p| p.placement == Placement::Path)
                .map(|p| p.name)
                .collect();
            let mut placeholders = template_params(descriptor.path_template);
            declared.sort_unstable();
            placeholders.sort_unstable();
            assert_eq!(declared, placeholders, "{}", descriptor.name());
        }
    }

    #[test]
    fn test_required_params_precede_optional_ones() {
        for descriptor in standard_catalog() {
            let first_optional = descriptor.params.iter().position(|p| !p.is_required());
            if let Some(index) = first_optional {
                assert!(
                    descriptor.params[index..].iter().all(|p| !p.is_required()),
                    "{}",
                    descriptor.name()
                );
            }
        }
    }

    #[test]
    fn test_operation_names_round_trip() {
        assert_eq!(OperationId::from_str("pet_stats").unwrap(), OperationId::PetStats);
        assert_eq!(OperationId::GameItemInfo.to_string(), "game_item_info");
        assert!(OperationId::from_str("Pet_Stats").is_err());
        assert!(OperationId::from_str("_iget").is_err());
    }

    #[test]
    fn test_pet_stats_defaults() {
        let descriptor = standard_catalog()
            .into_iter()
            .find(|d| d.id == OperationId::PetStats)
            .unwrap();

        let defaults: Vec<_> = descriptor.params.iter().map(|p| p.default.clone()).collect();
        assert_eq!(
            defaults,
            vec![
                None,
                Some(ArgValue::Integer(1)),
                Some(ArgValue::Integer(3)),
                Some(ArgValue::Integer(1)),
            ]
        );
        assert_eq!(descriptor.params[2].placement, Placement::Query("breedId"));
    }

    #[test]
    fn test_arg_value_render() {
        assert_eq!(ArgValue::Integer(19019).render(), "19019");
        assert_eq!(ArgValue::Bracket(PvpBracket::TwoVsTwo).render(), "2v2");
        assert_eq!(
            ArgValue::TextList(vec!["azralon".into(), "nemesis".into()]).render(),
            "azralon,nemesis"
        );
    }
}
