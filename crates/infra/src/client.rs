//! Client facade
//!
//! [`ArmoryClient`] wires the default adapters (reqwest transport, Battle.net
//! token issuer, file-backed credential store) into the core services and
//! exposes one typed method per game-data resource. The dynamic [`call`] and
//! [`batch`] entry points accept operation names and loose parameter sets.
//!
//! [`call`]: ArmoryClient::call
//! [`batch`]: ArmoryClient::batch

use std::sync::Arc;

use armory_core::{
    BatchDispatcher, CredentialStore, HttpTransport, OperationId, OperationInvoker,
    OperationRegistry, Operations, RequestExecutor, TokenIssuer, TokenLifecycle,
};
use armory_domain::{
    BatchOptions, BatchResult, ClientConfig, Locale, ParamSet, PvpBracket, Result,
};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{BattleNetTokenIssuer, FileCredentialStore};
use crate::http::HttpClient;

/// Generates typed methods for operations that take no parameters.
macro_rules! list_operations {
    ($($(#[$meta:meta])* $method:ident => $id:ident;)+) => {
        $(
            $(#[$meta])*
            pub async fn $method(&self) -> Result<Value> {
                self.run(OperationId::$id, ParamSet::empty()).await
            }
        )+
    };
}

/// Generates typed methods for operations keyed by one integer identifier.
macro_rules! id_operations {
    ($($(#[$meta:meta])* $method:ident($arg:ident) => $id:ident;)+) => {
        $(
            $(#[$meta])*
            pub async fn $method(&self, $arg: i64) -> Result<Value> {
                self.run(OperationId::$id, ParamSet::positional([$arg])).await
            }
        )+
    };
}

/// Game-data client for one region, locale and client identity
pub struct ArmoryClient {
    config: ClientConfig,
    tokens: Arc<TokenLifecycle>,
    operations: Arc<Operations>,
    dispatcher: BatchDispatcher,
}

impl ArmoryClient {
    /// Build a client with the default adapters.
    ///
    /// No network or filesystem access happens until the first call.
    ///
    /// # Errors
    /// Returns `ArmoryError::Config` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout)
            .max_attempts(config.retry_attempts)
            .build()?;

        let store = match &config.token_cache_path {
            Some(path) => FileCredentialStore::new(path.clone()),
            None => FileCredentialStore::for_identity(config.region, &config.client_id),
        };
        // Token exchanges are never retried inside the adapter.
        let auth_http =
            HttpClient::builder().timeout(config.request_timeout).max_attempts(1).build()?;
        let issuer = BattleNetTokenIssuer::new(
            auth_http,
            config.auth_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        );

        info!(
            region = %config.region,
            locale = %config.locale,
            cache = %store.path().display(),
            "Armory client configured"
        );

        Ok(Self::with_parts(config, Arc::new(store), Arc::new(issuer), Arc::new(http)))
    }

    /// Build a client over caller-supplied adapters.
    pub fn with_parts(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        issuer: Arc<dyn TokenIssuer>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let tokens = Arc::new(
            TokenLifecycle::new(store, issuer)
                .with_safety_margin_secs(config.token_safety_margin_secs),
        );
        let executor = Arc::new(RequestExecutor::new(
            transport,
            tokens.clone(),
            config.api_base_url.clone(),
            config.locale,
        ));
        let registry = Arc::new(OperationRegistry::standard());
        let operations = Arc::new(Operations::new(registry.clone(), executor));
        let dispatcher = BatchDispatcher::new(registry, operations.clone());

        Self { config, tokens, operations, dispatcher }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Names of every operation `call` and `batch` accept
    pub fn operation_names(&self) -> Vec<&'static str> {
        self.operations.registry().names().collect()
    }

    /// A bearer token valid right now, renewing it if needed.
    ///
    /// # Errors
    /// Returns `ArmoryError::Auth` if a renewal was needed and failed.
    pub async fn token(&self) -> Result<String> {
        self.tokens.ensure_fresh_token().await
    }

    /// Run one operation by name.
    ///
    /// # Errors
    /// - `ArmoryError::UnknownOperation` if `name` is not registered
    /// - `ArmoryError::InvalidParameter` before any network call if `params`
    ///   does not bind
    /// - Any transport, auth or remote failure of the call itself
    pub async fn call(&self, name: &str, params: ParamSet) -> Result<Value> {
        let operation = self.operations.registry().resolve(name)?;
        self.run(operation, params).await
    }

    /// Run one operation by name with a per-call locale.
    ///
    /// # Errors
    /// Same as [`call`](Self::call).
    pub async fn call_with_locale(
        &self,
        name: &str,
        params: ParamSet,
        locale: Locale,
    ) -> Result<Value> {
        let operation = self.operations.registry().resolve(name)?;
        self.operations.invoke_with_locale(operation, &params, Some(locale)).await
    }

    /// Run one operation over many parameter sets, collecting every outcome.
    ///
    /// Concurrency follows the configured `max_concurrency`.
    ///
    /// # Errors
    /// Returns `ArmoryError::UnknownOperation` before any work if `name` is
    /// not registered.
    pub async fn batch(&self, name: &str, parameter_sets: Vec<ParamSet>) -> Result<BatchResult> {
        let options = match self.config.max_concurrency {
            Some(limit) => BatchOptions::default().with_max_concurrency(limit),
            None => BatchOptions::default(),
        };
        self.batch_with(name, parameter_sets, options).await
    }

    /// Batch with explicit options.
    ///
    /// # Errors
    /// As [`batch`](Self::batch); under `FailurePolicy::FailFast` also the
    /// first failed outcome.
    pub async fn batch_with(
        &self,
        name: &str,
        parameter_sets: Vec<ParamSet>,
        options: BatchOptions,
    ) -> Result<BatchResult> {
        self.dispatcher.dispatch(name, parameter_sets, options).await
    }

    async fn run(&self, operation: OperationId, params: ParamSet) -> Result<Value> {
        self.operations.invoke(operation, &params).await
    }

    /* ---------------------------------------------------------------- */
    /* Character and guild                                              */
    /* ---------------------------------------------------------------- */

    /// Character profile. Unsupported `details` are dropped.
    pub async fn char_info(&self, realm: &str, charname: &str, details: &[&str]) -> Result<Value> {
        self.run(
            OperationId::CharInfo,
            ParamSet::positional([json!(realm), json!(charname), json!(details)]),
        )
        .await
    }

    /// Guild profile. Unsupported `details` are dropped.
    pub async fn guild_info(
        &self,
        realm: &str,
        guild_name: &str,
        details: &[&str],
    ) -> Result<Value> {
        self.run(
            OperationId::GuildInfo,
            ParamSet::positional([json!(realm), json!(guild_name), json!(details)]),
        )
        .await
    }

    /* ---------------------------------------------------------------- */
    /* Game data                                                        */
    /* ---------------------------------------------------------------- */

    /// Auction snapshots of `realm` modified after `last_modified`
    /// (milliseconds since the epoch, `0` for all).
    pub async fn game_auction_data(&self, realm: &str, last_modified: i64) -> Result<Value> {
        self.run(
            OperationId::GameAuctionData,
            ParamSet::positional([json!(realm), json!(last_modified)]),
        )
        .await
    }

    pub async fn game_challenge_realm_leaderboard(&self, realm: &str) -> Result<Value> {
        self.run(OperationId::GameChallengeRealmLeaderboard, ParamSet::positional([realm])).await
    }

    pub async fn game_pvp_leaderboards(&self, bracket: PvpBracket) -> Result<Value> {
        self.run(OperationId::GamePvpLeaderboards, ParamSet::positional([bracket.as_str()])).await
    }

    /// Status of the named realms, or of every realm when `realms` is empty
    pub async fn game_realm_status(&self, realms: &[&str]) -> Result<Value> {
        self.run(OperationId::GameRealmStatus, ParamSet::positional([json!(realms)])).await
    }

    id_operations! {
        game_achievement_info(achievement_id) => GameAchievementInfo;
        game_boss_info(boss_id) => GameBossInfo;
        game_item_info(item_id) => GameItemInfo;
        game_item_set(itemset_id) => GameItemSet;
        game_quest_info(quest_id) => GameQuestInfo;
        game_recipe_info(recipe_id) => GameRecipeInfo;
        game_spell_info(spell_id) => GameSpellInfo;
        game_zone_info(zone_id) => GameZoneInfo;
        pet_ability(ability_id) => PetAbility;
        pet_species(species_id) => PetSpecies;
    }

    /// Battle pet stats at a given level, breed and quality
    pub async fn pet_stats(
        &self,
        species_id: i64,
        level: i64,
        breed_id: i64,
        quality_id: i64,
    ) -> Result<Value> {
        let params = ParamSet::positional([species_id, level, breed_id, quality_id]);
        self.run(OperationId::PetStats, params).await
    }

    list_operations! {
        game_boss_list => GameBossList;
        game_challenge_region_leaderboard => GameChallengeRegionLeaderboard;
        game_mount_list => GameMountList;
        game_zone_list => GameZoneList;
        game_battlegroups_list => GameBattlegroupsList;
        game_races_list => GameRacesList;
        game_classes_list => GameClassesList;
        game_achievements_list => GameAchievementsList;
        game_itemclass_list => GameItemclassList;
        game_talents_list => GameTalentsList;
        pet_list => PetList;
        pet_types_list => PetTypesList;
        guild_rewards_list => GuildRewardsList;
        guild_perks_list => GuildPerksList;
        guild_achievements_list => GuildAchievementsList;
    }
}

#[cfg(test)]
mod tests {
    use armory_core::testing::{CountingTokenIssuer, InMemoryCredentialStore, ScriptedTransport};
    use armory_domain::{ArmoryError, ErrorKind, FailurePolicy};

    use super::*;

    const BASE: &str = "https://eu.api.blizzard.com/wow";

    struct Harness {
        client: ArmoryClient,
        transport: Arc<ScriptedTransport>,
        issuer: Arc<CountingTokenIssuer>,
    }

    fn harness(max_concurrency: Option<usize>) -> Harness {
        let config = ClientConfig::new("id", "secret", "eu", "de_DE")
            .unwrap()
            .with_max_concurrency(max_concurrency);
        let transport = Arc::new(ScriptedTransport::new());
        let issuer = Arc::new(CountingTokenIssuer::new(3600));
        let client = ArmoryClient::with_parts(
            config,
            Arc::new(InMemoryCredentialStore::new()),
            issuer.clone(),
            transport.clone(),
        );
        Harness { client, transport, issuer }
    }

    #[tokio::test]
    async fn test_typed_item_lookup() {
        let h = harness(None);
        h.transport.respond(format!("{BASE}/item/18803"), 200, &json!({"id": 18803}));

        let item = h.client.game_item_info(18803).await.unwrap();

        assert_eq!(item["id"], 18803);
        let request = &h.transport.requests()[0];
        assert_eq!(request.query_value("locale"), Some("de_DE"));
        assert!(request.bearer.is_some());
    }

    #[tokio::test]
    async fn test_list_operation_keeps_trailing_slash() {
        let h = harness(None);
        h.transport.respond(format!("{BASE}/mount/"), 200, &json!({"mounts": []}));

        h.client.game_mount_list().await.unwrap();

        assert_eq!(h.transport.requests()[0].url, format!("{BASE}/mount/"));
    }

    #[tokio::test]
    async fn test_pet_stats_query_keys() {
        let h = harness(None);

        h.client.pet_stats(258, 25, 5, 4).await.unwrap();

        let request = &h.transport.requests()[0];
        assert_eq!(request.url, format!("{BASE}/pet/stats/258"));
        assert_eq!(request.query_value("level"), Some("25"));
        assert_eq!(request.query_value("breedId"), Some("5"));
        assert_eq!(request.query_value("qualityId"), Some("4"));
    }

    #[tokio::test]
    async fn test_pvp_bracket_in_path() {
        let h = harness(None);

        h.client.game_pvp_leaderboards(PvpBracket::ThreeVsThree).await.unwrap();

        assert_eq!(h.transport.requests()[0].url, format!("{BASE}/leaderboard/3v3"));
    }

    #[tokio::test]
    async fn test_call_by_name_validates_before_network() {
        let h = harness(None);

        let err = h
            .client
            .call("game_item_info", ParamSet::positional([json!("abc")]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(h.transport.call_count(), 0);
        assert_eq!(h.issuer.calls(), 0);
    }

    #[tokio::test]
    async fn test_call_unknown_name() {
        let h = harness(None);
        let err = h.client.call("game_dungeon_list", ParamSet::empty()).await.unwrap_err();
        assert_eq!(err, ArmoryError::UnknownOperation("game_dungeon_list".into()));
    }

    #[tokio::test]
    async fn test_call_with_locale_overrides_once() {
        let h = harness(None);

        h.client.call_with_locale("pet_list", ParamSet::empty(), Locale::FrFr).await.unwrap();

        assert_eq!(h.transport.requests()[0].query_value("locale"), Some("fr_FR"));
    }

    #[tokio::test]
    async fn test_batch_pairs_outcomes_and_shares_token() {
        let h = harness(Some(2));
        h.transport.respond_raw(format!("{BASE}/item/2"), 404, "{\"reason\":\"missing\"}");

        let sets: Vec<_> = [1, 2, 3].iter().map(|id| ParamSet::positional([*id])).collect();
        let result = h.client.batch("game_item_info", sets).await.unwrap();

        assert_eq!(result.len(), 3);
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, &ParamSet::positional([2]));
        assert_eq!(h.issuer.calls(), 1);
    }

    #[tokio::test]
    async fn test_batch_with_fail_fast() {
        let h = harness(None);
        h.transport.respond_raw(format!("{BASE}/quest/9"), 500, "down");

        let options = BatchOptions::default().with_failure_policy(FailurePolicy::FailFast);
        let err = h
            .client
            .batch_with("game_quest_info", vec![ParamSet::positional([9])], options)
            .await
            .unwrap_err();

        assert_eq!(err, ArmoryError::Remote { status: 500, body: "down".into() });
    }

    #[tokio::test]
    async fn test_token_is_cached_between_calls() {
        let h = harness(None);

        let first = h.client.token().await.unwrap();
        let second = h.client.token().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.issuer.calls(), 1);
    }

    #[test]
    fn test_every_operation_is_exposed_by_name() {
        let h = harness(None);
        assert_eq!(h.client.operation_names().len(), OperationId::ALL.len());
    }
}
