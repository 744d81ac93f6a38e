//! Config state kept across driver invocations
//!
//! Records live in the scratch files the harness points drivers at.
//! Contexts, servers, feature flags and pre-v0.90.0 discovery sources go to
//! `TANZU_CONFIG`, later discovery sources to `TANZU_CONFIG_NEXT_GEN` and
//! metadata to `TANZU_CONFIG_METADATA`. Each invocation loads all three,
//! applies its APIs in order and writes them back.
//!
//! Records are stored in one canonical shape and rendered in the shape of
//! the reading version, so a context written with `target` on latest reads
//! back with the legacy `type` on v0.25.4.

use anyhow::{bail, Context, Result};
use compat_core::types::{
    CliOptionsOpts, ClientConfigOpts, ClientOptionsOpts, ConfigMetadataOpts, ContextOpts,
    ContextType, CurrentContextKey, FeatureMap, MetadataOpts, PluginDiscoveryOpts, ServerOpts,
    Target,
};
use compat_core::wire::Response;
use compat_core::{Api, ApiName, ArgumentKey, ArgumentValue, RuntimeVersion};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DISCOVERY_SOURCE_NOT_FOUND: &str = "cli discovery source not found";
const UNIFIED_CONFIG_SETTING: &str = "useUnifiedConfig";

/// Contents of `TANZU_CONFIG`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    contexts: Vec<ContextOpts>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    current_context: BTreeMap<Target, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    servers: Vec<ServerOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_server: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    features: BTreeMap<String, FeatureMap>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    discovery_sources: Vec<PluginDiscoveryOpts>,
}

/// Contents of `TANZU_CONFIG_NEXT_GEN`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextGenFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    discovery_sources: Vec<PluginDiscoveryOpts>,
}

pub struct Store {
    config_path: PathBuf,
    next_gen_path: PathBuf,
    metadata_path: PathBuf,
    config: ConfigFile,
    next_gen: NextGenFile,
    metadata: ConfigMetadataOpts,
}

impl Store {
    pub fn open(
        config_path: PathBuf,
        next_gen_path: PathBuf,
        metadata_path: PathBuf,
    ) -> Result<Self> {
        Ok(Self {
            config: load(&config_path)?,
            next_gen: load(&next_gen_path)?,
            metadata: load(&metadata_path)?,
            config_path,
            next_gen_path,
            metadata_path,
        })
    }

    pub fn save(&self) -> Result<()> {
        save(&self.config_path, &self.config)?;
        save(&self.next_gen_path, &self.next_gen)?;
        save(&self.metadata_path, &self.metadata)
    }

    /// Run one API against the stored records
    ///
    /// Failures the runtime would report come back as error responses.
    /// Undecodable arguments are driver errors.
    pub fn apply(&mut self, api: &Api) -> Result<Response> {
        let version = api.version;
        if !version.supports(api.name) {
            return Ok(fail(format!(
                "API {} is not supported by runtime version {}",
                api.name, version
            )));
        }

        match api.name {
            ApiName::SetContext => {
                let context = record(api, ArgumentKey::Context)?;
                Ok(self.set_context(context, flag(api, ArgumentKey::SetCurrent)))
            }
            ApiName::GetContext => self.get_context(text(api, ArgumentKey::ContextName)?, version),
            ApiName::DeleteContext => {
                Ok(self.delete_context(text(api, ArgumentKey::ContextName)?, version))
            }
            ApiName::SetCurrentContext => {
                Ok(self.set_current_context(text(api, ArgumentKey::ContextName)?, version))
            }
            ApiName::GetCurrentContext | ApiName::GetActiveContext => {
                let target = selected_target(api)?;
                match self.config.current_context.get(&target) {
                    Some(name) => self.get_context(name, version),
                    None => Ok(no_current_context(target, version)),
                }
            }
            ApiName::RemoveCurrentContext => {
                self.config.current_context.remove(&selected_target(api)?);
                Ok(done())
            }

            ApiName::SetServer => {
                let server: ServerOpts = record(api, ArgumentKey::Server)?;
                if flag(api, ArgumentKey::SetCurrent) {
                    self.config.current_server = Some(server.name.clone());
                }
                upsert(&mut self.config.servers, server, |a, b| a.name == b.name);
                Ok(done())
            }
            ApiName::GetServer => {
                let name = text(api, ArgumentKey::ServerName)?;
                match self.server(name) {
                    Some(server) => mapping(server),
                    None => Ok(server_not_found(name)),
                }
            }
            ApiName::DeleteServer => {
                let name = text(api, ArgumentKey::ServerName)?;
                if !remove(&mut self.config.servers, |s| s.name == name) {
                    return Ok(server_not_found(name));
                }
                if self.config.current_server.as_deref() == Some(name) {
                    self.config.current_server = None;
                }
                Ok(done())
            }
            ApiName::SetCurrentServer => {
                let name = text(api, ArgumentKey::ServerName)?;
                if self.server(name).is_none() {
                    return Ok(server_not_found(name));
                }
                self.config.current_server = Some(name.to_string());
                Ok(done())
            }
            ApiName::GetCurrentServer => {
                let current = self.config.current_server.as_deref().unwrap_or_default();
                match self.server(current) {
                    Some(server) => mapping(server),
                    None => Ok(fail(format!("current server \"{}\" not found", current))),
                }
            }
            ApiName::RemoveCurrentServer => {
                let name = text(api, ArgumentKey::ServerName)?;
                if self.config.current_server.as_deref() == Some(name) {
                    self.config.current_server = None;
                }
                Ok(done())
            }

            ApiName::SetFeature => {
                let (plugin, key) = feature_flag(api)?;
                let value = text(api, ArgumentKey::Value)?;
                self.config
                    .features
                    .entry(plugin.to_string())
                    .or_default()
                    .insert(key.to_string(), value.to_string());
                Ok(done())
            }
            ApiName::IsFeatureEnabled => {
                let (plugin, key) = feature_flag(api)?;
                match self.config.features.get(plugin).and_then(|flags| flags.get(key)) {
                    Some(value) => Ok(Response::String(is_true(value).to_string())),
                    None => Ok(feature_not_found(plugin, key)),
                }
            }
            ApiName::DeleteFeature => {
                let (plugin, key) = feature_flag(api)?;
                let Some(flags) = self.config.features.get_mut(plugin) else {
                    return Ok(feature_not_found(plugin, key));
                };
                if flags.remove(key).is_none() {
                    return Ok(feature_not_found(plugin, key));
                }
                if flags.is_empty() {
                    self.config.features.remove(plugin);
                }
                Ok(done())
            }

            ApiName::SetCLIDiscoverySource => {
                let source: PluginDiscoveryOpts = record(api, ArgumentKey::DiscoverySource)?;
                if source.name().is_none() {
                    bail!("discovery source has no configured type");
                }
                upsert(self.discovery_sources_mut(version), source, |a, b| {
                    a.name() == b.name()
                });
                Ok(done())
            }
            ApiName::GetCLIDiscoverySource => {
                let name = text(api, ArgumentKey::Name)?;
                match self.discovery_sources(version).iter().find(|s| s.name() == Some(name)) {
                    Some(source) => mapping(source),
                    None => Ok(fail(DISCOVERY_SOURCE_NOT_FOUND)),
                }
            }
            ApiName::DeleteCLIDiscoverySource => {
                let name = text(api, ArgumentKey::Name)?;
                if remove(self.discovery_sources_mut(version), |s| s.name() == Some(name)) {
                    Ok(done())
                } else {
                    Ok(fail(DISCOVERY_SOURCE_NOT_FOUND))
                }
            }

            ApiName::StoreClientConfig => {
                let config = record(api, ArgumentKey::ClientConfig)?;
                self.store_client_config(config, version);
                Ok(done())
            }
            ApiName::GetClientConfig => mapping(&self.client_config(version)),

            ApiName::SetConfigMetadataPatchStrategy => {
                let key = text(api, ArgumentKey::Key)?;
                let strategy = text(api, ArgumentKey::PatchStrategy)?;
                self.metadata
                    .patch_strategy
                    .insert(key.to_string(), strategy.to_string());
                Ok(done())
            }
            ApiName::GetConfigMetadataPatchStrategy => mapping(&self.metadata.patch_strategy),
            ApiName::DeleteConfigMetadataPatchStrategy => {
                self.metadata.patch_strategy.remove(text(api, ArgumentKey::Key)?);
                Ok(done())
            }
            ApiName::SetConfigMetadataSetting => {
                let key = text(api, ArgumentKey::SettingKey)?;
                let value = text(api, ArgumentKey::SettingValue)?;
                self.metadata
                    .settings
                    .insert(key.to_string(), value.to_string());
                Ok(done())
            }
            ApiName::GetConfigMetadataSetting => {
                let key = text(api, ArgumentKey::SettingKey)?;
                match self.metadata.settings.get(key) {
                    Some(value) => Ok(Response::String(value.clone())),
                    None => Ok(fail(format!("config metadata setting \"{}\" not found", key))),
                }
            }
            ApiName::DeleteConfigMetadataSetting => {
                self.metadata.settings.remove(text(api, ArgumentKey::SettingKey)?);
                Ok(done())
            }
            ApiName::IsConfigMetadataSettingsEnabled => {
                let key = text(api, ArgumentKey::SettingKey)?;
                Ok(Response::String(self.setting_enabled(key).to_string()))
            }
            ApiName::UseUnifiedConfig => Ok(Response::String(
                self.setting_enabled(UNIFIED_CONFIG_SETTING).to_string(),
            )),
            ApiName::GetMetadata => mapping(&MetadataOpts {
                config_metadata: Some(self.metadata.clone()),
            }),
        }
    }

    fn context(&self, name: &str) -> Option<&ContextOpts> {
        self.config.contexts.iter().find(|c| c.name == name)
    }

    fn set_context(&mut self, context: ContextOpts, set_current: bool) -> Response {
        let context = canonical_context(context);
        if set_current {
            if let Some(target) = context.target {
                self.config
                    .current_context
                    .insert(target, context.name.clone());
            }
        }
        upsert(&mut self.config.contexts, context, |a, b| a.name == b.name);
        done()
    }

    fn get_context(&self, name: &str, version: RuntimeVersion) -> Result<Response> {
        match self.context(name) {
            Some(context) => mapping(&render_context(context, version)),
            None => Ok(context_not_found(name, version)),
        }
    }

    fn delete_context(&mut self, name: &str, version: RuntimeVersion) -> Response {
        if !remove(&mut self.config.contexts, |c| c.name == name) {
            return context_not_found(name, version);
        }
        self.config.current_context.retain(|_, current| *current != name);
        done()
    }

    fn set_current_context(&mut self, name: &str, version: RuntimeVersion) -> Response {
        let Some(context) = self.context(name) else {
            return context_not_found(name, version);
        };
        let Some(target) = context.target else {
            return fail(format!("context {} has no target", name));
        };
        self.config
            .current_context
            .insert(target, name.to_string());
        done()
    }

    fn server(&self, name: &str) -> Option<&ServerOpts> {
        self.config.servers.iter().find(|s| s.name == name)
    }

    fn discovery_sources(&self, version: RuntimeVersion) -> &Vec<PluginDiscoveryOpts> {
        if uses_next_gen_discovery(version) {
            &self.next_gen.discovery_sources
        } else {
            &self.config.discovery_sources
        }
    }

    fn discovery_sources_mut(&mut self, version: RuntimeVersion) -> &mut Vec<PluginDiscoveryOpts> {
        if uses_next_gen_discovery(version) {
            &mut self.next_gen.discovery_sources
        } else {
            &mut self.config.discovery_sources
        }
    }

    fn setting_enabled(&self, key: &str) -> bool {
        self.metadata.settings.get(key).map_or(false, |v| is_true(v))
    }

    /// Replace everything a client config carries
    fn store_client_config(&mut self, config: ClientConfigOpts, version: RuntimeVersion) {
        self.config.servers = config.known_servers;
        self.config.current_server = config.current_server;
        self.config.contexts = config
            .known_contexts
            .into_iter()
            .map(canonical_context)
            .collect();
        self.config.current_context = config
            .current_context
            .into_iter()
            .map(|(key, name)| (key_target(key), name))
            .collect();

        let options = config.client_options.unwrap_or_default();
        self.config.features = options.features;
        *self.discovery_sources_mut(version) =
            options.cli.map(|cli| cli.discovery_sources).unwrap_or_default();
    }

    fn client_config(&self, version: RuntimeVersion) -> ClientConfigOpts {
        let mut config = ClientConfigOpts {
            known_servers: self.config.servers.clone(),
            current_server: self.config.current_server.clone(),
            ..Default::default()
        };

        if version != RuntimeVersion::V0116 {
            config.known_contexts = self
                .config
                .contexts
                .iter()
                .map(|c| render_context(c, version))
                .collect();
            config.current_context = self
                .config
                .current_context
                .iter()
                .filter_map(|(target, name)| {
                    current_context_key(*target, version).map(|key| (key, name.clone()))
                })
                .collect();
        }

        let discovery_sources = self.discovery_sources(version).clone();
        let options = ClientOptionsOpts {
            cli: (!discovery_sources.is_empty()).then(|| CliOptionsOpts {
                discovery_sources,
                edition: None,
            }),
            features: self.config.features.clone(),
        };
        if options != ClientOptionsOpts::default() {
            config.client_options = Some(options);
        }
        config
    }
}

fn load<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("invalid config in {}", path.display()))
}

fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_yaml::to_string(value)?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn done() -> Response {
    Response::String(String::new())
}

fn fail(message: impl Into<String>) -> Response {
    Response::Error(message.into())
}

fn mapping<T: Serialize>(value: &T) -> Result<Response> {
    match serde_yaml::to_value(value)? {
        serde_yaml::Value::Mapping(map) => Ok(Response::Map(map)),
        serde_yaml::Value::Null => Ok(Response::Map(Default::default())),
        other => bail!("expected a mapping, got {:?}", other),
    }
}

fn text(api: &Api, key: ArgumentKey) -> Result<&str> {
    api.arguments
        .get(&key)
        .and_then(ArgumentValue::as_str)
        .with_context(|| format!("{} is missing argument {}", api.name, key))
}

fn flag(api: &Api, key: ArgumentKey) -> bool {
    api.arguments
        .get(&key)
        .and_then(ArgumentValue::as_bool)
        .unwrap_or(false)
}

fn record<T: DeserializeOwned>(api: &Api, key: ArgumentKey) -> Result<T> {
    serde_yaml::from_str(text(api, key)?)
        .with_context(|| format!("{} has an undecodable {} argument", api.name, key))
}

fn feature_flag(api: &Api) -> Result<(&str, &str)> {
    Ok((text(api, ArgumentKey::Plugin)?, text(api, ArgumentKey::Key)?))
}

/// Target named by `target`, or by `contextType` when no target is given
fn selected_target(api: &Api) -> Result<Target> {
    if let Some(target) = api.arguments.get(&ArgumentKey::Target).and_then(ArgumentValue::as_str) {
        return serde_yaml::from_str(target).with_context(|| format!("unknown target {}", target));
    }
    let kind = text(api, ArgumentKey::ContextType)?;
    let kind: ContextType =
        serde_yaml::from_str(kind).with_context(|| format!("unknown context type {}", kind))?;
    Ok(kind_target(kind))
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn uses_next_gen_discovery(version: RuntimeVersion) -> bool {
    matches!(
        version,
        RuntimeVersion::V090 | RuntimeVersion::V102 | RuntimeVersion::Latest
    )
}

fn kind_target(kind: ContextType) -> Target {
    match kind {
        ContextType::K8s => Target::Kubernetes,
        ContextType::Tmc => Target::MissionControl,
        ContextType::Tanzu => Target::Global,
    }
}

/// v0.25.4 has no kind for global contexts
fn legacy_kind(target: Target) -> Option<ContextType> {
    match target {
        Target::Kubernetes => Some(ContextType::K8s),
        Target::MissionControl => Some(ContextType::Tmc),
        Target::Global => None,
    }
}

fn key_target(key: CurrentContextKey) -> Target {
    match key {
        CurrentContextKey::Target(target) => target,
        CurrentContextKey::Type(kind) => kind_target(kind),
    }
}

fn current_context_key(target: Target, version: RuntimeVersion) -> Option<CurrentContextKey> {
    if version == RuntimeVersion::V0254 {
        legacy_kind(target).map(CurrentContextKey::from)
    } else {
        Some(target.into())
    }
}

/// Stored contexts always carry `target` and never the legacy `type`
fn canonical_context(mut context: ContextOpts) -> ContextOpts {
    if context.target.is_none() {
        context.target = context.legacy_type.or(context.context_type).map(kind_target);
    }
    context.legacy_type = None;
    context
}

fn render_context(context: &ContextOpts, version: RuntimeVersion) -> ContextOpts {
    let mut rendered = context.clone();
    match version {
        RuntimeVersion::V0254 => {
            rendered.legacy_type = context.target.and_then(legacy_kind);
            rendered.target = None;
            rendered.context_type = None;
        }
        RuntimeVersion::Latest => {}
        _ => rendered.context_type = None,
    }
    rendered
}

fn upsert<T>(records: &mut Vec<T>, record: T, same: impl Fn(&T, &T) -> bool) {
    match records.iter_mut().find(|existing| same(existing, &record)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Remove every match, reporting whether there was one
fn remove<T>(records: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = records.len();
    records.retain(|r| !matches(r));
    records.len() != before
}

fn context_not_found(name: &str, version: RuntimeVersion) -> Response {
    if version == RuntimeVersion::V0254 {
        fail(format!("could not find context \"{}\"", name))
    } else {
        fail(format!("context {} not found", name))
    }
}

fn no_current_context(target: Target, version: RuntimeVersion) -> Response {
    match (version, legacy_kind(target)) {
        (RuntimeVersion::V0254, Some(kind)) => {
            fail(format!("no current context set for type \"{}\"", kind))
        }
        _ => fail(format!("no current context set for target \"{}\"", target)),
    }
}

fn server_not_found(name: &str) -> Response {
    fail(format!("could not find server \"{}\"", name))
}

fn feature_not_found(plugin: &str, key: &str) -> Response {
    fail(format!(
        "feature flag \"{}\" not found for plugin \"{}\"",
        key, plugin
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat_core::types::GlobalServerOpts;
    use compat_core::{Arguments, Output};
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Store {
        let paths = ["config.yaml", "config-ng.yaml", ".config-metadata.yaml"]
            .map(|file| dir.path().join(file));
        for path in &paths {
            fs::write(path, "").unwrap();
        }
        let [config, next_gen, metadata] = paths;
        Store::open(config, next_gen, metadata).unwrap()
    }

    fn reopen(dir: &TempDir) -> Store {
        Store::open(
            dir.path().join("config.yaml"),
            dir.path().join("config-ng.yaml"),
            dir.path().join(".config-metadata.yaml"),
        )
        .unwrap()
    }

    fn call(name: ApiName, version: RuntimeVersion, arguments: &[(ArgumentKey, ArgumentValue)]) -> Api {
        Api::new(
            name,
            version,
            arguments.iter().cloned().collect::<Arguments>(),
            Output::success(""),
        )
    }

    fn context_argument(context: &ContextOpts) -> (ArgumentKey, ArgumentValue) {
        (ArgumentKey::Context, ArgumentValue::yaml(context).unwrap())
    }

    fn named(name: &str) -> (ArgumentKey, ArgumentValue) {
        (ArgumentKey::ContextName, name.into())
    }

    fn kubernetes_context() -> ContextOpts {
        ContextOpts {
            name: "ctx".to_string(),
            target: Some(Target::Kubernetes),
            global_opts: Some(GlobalServerOpts {
                endpoint: "endpoint".to_string(),
                auth: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_context_renders_in_reader_shape() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let set = call(
            ApiName::SetContext,
            RuntimeVersion::Latest,
            &[context_argument(&kubernetes_context())],
        );
        assert_eq!(store.apply(&set).unwrap(), done());

        let Response::Map(legacy) = store
            .apply(&call(ApiName::GetContext, RuntimeVersion::V0254, &[named("ctx")]))
            .unwrap()
        else {
            panic!("expected a map");
        };
        let legacy: ContextOpts = serde_yaml::from_value(serde_yaml::Value::Mapping(legacy)).unwrap();
        assert_eq!(legacy.legacy_type, Some(ContextType::K8s));
        assert_eq!(legacy.target, None);
        assert_eq!(legacy.global_opts, kubernetes_context().global_opts);
    }

    #[test]
    fn test_legacy_context_reads_back_with_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let legacy = ContextOpts {
            target: None,
            legacy_type: Some(ContextType::K8s),
            ..kubernetes_context()
        };
        store
            .apply(&call(ApiName::SetContext, RuntimeVersion::V0254, &[context_argument(&legacy)]))
            .unwrap();

        let response = store
            .apply(&call(ApiName::GetContext, RuntimeVersion::V0280, &[named("ctx")]))
            .unwrap();
        assert_eq!(response, mapping(&kubernetes_context()).unwrap());
    }

    #[test]
    fn test_state_survives_reopen_and_delete_is_seen_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        store
            .apply(&call(
                ApiName::SetContext,
                RuntimeVersion::V0280,
                &[context_argument(&kubernetes_context())],
            ))
            .unwrap();
        store.save().unwrap();

        let mut store = reopen(&dir);
        assert!(matches!(
            store.apply(&call(ApiName::GetContext, RuntimeVersion::Latest, &[named("ctx")])).unwrap(),
            Response::Map(_)
        ));
        store
            .apply(&call(ApiName::DeleteContext, RuntimeVersion::V0280, &[named("ctx")]))
            .unwrap();
        store.save().unwrap();

        let mut store = reopen(&dir);
        assert_eq!(
            store.apply(&call(ApiName::GetContext, RuntimeVersion::Latest, &[named("ctx")])).unwrap(),
            Response::Error("context ctx not found".into())
        );
        assert_eq!(
            store.apply(&call(ApiName::GetContext, RuntimeVersion::V0254, &[named("ctx")])).unwrap(),
            Response::Error("could not find context \"ctx\"".into())
        );
        assert_eq!(
            store.apply(&call(ApiName::DeleteContext, RuntimeVersion::V0280, &[named("ctx")])).unwrap(),
            Response::Error("context ctx not found".into())
        );
    }

    #[test]
    fn test_current_context_by_target_or_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let legacy_selector = [(ArgumentKey::ContextType, ArgumentValue::from("k8s"))];

        assert_eq!(
            store
                .apply(&call(ApiName::GetCurrentContext, RuntimeVersion::V0254, &legacy_selector))
                .unwrap(),
            Response::Error("no current context set for type \"k8s\"".into())
        );

        store
            .apply(&call(
                ApiName::SetContext,
                RuntimeVersion::Latest,
                &[
                    context_argument(&kubernetes_context()),
                    (ArgumentKey::SetCurrent, true.into()),
                ],
            ))
            .unwrap();
        assert!(matches!(
            store
                .apply(&call(ApiName::GetCurrentContext, RuntimeVersion::V0254, &legacy_selector))
                .unwrap(),
            Response::Map(_)
        ));

        let target = [(ArgumentKey::Target, ArgumentValue::from("kubernetes"))];
        store
            .apply(&call(ApiName::RemoveCurrentContext, RuntimeVersion::V0280, &target))
            .unwrap();
        assert!(matches!(
            store
                .apply(&call(ApiName::GetCurrentContext, RuntimeVersion::V0280, &target))
                .unwrap(),
            Response::Error(_)
        ));
    }

    #[test]
    fn test_feature_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let flag = [
            (ArgumentKey::Plugin, ArgumentValue::from("plugin")),
            (ArgumentKey::Key, ArgumentValue::from("key")),
        ];
        let mut with_value = flag.to_vec();
        with_value.push((ArgumentKey::Value, "true".into()));

        store
            .apply(&call(ApiName::SetFeature, RuntimeVersion::Latest, &with_value))
            .unwrap();
        assert_eq!(
            store.apply(&call(ApiName::IsFeatureEnabled, RuntimeVersion::V0116, &flag)).unwrap(),
            Response::String("true".into())
        );

        store
            .apply(&call(ApiName::DeleteFeature, RuntimeVersion::V0280, &flag))
            .unwrap();
        assert!(matches!(
            store.apply(&call(ApiName::IsFeatureEnabled, RuntimeVersion::Latest, &flag)).unwrap(),
            Response::Error(ref message) if message.contains("not found")
        ));
        assert!(store.config.features.is_empty());
    }

    #[test]
    fn test_discovery_sources_split_by_generation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let source = PluginDiscoveryOpts::oci("source", "image");
        store
            .apply(&call(
                ApiName::SetCLIDiscoverySource,
                RuntimeVersion::Latest,
                &[(ArgumentKey::DiscoverySource, ArgumentValue::yaml(&source).unwrap())],
            ))
            .unwrap();

        let name = [(ArgumentKey::Name, ArgumentValue::from("source"))];
        assert_eq!(
            store
                .apply(&call(ApiName::GetCLIDiscoverySource, RuntimeVersion::V090, &name))
                .unwrap(),
            mapping(&source).unwrap()
        );
        assert_eq!(
            store
                .apply(&call(ApiName::GetCLIDiscoverySource, RuntimeVersion::V0280, &name))
                .unwrap(),
            Response::Error(DISCOVERY_SOURCE_NOT_FOUND.into())
        );
    }

    #[test]
    fn test_client_config_keys_current_context_per_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let config = ClientConfigOpts {
            known_contexts: vec![kubernetes_context()],
            current_context: BTreeMap::from([(Target::Kubernetes.into(), "ctx".to_string())]),
            ..Default::default()
        };
        store
            .apply(&call(
                ApiName::StoreClientConfig,
                RuntimeVersion::V0280,
                &[(ArgumentKey::ClientConfig, ArgumentValue::yaml(&config).unwrap())],
            ))
            .unwrap();

        let legacy = store.client_config(RuntimeVersion::V0254);
        assert_eq!(
            legacy.current_context,
            BTreeMap::from([(CurrentContextKey::from(ContextType::K8s), "ctx".to_string())])
        );
        assert_eq!(legacy.known_contexts[0].legacy_type, Some(ContextType::K8s));
        assert_eq!(store.client_config(RuntimeVersion::Latest), config);
        assert!(store.client_config(RuntimeVersion::V0116).known_contexts.is_empty());
    }

    #[test]
    fn test_unsupported_api_is_an_error_response() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        let response = store
            .apply(&call(ApiName::GetContext, RuntimeVersion::V0116, &[named("ctx")]))
            .unwrap();
        assert!(matches!(response, Response::Error(ref m) if m.contains("not supported")));
    }

    #[test]
    fn test_metadata_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(&dir);
        store
            .apply(&call(
                ApiName::SetConfigMetadataSetting,
                RuntimeVersion::V090,
                &[
                    (ArgumentKey::SettingKey, UNIFIED_CONFIG_SETTING.into()),
                    (ArgumentKey::SettingValue, "true".into()),
                ],
            ))
            .unwrap();
        assert_eq!(
            store.apply(&call(ApiName::UseUnifiedConfig, RuntimeVersion::Latest, &[])).unwrap(),
            Response::String("true".into())
        );

        store
            .apply(&call(
                ApiName::DeleteConfigMetadataSetting,
                RuntimeVersion::Latest,
                &[(ArgumentKey::SettingKey, UNIFIED_CONFIG_SETTING.into())],
            ))
            .unwrap();
        assert!(matches!(
            store
                .apply(&call(
                    ApiName::GetConfigMetadataSetting,
                    RuntimeVersion::V0280,
                    &[(ArgumentKey::SettingKey, UNIFIED_CONFIG_SETTING.into())],
                ))
                .unwrap(),
            Response::Error(_)
        ));
    }
}
