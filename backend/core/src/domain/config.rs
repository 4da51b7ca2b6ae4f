// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Lunch & Learn Configuration Types
//
// Manifest-style configuration (apiVersion/kind/metadata/spec) covering:
// - Collection names used to scope id allocation
// - Paging defaults and the fallback sort orders
// - Notification dispatch and mail settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::entity::EntityKind;
use crate::domain::page::{Sort, SortOrder, SortPolicy};

pub const API_VERSION: &str = "100monkeys.ai/v1";
pub const CONFIG_KIND: &str = "LunchLearnConfig";

/// Top-level configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LunchLearnConfig {
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    pub kind: String,

    pub metadata: ConfigMetadata,

    pub spec: LunchLearnSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LunchLearnSpec {
    #[serde(default)]
    pub collections: CollectionNames,

    #[serde(default)]
    pub paging: PagingConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Allocator scope per entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionNames {
    #[serde(default = "default_training_collection")]
    pub training: String,
    #[serde(default = "default_topic_collection")]
    pub topic: String,
    #[serde(default = "default_comment_collection")]
    pub comment: String,
    #[serde(default = "default_feedback_collection")]
    pub feedback: String,
    #[serde(default = "default_employee_collection")]
    pub employee: String,
}

impl CollectionNames {
    /// Collection that scopes id allocation for `kind`.
    ///
    /// Employees are keyed by their external guid and attachments by file
    /// name, so neither draws from the allocator.
    pub fn allocation_scope(&self, kind: EntityKind) -> Option<&str> {
        match kind {
            EntityKind::Training => Some(&self.training),
            EntityKind::Topic => Some(&self.topic),
            EntityKind::Comment => Some(&self.comment),
            EntityKind::Feedback => Some(&self.feedback),
            EntityKind::Employee | EntityKind::Attachment => None,
        }
    }
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            training: default_training_collection(),
            topic: default_topic_collection(),
            comment: default_comment_collection(),
            feedback: default_feedback_collection(),
            employee: default_employee_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Order used for plain listings and empty search terms
    #[serde(default = "default_sort_orders")]
    pub default_sort: Vec<SortOrder>,

    /// Order used for non-empty search terms
    #[serde(default = "score_sort_orders")]
    pub score_sort: Vec<SortOrder>,
}

impl PagingConfig {
    pub fn sort_policy(&self) -> SortPolicy {
        SortPolicy {
            default: Sort {
                orders: self.default_sort.clone(),
            },
            score: Sort {
                orders: self.score_sort.clone(),
            },
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_sort: default_sort_orders(),
            score_sort: score_sort_orders(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Broadcast channel capacity; slow dispatchers lag past this
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,

    #[serde(default)]
    pub mail: MailConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            event_bus_capacity: default_event_bus_capacity(),
            mail: MailConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_mail_from")]
    pub from: String,

    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,

    /// Recipients of administrative notices (new topics, new employees)
    #[serde(default)]
    pub admin_recipients: Vec<String>,

    /// Domain appended to employee guids to form a mail address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_domain: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: default_mail_from(),
            subject_prefix: default_subject_prefix(),
            admin_recipients: Vec::new(),
            recipient_domain: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_training_collection() -> String {
    "training".to_string()
}

fn default_topic_collection() -> String {
    "topic".to_string()
}

fn default_comment_collection() -> String {
    "comment".to_string()
}

fn default_feedback_collection() -> String {
    "feedback".to_string()
}

fn default_employee_collection() -> String {
    "employee".to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    200
}

fn default_sort_orders() -> Vec<SortOrder> {
    SortPolicy::default().default.orders
}

fn score_sort_orders() -> Vec<SortOrder> {
    SortPolicy::default().score.orders
}

fn default_event_bus_capacity() -> usize {
    1000
}

fn default_mail_from() -> String {
    "lunch-and-learn@localhost".to_string()
}

fn default_subject_prefix() -> String {
    "[Lunch & Learn]".to_string()
}

impl Default for LunchLearnConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: CONFIG_KIND.to_string(),
            metadata: ConfigMetadata {
                name: "lunch-and-learn".to_string(),
                version: Some("1.0.0".to_string()),
            },
            spec: LunchLearnSpec::default(),
        }
    }
}

impl LunchLearnConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. LUNCHLEARN_CONFIG_PATH environment variable
    /// 2. ./lunchlearn-config.yaml (working directory)
    /// 3. ~/.lunchlearn/config.yaml (user home)
    /// 4. /etc/lunchlearn/config.yaml (system, Unix) or C:\ProgramData\LunchLearn\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LUNCHLEARN_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./lunchlearn-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".lunchlearn").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/lunchlearn/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\LunchLearn\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must load
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LUNCHLEARN_DEFAULT_PAGE_SIZE") {
            match val.trim().parse::<usize>() {
                Ok(size) => {
                    tracing::info!("Environment override: LUNCHLEARN_DEFAULT_PAGE_SIZE={}", size);
                    self.spec.paging.default_page_size = size;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for LUNCHLEARN_DEFAULT_PAGE_SIZE: '{}'. Expected a positive integer. Ignoring.",
                        val
                    );
                }
            }
        }

        if let Ok(val) = std::env::var("LUNCHLEARN_NOTIFICATIONS_ENABLED") {
            match parse_flag(&val) {
                Some(enabled) => {
                    tracing::info!("Environment override: LUNCHLEARN_NOTIFICATIONS_ENABLED={}", enabled);
                    self.spec.notifications.enabled = enabled;
                }
                None => {
                    tracing::warn!(
                        "Invalid value for LUNCHLEARN_NOTIFICATIONS_ENABLED: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != CONFIG_KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, CONFIG_KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let collections = &self.spec.collections;
        let names = [
            ("training", &collections.training),
            ("topic", &collections.topic),
            ("comment", &collections.comment),
            ("feedback", &collections.feedback),
            ("employee", &collections.employee),
        ];
        for (key, name) in &names {
            if name.trim().is_empty() {
                anyhow::bail!("spec.collections.{} cannot be empty", key);
            }
        }
        for (i, (key, name)) in names.iter().enumerate() {
            if let Some((other, _)) = names[i + 1..].iter().find(|(_, n)| n == name) {
                anyhow::bail!(
                    "spec.collections.{} and spec.collections.{} share the name '{}'",
                    key,
                    other,
                    name
                );
            }
        }

        let paging = &self.spec.paging;
        if paging.default_page_size == 0 {
            anyhow::bail!("spec.paging.default_page_size must be greater than zero");
        }
        if paging.default_page_size > paging.max_page_size {
            anyhow::bail!(
                "spec.paging.default_page_size ({}) exceeds max_page_size ({})",
                paging.default_page_size,
                paging.max_page_size
            );
        }
        if paging.default_sort.is_empty() || paging.score_sort.is_empty() {
            anyhow::bail!("spec.paging sort orders cannot be empty");
        }
        if let Some(order) = paging
            .default_sort
            .iter()
            .chain(&paging.score_sort)
            .find(|o| o.property.trim().is_empty())
        {
            anyhow::bail!("Sort property cannot be empty (direction {:?})", order.direction);
        }

        let notifications = &self.spec.notifications;
        if notifications.event_bus_capacity == 0 {
            anyhow::bail!("spec.notifications.event_bus_capacity must be greater than zero");
        }
        if notifications.mail.from.trim().is_empty() {
            anyhow::bail!("spec.notifications.mail.from cannot be empty");
        }

        Ok(())
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
