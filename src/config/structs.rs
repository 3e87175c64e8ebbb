use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀（`TL__SERVER__PORT=9000`）
pub const ENV_PREFIX: &str = "TL";

/// 静态配置（从 TOML 与环境变量加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量、对外访问地址
/// - database: 数据库连接与重试
/// - logging: 日志
/// - auth: 管理接口 JWT
/// - analytics: funnel 窗口与事件写入超时
/// - notify: 线索邮件通知
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl StaticConfig {
    /// 从默认路径加载
    pub fn load() -> Self {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：TL，分隔符：__
    /// 示例：TL__SERVER__PORT=9999
    pub fn load_from(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 对外访问地址，用于 vCard 与邮件中的链接
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// 允许跨域的来源；为空时只允许同源，`["*"]` 表示任意来源
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 管理接口认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 签名密钥；为空时启动随机生成，重启后旧 token 失效
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_minutes")]
    pub token_minutes: u64,
}

/// Funnel 与事件记录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_funnel_days")]
    pub default_days: u32,
    #[serde(default = "default_funnel_max_days")]
    pub max_days: u32,
    /// best-effort 事件写入的上限耗时
    #[serde(default = "default_event_write_timeout_ms")]
    pub event_write_timeout_ms: u64,
}

/// 线索邮件通知配置（Resend 兼容接口）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_notify_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_notify_from")]
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,
}

impl NotifyConfig {
    /// api_key 与收件人都配置时才会真正发送
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
            && self.to.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://taplinker.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_token_minutes() -> u64 {
    60 * 24
}

fn default_funnel_days() -> u32 {
    30
}

fn default_funnel_max_days() -> u32 {
    365
}

fn default_event_write_timeout_ms() -> u64 {
    2000
}

fn default_notify_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_notify_from() -> String {
    "Taplinker <leads@taplinker.local>".to_string()
}

fn default_notify_timeout_secs() -> u64 {
    10
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_base_url: default_public_base_url(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_minutes: default_token_minutes(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_days: default_funnel_days(),
            max_days: default_funnel_max_days(),
            event_write_timeout_ms: default_event_write_timeout_ms(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_url: default_notify_api_url(),
            api_key: None,
            from: default_notify_from(),
            to: None,
            timeout_secs: default_notify_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[analytics]"));
        assert!(sample.contains("default_days = 30"));

        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.analytics.max_days, 365);
        assert_eq!(parsed.notify.api_url, "https://api.resend.com/emails");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [analytics]
            default_days = 7
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.port, 9000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.analytics.default_days, 7);
        assert_eq!(parsed.analytics.max_days, 365);
        assert_eq!(parsed.database.retry_count, 3);
    }

    #[test]
    fn test_notify_requires_key_and_recipient() {
        let mut notify = NotifyConfig::default();
        assert!(!notify.is_configured());

        notify.api_key = Some("re_123".to_string());
        assert!(!notify.is_configured());

        notify.to = Some("   ".to_string());
        assert!(!notify.is_configured());

        notify.to = Some("office@example.com".to_string());
        assert!(notify.is_configured());
    }
}
