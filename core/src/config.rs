use crate::auth::Role;
use serde::{Deserialize, Serialize};

// ── SharePoint / Graph ─────────────────────────────────────────────

/// Workbook file name and worksheet name for one metric feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetLocation {
    pub file: String,
    pub sheet: String,
}

/// `client_id`, `tenant_id` and `scopes` describe the app registration a
/// token must be acquired for; the core never performs that sign-in itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePointConfig {
    pub client_id: String,
    pub tenant_id: String,
    pub site_url: String,
    pub library_name: String,
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
    pub lag_measures: SheetLocation,
    pub lead_measures: SheetLocation,
    pub wig_metrics: SheetLocation,
    pub activity_data: SheetLocation,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl SharePointConfig {
    /// Azure AD authority for the configured tenant.
    pub fn authority(&self) -> String {
        format!("https://login.microsoftonline.com/{}", self.tenant_id)
    }
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://graph.microsoft.com/Sites.Read.All".into(),
        "https://graph.microsoft.com/Files.Read.All".into(),
        "User.Read".into(),
    ]
}

// ── Refresh policy ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Periodic refetch interval.
    pub interval_secs: u64,
    /// Age after which fetched data counts as stale.
    pub stale_after_secs: u64,
}

// ── Health bands ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthThresholds {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
}

// ── Overview ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewConfig {
    /// Target for the live Activity card (count of activity rows).
    pub activity_target: f64,
    /// Departments listed in the CEO executive summary.
    pub summary_departments: Vec<String>,
    /// Subject of the health card for the CEO role.
    pub organization_label: String,
}

// ── Users ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub role: Role,
    pub departments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDirectoryConfig {
    pub shared_password: String,
    pub users: Vec<UserEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    refresh: RefreshConfig,
    health: HealthThresholds,
    overview: OverviewConfig,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub sharepoint: SharePointConfig,
    pub refresh: RefreshConfig,
    pub health: HealthThresholds,
    pub overview: OverviewConfig,
    pub directory: UserDirectoryConfig,
}

impl DashboardConfig {
    /// Load from the data/ directory.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let dash_path = format!("{data_dir}/dashboard.json");
        let dash_content = std::fs::read_to_string(&dash_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {dash_path}: {e}"))?;
        let dash_file: DashboardFile = serde_json::from_str(&dash_content)?;

        let sp_path = format!("{data_dir}/sharepoint.json");
        let sp_content = std::fs::read_to_string(&sp_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {sp_path}: {e}"))?;
        let sharepoint: SharePointConfig = serde_json::from_str(&sp_content)?;

        let users_path = format!("{data_dir}/users.json");
        let users_content = std::fs::read_to_string(&users_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {users_path}: {e}"))?;
        let directory: UserDirectoryConfig = serde_json::from_str(&users_content)?;

        if dash_file.refresh.interval_secs == 0 {
            anyhow::bail!("{dash_path}: refresh.interval_secs must be > 0");
        }

        Ok(Self {
            sharepoint,
            refresh: dash_file.refresh,
            health: dash_file.health,
            overview: dash_file.overview,
            directory,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let sheet = |file: &str, sheet: &str| SheetLocation {
            file: file.into(),
            sheet: sheet.into(),
        };
        let department = |name: &str, dept: &str| UserEntry {
            username: name.into(),
            role: Role::Department,
            departments: vec![dept.into()],
        };

        Self {
            sharepoint: SharePointConfig {
                client_id: "test-client".into(),
                tenant_id: "test-tenant".into(),
                site_url: "https://contoso.sharepoint.com/sites/FourDX".into(),
                library_name: "4DXData".into(),
                graph_base_url: default_graph_base_url(),
                lag_measures: sheet("LAG_Measures.xlsx", "LAG Data"),
                lead_measures: sheet("LEAD_Measures.xlsx", "LEAD Data"),
                wig_metrics: sheet("WIG_Metrics.xlsx", "WIG Data"),
                activity_data: sheet("Activity_Data.xlsx", "Activity Data"),
                scopes: default_scopes(),
            },
            refresh: RefreshConfig {
                interval_secs: 5 * 60,
                stale_after_secs: 2 * 60,
            },
            health: HealthThresholds {
                excellent: 80,
                good: 60,
                fair: 40,
            },
            overview: OverviewConfig {
                activity_target: 150.0,
                summary_departments: vec![
                    "HR".into(),
                    "Finance".into(),
                    "Operations".into(),
                    "Marketing".into(),
                ],
                organization_label: "Organization".into(),
            },
            directory: UserDirectoryConfig {
                shared_password: "password123".into(),
                users: vec![
                    UserEntry {
                        username: "CEO".into(),
                        role: Role::Ceo,
                        departments: vec!["all".into()],
                    },
                    department("hr", "HR"),
                    department("finance", "Finance"),
                    department("operations", "Operations"),
                    department("marketing", "Marketing"),
                ],
            },
        }
    }
}
